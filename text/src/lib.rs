//! Prose tokenizing and reflow for command documentation.
//!
//! Descriptions are written as loose prose: ordinary lines are reflowed,
//! blank lines separate paragraphs and indented lines are kept verbatim.
//! This crate provides the two stages of that pipeline:
//!
//! - [`Lexer`]: turns a string into [`Token`]s.
//! - [`LineFormatter`] / [`format_text`] / [`reflow`]: packs tokens into
//!   indented lines of a fixed width.
//!
//! # Example
//!
//! ```
//! use cmdtree_text::reflow;
//!
//! let description = "\
//! Copies files from one place to another.
//!
//! Example:
//!   cp -r src dst
//! ";
//!
//! assert_eq!(
//!     reflow(description, 30, "    "),
//!     "    Copies files from one\n    place to another.\n\n    Example:\n      cp -r src dst\n"
//! );
//! ```

mod format;
mod lexer;

pub use format::{DEFAULT_WIDTH, LineFormatter, VERBATIM_INDENT, display_width, format_text, reflow};
pub use lexer::{Lexer, Token};
