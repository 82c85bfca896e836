//! Command-line option parsing over a tree of subcommands.
//!
//! This crate provides the engine behind a command-line surface:
//!
//! - [`OptionSpec`]: an option with long names, short letters, an arity and
//!   an action that writes through an [`OptionValue`] into state the caller
//!   owns (usually a [`Binding`]).
//! - [`OptionSet`]: the options of one command, with unique-prefix
//!   matching ([`OptionSet::find_long`]) and parsing ([`OptionSet::parse`]).
//! - [`CommandTree`]: an arena of [`Command`]s. [`CommandTree::resolve`]
//!   walks the tree, [`CommandTree::run`] executes the command reached, and
//!   [`CommandTree::render_doc`] renders man-page style documentation.
//!
//! Option errors of one command are collected rather than stopping at the
//! first bad token; [`ParseError`] holds one or many [`OptionError`]s.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::*;
//!
//! let verbose = Binding::new(false);
//! let output = Binding::new(String::new());
//!
//! let mut tree = CommandTree::new(
//!     Command::new("tool")
//!         .with_option(OptionSpec::boolean(&verbose, "verbose", Some('v'), "talk more")),
//! );
//! let root = tree.root();
//! let build = tree.add_subcommand(
//!     root,
//!     Command::new("build")
//!         .with_info("builds things")
//!         .with_option(OptionSpec::string(&output, "output", Some('o'), "target file"))
//!         .with_exec(|args| {
//!             assert_eq!(args, ["main.c"]);
//!             Ok(())
//!         }),
//! );
//!
//! let resolution = tree.resolve(&["-v", "bu", "--out=a.out", "main.c"]);
//! assert!(resolution.is_ok());
//! assert_eq!(resolution.path, vec![root, build]);
//! assert_eq!(resolution.consumed, 3);
//! assert!(verbose.get());
//! assert_eq!(output.get(), "a.out");
//!
//! tree.run(&["build", "-o", "b.out", "main.c"], &mut std::io::sink()).unwrap();
//! assert_eq!(output.get(), "b.out");
//! ```

mod command;
mod doc;
mod error;
mod matcher;
mod option;
mod parser;
mod resolve;
mod value;

pub use command::{Command, CommandAction, CommandId, CommandTree, ExecFn};
pub use doc::DOC_INDENT;
pub use error::{CommandError, ExecError, OptionError, ParseError, flatten};
pub use matcher::{Match, OptionSet};
pub use option::{OptionAction, OptionSpec};
pub use parser::{ParseContext, ParseOutcome};
pub use resolve::{HELP_COMMAND, Resolution};
pub use value::{
    Binding, BoolValue, FloatValue, FnValue, IntValue, OptionValue, StringValue, ValueError, parse_int,
};
