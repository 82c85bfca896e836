//! Declarative command-line surfaces.
//!
//! A [`CommandDef`] describes a command tree in YAML or JSON: names,
//! summaries, options with their value kinds and defaults, and nested
//! subcommands. [`validate_definition`] reports structural problems, and
//! [`Surface::build`] turns a valid definition into a
//! [`CommandTree`](cmdtree_core::CommandTree) whose options write into typed
//! bindings.
//!
//! # Example
//!
//! ```
//! use cmdtree_surface::*;
//!
//! let def = CommandDef::from_yaml_str(r#"
//! name: tool
//! options:
//!   - name: verbose
//!     short: v
//! subcommands:
//!   - name: build
//!     options:
//!       - name: output
//!         short: o
//!         type: string
//!         default: a.out
//! "#).unwrap();
//! assert!(validate_definition(&def).is_empty());
//!
//! let mut surface = Surface::build(&def).unwrap();
//! let report = surface.parse(&["-v", "build", "main.c"]);
//! assert_eq!(report.path, vec!["tool", "build"]);
//! assert_eq!(report.remaining, vec!["main.c"]);
//! assert_eq!(report.options[0].values["verbose"], true);
//! assert_eq!(report.options[1].values["output"], "a.out");
//! ```

mod build;
mod definition;
mod error;
mod validate;

pub use build::{BoundValue, CommandValues, ParseReport, Surface};
pub use definition::{CommandDef, OptionDef, ValueKind};
pub use error::{Result, SurfaceError};
pub use validate::{ValidationError, validate_definition};
