//! Error types for option parsing and command resolution.
//!
//! Option errors are collected per command level. [`flatten`] turns the
//! collected list into a result: no errors is success, one error surfaces as
//! [`ParseError::Single`], more than one as [`ParseError::Multiple`].

use std::fmt;
use std::io;

use thiserror::Error;

use crate::value::ValueError;

/// A failure attributed to a single option token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    /// The token names no declared option.
    #[error("unrecognized option {option}")]
    Unrecognized {
        /// The token as written, including dashes.
        option: String,
    },
    /// The token is a prefix of more than one option's names.
    #[error("ambiguous option {option} (could be {})", .candidates.join(", "))]
    Ambiguous {
        /// The token as written, including dashes.
        option: String,
        /// Display names of every option the prefix matched.
        candidates: Vec<String>,
    },
    /// A parameter was attached to an option that takes none.
    #[error("option {} requires no parameter", display_name(.option))]
    ParameterNotAllowed {
        /// Identity of the option.
        option: String,
    },
    /// A mandatory parameter was not supplied.
    #[error("no parameter for option {}", display_name(.option))]
    MissingParameter {
        /// Identity of the option.
        option: String,
    },
    /// The option's setter rejected the parameter.
    #[error("error setting value {param:?} for option {}: {source}", display_name(.option))]
    SetValueFailed {
        /// Identity of the option.
        option: String,
        /// The parameter handed to the setter.
        param: String,
        /// The setter's own error.
        #[source]
        source: ValueError,
    },
}

fn display_name(option: &str) -> String {
    if option.chars().count() == 1 {
        format!("-{option}")
    } else {
        format!("--{option}")
    }
}

impl OptionError {
    /// Returns the option identity this error is attributed to.
    ///
    /// For resolved options this is the primary long name, or the short
    /// letter when the option was addressed in short form. For unresolved
    /// tokens it is the token itself.
    pub fn option(&self) -> &str {
        match self {
            Self::Unrecognized { option }
            | Self::Ambiguous { option, .. }
            | Self::ParameterNotAllowed { option }
            | Self::MissingParameter { option }
            | Self::SetValueFailed { option, .. } => option,
        }
    }

    /// Returns `true` when the token could not be resolved to one option.
    ///
    /// Ambiguous prefixes count as unrecognized here; match on the variant to
    /// tell them apart.
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Self::Unrecognized { .. } | Self::Ambiguous { .. })
    }
}

/// Accumulated option errors of one parsing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Exactly one error.
    Single(OptionError),
    /// Two or more errors in discovery order.
    Multiple(Vec<OptionError>),
}

impl ParseError {
    /// Returns the contained errors in discovery order.
    pub fn errors(&self) -> &[OptionError] {
        match self {
            Self::Single(err) => std::slice::from_ref(err),
            Self::Multiple(errs) => errs,
        }
    }

    /// Returns the first error.
    pub fn first(&self) -> &OptionError {
        match self {
            Self::Single(err) => err,
            // Multiple is only built from lists longer than one.
            Self::Multiple(errs) => &errs[0],
        }
    }

    /// Returns `true` if any contained error is attributed to `option`.
    pub fn has_error_for(&self, option: &str) -> bool {
        self.errors().iter().any(|err| err.option() == option)
    }

    /// Returns the number of contained errors.
    pub fn len(&self) -> usize {
        self.errors().len()
    }

    /// Always `false`; an empty list flattens to success.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors().iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Single(err) => Some(err),
            Self::Multiple(_) => None,
        }
    }
}

impl From<OptionError> for ParseError {
    fn from(err: OptionError) -> Self {
        Self::Single(err)
    }
}

/// Applies the zero/one/many rule to an error list.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{OptionError, ParseError, flatten};
///
/// assert_eq!(flatten(Vec::new()), Ok(()));
///
/// let missing = OptionError::MissingParameter { option: "s".into() };
/// assert_eq!(
///     flatten(vec![missing.clone()]),
///     Err(ParseError::Single(missing.clone()))
/// );
///
/// let unknown = OptionError::Unrecognized { option: "-x".into() };
/// let err = flatten(vec![missing, unknown]).unwrap_err();
/// assert!(err.has_error_for("s"));
/// assert!(err.has_error_for("-x"));
/// assert_eq!(err.len(), 2);
/// ```
///
/// # Errors
///
/// Returns a [`ParseError`] when `errors` is not empty.
pub fn flatten(mut errors: Vec<OptionError>) -> Result<(), ParseError> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(ParseError::Single(errors.remove(0))),
        _ => Err(ParseError::Multiple(errors)),
    }
}

/// Errors produced while resolving or running a command tree.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Option errors of the root command.
    #[error(transparent)]
    Options(ParseError),
    /// Option errors of a subcommand.
    #[error("{command}: {source}")]
    InCommand {
        /// Name of the command whose options failed.
        command: String,
        /// The accumulated option errors.
        #[source]
        source: ParseError,
    },
    /// A positional argument is a prefix of several subcommands.
    #[error("unrecognized command {name} (could be {})", .candidates.join(", "))]
    UnrecognizedCommand {
        /// The argument as written.
        name: String,
        /// Names of the subcommands it prefixes.
        candidates: Vec<String>,
    },
    /// The resolved command has no action.
    #[error("{command}: couldn't find executable subcommand")]
    NoExecutableCommand {
        /// Name of the resolved command.
        command: String,
    },
    /// The resolved command's action failed.
    #[error("{command}: {source}")]
    ExecFailed {
        /// Name of the command that ran.
        command: String,
        /// The action's error.
        #[source]
        source: ExecError,
    },
    /// Writing documentation failed.
    #[error("failed to write documentation: {0}")]
    Output(#[from] io::Error),
}

impl CommandError {
    /// Returns the option errors, if this is an option failure at any level.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Options(err) | Self::InCommand { source: err, .. } => Some(err),
            _ => None,
        }
    }
}

/// Boxed error returned by command actions.
pub type ExecError = Box<dyn std::error::Error + Send + Sync>;
