//! Definition validation.
//!
//! Catches definitions that would build a tree with unreachable or
//! misbehaving options: bad names, duplicates, names shadowed by the
//! unique-prefix rule, and defaults that do not parse. Every problem is
//! reported; validation does not stop at the first one.
//!
//! # Examples
//!
//! ```
//! use cmdtree_surface::*;
//!
//! let def = CommandDef::from_yaml_str(
//!     "name: tool\noptions:\n  - name: verbose\n    short: v\n",
//! )
//! .unwrap();
//! assert!(validate_definition(&def).is_empty());
//!
//! // `str` is a prefix of `string`, so `--str` could never be matched.
//! let def = CommandDef::from_yaml_str(
//!     "name: tool\noptions:\n  - name: str\n    type: string\n  - name: string\n    type: string\n",
//! )
//! .unwrap();
//! let errors = validate_definition(&def);
//! assert!(matches!(errors[0], ValidationError::ShadowedOption { .. }));
//! ```

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use cmdtree_core::parse_int;

use crate::definition::{CommandDef, OptionDef, ValueKind};

/// Definition validation errors.
///
/// `command` is the space-separated path from the root to the command the
/// problem belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A subcommand has an empty name.
    #[error("{command}: subcommand name cannot be empty")]
    EmptySubcommandName {
        /// Path of the parent command.
        command: String,
    },
    /// An option has no long name, short letter or alias.
    #[error("{command}: option must define a name, short letter or alias")]
    MissingOptionName {
        /// Path of the command.
        command: String,
    },
    /// A short letter is not a single alphanumeric character.
    #[error("{command}: invalid short option {short:?}")]
    InvalidShort {
        /// Path of the command.
        command: String,
        /// The letter as written.
        short: String,
    },
    /// A long name is empty, starts with `-`, or contains `=` or whitespace.
    #[error("{command}: invalid long option name {name:?}")]
    InvalidLongName {
        /// Path of the command.
        command: String,
        /// The name as written.
        name: String,
    },
    /// Two options of one command share a name or letter.
    #[error("{command}: duplicate option {option}")]
    DuplicateOption {
        /// Path of the command.
        command: String,
        /// The shared name, with dashes.
        option: String,
    },
    /// Two subcommands of one command share a name.
    #[error("{command}: duplicate subcommand {name}")]
    DuplicateSubcommand {
        /// Path of the parent command.
        command: String,
        /// The shared name.
        name: String,
    },
    /// A long name is a strict prefix of another option's long name.
    #[error("{command}: option --{name} is a prefix of --{other} and can never be matched")]
    ShadowedOption {
        /// Path of the command.
        command: String,
        /// The shadowed name.
        name: String,
        /// The longer name.
        other: String,
    },
    /// A subcommand name is a strict prefix of a sibling's name.
    #[error("{command}: subcommand {name} is a prefix of {other} and can never be matched")]
    ShadowedSubcommand {
        /// Path of the parent command.
        command: String,
        /// The shadowed name.
        name: String,
        /// The longer name.
        other: String,
    },
    /// A `bool` option declares a parameter.
    #[error("{command}: flag {option} cannot take a parameter")]
    FlagWithParameter {
        /// Path of the command.
        command: String,
        /// Identity of the option.
        option: String,
    },
    /// A default does not parse as the option's kind.
    #[error("{command}: invalid default {default:?} for option {option}: {reason}")]
    InvalidDefault {
        /// Path of the command.
        command: String,
        /// Identity of the option.
        option: String,
        /// The default as written.
        default: String,
        /// Why it was rejected.
        reason: String,
    },
    /// `help` is set on a subcommand.
    #[error("{command}: help can only be enabled on the root command")]
    HelpOnSubcommand {
        /// Path of the command.
        command: String,
    },
}

/// Validates a definition tree.
///
/// Returns an empty list when the definition is valid.
pub fn validate_definition(def: &CommandDef) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut path = vec![def.name.clone()];
    validate_command(def, &mut path, &mut errors);
    errors
}

fn validate_command(def: &CommandDef, path: &mut Vec<String>, errors: &mut Vec<ValidationError>) {
    let command = path.join(" ");

    if path.len() > 1 && def.help {
        errors.push(ValidationError::HelpOnSubcommand {
            command: command.clone(),
        });
    }

    validate_options(&def.options, &command, errors);

    let mut seen: HashSet<&str> = HashSet::new();
    for sub in &def.subcommands {
        if sub.name.is_empty() {
            errors.push(ValidationError::EmptySubcommandName {
                command: command.clone(),
            });
        } else if !seen.insert(sub.name.as_str()) {
            errors.push(ValidationError::DuplicateSubcommand {
                command: command.clone(),
                name: sub.name.clone(),
            });
        }
    }

    let names: Vec<(&str, usize)> = seen.into_iter().zip(0..).collect();
    for (name, other) in shadowed(&names) {
        errors.push(ValidationError::ShadowedSubcommand {
            command: command.clone(),
            name,
            other,
        });
    }

    for sub in &def.subcommands {
        path.push(sub.name.clone());
        validate_command(sub, path, errors);
        path.pop();
    }
}

fn validate_options(options: &[OptionDef], command: &str, errors: &mut Vec<ValidationError>) {
    let mut longs: HashMap<&str, usize> = HashMap::new();
    let mut shorts: HashSet<&str> = HashSet::new();

    for (index, opt) in options.iter().enumerate() {
        let long_names = std::iter::once(&opt.name)
            .filter(|name| !name.is_empty())
            .chain(opt.aliases.iter());
        let short_names = opt.short.iter().chain(opt.short_aliases.iter());

        if opt.key().is_empty() {
            errors.push(ValidationError::MissingOptionName {
                command: command.to_string(),
            });
        }

        for name in long_names {
            if !is_valid_long(name) {
                errors.push(ValidationError::InvalidLongName {
                    command: command.to_string(),
                    name: name.clone(),
                });
            } else if longs.insert(name.as_str(), index).is_some() {
                errors.push(ValidationError::DuplicateOption {
                    command: command.to_string(),
                    option: format!("--{name}"),
                });
            }
        }

        for short in short_names {
            if !is_valid_short(short) {
                errors.push(ValidationError::InvalidShort {
                    command: command.to_string(),
                    short: short.clone(),
                });
            } else if !shorts.insert(short.as_str()) {
                errors.push(ValidationError::DuplicateOption {
                    command: command.to_string(),
                    option: format!("-{short}"),
                });
            }
        }

        if !opt.kind.takes_param() && (opt.optional_param || opt.param_type.is_some()) {
            errors.push(ValidationError::FlagWithParameter {
                command: command.to_string(),
                option: opt.key(),
            });
        }

        if let Some(default) = &opt.default {
            if let Err(reason) = check_default(opt.kind, default) {
                errors.push(ValidationError::InvalidDefault {
                    command: command.to_string(),
                    option: opt.key(),
                    default: default.clone(),
                    reason,
                });
            }
        }
    }

    // Exact duplicates were reported above; only strict prefixes remain.
    let names: Vec<(&str, usize)> = longs.into_iter().collect();
    for (name, other) in shadowed(&names) {
        errors.push(ValidationError::ShadowedOption {
            command: command.to_string(),
            name,
            other,
        });
    }
}

/// Returns `(short, long)` pairs of names owned by different entries where
/// `short` is a strict prefix of `long`, sorted for stable reporting.
fn shadowed(names: &[(&str, usize)]) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = names
        .iter()
        .flat_map(|&(a, owner)| {
            names
                .iter()
                .filter(move |&&(b, other)| other != owner && b.len() > a.len() && b.starts_with(a))
                .map(move |&(b, _)| (a.to_string(), b.to_string()))
        })
        .collect();
    pairs.sort();
    pairs
}

fn is_valid_long(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('-') && !name.contains('=') && !name.chars().any(char::is_whitespace)
}

fn is_valid_short(short: &str) -> bool {
    let mut chars = short.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphanumeric())
}

fn check_default(kind: ValueKind, default: &str) -> Result<(), String> {
    match kind {
        ValueKind::Bool => Err("flags take no default".to_string()),
        ValueKind::String => Ok(()),
        ValueKind::Int => parse_int(default).map(drop).map_err(|err| err.to_string()),
        ValueKind::Float => default
            .trim()
            .parse::<f64>()
            .map(drop)
            .map_err(|err| err.to_string()),
    }
}
