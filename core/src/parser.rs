//! Option parsing for a single command level.
//!
//! [`OptionSet::parse`] walks the arguments left to right and stops at the
//! first argument that is not an option, at `-` (left in place) or after
//! `--` (consumed). Errors do not stop the walk: each failing token is
//! recorded and parsing resumes with the next argument.
//!
//! Accepted syntax:
//!
//! | Form            | Meaning                                               |
//! |-----------------|-------------------------------------------------------|
//! | `--name`        | flag, or option with an optional parameter left out   |
//! | `--name=value`  | parameter attached                                    |
//! | `--name value`  | parameter in the next argument                        |
//! | `--na`          | any unique prefix of a long name                      |
//! | `-x`            | short option                                          |
//! | `-xyz`          | cluster of short flags                                |
//! | `-xvalue`       | short option with the rest of the token as parameter  |
//! | `-x value`      | short option with the parameter in the next argument  |

use tracing::{debug, trace};

use crate::error::{OptionError, ParseError, flatten};
use crate::matcher::{Match, OptionSet};
use crate::option::OptionAction;

/// State threaded through a parsing pass and handed back to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseContext {
    /// Set when a help option occurred.
    pub help_requested: bool,
}

/// Result of parsing the options of one command level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Number of arguments consumed, including a terminating `--`.
    pub consumed: usize,
    /// Accumulated errors, flattened.
    pub result: Result<(), ParseError>,
}

impl ParseOutcome {
    /// Returns `true` if no option failed.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Result of handling one option token.
struct Step {
    used: usize,
    result: Result<(), OptionError>,
}

impl Step {
    fn new(used: usize, result: Result<(), OptionError>) -> Self {
        Self { used, result }
    }
}

fn looks_like_option(arg: &str) -> bool {
    arg.starts_with('-')
}

impl OptionSet {
    /// Parses leading options of `args`, invoking setters as they occur.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdtree_core::{Binding, OptionSet, OptionSpec, ParseContext};
    ///
    /// let flag = Binding::new(false);
    /// let s = Binding::new(String::new());
    /// let mut options = OptionSet::from(vec![
    ///     OptionSpec::boolean(&flag, "flag", Some('f'), "a boolean option"),
    ///     OptionSpec::string(&s, "str", Some('s'), "a string option"),
    /// ]);
    ///
    /// let outcome = options.parse(&["--s", "foo", "--fl", "bar"], &mut ParseContext::default());
    /// assert_eq!(outcome.consumed, 3);
    /// assert!(outcome.is_ok());
    /// assert_eq!(s.get(), "foo");
    /// assert!(flag.get());
    /// ```
    pub fn parse<S: AsRef<str>>(&mut self, args: &[S], ctx: &mut ParseContext) -> ParseOutcome {
        let mut errors = Vec::new();
        let mut i = 0;

        while let Some(arg) = args.get(i) {
            let arg: &str = arg.as_ref();
            let rest = &args[i + 1..];

            let step = if arg == "--" {
                i += 1;
                break;
            } else if let Some(body) = arg.strip_prefix("--") {
                self.parse_long(body, rest, ctx)
            } else if arg == "-" {
                break;
            } else if let Some(cluster) = arg.strip_prefix('-') {
                self.parse_short(cluster, rest, ctx)
            } else {
                break;
            };

            i += step.used;
            if let Err(err) = step.result {
                debug!(arg, error = %err, "option error");
                errors.push(err);
            }
        }

        trace!(consumed = i, errors = errors.len(), "options parsed");
        ParseOutcome {
            consumed: i,
            result: flatten(errors),
        }
    }

    fn parse_long<S: AsRef<str>>(&mut self, body: &str, rest: &[S], ctx: &mut ParseContext) -> Step {
        let (candidate, attached) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };

        let index = match self.find_long(candidate) {
            Match::Found(index) => index,
            Match::Unrecognized => {
                return Step::new(
                    1,
                    Err(OptionError::Unrecognized {
                        option: format!("--{candidate}"),
                    }),
                );
            }
            Match::Ambiguous(indices) => {
                return Step::new(1, Err(self.ambiguous(format!("--{candidate}"), &indices)));
            }
        };

        let opt = &self[index];
        let identity = opt.long_identity(candidate);
        let (has_param, optional) = (opt.has_param, opt.optional_param);

        if !has_param {
            if attached.is_some() {
                return Step::new(1, Err(OptionError::ParameterNotAllowed { option: identity }));
            }
            return Step::new(1, self.apply(index, &identity, "", true, ctx));
        }

        if let Some(param) = attached {
            return Step::new(1, self.apply(index, &identity, param, false, ctx));
        }
        self.take_next(index, &identity, optional, rest, ctx)
    }

    fn parse_short<S: AsRef<str>>(&mut self, cluster: &str, rest: &[S], ctx: &mut ParseContext) -> Step {
        for (pos, c) in cluster.char_indices() {
            let index = match self.find_short(c) {
                Match::Found(index) => index,
                Match::Unrecognized => {
                    return Step::new(
                        1,
                        Err(OptionError::Unrecognized {
                            option: format!("-{c}"),
                        }),
                    );
                }
                Match::Ambiguous(indices) => {
                    return Step::new(1, Err(self.ambiguous(format!("-{c}"), &indices)));
                }
            };

            let identity = c.to_string();
            let opt = &self[index];
            let (has_param, optional) = (opt.has_param, opt.optional_param);

            if !has_param {
                if let Err(err) = self.apply(index, &identity, "", true, ctx) {
                    return Step::new(1, Err(err));
                }
                continue;
            }

            // A parameter-taking letter ends the cluster; whatever follows it
            // in the token is its parameter.
            let remainder = &cluster[pos + c.len_utf8()..];
            if !remainder.is_empty() {
                return Step::new(1, self.apply(index, &identity, remainder, false, ctx));
            }
            return self.take_next(index, &identity, optional, rest, ctx);
        }
        Step::new(1, Ok(()))
    }

    /// Takes the parameter from the argument after the option token.
    fn take_next<S: AsRef<str>>(
        &mut self,
        index: usize,
        identity: &str,
        optional: bool,
        rest: &[S],
        ctx: &mut ParseContext,
    ) -> Step {
        // `--` always terminates; it is never taken as a parameter.
        let next: Option<&str> = rest.first().map(|arg| arg.as_ref()).filter(|&arg| arg != "--");
        match next {
            Some(next) if !(optional && looks_like_option(next)) => {
                Step::new(2, self.apply(index, identity, next, false, ctx))
            }
            _ if optional => Step::new(1, self.apply(index, identity, "", true, ctx)),
            _ => Step::new(
                1,
                Err(OptionError::MissingParameter {
                    option: identity.to_string(),
                }),
            ),
        }
    }

    fn apply(
        &mut self,
        index: usize,
        identity: &str,
        param: &str,
        no_param: bool,
        ctx: &mut ParseContext,
    ) -> Result<(), OptionError> {
        match self[index].action_mut() {
            OptionAction::Help => {
                trace!(option = identity, "help requested");
                ctx.help_requested = true;
                Ok(())
            }
            OptionAction::Set(value) => {
                trace!(option = identity, param, no_param, "setting option");
                value
                    .set_value(identity, param, no_param)
                    .map_err(|source| OptionError::SetValueFailed {
                        option: identity.to_string(),
                        param: param.to_string(),
                        source,
                    })
            }
        }
    }

    fn ambiguous(&self, option: String, indices: &[usize]) -> OptionError {
        OptionError::Ambiguous {
            option,
            candidates: indices.iter().map(|&i| self[i].display_name()).collect(),
        }
    }
}
