//! Option declarations.
//!
//! An [`OptionSpec`] describes how an option is addressed (long names,
//! short letters), its arity, how it is displayed, and what it does when it
//! occurs: write through an [`OptionValue`] or request help.

use std::fmt;

use crate::value::{Binding, BoolValue, FloatValue, IntValue, OptionValue, StringValue, ValueError};

/// What an option does when it occurs on the command line.
pub enum OptionAction {
    /// Hand the occurrence to a value setter.
    Set(Box<dyn OptionValue>),
    /// Record a help request in the parse context.
    Help,
}

impl fmt::Debug for OptionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set(_) => f.write_str("Set(..)"),
            Self::Help => f.write_str("Help"),
        }
    }
}

/// Declaration of a single option.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Binding, OptionSpec};
///
/// let dir = Binding::new(String::from("."));
/// let opt = OptionSpec::string(&dir, "dir", Some('d'), "working directory");
/// assert_eq!(opt.usage(), "-d string, --dir=string (default .)");
/// assert!(opt.has_param);
///
/// let verbose = Binding::new(true);
/// let opt = OptionSpec::boolean(&verbose, "verbose", Some('v'), "talk more")
///     .with_alias("loud");
/// assert!(!verbose.get());
/// assert_eq!(opt.usage(), "-v, --verbose, --loud");
/// ```
#[derive(Debug)]
pub struct OptionSpec {
    /// Primary long name, used with `--`. Empty when the option has none.
    pub name: String,
    /// Primary short letter, used with `-`.
    pub short: Option<char>,
    /// Additional long names.
    pub aliases: Vec<String>,
    /// Additional short letters.
    pub short_aliases: Vec<char>,
    /// Prose shown below the usage line in documentation.
    pub description: String,
    /// Whether the option takes a parameter.
    pub has_param: bool,
    /// Whether the parameter may be left out. Only meaningful with `has_param`.
    pub optional_param: bool,
    /// Label for the parameter in usage lines.
    pub param_type: String,
    /// Default value as displayed and as used by reset.
    pub default: String,
    action: OptionAction,
}

impl OptionSpec {
    /// Creates an option from its parts.
    ///
    /// Pass an empty `name` for a short-only option.
    pub fn new(name: &str, short: Option<char>, description: &str, action: OptionAction) -> Self {
        Self {
            name: name.to_string(),
            short,
            aliases: Vec::new(),
            short_aliases: Vec::new(),
            description: description.to_string(),
            has_param: false,
            optional_param: false,
            param_type: String::new(),
            default: String::new(),
            action,
        }
    }

    /// Creates a flag bound to `flag`, which is cleared to `false`.
    pub fn boolean(flag: &Binding<bool>, name: &str, short: Option<char>, description: &str) -> Self {
        flag.set(false);
        Self::new(
            name,
            short,
            description,
            OptionAction::Set(Box::new(BoolValue::new(flag.clone()))),
        )
    }

    /// Creates a string option. The current value of `s` becomes the default.
    pub fn string(s: &Binding<String>, name: &str, short: Option<char>, description: &str) -> Self {
        let default = s.get();
        Self::new(
            name,
            short,
            description,
            OptionAction::Set(Box::new(StringValue::new(s.clone()))),
        )
        .with_param("string")
        .with_default(&default)
    }

    /// Creates an integer option. A non-zero current value of `n` becomes the
    /// default.
    pub fn int(n: &Binding<i64>, name: &str, short: Option<char>, description: &str) -> Self {
        let current = n.get();
        let default = if current != 0 { current.to_string() } else { String::new() };
        Self::new(
            name,
            short,
            description,
            OptionAction::Set(Box::new(IntValue::new(n.clone()))),
        )
        .with_param("int")
        .with_default(&default)
    }

    /// Creates a floating point option. A non-zero current value of `x`
    /// becomes the default.
    pub fn float(x: &Binding<f64>, name: &str, short: Option<char>, description: &str) -> Self {
        let current = x.get();
        let default = if current != 0.0 { current.to_string() } else { String::new() };
        Self::new(
            name,
            short,
            description,
            OptionAction::Set(Box::new(FloatValue::new(x.clone()))),
        )
        .with_param("float")
        .with_default(&default)
    }

    /// Creates an option driven by a custom [`OptionValue`].
    pub fn custom(
        name: &str,
        short: Option<char>,
        description: &str,
        value: impl OptionValue + 'static,
    ) -> Self {
        Self::new(name, short, description, OptionAction::Set(Box::new(value)))
    }

    /// Creates the `-h, --help` option.
    pub fn help() -> Self {
        Self::new(
            "help",
            Some('h'),
            "prints help message for command",
            OptionAction::Help,
        )
    }

    /// Makes the option take a parameter labelled `param_type`.
    pub fn with_param(mut self, param_type: &str) -> Self {
        self.has_param = true;
        self.param_type = param_type.to_string();
        self
    }

    /// Makes the parameter optional. Implies a parameter.
    pub fn with_optional_param(mut self) -> Self {
        self.has_param = true;
        self.optional_param = true;
        self
    }

    /// Sets the displayed default.
    pub fn with_default(mut self, default: &str) -> Self {
        self.default = default.to_string();
        self
    }

    /// Adds a long alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Adds a short alias.
    pub fn with_short_alias(mut self, short: char) -> Self {
        self.short_aliases.push(short);
        self
    }

    /// Returns the action run on each occurrence.
    pub fn action(&self) -> &OptionAction {
        &self.action
    }

    pub(crate) fn action_mut(&mut self) -> &mut OptionAction {
        &mut self.action
    }

    /// Iterates over the primary long name and all long aliases.
    pub fn long_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.aliases.iter().map(String::as_str))
            .filter(|name| !name.is_empty())
    }

    /// Iterates over the primary short letter and all short aliases.
    pub fn short_names(&self) -> impl Iterator<Item = char> + '_ {
        self.short.into_iter().chain(self.short_aliases.iter().copied())
    }

    /// Returns `true` if `c` is one of the option's short letters.
    pub fn has_short(&self, c: char) -> bool {
        self.short_names().any(|s| s == c)
    }

    /// Returns the key options are sorted by in documentation: the primary
    /// short letter, else the primary name, else the first alias.
    pub fn sort_key(&self) -> String {
        if let Some(c) = self.short {
            return c.to_string();
        }
        if !self.name.is_empty() {
            return self.name.clone();
        }
        self.long_names()
            .next()
            .map(String::from)
            .or_else(|| self.short_names().next().map(String::from))
            .unwrap_or_default()
    }

    /// Returns the name shown in diagnostics, with dashes.
    pub fn display_name(&self) -> String {
        match (self.long_names().next(), self.short_names().next()) {
            (Some(name), _) => format!("--{name}"),
            (None, Some(c)) => format!("-{c}"),
            (None, None) => String::from("<unnamed>"),
        }
    }

    /// Returns the identity errors are attributed to when no occurrence is
    /// involved: the primary name, else the first short letter, else the
    /// first alias.
    pub fn identity(&self) -> String {
        if !self.name.is_empty() {
            return self.name.clone();
        }
        self.short_names()
            .next()
            .map(String::from)
            .or_else(|| self.long_names().next().map(String::from))
            .unwrap_or_default()
    }

    /// Returns the identity errors for a long-form occurrence are attributed
    /// to: the primary name, else the alias `candidate` abbreviates.
    pub(crate) fn long_identity(&self, candidate: &str) -> String {
        if !self.name.is_empty() {
            return self.name.clone();
        }
        self.long_names()
            .find(|name| name.starts_with(candidate))
            .unwrap_or(candidate)
            .to_string()
    }

    /// Returns the one-line usage signature.
    pub fn usage(&self) -> String {
        let ptype = if self.param_type.is_empty() {
            "param"
        } else {
            self.param_type.as_str()
        };

        let mut parts = Vec::new();
        for c in self.short_names() {
            let part = match (self.has_param, self.optional_param) {
                (false, _) => format!("-{c}"),
                (true, false) => format!("-{c} {ptype}"),
                (true, true) => format!("-{c} [{ptype}]"),
            };
            parts.push(part);
        }
        for name in self.long_names() {
            let part = match (self.has_param, self.optional_param) {
                (false, _) => format!("--{name}"),
                (true, false) => format!("--{name}={ptype}"),
                (true, true) => format!("--{name}[={ptype}]"),
            };
            parts.push(part);
        }

        let mut usage = parts.join(", ");
        if !self.default.is_empty() {
            usage.push_str(&format!(" (default {})", self.default));
        }
        usage
    }

    /// Restores the bound state to the default.
    pub(crate) fn reset(&mut self) -> Result<(), ValueError> {
        match &mut self.action {
            OptionAction::Set(value) => value.reset_value(&self.default),
            OptionAction::Help => Ok(()),
        }
    }
}
