//! Option values and the bindings they write into.
//!
//! An option never owns the state it controls. Instead it holds an
//! [`OptionValue`] that writes into a [`Binding`] shared with the caller:
//!
//! ```
//! use cmdtree_core::{Binding, IntValue, OptionValue};
//!
//! let jobs = Binding::new(1_i64);
//! let mut value = IntValue::new(jobs.clone());
//! value.set_value("jobs", "0x10", false).unwrap();
//! assert_eq!(jobs.get(), 16);
//! ```

use std::fmt;
use std::num::ParseFloatError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

/// Errors returned by [`OptionValue`] implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The parameter is not a valid integer.
    #[error("invalid integer {value:?}: {reason}")]
    InvalidInt {
        /// Offending parameter.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
    /// The parameter is not a valid floating point number.
    #[error("invalid float {value:?}: {source}")]
    InvalidFloat {
        /// Offending parameter.
        value: String,
        /// Underlying parse failure.
        #[source]
        source: ParseFloatError,
    },
    /// Any other rejection, described by the setter.
    #[error("{0}")]
    Invalid(String),
}

/// A shared handle to externally-owned option state.
///
/// Cloning a binding yields another handle to the same storage. The caller
/// keeps one clone to read results; the option writes through the other.
pub struct Binding<T>(Arc<Mutex<T>>);

impl<T> Binding<T> {
    /// Creates a binding holding `value`.
    pub fn new(value: T) -> Self {
        Self(Arc::new(Mutex::new(value)))
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the bound value.
    pub fn set(&self, value: T) {
        *self.lock() = value;
    }

    /// Applies `f` to the bound value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.lock())
    }
}

impl<T: Clone> Binding<T> {
    /// Returns a copy of the bound value.
    pub fn get(&self) -> T {
        self.lock().clone()
    }
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: Default> Default for Binding<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with(|value| f.debug_tuple("Binding").field(value).finish())
    }
}

/// Capability an option uses to change the state it controls.
///
/// `set_value` is called once per occurrence of the option on the command
/// line. `name` is the identity the option was addressed by, `param` the
/// parameter (empty when there is none) and `no_param` tells an optional
/// parameter that was left out apart from an explicitly empty one.
pub trait OptionValue: Send + Sync {
    /// Records one occurrence of the option.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] when `param` is not acceptable.
    fn set_value(&mut self, name: &str, param: &str, no_param: bool) -> Result<(), ValueError>;

    /// Restores the initial state.
    ///
    /// The default implementation feeds `default` through
    /// [`set_value`](OptionValue::set_value).
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] when `default` is not acceptable.
    fn reset_value(&mut self, default: &str) -> Result<(), ValueError> {
        self.set_value("", default, false)
    }
}

/// Flag value: any occurrence sets `true`, reset sets `false`.
#[derive(Debug, Clone)]
pub struct BoolValue(Binding<bool>);

impl BoolValue {
    /// Wraps `binding`.
    pub fn new(binding: Binding<bool>) -> Self {
        Self(binding)
    }
}

impl OptionValue for BoolValue {
    fn set_value(&mut self, _name: &str, _param: &str, _no_param: bool) -> Result<(), ValueError> {
        self.0.set(true);
        Ok(())
    }

    fn reset_value(&mut self, _default: &str) -> Result<(), ValueError> {
        self.0.set(false);
        Ok(())
    }
}

/// Stores the parameter verbatim.
#[derive(Debug, Clone)]
pub struct StringValue(Binding<String>);

impl StringValue {
    /// Wraps `binding`.
    pub fn new(binding: Binding<String>) -> Self {
        Self(binding)
    }
}

impl OptionValue for StringValue {
    fn set_value(&mut self, _name: &str, param: &str, _no_param: bool) -> Result<(), ValueError> {
        self.0.set(param.to_string());
        Ok(())
    }
}

/// Parses the parameter as a signed integer.
///
/// Accepts an optional sign, the prefixes `0x`, `0o` and `0b`, a leading `0`
/// for octal, and `_` between digits.
#[derive(Debug, Clone)]
pub struct IntValue(Binding<i64>);

impl IntValue {
    /// Wraps `binding`.
    pub fn new(binding: Binding<i64>) -> Self {
        Self(binding)
    }
}

impl OptionValue for IntValue {
    fn set_value(&mut self, _name: &str, param: &str, _no_param: bool) -> Result<(), ValueError> {
        let n = parse_int(param)?;
        self.0.set(n);
        Ok(())
    }

    fn reset_value(&mut self, default: &str) -> Result<(), ValueError> {
        if default.is_empty() {
            self.0.set(0);
            return Ok(());
        }
        self.set_value("", default, false)
    }
}

/// Parses the parameter as a 64-bit float.
#[derive(Debug, Clone)]
pub struct FloatValue(Binding<f64>);

impl FloatValue {
    /// Wraps `binding`.
    pub fn new(binding: Binding<f64>) -> Self {
        Self(binding)
    }
}

impl OptionValue for FloatValue {
    fn set_value(&mut self, _name: &str, param: &str, _no_param: bool) -> Result<(), ValueError> {
        let x = param.trim().parse::<f64>().map_err(|source| ValueError::InvalidFloat {
            value: param.to_string(),
            source,
        })?;
        self.0.set(x);
        Ok(())
    }

    fn reset_value(&mut self, default: &str) -> Result<(), ValueError> {
        if default.is_empty() {
            self.0.set(0.0);
            return Ok(());
        }
        self.set_value("", default, false)
    }
}

/// Adapts a closure into an [`OptionValue`].
///
/// The closure receives `(name, param, no_param)`. Reset goes through the
/// closure as well, with an empty name.
pub struct FnValue<F>(F);

impl<F> FnValue<F>
where
    F: FnMut(&str, &str, bool) -> Result<(), ValueError> + Send + Sync,
{
    /// Wraps `f`.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> fmt::Debug for FnValue<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnValue")
    }
}

impl<F> OptionValue for FnValue<F>
where
    F: FnMut(&str, &str, bool) -> Result<(), ValueError> + Send + Sync,
{
    fn set_value(&mut self, name: &str, param: &str, no_param: bool) -> Result<(), ValueError> {
        (self.0)(name, param, no_param)
    }
}

/// Parses an integer literal the way [`IntValue`] does.
///
/// # Errors
///
/// Returns [`ValueError::InvalidInt`] for malformed or out-of-range input.
///
/// # Examples
///
/// ```
/// use cmdtree_core::parse_int;
///
/// assert_eq!(parse_int("42").unwrap(), 42);
/// assert_eq!(parse_int("-0x1f").unwrap(), -31);
/// assert_eq!(parse_int("0b101").unwrap(), 5);
/// assert_eq!(parse_int("0755").unwrap(), 0o755);
/// assert_eq!(parse_int("1_000").unwrap(), 1000);
/// assert!(parse_int("12ab").is_err());
/// ```
pub fn parse_int(s: &str) -> Result<i64, ValueError> {
    let invalid = |reason: &dyn fmt::Display| ValueError::InvalidInt {
        value: s.to_string(),
        reason: reason.to_string(),
    };

    let (sign, unsigned) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.strip_prefix('+').unwrap_or(s)),
    };

    let (radix, digits) = if let Some(rest) = strip_prefix_ci(unsigned, "0x") {
        (16, rest)
    } else if let Some(rest) = strip_prefix_ci(unsigned, "0o") {
        (8, rest)
    } else if let Some(rest) = strip_prefix_ci(unsigned, "0b") {
        (2, rest)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };

    let digits: String = digits.chars().filter(|&c| c != '_').collect();
    // from_str_radix would accept a second sign here.
    if digits.starts_with(['+', '-']) {
        return Err(invalid(&"misplaced sign"));
    }
    i64::from_str_radix(&format!("{sign}{digits}"), radix).map_err(|err| invalid(&err))
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        s.get(prefix.len()..)
    } else {
        None
    }
}
