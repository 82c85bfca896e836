//! Option registry and name matching.
//!
//! Short options match a letter exactly. Long options match by unique
//! prefix of any of an option's long names. Every option is examined, so an
//! ambiguous prefix is always reported instead of silently resolving to the
//! first declaration.

use std::ops::{Index, IndexMut};

use crate::error::ParseError;
use crate::option::OptionSpec;

/// Outcome of looking up a name among the declared options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Match {
    /// Exactly one option matched; holds its index.
    Found(usize),
    /// No option matched.
    Unrecognized,
    /// Several options matched; holds their indices in declaration order.
    Ambiguous(Vec<usize>),
}

/// Ordered collection of the options of one command.
#[derive(Debug, Default)]
pub struct OptionSet {
    options: Vec<OptionSpec>,
}

impl OptionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an option.
    pub fn push(&mut self, option: OptionSpec) {
        self.options.push(option);
    }

    /// Returns the number of options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Returns `true` if there are no options.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Iterates over the options in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, OptionSpec> {
        self.options.iter()
    }

    /// Returns the option at `index`.
    pub fn get(&self, index: usize) -> Option<&OptionSpec> {
        self.options.get(index)
    }

    /// Returns `true` if any option uses `c` as a short letter.
    pub fn has_short(&self, c: char) -> bool {
        self.options.iter().any(|opt| opt.has_short(c))
    }

    /// Finds the option a long-form candidate refers to.
    ///
    /// An option matches when any of its long names starts with
    /// `candidate`. An empty candidate matches nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdtree_core::{Binding, Match, OptionSet, OptionSpec};
    ///
    /// let s = Binding::new(String::new());
    /// let mut set = OptionSet::new();
    /// set.push(OptionSpec::string(&s, "size", None, ""));
    /// set.push(OptionSpec::string(&s, "str", None, ""));
    ///
    /// assert_eq!(set.find_long("si"), Match::Found(0));
    /// assert_eq!(set.find_long("st"), Match::Found(1));
    /// assert_eq!(set.find_long("s"), Match::Ambiguous(vec![0, 1]));
    /// assert_eq!(set.find_long("x"), Match::Unrecognized);
    /// ```
    pub fn find_long(&self, candidate: &str) -> Match {
        if candidate.is_empty() {
            return Match::Unrecognized;
        }
        self.matching(|opt| opt.long_names().any(|name| name.starts_with(candidate)))
    }

    /// Finds the option a short letter refers to.
    pub fn find_short(&self, c: char) -> Match {
        self.matching(|opt| opt.has_short(c))
    }

    fn matching(&self, matches: impl Fn(&OptionSpec) -> bool) -> Match {
        let found: Vec<usize> = self
            .options
            .iter()
            .enumerate()
            .filter(|(_, opt)| matches(*opt))
            .map(|(i, _)| i)
            .collect();
        match found.as_slice() {
            [] => Match::Unrecognized,
            [i] => Match::Found(*i),
            _ => Match::Ambiguous(found),
        }
    }

    /// Resets every option to its default, collecting failures.
    ///
    /// # Errors
    ///
    /// Returns the accumulated [`ParseError`] if any reset failed.
    pub fn reset(&mut self) -> Result<(), ParseError> {
        let mut errors = Vec::new();
        for opt in &mut self.options {
            if let Err(source) = opt.reset() {
                errors.push(crate::OptionError::SetValueFailed {
                    option: opt.identity(),
                    param: opt.default.clone(),
                    source,
                });
            }
        }
        crate::error::flatten(errors)
    }

    /// Returns the indices of the options sorted for documentation.
    pub fn sorted_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.options.len()).collect();
        indices.sort_by_cached_key(|&i| self.options[i].sort_key());
        indices
    }
}

impl Index<usize> for OptionSet {
    type Output = OptionSpec;

    fn index(&self, index: usize) -> &OptionSpec {
        &self.options[index]
    }
}

impl IndexMut<usize> for OptionSet {
    fn index_mut(&mut self, index: usize) -> &mut OptionSpec {
        &mut self.options[index]
    }
}

impl FromIterator<OptionSpec> for OptionSet {
    fn from_iter<I: IntoIterator<Item = OptionSpec>>(iter: I) -> Self {
        Self {
            options: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<OptionSpec>> for OptionSet {
    fn from(options: Vec<OptionSpec>) -> Self {
        Self { options }
    }
}

impl<'a> IntoIterator for &'a OptionSet {
    type Item = &'a OptionSpec;
    type IntoIter = std::slice::Iter<'a, OptionSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Binding;

    fn set() -> OptionSet {
        let f = Binding::new(false);
        let s = Binding::new(String::new());
        OptionSet::from(vec![
            OptionSpec::boolean(&f, "flag", Some('f'), "").with_alias("force"),
            OptionSpec::string(&s, "str", Some('s'), ""),
            OptionSpec::string(&s, "", Some('o'), ""),
        ])
    }

    #[test]
    fn test_prefix_of_single_option_matches() {
        let set = set();
        assert_eq!(set.find_long("fl"), Match::Found(0));
        assert_eq!(set.find_long("str"), Match::Found(1));
    }

    #[test]
    fn test_aliases_of_one_option_are_not_ambiguous() {
        // "f" prefixes both "flag" and "force", which belong to one option.
        assert_eq!(set().find_long("f"), Match::Found(0));
        assert_eq!(set().find_long("for"), Match::Found(0));
    }

    #[test]
    fn test_exact_name_that_prefixes_another_is_ambiguous() {
        let s = Binding::new(String::new());
        let set = OptionSet::from(vec![
            OptionSpec::string(&s, "str", None, ""),
            OptionSpec::string(&s, "string", None, ""),
        ]);
        assert_eq!(set.find_long("str"), Match::Ambiguous(vec![0, 1]));
        assert_eq!(set.find_long("stri"), Match::Found(1));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert_eq!(set().find_long("FLAG"), Match::Unrecognized);
        assert_eq!(set().find_short('F'), Match::Unrecognized);
    }

    #[test]
    fn test_empty_candidate_matches_nothing() {
        assert_eq!(set().find_long(""), Match::Unrecognized);
    }

    #[test]
    fn test_short_lookup() {
        let set = set();
        assert_eq!(set.find_short('o'), Match::Found(2));
        assert_eq!(set.find_short('x'), Match::Unrecognized);
        assert!(set.has_short('s'));
    }

    #[test]
    fn test_duplicate_short_is_ambiguous() {
        let f = Binding::new(false);
        let set = OptionSet::from(vec![
            OptionSpec::boolean(&f, "all", Some('a'), ""),
            OptionSpec::boolean(&f, "append", Some('a'), ""),
        ]);
        assert_eq!(set.find_short('a'), Match::Ambiguous(vec![0, 1]));
    }

    #[test]
    fn test_sorted_indices() {
        let f = Binding::new(false);
        let set = OptionSet::from(vec![
            OptionSpec::boolean(&f, "zeta", None, ""),
            OptionSpec::boolean(&f, "verbose", Some('v'), ""),
            OptionSpec::boolean(&f, "all", Some('a'), ""),
        ]);
        assert_eq!(set.sorted_indices(), vec![2, 1, 0]);
    }
}
