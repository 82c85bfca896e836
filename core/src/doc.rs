//! Man-page style documentation for a command.
//!
//! Sections appear in a fixed order and are separated by one blank line:
//!
//! ```text
//! NAME
//!     tool - does things
//!
//! USAGE
//!     tool [OPTIONS] <command>
//!
//! DESCRIPTION
//!     Reflowed prose.
//!
//! OPTIONS
//!     -v, --verbose
//!         talk more
//!
//! SUBCOMMANDS
//!     help    - prints help messages
//!     version - prints the version
//! ```
//!
//! Sections whose source field is empty or blank are left out.

use std::fmt::{self, Write};
use std::io;

use cmdtree_text::{DEFAULT_WIDTH, Lexer, format_text};

use crate::command::{CommandId, CommandTree};

/// Indentation of section bodies.
pub const DOC_INDENT: &str = "    ";

impl CommandTree {
    /// Renders the documentation of the command at `id`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdtree_core::{Binding, Command, CommandTree, OptionSpec};
    ///
    /// let verbose = Binding::new(false);
    /// let mut tree = CommandTree::new(
    ///     Command::new("tool")
    ///         .with_info("does things")
    ///         .with_option(OptionSpec::boolean(&verbose, "verbose", Some('v'), "talk more")),
    /// );
    /// let root = tree.root();
    /// tree.add_subcommand(root, Command::new("version").with_info("prints the version"));
    ///
    /// assert_eq!(
    ///     tree.render_doc(root),
    ///     "NAME\n    tool - does things\n\n\
    ///      OPTIONS\n    -v, --verbose\n        talk more\n\n\
    ///      SUBCOMMANDS\n    version - prints the version\n"
    /// );
    /// ```
    pub fn render_doc(&self, id: CommandId) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.doc_into(id, &mut out);
        out
    }

    /// Writes the documentation of the command at `id` to `out`.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors of `out`.
    pub fn write_doc<W: io::Write>(&self, id: CommandId, out: &mut W) -> io::Result<()> {
        out.write_all(self.render_doc(id).as_bytes())?;
        out.flush()
    }

    fn doc_into<W: Write>(&self, id: CommandId, w: &mut W) -> fmt::Result {
        let cmd = &self[id];
        let mut sections = 0;
        let mut section = |w: &mut W, title: &str| -> fmt::Result {
            if sections > 0 {
                writeln!(w)?;
            }
            sections += 1;
            writeln!(w, "{title}")
        };

        if !cmd.name.is_empty() || !cmd.info.is_empty() {
            section(w, "NAME")?;
            match (cmd.name.is_empty(), cmd.info.is_empty()) {
                (false, false) => writeln!(w, "{DOC_INDENT}{} - {}", cmd.name, cmd.info)?,
                (false, true) => writeln!(w, "{DOC_INDENT}{}", cmd.name)?,
                _ => writeln!(w, "{DOC_INDENT}{}", cmd.info)?,
            }
        }

        if !cmd.usage.trim().is_empty() {
            section(w, "USAGE")?;
            for line in cmd.usage.trim_matches('\n').lines() {
                writeln!(w, "{DOC_INDENT}{line}")?;
            }
        }

        if Lexer::new(&cmd.description).next().is_some() {
            section(w, "DESCRIPTION")?;
            format_text(w, &cmd.description, DEFAULT_WIDTH, DOC_INDENT)?;
        }

        if !cmd.options.is_empty() {
            section(w, "OPTIONS")?;
            let nested = format!("{DOC_INDENT}{DOC_INDENT}");
            for i in cmd.options.sorted_indices() {
                let opt = &cmd.options[i];
                writeln!(w, "{DOC_INDENT}{}", opt.usage())?;
                format_text(w, &opt.description, DEFAULT_WIDTH, &nested)?;
            }
        }

        let mut names: Vec<&str> = self
            .children(id)
            .iter()
            .map(|&child| self[child].name.as_str())
            .filter(|name| !name.is_empty())
            .collect();
        if !names.is_empty() {
            section(w, "SUBCOMMANDS")?;
            names.sort_unstable();
            let column = names.iter().map(|name| name.chars().count()).max().unwrap_or(0) + 1;
            for name in names {
                let info = self
                    .find_child(id, name)
                    .map(|child| self[child].info.as_str())
                    .unwrap_or_default();
                if info.is_empty() {
                    writeln!(w, "{DOC_INDENT}{name}")?;
                } else {
                    writeln!(w, "{DOC_INDENT}{name:<column$}- {info}")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::option::OptionSpec;
    use crate::value::Binding;

    #[test]
    fn test_empty_command_renders_nothing() {
        let tree = CommandTree::new(Command::default());
        assert_eq!(tree.render_doc(tree.root()), "");
    }

    #[test]
    fn test_info_without_name() {
        let tree = CommandTree::new(Command::default().with_info("anonymous"));
        assert_eq!(tree.render_doc(tree.root()), "NAME\n    anonymous\n");
    }

    #[test]
    fn test_usage_lines_are_indented() {
        let tree = CommandTree::new(Command::new("tool").with_usage("tool add FILE\ntool rm FILE"));
        assert_eq!(
            tree.render_doc(tree.root()),
            "NAME\n    tool\n\nUSAGE\n    tool add FILE\n    tool rm FILE\n"
        );
    }

    #[test]
    fn test_description_is_reflowed() {
        let words = "word ".repeat(30);
        let tree = CommandTree::new(Command::default().with_description(&words));
        let doc = tree.render_doc(tree.root());
        assert!(doc.starts_with("DESCRIPTION\n    word word"));
        assert!(doc.lines().all(|line| line.len() <= DEFAULT_WIDTH));
        assert!(doc.lines().count() > 2);
    }

    #[test]
    fn test_options_sorted_with_nested_description() {
        let f = Binding::new(false);
        let s = Binding::new(String::from("out"));
        let tree = CommandTree::new(
            Command::default()
                .with_option(OptionSpec::string(&s, "str", Some('s'), "a string option"))
                .with_option(OptionSpec::boolean(&f, "flag", Some('f'), "a boolean option"))
                .with_option(OptionSpec::boolean(&f, "quiet", None, "")),
        );
        assert_eq!(
            tree.render_doc(tree.root()),
            "OPTIONS\n\
             \x20   -f, --flag\n\
             \x20       a boolean option\n\
             \x20   --quiet\n\
             \x20   -s string, --str=string (default out)\n\
             \x20       a string option\n"
        );
    }

    #[test]
    fn test_subcommands_aligned_and_sorted() {
        let mut tree = CommandTree::new(Command::new("tool"));
        let root = tree.root();
        tree.add_subcommand(root, Command::new("version").with_info("prints the version"));
        tree.add_subcommand(root, Command::new("add").with_info("adds"));
        tree.add_subcommand(root, Command::new("bare"));
        assert_eq!(
            tree.render_doc(root),
            "NAME\n    tool\n\nSUBCOMMANDS\n    add     - adds\n    bare\n    version - prints the version\n"
        );
    }

    #[test]
    fn test_blank_description_and_usage_are_left_out() {
        let tree = CommandTree::new(
            Command::new("tool")
                .with_usage("  \n")
                .with_description("\n\n  \n"),
        );
        assert_eq!(tree.render_doc(tree.root()), "NAME\n    tool\n");

        let tree = CommandTree::new(Command::new("tool").with_usage("\ntool <file>\n"));
        assert_eq!(tree.render_doc(tree.root()), "NAME\n    tool\n\nUSAGE\n    tool <file>\n");
    }

    #[test]
    fn test_write_doc_matches_render() {
        let tree = CommandTree::new(Command::new("tool").with_info("does things"));
        let mut out = Vec::new();
        tree.write_doc(tree.root(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), tree.render_doc(tree.root()));
    }
}
