//! Resolving argument lists against a command tree and running the result.

use std::io;

use tracing::{debug, trace};

use crate::command::{Command, CommandAction, CommandId, CommandTree};
use crate::error::CommandError;
use crate::option::OptionSpec;
use crate::parser::ParseContext;

/// Name of the subcommand installed by [`CommandTree::add_help_command`].
pub const HELP_COMMAND: &str = "help";

/// Outcome of resolving an argument list.
#[derive(Debug)]
pub struct Resolution {
    /// Commands from the root to the deepest one reached. Never empty.
    pub path: Vec<CommandId>,
    /// Number of arguments consumed by options and command names.
    pub consumed: usize,
    /// Whether a help option occurred at any level.
    pub help_requested: bool,
    /// Error that stopped the descent.
    pub error: Option<CommandError>,
}

impl Resolution {
    /// Returns the deepest command reached.
    pub fn command(&self) -> CommandId {
        // The path always holds at least the root.
        self.path[self.path.len() - 1]
    }

    /// Returns `true` if resolution finished without error.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Returns the arguments left after resolution.
    pub fn remaining<'a, S: AsRef<str>>(&self, args: &'a [S]) -> &'a [S] {
        &args[self.consumed.min(args.len())..]
    }
}

impl CommandTree {
    /// Matches `arg` against the children of `parent` by unique prefix.
    ///
    /// Returns `Ok(None)` when nothing matches; the argument is then left for
    /// the command's action.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnrecognizedCommand`] when `arg` prefixes
    /// more than one child name.
    pub fn match_subcommand(&self, parent: CommandId, arg: &str) -> Result<Option<CommandId>, CommandError> {
        if arg.is_empty() {
            return Ok(None);
        }
        let found: Vec<CommandId> = self
            .children(parent)
            .iter()
            .copied()
            .filter(|&child| self[child].name.starts_with(arg))
            .collect();
        match found.as_slice() {
            [] => Ok(None),
            [id] => Ok(Some(*id)),
            _ => Err(CommandError::UnrecognizedCommand {
                name: arg.to_string(),
                candidates: self.names(&found),
            }),
        }
    }

    /// Walks the tree from the root, parsing each level's options and
    /// matching the next argument against the subcommands.
    ///
    /// Option errors of the root are reported as they are; errors of deeper
    /// levels are wrapped with the command's name. Any error ends the
    /// descent.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdtree_core::{Command, CommandTree};
    ///
    /// let mut tree = CommandTree::new(Command::new("tool"));
    /// let root = tree.root();
    /// let version = tree.add_subcommand(root, Command::new("version"));
    ///
    /// let resolution = tree.resolve(&["ver"]);
    /// assert!(resolution.is_ok());
    /// assert_eq!(resolution.path, vec![root, version]);
    /// assert_eq!(resolution.consumed, 1);
    /// ```
    pub fn resolve<S: AsRef<str>>(&mut self, args: &[S]) -> Resolution {
        let mut ctx = ParseContext::default();
        let mut path = Vec::new();
        let mut consumed = 0;
        let mut id = self.root();

        let error = loop {
            path.push(id);

            if !self[id].options.is_empty() {
                let outcome = self[id].options.parse(&args[consumed..], &mut ctx);
                consumed += outcome.consumed;
                if let Err(err) = outcome.result {
                    let err = if id == self.root() {
                        CommandError::Options(err)
                    } else {
                        CommandError::InCommand {
                            command: self[id].name.clone(),
                            source: err,
                        }
                    };
                    debug!(command = %self[id].name, error = %err, "option parsing failed");
                    break Some(err);
                }
            }

            let Some(arg) = args.get(consumed) else {
                break None;
            };
            let arg: &str = arg.as_ref();
            match self.match_subcommand(id, arg) {
                Ok(Some(child)) => {
                    trace!(command = %self[child].name, arg, "descending");
                    consumed += 1;
                    id = child;
                }
                Ok(None) => break None,
                Err(err) => {
                    debug!(error = %err, "subcommand resolution failed");
                    break Some(err);
                }
            }
        };

        debug!(
            path = ?self.names(&path),
            consumed,
            help = ctx.help_requested,
            "resolved"
        );
        Resolution {
            path,
            consumed,
            help_requested: ctx.help_requested,
            error,
        }
    }

    /// Resolves `args` and runs the deepest command reached.
    ///
    /// If a help option occurred, the command's documentation is written to
    /// `out` instead. The help command writes there as well.
    ///
    /// # Errors
    ///
    /// Returns the resolution error, [`CommandError::NoExecutableCommand`]
    /// when the command has no action, [`CommandError::ExecFailed`] when
    /// the action fails, or [`CommandError::Output`] when writing fails.
    pub fn run<S: AsRef<str>, W: io::Write>(&mut self, args: &[S], out: &mut W) -> Result<(), CommandError> {
        let mut resolution = self.resolve(args);
        if let Some(err) = resolution.error.take() {
            return Err(err);
        }
        let id = resolution.command();
        let rest: Vec<String> = resolution
            .remaining(args)
            .iter()
            .map(|arg| {
                let arg: &str = arg.as_ref();
                arg.to_string()
            })
            .collect();

        if resolution.help_requested {
            debug!(command = %self[id].name, "help option intercepts execution");
            self.write_doc(id, out)?;
            return Ok(());
        }

        let is_help = matches!(self[id].action(), Some(CommandAction::Help));
        if is_help {
            return self.run_help(&rest, out);
        }

        let command = &self[id];
        match command.action() {
            Some(CommandAction::Exec(exec)) => {
                debug!(command = %command.name, args = rest.len(), "executing");
                exec(rest.as_slice()).map_err(|source| CommandError::ExecFailed {
                    command: command.name.clone(),
                    source,
                })
            }
            _ => Err(CommandError::NoExecutableCommand {
                command: command.name.clone(),
            }),
        }
    }

    fn run_help<W: io::Write>(&mut self, args: &[String], out: &mut W) -> Result<(), CommandError> {
        let mut resolution = self.resolve(args);
        if let Some(err) = resolution.error.take() {
            return Err(err);
        }
        self.write_doc(resolution.command(), out)?;
        Ok(())
    }

    /// Adds a `help` subcommand to the root.
    ///
    /// Returns `false` if the root already has a child named `help`.
    pub fn add_help_command(&mut self) -> bool {
        let root = self.root();
        if self.find_child(root, HELP_COMMAND).is_some() {
            return false;
        }
        let usage = format!("{} {HELP_COMMAND} <commands>...", self[root].name);
        let mut help = Command::new(HELP_COMMAND)
            .with_info("prints help messages")
            .with_usage(usage.trim_start());
        help.set_action(CommandAction::Help);
        self.add_subcommand(root, help);
        true
    }

    /// Adds `-h, --help` to the command at `id`.
    ///
    /// Returns `false` without changes if the command has no action, is
    /// named `help`, or already uses `-h`.
    pub fn add_help_option(&mut self, id: CommandId) -> bool {
        let command = &mut self[id];
        if command.name == HELP_COMMAND || !command.is_executable() || command.options.has_short('h') {
            return false;
        }
        command.options.push(OptionSpec::help());
        true
    }

    /// Adds help options to every command the tree allows them on.
    pub fn add_help_option_to_all(&mut self) {
        let ids: Vec<CommandId> = self.ids().collect();
        for id in ids {
            self.add_help_option(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::OptionError;
    use crate::value::Binding;

    fn tree_with(names: &[&str]) -> CommandTree {
        let mut tree = CommandTree::new(Command::new("tool"));
        let root = tree.root();
        for name in names {
            tree.add_subcommand(root, Command::new(name));
        }
        tree
    }

    #[test]
    fn test_empty_args_resolve_to_root() {
        let mut tree = tree_with(&["version"]);
        let resolution = tree.resolve::<&str>(&[]);
        assert_eq!(resolution.path, vec![tree.root()]);
        assert_eq!(resolution.consumed, 0);
        assert!(resolution.is_ok());
    }

    #[test]
    fn test_ambiguous_subcommand() {
        let mut tree = tree_with(&["version", "verify"]);
        let resolution = tree.resolve(&["ver"]);
        match resolution.error {
            Some(CommandError::UnrecognizedCommand { name, candidates }) => {
                assert_eq!(name, "ver");
                assert_eq!(candidates, vec!["version", "verify"]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(resolution.path, vec![tree.root()]);
        assert_eq!(resolution.consumed, 0);
    }

    #[test]
    fn test_unmatched_positional_is_not_an_error() {
        let mut tree = tree_with(&["version"]);
        let resolution = tree.resolve(&["file.txt"]);
        assert!(resolution.is_ok());
        assert_eq!(resolution.consumed, 0);
    }

    #[test]
    fn test_empty_argument_matches_no_subcommand() {
        let mut tree = tree_with(&["version"]);
        let resolution = tree.resolve(&[""]);
        assert!(resolution.is_ok());
        assert_eq!(resolution.path.len(), 1);
    }

    #[test]
    fn test_subcommand_errors_carry_command_name() {
        let mut tree = CommandTree::new(Command::new("tool"));
        let root = tree.root();
        let v = Binding::new(false);
        tree.add_subcommand(
            root,
            Command::new("version").with_option(OptionSpec::boolean(&v, "verbose", Some('v'), "")),
        );
        let resolution = tree.resolve(&["version", "--x", "next"]);
        let err = resolution.error.unwrap();
        assert_eq!(err.to_string(), "version: unrecognized option --x");
        assert_eq!(resolution.consumed, 2);
    }

    #[test]
    fn test_root_option_error_stops_descent() {
        let v = Binding::new(false);
        let mut tree = CommandTree::new(
            Command::new("tool").with_option(OptionSpec::boolean(&v, "verbose", Some('v'), "")),
        );
        let root = tree.root();
        tree.add_subcommand(root, Command::new("version"));
        let resolution = tree.resolve(&["-q", "version"]);
        match resolution.error {
            Some(CommandError::Options(err)) => {
                assert_eq!(err, OptionError::Unrecognized { option: "-q".into() }.into());
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(resolution.path, vec![root]);
    }

    #[test]
    fn test_command_without_options_passes_dashes_through() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut tree = CommandTree::new(Command::new("tool"));
        let root = tree.root();
        tree.add_subcommand(
            root,
            Command::new("echo").with_exec(move |args| {
                sink.lock().unwrap().extend_from_slice(args);
                Ok(())
            }),
        );
        tree.run(&["echo", "-n", "hi"], &mut Vec::new()).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["-n", "hi"]);
    }

    #[test]
    fn test_run_without_action() {
        let mut tree = tree_with(&["version"]);
        let err = tree.run(&["version"], &mut Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "version: couldn't find executable subcommand");
    }

    #[test]
    fn test_run_reports_exec_failure() {
        let mut tree = CommandTree::new(Command::new("tool").with_exec(|_| Err("boom".into())));
        let err = tree.run::<&str, _>(&[], &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CommandError::ExecFailed { .. }));
        assert_eq!(err.to_string(), "tool: boom");
    }

    #[test]
    fn test_help_command_is_added_once() {
        let mut tree = tree_with(&["version"]);
        assert!(tree.add_help_command());
        assert!(!tree.add_help_command());
        let help = tree.find_child(tree.root(), HELP_COMMAND).unwrap();
        assert_eq!(tree[help].usage, "tool help <commands>...");
    }

    #[test]
    fn test_help_option_rules() {
        let mut tree = CommandTree::new(Command::new("tool").with_exec(|_| Ok(())));
        let root = tree.root();
        let idle = tree.add_subcommand(root, Command::new("idle"));
        let taken = tree.add_subcommand(
            root,
            Command::new("hold")
                .with_option(OptionSpec::boolean(&Binding::new(false), "hold", Some('h'), ""))
                .with_exec(|_| Ok(())),
        );
        tree.add_help_command();
        tree.add_help_option_to_all();

        assert!(tree[root].options.has_short('h'));
        assert!(!tree[idle].options.has_short('h'));
        assert_eq!(tree[taken].options.len(), 1);
        let help = tree.find_child(root, HELP_COMMAND).unwrap();
        assert!(tree[help].options.is_empty());
    }
}
