//! Commands and the command tree.
//!
//! Commands live in an arena owned by [`CommandTree`] and are addressed by
//! [`CommandId`]. Parent-to-child links are index lists, so documentation can
//! be rendered from a shared reference while option parsing takes the tree
//! mutably.

use std::fmt;

use crate::error::{ExecError, ParseError, flatten};
use crate::matcher::OptionSet;
use crate::option::OptionSpec;

/// Action run for a command's remaining arguments.
pub type ExecFn = Box<dyn Fn(&[String]) -> Result<(), ExecError> + Send + Sync>;

/// What a resolved command does when run.
pub enum CommandAction {
    /// Run a closure with the arguments left after resolution.
    Exec(ExecFn),
    /// Resolve the arguments from the root and print the documentation of
    /// the command reached.
    Help,
}

impl fmt::Debug for CommandAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exec(_) => f.write_str("Exec(..)"),
            Self::Help => f.write_str("Help"),
        }
    }
}

/// A node of the command tree.
#[derive(Debug, Default)]
pub struct Command {
    /// Name matched against positional arguments. Empty only for a root.
    pub name: String,
    /// One-line summary.
    pub info: String,
    /// Usage lines, printed as written.
    pub usage: String,
    /// Prose, reflowed when documented.
    pub description: String,
    /// Options that must directly follow the command's name.
    pub options: OptionSet,
    action: Option<CommandAction>,
}

impl Command {
    /// Creates a command with the given name and nothing else.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Sets the one-line summary.
    pub fn with_info(mut self, info: &str) -> Self {
        self.info = info.to_string();
        self
    }

    /// Sets the usage text.
    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Appends an option.
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Sets the action run with the remaining arguments.
    pub fn with_exec<F>(mut self, f: F) -> Self
    where
        F: Fn(&[String]) -> Result<(), ExecError> + Send + Sync + 'static,
    {
        self.action = Some(CommandAction::Exec(Box::new(f)));
        self
    }

    /// Replaces the action.
    pub fn set_action(&mut self, action: CommandAction) {
        self.action = Some(action);
    }

    /// Returns the action, if any.
    pub fn action(&self) -> Option<&CommandAction> {
        self.action.as_ref()
    }

    /// Returns `true` if running the command would do something.
    pub fn is_executable(&self) -> bool {
        self.action.is_some()
    }
}

/// Stable index of a command inside its [`CommandTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(usize);

impl CommandId {
    /// Returns the arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct Node {
    command: Command,
    parent: Option<CommandId>,
    children: Vec<CommandId>,
}

/// Arena of commands rooted at a single command.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Command, CommandTree};
///
/// let mut tree = CommandTree::new(Command::new("tool").with_info("does things"));
/// let root = tree.root();
/// let version = tree.add_subcommand(root, Command::new("version"));
///
/// assert_eq!(tree.children(root), &[version]);
/// assert_eq!(tree.parent(version), Some(root));
/// assert_eq!(tree[version].name, "version");
/// ```
///
/// # Panics
///
/// Methods taking a [`CommandId`] panic when the id was issued by another
/// tree and is out of range for this one.
#[derive(Debug)]
pub struct CommandTree {
    nodes: Vec<Node>,
}

impl CommandTree {
    /// Creates a tree containing only `root`.
    pub fn new(root: Command) -> Self {
        Self {
            nodes: vec![Node {
                command: root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Returns the id of the root command.
    pub fn root(&self) -> CommandId {
        CommandId(0)
    }

    /// Appends `command` as the last child of `parent`.
    pub fn add_subcommand(&mut self, parent: CommandId, command: Command) -> CommandId {
        let id = CommandId(self.nodes.len());
        self.nodes.push(Node {
            command,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Returns the command at `id`.
    pub fn command(&self, id: CommandId) -> &Command {
        &self.nodes[id.0].command
    }

    /// Returns the command at `id` mutably.
    pub fn command_mut(&mut self, id: CommandId) -> &mut Command {
        &mut self.nodes[id.0].command
    }

    /// Returns the children of `id` in insertion order.
    pub fn children(&self, id: CommandId) -> &[CommandId] {
        &self.nodes[id.0].children
    }

    /// Returns the parent of `id`, or `None` for the root.
    pub fn parent(&self, id: CommandId) -> Option<CommandId> {
        self.nodes[id.0].parent
    }

    /// Returns the child of `parent` named exactly `name`.
    pub fn find_child(&self, parent: CommandId, name: &str) -> Option<CommandId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&child| self.command(child).name == name)
    }

    /// Returns the names along `path`.
    pub fn names(&self, path: &[CommandId]) -> Vec<String> {
        path.iter().map(|&id| self.command(id).name.clone()).collect()
    }

    /// Iterates over every command id, parents before children.
    pub fn ids(&self) -> impl Iterator<Item = CommandId> + '_ {
        (0..self.nodes.len()).map(CommandId)
    }

    /// Returns the number of commands, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`; a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Resets the options of every command to their defaults.
    ///
    /// # Errors
    ///
    /// Returns every reset failure of the whole tree, flattened.
    pub fn reset_options(&mut self) -> Result<(), ParseError> {
        let mut errors = Vec::new();
        for node in &mut self.nodes {
            if let Err(err) = node.command.options.reset() {
                errors.extend(err.errors().iter().cloned());
            }
        }
        flatten(errors)
    }
}

impl std::ops::Index<CommandId> for CommandTree {
    type Output = Command;

    fn index(&self, id: CommandId) -> &Command {
        self.command(id)
    }
}

impl std::ops::IndexMut<CommandId> for CommandTree {
    fn index_mut(&mut self, id: CommandId) -> &mut Command {
        self.command_mut(id)
    }
}
