//! Turning a definition into a live command tree.
//!
//! Every option of the definition gets a typed [`Binding`]; after parsing,
//! the bindings hold the values the command line produced and
//! [`Surface::parse`] collects them into a serializable [`ParseReport`].

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use cmdtree_core::{Binding, Command, CommandError, CommandId, CommandTree, OptionSpec, parse_int};

use crate::definition::{CommandDef, OptionDef, ValueKind};
use crate::error::{Result, SurfaceError};
use crate::validate::{ValidationError, validate_definition};

/// Typed storage behind one option.
#[derive(Debug, Clone)]
pub enum BoundValue {
    /// Flag state.
    Bool(Binding<bool>),
    /// String parameter.
    String(Binding<String>),
    /// Integer parameter.
    Int(Binding<i64>),
    /// Float parameter.
    Float(Binding<f64>),
}

impl BoundValue {
    /// Returns the current value as JSON.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(b.get()),
            Self::String(s) => Value::String(s.get()),
            Self::Int(n) => Value::from(n.get()),
            // Non-finite floats have no JSON form.
            Self::Float(x) => serde_json::Number::from_f64(x.get()).map_or(Value::Null, Value::Number),
        }
    }
}

/// Values of one command after parsing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandValues {
    /// Command name.
    pub command: String,
    /// Option values keyed by option identity.
    pub values: Map<String, Value>,
}

/// Result of parsing an argument list against a [`Surface`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseReport {
    /// Names of the commands reached, root first.
    pub path: Vec<String>,
    /// Number of arguments consumed by options and command names.
    pub consumed: usize,
    /// Arguments left for the deepest command.
    pub remaining: Vec<String>,
    /// Whether a help option occurred.
    pub help_requested: bool,
    /// Resolution error, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Option values of every command on the path.
    pub options: Vec<CommandValues>,
}

/// A command tree built from a definition, with the bindings of its options.
///
/// # Examples
///
/// ```
/// use cmdtree_surface::{CommandDef, Surface};
///
/// let def = CommandDef::from_yaml_str(
///     "name: tool\noptions:\n  - name: jobs\n    short: j\n    type: int\n",
/// )
/// .unwrap();
/// let mut surface = Surface::build(&def).unwrap();
///
/// let report = surface.parse(&["-j", "0x10", "file"]);
/// assert_eq!(report.consumed, 2);
/// assert_eq!(report.remaining, vec!["file"]);
/// assert_eq!(report.options[0].values["jobs"], 16);
/// ```
#[derive(Debug)]
pub struct Surface {
    tree: CommandTree,
    values: Vec<Vec<(String, BoundValue)>>,
}

impl Surface {
    /// Validates `def` and builds its tree.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::InvalidDefinition`] with every validation
    /// problem when `def` is not valid.
    pub fn build(def: &CommandDef) -> Result<Self> {
        let errors = validate_definition(def);
        if !errors.is_empty() {
            return Err(SurfaceError::InvalidDefinition(errors));
        }

        let (root, root_values) = build_command(def)?;
        let mut surface = Self {
            tree: CommandTree::new(root),
            values: vec![root_values],
        };
        let root_id = surface.tree.root();
        surface.add_children(root_id, &def.subcommands)?;

        if def.help {
            surface.install_help();
        }
        info!(command = %def.name, commands = surface.tree.len(), "built command tree");
        Ok(surface)
    }

    fn add_children(&mut self, parent: CommandId, subcommands: &[CommandDef]) -> Result<()> {
        for sub in subcommands {
            let (command, values) = build_command(sub)?;
            let id = self.tree.add_subcommand(parent, command);
            self.set_values(id, values);
            self.add_children(id, &sub.subcommands)?;
        }
        Ok(())
    }

    fn set_values(&mut self, id: CommandId, values: Vec<(String, BoundValue)>) {
        let index = id.index();
        if self.values.len() <= index {
            self.values.resize_with(index + 1, Vec::new);
        }
        self.values[index] = values;
    }

    /// Adds the help subcommand and `-h, --help` to every other command that
    /// leaves `-h` free.
    fn install_help(&mut self) {
        self.tree.add_help_command();
        let ids: Vec<CommandId> = self.tree.ids().collect();
        for id in ids {
            let command = &mut self.tree[id];
            if command.name != cmdtree_core::HELP_COMMAND && !command.options.has_short('h') {
                command.options.push(OptionSpec::help());
            }
        }
    }

    /// Returns the command tree.
    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    /// Returns the bindings of the command at `id`, keyed by option identity.
    pub fn values(&self, id: CommandId) -> &[(String, BoundValue)] {
        self.values.get(id.index()).map(Vec::as_slice).unwrap_or_default()
    }

    /// Resets all options, resolves `args` and reports the result.
    ///
    /// A reset failure is reported like a resolution error.
    pub fn parse<S: AsRef<str>>(&mut self, args: &[S]) -> ParseReport {
        let reset_error = self.tree.reset_options().err();
        let resolution = self.tree.resolve(args);

        let error = reset_error
            .map(|err| CommandError::Options(err).to_string())
            .or_else(|| resolution.error.as_ref().map(ToString::to_string));
        let options = resolution
            .path
            .iter()
            .map(|&id| CommandValues {
                command: self.tree[id].name.clone(),
                values: self
                    .values(id)
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            })
            .collect();

        debug!(consumed = resolution.consumed, error = ?error, "parse report ready");
        ParseReport {
            path: self.tree.names(&resolution.path),
            consumed: resolution.consumed,
            remaining: resolution
                .remaining(args)
                .iter()
                .map(|arg| {
                    let arg: &str = arg.as_ref();
                    arg.to_string()
                })
                .collect(),
            help_requested: resolution.help_requested,
            error,
            options,
        }
    }

    /// Finds the command reached by `names`, each matched by unique prefix.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::UnknownCommand`] when a name matches no
    /// subcommand, or the ambiguity message when it matches several.
    pub fn find<S: AsRef<str>>(&self, names: &[S]) -> Result<CommandId> {
        let mut id = self.tree.root();
        for name in names {
            let name: &str = name.as_ref();
            id = self
                .tree
                .match_subcommand(id, name)
                .map_err(|err| SurfaceError::UnknownCommand(err.to_string()))?
                .ok_or_else(|| SurfaceError::UnknownCommand(name.to_string()))?;
        }
        Ok(id)
    }

    /// Renders the documentation of the command reached by `names`.
    ///
    /// # Errors
    ///
    /// See [`Surface::find`].
    pub fn doc<S: AsRef<str>>(&self, names: &[S]) -> Result<String> {
        let id = self.find(names)?;
        Ok(self.tree.render_doc(id))
    }
}

fn build_command(def: &CommandDef) -> Result<(Command, Vec<(String, BoundValue)>)> {
    let mut command = Command::new(&def.name)
        .with_info(&def.info)
        .with_usage(&def.usage)
        .with_description(&def.description);
    let mut values = Vec::with_capacity(def.options.len());
    for opt in &def.options {
        let (spec, value) = build_option(opt)?;
        command.options.push(spec);
        values.push((opt.key(), value));
    }
    Ok((command, values))
}

fn build_option(def: &OptionDef) -> Result<(OptionSpec, BoundValue)> {
    let short = def.short.as_deref().and_then(|s| s.chars().next());
    let default = def.default.as_deref().unwrap_or_default();
    let invalid = |reason: String| {
        SurfaceError::InvalidDefinition(vec![ValidationError::InvalidDefault {
            command: String::new(),
            option: def.key(),
            default: default.to_string(),
            reason,
        }])
    };

    let (mut spec, value) = match def.kind {
        ValueKind::Bool => {
            let b = Binding::new(false);
            (OptionSpec::boolean(&b, &def.name, short, &def.description), BoundValue::Bool(b))
        }
        ValueKind::String => {
            let s = Binding::new(default.to_string());
            (OptionSpec::string(&s, &def.name, short, &def.description), BoundValue::String(s))
        }
        ValueKind::Int => {
            let n = if default.is_empty() {
                0
            } else {
                parse_int(default).map_err(|err| invalid(err.to_string()))?
            };
            let n = Binding::new(n);
            (OptionSpec::int(&n, &def.name, short, &def.description), BoundValue::Int(n))
        }
        ValueKind::Float => {
            let x = if default.is_empty() {
                0.0
            } else {
                default
                    .trim()
                    .parse::<f64>()
                    .map_err(|err| invalid(err.to_string()))?
            };
            let x = Binding::new(x);
            (OptionSpec::float(&x, &def.name, short, &def.description), BoundValue::Float(x))
        }
    };

    for alias in &def.aliases {
        spec = spec.with_alias(alias);
    }
    for c in def.short_aliases.iter().filter_map(|s| s.chars().next()) {
        spec = spec.with_short_alias(c);
    }
    if let Some(label) = &def.param_type {
        spec = spec.with_param(label);
    }
    if def.optional_param {
        spec = spec.with_optional_param();
    }
    Ok((spec, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(yaml: &str) -> Surface {
        Surface::build(&CommandDef::from_yaml_str(yaml).unwrap()).unwrap()
    }

    const GIT: &str = r#"
name: git
info: the stupid content tracker
help: true
options:
  - name: verbose
    short: v
subcommands:
  - name: remote
    info: manage remotes
    subcommands:
      - name: add
        options:
          - name: fetch
            short: f
          - name: track
            short: t
            type: string
  - name: commit
    options:
      - name: message
        short: m
        type: string
        default: wip
"#;

    #[test]
    fn test_build_rejects_invalid_definition() {
        let def = CommandDef::from_yaml_str("name: x\noptions:\n  - name: a\n    short: ab\n").unwrap();
        match Surface::build(&def) {
            Err(SurfaceError::InvalidDefinition(errors)) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_collects_values_along_path() {
        let mut surface = surface(GIT);
        let report = surface.parse(&["-v", "rem", "add", "-ft", "main", "origin", "url"]);
        assert_eq!(report.path, vec!["git", "remote", "add"]);
        assert_eq!(report.consumed, 5);
        assert_eq!(report.remaining, vec!["origin", "url"]);
        assert_eq!(report.error, None);
        assert_eq!(report.options[0].values["verbose"], true);
        assert!(report.options[1].values.is_empty());
        assert_eq!(report.options[2].values["fetch"], true);
        assert_eq!(report.options[2].values["track"], "main");
    }

    #[test]
    fn test_parse_resets_between_runs() {
        let mut surface = surface(GIT);
        let report = surface.parse(&["commit", "-m", "fix"]);
        assert_eq!(report.options[1].values["message"], "fix");

        let report = surface.parse(&["commit"]);
        assert_eq!(report.options[1].values["message"], "wip");
        assert_eq!(report.options[0].values["verbose"], false);
    }

    #[test]
    fn test_parse_reports_errors() {
        let mut surface = surface(GIT);
        let report = surface.parse(&["commit", "--nope"]);
        assert_eq!(report.error.as_deref(), Some("commit: unrecognized option --nope"));
        assert_eq!(report.path, vec!["git", "commit"]);
    }

    #[test]
    fn test_help_installed() {
        let mut surface = surface(GIT);
        let report = surface.parse(&["remote", "add", "--help"]);
        assert!(report.help_requested);

        let doc = surface.doc(&["help"]).unwrap();
        assert!(doc.starts_with("NAME\n    help - prints help messages\n"));
        let root_doc = surface.doc::<&str>(&[]).unwrap();
        assert!(root_doc.contains("    -h, --help\n"));
        assert!(root_doc.contains("SUBCOMMANDS\n    commit\n    help   - prints help messages\n"));
    }

    #[test]
    fn test_find_by_prefix() {
        let surface = surface(GIT);
        let id = surface.find(&["r", "a"]).unwrap();
        assert_eq!(surface.tree()[id].name, "add");
        assert!(matches!(surface.find(&["nope"]), Err(SurfaceError::UnknownCommand(_))));
    }

    #[test]
    fn test_float_and_optional_param() {
        let mut surface = surface(
            r#"
name: plot
options:
  - name: scale
    type: float
    default: "1.5"
  - name: color
    type: string
    optional_param: true
    param_type: when
"#,
        );
        let doc = surface.doc::<&str>(&[]).unwrap();
        assert!(doc.contains("--color[=when]"));
        assert!(doc.contains("--scale=float (default 1.5)"));

        let report = surface.parse(&["--color", "--scale", "2"]);
        assert_eq!(report.options[0].values["scale"], 2.0);
        assert_eq!(report.options[0].values["color"], "");
        assert_eq!(report.consumed, 3);
    }
}
