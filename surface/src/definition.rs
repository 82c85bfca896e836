//! Serializable definitions of a command-line surface.
//!
//! A definition describes a command tree in YAML or JSON:
//!
//! ```yaml
//! name: tool
//! info: does things
//! help: true
//! options:
//!   - name: verbose
//!     short: v
//!     description: talk more
//! subcommands:
//!   - name: build
//!     info: builds things
//!     options:
//!       - name: jobs
//!         short: j
//!         type: int
//!         default: "4"
//! ```
//!
//! Every field except `name` may be left out.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Kind of value an option stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// A flag without parameter.
    #[default]
    Bool,
    /// Any string.
    String,
    /// A signed integer with optional base prefix.
    Int,
    /// A 64-bit float.
    Float,
}

impl ValueKind {
    /// Returns `true` for kinds that take a parameter.
    pub fn takes_param(self) -> bool {
        !matches!(self, Self::Bool)
    }
}

/// One option of a command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionDef {
    /// Primary long name.
    pub name: String,
    /// Primary short letter, as a one-character string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    /// Additional long names.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Additional short letters.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub short_aliases: Vec<String>,
    /// Value kind; `bool` when omitted.
    #[serde(rename = "type")]
    pub kind: ValueKind,
    /// Whether the parameter may be left out.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub optional_param: bool,
    /// Label shown for the parameter instead of the kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    /// Initial value, written the way it would be on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Prose for the OPTIONS section.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl OptionDef {
    /// Returns the identity used for the option's value in reports: the
    /// name, else the short letter, else the first alias.
    pub fn key(&self) -> String {
        if !self.name.is_empty() {
            return self.name.clone();
        }
        self.short
            .iter()
            .chain(self.aliases.iter())
            .find(|s| !s.is_empty())
            .cloned()
            .unwrap_or_default()
    }
}

/// A command and, recursively, its subcommands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandDef {
    /// Command name; the root's name is the program name.
    pub name: String,
    /// One-line summary.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub info: String,
    /// Usage lines.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub usage: String,
    /// Prose for the DESCRIPTION section.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Installs the `help` subcommand and `-h, --help` options. Root only.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub help: bool,
    /// Options in declaration order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDef>,
    /// Subcommands in declaration order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<CommandDef>,
}

impl CommandDef {
    /// Loads a definition, choosing the format by extension.
    ///
    /// `.json` files are read as JSON; anything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::SurfaceError::IoError) if the file cannot
    /// be read, or a JSON/YAML error if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let def = if is_json(path) {
            serde_json::from_reader(reader)?
        } else {
            serde_yaml::from_reader(reader)?
        };
        debug!(path = %path.display(), "loaded definition");
        Ok(def)
    }

    /// Saves the definition, choosing the format by extension.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::SurfaceError::IoError) if the file cannot
    /// be written, or a JSON/YAML error if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let writer = BufWriter::new(File::create(path)?);
        if is_json(path) {
            serde_json::to_writer_pretty(writer, self)?;
        } else {
            serde_yaml::to_writer(writer, self)?;
        }
        Ok(())
    }

    /// Parses a YAML definition.
    ///
    /// # Errors
    ///
    /// Returns [`YamlError`](crate::SurfaceError::YamlError) on malformed
    /// input.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses a JSON definition.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError`](crate::SurfaceError::JsonError) on malformed
    /// input.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the direct subcommand named exactly `name`.
    pub fn find_subcommand(&self, name: &str) -> Option<&CommandDef> {
        self.subcommands.iter().find(|sub| sub.name == name)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
