//! Declarative command definitions.
//!
//! A bot's commands can be described in a YAML or JSON file instead of code.
//! Files ending in `.json` are read as JSON, everything else as YAML.
//!
//! # Example YAML
//!
//! ```yaml
//! prefix: "!"
//! bot_id: "123456789012345678"
//! commands:
//!   - name: mute
//!     description: Temporarily silence a member
//!     aliases: [silence]
//!     group: moderation
//!     arguments:
//!       - { name: user, type: user, required: true }
//!       - { name: duration, type: duration, required: true, default: 1h }
//!       - { name: reason, kind: content }
//!       - { name: silent, kind: flag, type: bool, flag: true }
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use command_args_core::{ArgumentKind, ArgumentSchema, TypeGuard};
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};
use crate::registry::CommandInfo;

/// One argument of a [`CommandDefinition`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentDefinition {
    pub name: String,
    #[serde(default)]
    pub kind: ArgumentKind,
    #[serde(default, rename = "type")]
    pub guard: TypeGuard,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default: String,
    /// Matched anywhere as `--name`, rather than by position.
    #[serde(default)]
    pub flag: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

/// A command and its arguments, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,
    /// Whether users without moderator rights may run the command.
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub arguments: Vec<ArgumentDefinition>,
}

impl CommandDefinition {
    /// Builds the argument schema.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidSchema`] naming this command when the
    /// arguments do not form a valid schema.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_args_registry::CommandDefinition;
    ///
    /// let def: CommandDefinition = serde_yaml::from_str(r#"
    /// name: echo
    /// arguments:
    ///   - { name: text, kind: content }
    ///   - { name: loud, kind: flag, type: bool, flag: true }
    /// "#).unwrap();
    ///
    /// let schema = def.to_schema().unwrap();
    /// assert_eq!(schema.len(), 2);
    /// assert_eq!(schema.flags().count(), 1);
    /// ```
    pub fn to_schema(&self) -> Result<ArgumentSchema> {
        let mut builder = ArgumentSchema::builder();
        for arg in &self.arguments {
            builder = if arg.flag {
                builder.add_flag(
                    &arg.name,
                    arg.guard,
                    arg.kind,
                    &arg.description,
                    arg.required,
                    &arg.default,
                )
            } else {
                builder.define(
                    &arg.name,
                    arg.kind,
                    arg.guard,
                    &arg.description,
                    arg.required,
                    &arg.default,
                )
            };
            if !arg.choices.is_empty() {
                builder = builder.add_choices(&arg.name, arg.choices.iter().cloned());
            }
        }

        builder.build().map_err(|source| RegistryError::InvalidSchema {
            command: self.name.clone(),
            source,
        })
    }

    /// Converts the definition into registrable command info.
    ///
    /// # Errors
    ///
    /// See [`to_schema`](CommandDefinition::to_schema).
    pub fn to_info(&self) -> Result<CommandInfo> {
        Ok(CommandInfo {
            name: self.name.clone(),
            description: self.description.clone(),
            group: self.group.clone(),
            public: self.public,
            aliases: self.aliases.clone(),
            schema: self.to_schema()?,
        })
    }
}

/// Top-level bot configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfig {
    /// Text that marks a message as a command (e.g. `"!"`).
    pub prefix: String,
    /// Bot user id, enabling `@bot command` invocations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub commands: Vec<CommandDefinition>,
}

impl BotConfig {
    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](RegistryError::IoError) if the file cannot be
    /// read, or [`JsonError`](RegistryError::JsonError) /
    /// [`YamlError`](RegistryError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(std::fs::File::open(path)?);
        let config = if is_json(path) {
            serde_json::from_reader(reader)?
        } else {
            serde_yaml::from_reader(reader)?
        };
        Ok(config)
    }

    /// Saves the configuration, choosing the format from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](RegistryError::IoError) if the file cannot be
    /// written, or a serialization error.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let writer = BufWriter::new(std::fs::File::create(path)?);
        if is_json(path) {
            serde_json::to_writer_pretty(writer, self)?;
        } else {
            serde_yaml::to_writer(writer, self)?;
        }
        Ok(())
    }

    /// Looks up a definition by name, ignoring case.
    pub fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
