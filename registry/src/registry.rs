//! Command registry.
//!
//! Commands are registered once at startup and the registry is read-only
//! afterwards, so it can be shared freely between threads.

use std::collections::HashMap;
use std::sync::Arc;

use command_args_core::{ArgumentSchema, ReportSink, TracingSink};
use tracing::{debug, warn};

use crate::config::BotConfig;
use crate::dispatch::Context;
use crate::error::{RegistryError, Result};

/// Everything about a command except the code it runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandInfo {
    pub name: String,
    pub description: String,
    pub group: String,
    /// Whether users without moderator rights may run the command.
    pub public: bool,
    /// Extra triggers. The name is always a trigger too.
    pub aliases: Vec<String>,
    pub schema: ArgumentSchema,
}

impl CommandInfo {
    /// Creates a command with no arguments.
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            ..Default::default()
        }
    }

    /// Sets the argument schema.
    pub fn with_schema(mut self, schema: ArgumentSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Adds extra triggers.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Sets the help group.
    pub fn with_group(mut self, group: &str) -> Self {
        self.group = group.to_string();
        self
    }

    /// Marks the command as usable by everyone.
    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }

    /// One-line usage, e.g. `mute <user> <duration> [reason...]`.
    pub fn usage(&self) -> String {
        let args = self.schema.usage();
        if args.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, args)
        }
    }
}

/// Code run for a dispatched command.
pub type Handler = Arc<dyn Fn(&Context<'_>) + Send + Sync>;

struct Command {
    info: CommandInfo,
    handler: Option<Handler>,
}

/// Name and alias lookup for registered commands.
///
/// # Examples
///
/// ```
/// use command_args_registry::{CommandInfo, CommandRegistry};
///
/// let mut registry = CommandRegistry::new();
/// registry
///     .register(CommandInfo::new("Ping", "Check latency").with_aliases(["p"]), None)
///     .unwrap();
///
/// assert_eq!(registry.resolve("ping").unwrap().name, "Ping");
/// assert_eq!(registry.resolve("P").unwrap().name, "Ping");
/// assert!(registry.resolve("pong").is_none());
/// ```
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
    triggers: HashMap<String, String>,
    sink: Arc<dyn ReportSink>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.commands.len())
            .field("triggers", &self.triggers.len())
            .finish()
    }
}

impl CommandRegistry {
    /// Creates an empty registry that reports through [`TracingSink`].
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
            triggers: HashMap::new(),
            sink: Arc::new(TracingSink),
        }
    }

    /// Replaces the report sink used for registration and parse problems.
    pub fn with_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Builds a registry from a configuration file.
    ///
    /// # Errors
    ///
    /// See [`load_config`](CommandRegistry::load_config).
    pub fn from_config(config: &BotConfig) -> Result<Self> {
        let mut registry = Self::new();
        registry.load_config(config)?;
        Ok(registry)
    }

    /// Registers every command of a configuration file, without handlers.
    ///
    /// # Errors
    ///
    /// Fails on the first command whose schema is invalid or whose name is
    /// already taken.
    pub fn load_config(&mut self, config: &BotConfig) -> Result<()> {
        for def in &config.commands {
            let info = def.to_info().inspect_err(|err| {
                self.sink.report("Command registration failed", err);
            })?;
            self.register(info, None)?;
        }
        Ok(())
    }

    /// Registers a command.
    ///
    /// The name and aliases become lower-case triggers. An alias already
    /// bound to another command is skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::EmptyTrigger`] for a blank name and
    /// [`RegistryError::DuplicateCommand`] when the name is taken.
    pub fn register(&mut self, info: CommandInfo, handler: Option<Handler>) -> Result<()> {
        if let Err(err) = self.check_name(&info.name) {
            self.sink.report("Command registration failed", &err);
            return Err(err);
        }
        let key = info.name.trim().to_lowercase();

        self.triggers.insert(key.clone(), key.clone());
        for alias in &info.aliases {
            let alias = alias.to_lowercase();
            match self.triggers.get(&alias) {
                Some(owner) if *owner != key => {
                    warn!(alias = %alias, command = %info.name, owner = %owner, "Alias already registered");
                }
                Some(_) => {}
                None => {
                    self.triggers.insert(alias, key.clone());
                }
            }
        }

        debug!(command = %info.name, arguments = info.schema.len(), "Registered command");
        self.commands.insert(key, Command { info, handler });
        Ok(())
    }

    fn check_name(&self, name: &str) -> Result<()> {
        let key = name.trim().to_lowercase();
        if key.is_empty() {
            return Err(RegistryError::EmptyTrigger);
        }
        if self.triggers.contains_key(&key) {
            return Err(RegistryError::DuplicateCommand(name.to_string()));
        }
        Ok(())
    }

    /// Finds a command by name or alias, ignoring case.
    pub fn resolve(&self, trigger: &str) -> Option<&CommandInfo> {
        self.entry(trigger).map(|command| &command.info)
    }

    pub(crate) fn handler(&self, trigger: &str) -> Option<&Handler> {
        self.entry(trigger).and_then(|command| command.handler.as_ref())
    }

    pub(crate) fn sink(&self) -> &dyn ReportSink {
        self.sink.as_ref()
    }

    fn entry(&self, trigger: &str) -> Option<&Command> {
        let key = self.triggers.get(&trigger.to_lowercase())?;
        self.commands.get(key)
    }

    /// Registered commands, sorted by name.
    pub fn commands(&self) -> Vec<&CommandInfo> {
        let mut list: Vec<&CommandInfo> = self.commands.values().map(|c| &c.info).collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use command_args_core::{ArgumentKind, TypeGuard};

    use super::*;

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = CommandRegistry::new();
        registry.register(CommandInfo::new("ban", ""), None).unwrap();

        let err = registry.register(CommandInfo::new("BAN", ""), None).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateCommand(name) if name == "BAN"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_name_colliding_with_alias_rejected() {
        let mut registry = CommandRegistry::new();
        registry
            .register(CommandInfo::new("ban", "").with_aliases(["hammer"]), None)
            .unwrap();

        assert!(registry.register(CommandInfo::new("hammer", ""), None).is_err());
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut registry = CommandRegistry::new();
        let err = registry.register(CommandInfo::new("  ", ""), None).unwrap_err();
        assert!(matches!(err, RegistryError::EmptyTrigger));
    }

    #[test]
    fn test_taken_alias_is_skipped() {
        let mut registry = CommandRegistry::new();
        registry
            .register(CommandInfo::new("kick", "").with_aliases(["boot"]), None)
            .unwrap();
        registry
            .register(CommandInfo::new("ban", "").with_aliases(["Boot", "hammer"]), None)
            .unwrap();

        assert_eq!(registry.resolve("boot").unwrap().name, "kick");
        assert_eq!(registry.resolve("hammer").unwrap().name, "ban");
    }

    #[test]
    fn test_commands_sorted() {
        let mut registry = CommandRegistry::new();
        for name in ["warn", "ban", "mute"] {
            registry.register(CommandInfo::new(name, ""), None).unwrap();
        }

        let names: Vec<&str> = registry.commands().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["ban", "mute", "warn"]);
    }

    #[test]
    fn test_usage_line() {
        let schema = ArgumentSchema::builder()
            .define("user", ArgumentKind::Option, TypeGuard::User, "", true, "")
            .build()
            .unwrap();
        let info = CommandInfo::new("kick", "").with_schema(schema);
        assert_eq!(info.usage(), "kick <user>");
        assert_eq!(CommandInfo::new("ping", "").usage(), "ping");
    }
}
