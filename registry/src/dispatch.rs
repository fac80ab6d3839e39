//! Turning chat messages into command invocations.

use command_args_core::ParsedArguments;
use command_args_parser::{InteractionOption, parse_arguments_with, parse_interaction_options};
use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};
use tracing::debug;

use crate::error::{RegistryError, Result};
use crate::registry::{CommandInfo, CommandRegistry};

/// A message split into its trigger and argument string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Lower-cased command trigger.
    pub trigger: String,
    /// Everything after the trigger.
    pub args: String,
}

/// Splits a message into trigger and arguments.
///
/// A message is a command when it starts with `prefix`, or, when `bot_id` is
/// given, with a mention of the bot followed by a space (`<@id> ` or
/// `<@!id> `). An empty prefix disables the prefix form. Returns `None` for
/// anything else, including a bare prefix or mention.
///
/// # Examples
///
/// ```
/// use command_args_registry::extract_command;
///
/// let inv = extract_command("!Mute <@123456789012345678> 1h", "!", None).unwrap();
/// assert_eq!(inv.trigger, "mute");
/// assert_eq!(inv.args, "<@123456789012345678> 1h");
///
/// let inv = extract_command("<@!42> ping", "!", Some("42")).unwrap();
/// assert_eq!(inv.trigger, "ping");
/// assert_eq!(inv.args, "");
///
/// assert!(extract_command("hello there", "!", Some("42")).is_none());
/// assert!(extract_command("!", "!", None).is_none());
/// ```
pub fn extract_command(message: &str, prefix: &str, bot_id: Option<&str>) -> Option<Invocation> {
    let content = strip_prefix(message, prefix).or_else(|| strip_mention(message, bot_id?))?;

    let content = content.trim_start();
    let (trigger, args) = match content.split_once(char::is_whitespace) {
        Some((trigger, args)) => (trigger, args.trim_start()),
        None => (content, ""),
    };
    if trigger.is_empty() {
        return None;
    }

    Some(Invocation {
        trigger: trigger.to_lowercase(),
        args: args.to_string(),
    })
}

fn strip_prefix<'m>(message: &'m str, prefix: &str) -> Option<&'m str> {
    if prefix.is_empty() {
        return None;
    }
    message.strip_prefix(prefix)
}

fn strip_mention<'m>(message: &'m str, bot_id: &str) -> Option<&'m str> {
    [format!("<@{bot_id}> "), format!("<@!{bot_id}> ")]
        .iter()
        .find_map(|mention| message.strip_prefix(mention.as_str()))
}

/// A single dispatched invocation, handed to the command handler.
#[derive(Debug, Clone)]
pub struct Context<'a> {
    pub command: &'a CommandInfo,
    /// The trigger actually used (name or alias).
    pub trigger: String,
    pub args: ParsedArguments,
}

impl Serialize for Context<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Context", 3)?;
        state.serialize_field("command", &self.command.name)?;
        state.serialize_field("trigger", &self.trigger)?;
        state.serialize_field("args", &self.args)?;
        state.end()
    }
}

impl CommandRegistry {
    /// Extracts, resolves and parses a chat message.
    ///
    /// Returns `Ok(None)` when the message is not a command.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownCommand`] when the trigger matches no
    /// registered command.
    pub fn dispatch(
        &self,
        message: &str,
        prefix: &str,
        bot_id: Option<&str>,
    ) -> Result<Option<Context<'_>>> {
        match extract_command(message, prefix, bot_id) {
            Some(invocation) => self.dispatch_invocation(&invocation).map(Some),
            None => Ok(None),
        }
    }

    /// Resolves and parses an already split invocation.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownCommand`] for an unknown trigger.
    pub fn dispatch_invocation(&self, invocation: &Invocation) -> Result<Context<'_>> {
        let command = self
            .resolve(&invocation.trigger)
            .ok_or_else(|| RegistryError::UnknownCommand(invocation.trigger.clone()))?;

        let args = parse_arguments_with(&invocation.args, &command.schema, self.sink());
        debug!(command = %command.name, trigger = %invocation.trigger, args = args.len(), "Dispatched command");

        Ok(Context {
            command,
            trigger: invocation.trigger.clone(),
            args,
        })
    }

    /// Resolves a slash-command interaction and binds its options.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownCommand`] for an unknown name.
    pub fn dispatch_interaction(
        &self,
        name: &str,
        options: &[InteractionOption],
    ) -> Result<Context<'_>> {
        let command = self
            .resolve(name)
            .ok_or_else(|| RegistryError::UnknownCommand(name.to_string()))?;

        Ok(Context {
            command,
            trigger: name.to_lowercase(),
            args: parse_interaction_options(options, &command.schema),
        })
    }

    /// Dispatches a message and runs the command's handler, if it has one.
    ///
    /// # Errors
    ///
    /// See [`dispatch`](CommandRegistry::dispatch).
    pub fn invoke(
        &self,
        message: &str,
        prefix: &str,
        bot_id: Option<&str>,
    ) -> Result<Option<Context<'_>>> {
        let Some(ctx) = self.dispatch(message, prefix, bot_id)? else {
            return Ok(None);
        };
        if let Some(handler) = self.handler(&ctx.trigger) {
            handler(&ctx);
        }
        Ok(Some(ctx))
    }
}
