//! Resolution of mention/id values into platform entities.
//!
//! The parser never talks to the network. Entity accessors take an injected
//! [`EntityResolver`] (usually backed by a session cache with a REST
//! fallback) and report failures as [`Unresolved`], which still carries a
//! partial entity with the identifier filled in so callers can echo it back
//! to the user.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::clean_id;
use crate::value::ParsedValue;

/// A text channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel id.
    pub id: String,
    /// Display name, empty on a partial entity.
    pub name: String,
    /// Owning guild, empty for direct messages.
    pub guild_id: String,
}

/// A platform user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User id.
    pub id: String,
    /// Account name, empty on a partial entity.
    pub username: String,
    /// Whether the account is a bot.
    pub bot: bool,
}

/// A guild role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role id.
    pub id: String,
    /// Role name, empty on a partial entity.
    pub name: String,
}

/// A user's membership in a guild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Guild the membership belongs to.
    pub guild_id: String,
    /// The member's user account.
    pub user: User,
    /// Guild nickname, if one is set.
    pub nick: Option<String>,
    /// Ids of the roles held in the guild.
    pub roles: Vec<String>,
}

/// Looks up live entities by identifier.
///
/// Implementations decide how (cache first, then API); the accessors only
/// need an answer or `None`.
pub trait EntityResolver {
    /// Returns `false` when there is no usable connection.
    fn is_connected(&self) -> bool;
    /// Finds a channel by id.
    fn channel(&self, id: &str) -> Option<Channel>;
    /// Finds a user by id.
    fn user(&self, id: &str) -> Option<User>;
    /// Finds a role within a guild.
    fn role(&self, guild_id: &str, id: &str) -> Option<Role>;
    /// Finds a guild member.
    fn member(&self, guild_id: &str, id: &str) -> Option<Member>;
}

/// Why an entity could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The argument has no value.
    #[error("no {0} id")]
    Empty(&'static str),
    /// The value does not reduce to a platform id.
    #[error("invalid {kind} id: {value}")]
    InvalidId { kind: &'static str, value: String },
    /// The resolver has no active connection.
    #[error("no session")]
    NotConnected,
    /// A guild-scoped lookup was made without a guild id.
    #[error("no guild id")]
    MissingGuild,
    /// The resolver could not find the entity.
    #[error("could not find {kind} {id}")]
    NotFound { kind: &'static str, id: String },
}

/// Failed resolution: the reason plus a best-effort partial entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct Unresolved<T: std::fmt::Debug> {
    /// Entity with only the identifier populated.
    pub partial: T,
    /// What went wrong.
    pub reason: ResolveError,
}

impl<T: std::fmt::Debug> Unresolved<T> {
    fn new(partial: T, reason: ResolveError) -> Self {
        Self { partial, reason }
    }
}

/// The id to lookup, or the reason there is none. `raw` is echoed in the
/// partial entity when cleaning fails.
fn lookup_id(
    value: &ParsedValue,
    kind: &'static str,
    resolver: &dyn EntityResolver,
) -> Result<String, (String, ResolveError)> {
    let raw = value.as_string();
    if raw.is_empty() {
        return Err((raw, ResolveError::Empty(kind)));
    }
    let Some(id) = clean_id(&raw) else {
        return Err((
            raw.clone(),
            ResolveError::InvalidId {
                kind,
                value: raw,
            },
        ));
    };
    if !resolver.is_connected() {
        return Err((id, ResolveError::NotConnected));
    }
    Ok(id)
}

impl ParsedValue {
    /// Resolves the value as a channel.
    ///
    /// # Errors
    ///
    /// Returns [`Unresolved`] when the value is empty, is not an id, the
    /// resolver is disconnected, or the channel does not exist.
    pub fn as_channel(&self, resolver: &dyn EntityResolver) -> Result<Channel, Unresolved<Channel>> {
        let partial = |id: String| Channel {
            id,
            ..Default::default()
        };
        let id = lookup_id(self, "channel", resolver)
            .map_err(|(id, reason)| Unresolved::new(partial(id), reason))?;
        resolver.channel(&id).ok_or_else(|| {
            Unresolved::new(
                partial(id.clone()),
                ResolveError::NotFound { kind: "channel", id },
            )
        })
    }

    /// Resolves the value as a user.
    ///
    /// # Errors
    ///
    /// See [`as_channel`](ParsedValue::as_channel).
    pub fn as_user(&self, resolver: &dyn EntityResolver) -> Result<User, Unresolved<User>> {
        let partial = |id: String| User {
            id,
            ..Default::default()
        };
        let id = lookup_id(self, "user", resolver)
            .map_err(|(id, reason)| Unresolved::new(partial(id), reason))?;
        resolver.user(&id).ok_or_else(|| {
            Unresolved::new(
                partial(id.clone()),
                ResolveError::NotFound { kind: "user", id },
            )
        })
    }

    /// Resolves the value as a role in `guild_id`.
    ///
    /// # Errors
    ///
    /// Also fails with [`ResolveError::MissingGuild`] when `guild_id` is
    /// empty.
    pub fn as_role(
        &self,
        resolver: &dyn EntityResolver,
        guild_id: &str,
    ) -> Result<Role, Unresolved<Role>> {
        let partial = |id: String| Role {
            id,
            ..Default::default()
        };
        let id = lookup_id(self, "role", resolver)
            .map_err(|(id, reason)| Unresolved::new(partial(id), reason))?;
        if guild_id.is_empty() {
            return Err(Unresolved::new(partial(id), ResolveError::MissingGuild));
        }
        resolver.role(guild_id, &id).ok_or_else(|| {
            Unresolved::new(
                partial(id.clone()),
                ResolveError::NotFound { kind: "role", id },
            )
        })
    }

    /// Resolves the value as a member of `guild_id`.
    ///
    /// # Errors
    ///
    /// Also fails with [`ResolveError::MissingGuild`] when `guild_id` is
    /// empty.
    pub fn as_member(
        &self,
        resolver: &dyn EntityResolver,
        guild_id: &str,
    ) -> Result<Member, Unresolved<Member>> {
        let partial = |id: String| Member {
            guild_id: guild_id.to_string(),
            user: User {
                id,
                ..Default::default()
            },
            ..Default::default()
        };
        let id = lookup_id(self, "user", resolver)
            .map_err(|(id, reason)| Unresolved::new(partial(id), reason))?;
        if guild_id.is_empty() {
            return Err(Unresolved::new(partial(id), ResolveError::MissingGuild));
        }
        resolver.member(guild_id, &id).ok_or_else(|| {
            Unresolved::new(
                partial(id.clone()),
                ResolveError::NotFound { kind: "member", id },
            )
        })
    }
}
