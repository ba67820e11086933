//! Data structures and validation helpers shared across the relay crates.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use thiserror::Error;

/// Games whose daily sign-in requires a solved Geetest challenge. The string
/// form doubles as the `{game}` path segment and the challenge column name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Game {
    Genshin,
    Honkai3rd,
    StarRail,
}

/// Minimum length (in characters) for the `gt` and `challenge` widget tokens
/// embedded in a sign-in link. Shorter values indicate a truncated or
/// hand-edited link.
pub const MIN_WIDGET_TOKEN_LENGTH: usize = 30;

/// Errors emitted when the widget tokens of a sign-in link fail validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("widget token shorter than {MIN_WIDGET_TOKEN_LENGTH} characters")]
    TokenTooShort,
}

/// Validates the opaque `gt`/`challenge` tokens carried by a sign-in link.
pub fn validate_link_tokens(gt: &str, challenge: &str) -> Result<(), LinkError> {
    if gt.len() < MIN_WIDGET_TOKEN_LENGTH || challenge.len() < MIN_WIDGET_TOKEN_LENGTH {
        return Err(LinkError::TokenTooShort);
    }

    Ok(())
}

/// Errors emitted when a user-supplied Discord id fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiscordIdError {
    #[error("discord id must be a decimal integer")]
    NotNumeric,
}

/// Externally assigned Discord snowflake identifying a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiscordId(i64);

impl DiscordId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn parse(raw: &str) -> Result<Self, DiscordIdError> {
        raw.parse::<i64>()
            .map(Self)
            .map_err(|_| DiscordIdError::NotNumeric)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for DiscordId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for DiscordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The three opaque tokens produced by a successfully solved Geetest widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeetestSolution {
    pub challenge: String,
    pub validate: String,
    pub seccode: String,
}

/// Registered bot end-user. Rows are created by the bot's own registration
/// flow; the relay only checks for their existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserRecord {
    pub discord_id: DiscordId,
}

/// Most recent solved challenge per user, one optional slot per game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeRecord {
    pub discord_id: DiscordId,
    pub genshin: Option<GeetestSolution>,
    pub honkai3rd: Option<GeetestSolution>,
    pub starrail: Option<GeetestSolution>,
}

impl ChallengeRecord {
    /// Empty record for a user with no stored solutions yet.
    pub fn new(discord_id: DiscordId) -> Self {
        Self {
            discord_id,
            genshin: None,
            honkai3rd: None,
            starrail: None,
        }
    }

    pub fn solution_for(&self, game: Game) -> Option<&GeetestSolution> {
        match game {
            Game::Genshin => self.genshin.as_ref(),
            Game::Honkai3rd => self.honkai3rd.as_ref(),
            Game::StarRail => self.starrail.as_ref(),
        }
    }
}
