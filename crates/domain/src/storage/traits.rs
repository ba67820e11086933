use async_trait::async_trait;
use thiserror::Error;

use crate::model::{ChallengeRecord, DiscordId, Game, GeetestSolution, UserRecord};

/// Common result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(String),
}

impl StorageError {
    pub fn from_source(err: impl std::fmt::Display) -> Self {
        Self::Database(err.to_string())
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Registers a user row. Inserting an already-registered id is a no-op.
    async fn insert_user(&self, user: UserRecord) -> StorageResult<()>;

    /// Looks up a user by Discord id. Absence is `Ok(None)`, not an error.
    async fn find_user(&self, discord_id: DiscordId) -> StorageResult<Option<UserRecord>>;
}

#[async_trait]
pub trait ChallengeStore: Send + Sync {
    /// Stores the solved challenge for one game, creating the row if needed.
    /// Solutions stored for other games on the same user are preserved.
    async fn upsert_solution(
        &self,
        discord_id: DiscordId,
        game: Game,
        solution: GeetestSolution,
    ) -> StorageResult<()>;

    async fn find_challenge(
        &self,
        discord_id: DiscordId,
    ) -> StorageResult<Option<ChallengeRecord>>;
}
