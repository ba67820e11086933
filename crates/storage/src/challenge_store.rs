use geetest_relay_domain::model::{ChallengeRecord, DiscordId, Game, GeetestSolution};
use geetest_relay_domain::storage::{ChallengeStore, StorageError, StorageResult};
use sea_orm::{sea_query::OnConflict, EntityTrait, Set};

use crate::entity::geetest_challenges;
use crate::SeaOrmStorage;

fn game_column(game: Game) -> geetest_challenges::Column {
    match game {
        Game::Genshin => geetest_challenges::Column::Genshin,
        Game::Honkai3rd => geetest_challenges::Column::Honkai3rd,
        Game::StarRail => geetest_challenges::Column::Starrail,
    }
}

#[async_trait::async_trait]
impl ChallengeStore for SeaOrmStorage {
    async fn upsert_solution(
        &self,
        discord_id: DiscordId,
        game: Game,
        solution: GeetestSolution,
    ) -> StorageResult<()> {
        let value = serde_json::to_value(&solution).map_err(StorageError::from_source)?;

        let mut active = geetest_challenges::ActiveModel {
            discord_id: Set(discord_id.get()),
            ..Default::default()
        };
        match game {
            Game::Genshin => active.genshin = Set(Some(value)),
            Game::Honkai3rd => active.honkai3rd = Set(Some(value)),
            Game::StarRail => active.starrail = Set(Some(value)),
        }

        // Conflicting rows only get the addressed game's column rewritten, so
        // solutions stored for the user's other games survive the upsert.
        geetest_challenges::Entity::insert(active)
            .on_conflict(
                OnConflict::column(geetest_challenges::Column::DiscordId)
                    .update_column(game_column(game))
                    .to_owned(),
            )
            .exec_without_returning(self.connection())
            .await
            .map_err(StorageError::from_source)?;
        Ok(())
    }

    async fn find_challenge(
        &self,
        discord_id: DiscordId,
    ) -> StorageResult<Option<ChallengeRecord>> {
        let maybe = geetest_challenges::Entity::find_by_id(discord_id.get())
            .one(self.connection())
            .await
            .map_err(StorageError::from_source)?;
        maybe.map(challenge_to_record).transpose()
    }
}

fn challenge_to_record(model: geetest_challenges::Model) -> StorageResult<ChallengeRecord> {
    Ok(ChallengeRecord {
        discord_id: DiscordId::new(model.discord_id),
        genshin: parse_solution(model.genshin)?,
        honkai3rd: parse_solution(model.honkai3rd)?,
        starrail: parse_solution(model.starrail)?,
    })
}

fn parse_solution(value: Option<serde_json::Value>) -> StorageResult<Option<GeetestSolution>> {
    value
        .map(|v| serde_json::from_value(v).map_err(StorageError::from_source))
        .transpose()
}
