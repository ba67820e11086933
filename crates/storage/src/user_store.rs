use geetest_relay_domain::model::{DiscordId, UserRecord};
use geetest_relay_domain::storage::{StorageError, StorageResult, UserStore};
use sea_orm::{sea_query::OnConflict, EntityTrait, Set};

use crate::entity::users;
use crate::SeaOrmStorage;

#[async_trait::async_trait]
impl UserStore for SeaOrmStorage {
    async fn insert_user(&self, user: UserRecord) -> StorageResult<()> {
        let model = users::ActiveModel {
            discord_id: Set(user.discord_id.get()),
        };
        users::Entity::insert(model)
            .on_conflict(
                OnConflict::column(users::Column::DiscordId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.connection())
            .await
            .map_err(StorageError::from_source)?;
        Ok(())
    }

    async fn find_user(&self, discord_id: DiscordId) -> StorageResult<Option<UserRecord>> {
        let maybe = users::Entity::find_by_id(discord_id.get())
            .one(self.connection())
            .await
            .map_err(StorageError::from_source)?;
        Ok(maybe.map(|model| UserRecord {
            discord_id: DiscordId::new(model.discord_id),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn storage() -> SeaOrmStorage {
        SeaOrmStorage::connect("sqlite::memory:")
            .await
            .expect("storage inits")
    }

    #[tokio::test]
    async fn find_user_reports_absence_as_none() {
        let storage = storage().await;
        let found = storage.find_user(DiscordId::new(1)).await.unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn insert_user_is_conflict_free_on_duplicates() {
        let storage = storage().await;
        let user = UserRecord {
            discord_id: DiscordId::new(42),
        };
        storage.insert_user(user).await.unwrap();
        storage.insert_user(user).await.unwrap();

        let found = storage.find_user(user.discord_id).await.unwrap();
        assert_eq!(found, Some(user));
    }
}
