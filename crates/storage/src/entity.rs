pub mod users {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub discord_id: i64,
    }

    #[derive(Debug, Clone, Copy, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod geetest_challenges {
    use sea_orm::entity::prelude::*;

    /// One row per user; each game column holds the latest solved challenge
    /// as a `{challenge, validate, seccode}` JSON object.
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "geetest_challenges")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub discord_id: i64,
        pub genshin: Option<Json>,
        pub honkai3rd: Option<Json>,
        pub starrail: Option<Json>,
    }

    #[derive(Debug, Clone, Copy, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}
