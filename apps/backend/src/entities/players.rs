use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "players")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub name_lc: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique, column_name = "token_hash")]
    pub token_hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sessions_players::Entity")]
    SessionsPlayers,
}

impl Related<super::sessions_players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SessionsPlayers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
