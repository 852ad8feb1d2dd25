use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "slots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub link: String,
    pub tag_link_id: i32,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tag_link::Entity",
        from = "Column::TagLinkId",
        to = "super::tag_link::Column::Id"
    )]
    TagLink,
}

impl Related<super::tag_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TagLink.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
