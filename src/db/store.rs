use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use std::collections::HashMap;

use crate::db::entities::{
    prelude::{Slot as SlotEntity, TagLink as TagLinkEntity, User as UserEntity},
    slot, tag_link, user,
};
use crate::db::models::{
    NewSlot, NewTagLink, NewUser, Slot, TagLink, TagLinkWithSlots, User, UserWithTagLinks,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    Db(DbErr),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::UniqueViolation(detail),
            _ => StoreError::Db(err),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations the request handlers depend on.
///
/// Aggregate reads (`*_with_*`) return fully populated structures; callers
/// never assemble nested data themselves.
#[async_trait]
pub trait TagLinkStore: Send + Sync {
    async fn list_users_with_tag_links(&self) -> StoreResult<Vec<UserWithTagLinks>>;
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User>;
    async fn find_user(&self, user_id: i32) -> StoreResult<Option<User>>;

    async fn tag_id_claimed(&self, tag_id: &str) -> StoreResult<bool>;
    async fn create_tag_link(&self, new_tag_link: NewTagLink) -> StoreResult<TagLink>;
    async fn find_tag_link(&self, tag_link_id: i32) -> StoreResult<Option<TagLink>>;
    async fn find_tag_link_with_slots(
        &self,
        tag_link_id: i32,
    ) -> StoreResult<Option<TagLinkWithSlots>>;
    async fn list_tag_links_with_slots(&self) -> StoreResult<Vec<TagLinkWithSlots>>;

    /// Sets the active slot only if none is set yet. Returns whether a row changed.
    async fn activate_if_unset(&self, tag_link_id: i32, slot_id: i32) -> StoreResult<bool>;
    async fn set_active_slot(&self, tag_link_id: i32, slot_id: i32) -> StoreResult<TagLink>;

    async fn create_slot(&self, new_slot: NewSlot) -> StoreResult<Slot>;
    async fn list_slots(&self) -> StoreResult<Vec<Slot>>;
}

#[derive(Clone, Debug)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TagLinkStore for SeaOrmStore {
    async fn list_users_with_tag_links(&self) -> StoreResult<Vec<UserWithTagLinks>> {
        let users = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;

        let mut links_by_user: HashMap<i32, Vec<TagLinkWithSlots>> = HashMap::new();
        for link in self.list_tag_links_with_slots().await? {
            links_by_user
                .entry(link.tag_link.user_id)
                .or_default()
                .push(link);
        }

        Ok(users
            .into_iter()
            .map(|model| {
                let tag_links = links_by_user.remove(&model.id).unwrap_or_default();
                UserWithTagLinks {
                    user: model.into(),
                    tag_links,
                }
            })
            .collect())
    }

    async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        let now = Utc::now();
        let model = user::ActiveModel {
            name: Set(new_user.name),
            email: Set(new_user.email),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(model.into())
    }

    async fn find_user(&self, user_id: i32) -> StoreResult<Option<User>> {
        let model = UserEntity::find_by_id(user_id).one(&self.db).await?;
        Ok(model.map(User::from))
    }

    async fn tag_id_claimed(&self, tag_id: &str) -> StoreResult<bool> {
        let count = TagLinkEntity::find()
            .filter(tag_link::Column::TagId.eq(tag_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn create_tag_link(&self, new_tag_link: NewTagLink) -> StoreResult<TagLink> {
        let now = Utc::now();
        let model = tag_link::ActiveModel {
            tag_id: Set(new_tag_link.tag_id),
            user_id: Set(new_tag_link.user_id),
            active_slot_id: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(model.into())
    }

    async fn find_tag_link(&self, tag_link_id: i32) -> StoreResult<Option<TagLink>> {
        let model = TagLinkEntity::find_by_id(tag_link_id).one(&self.db).await?;
        Ok(model.map(TagLink::from))
    }

    async fn find_tag_link_with_slots(
        &self,
        tag_link_id: i32,
    ) -> StoreResult<Option<TagLinkWithSlots>> {
        let rows = TagLinkEntity::find_by_id(tag_link_id)
            .find_with_related(SlotEntity)
            .order_by_asc(slot::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().next().map(TagLinkWithSlots::from))
    }

    async fn list_tag_links_with_slots(&self) -> StoreResult<Vec<TagLinkWithSlots>> {
        let rows = TagLinkEntity::find()
            .find_with_related(SlotEntity)
            .order_by_asc(tag_link::Column::Id)
            .order_by_asc(slot::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(TagLinkWithSlots::from).collect())
    }

    async fn activate_if_unset(&self, tag_link_id: i32, slot_id: i32) -> StoreResult<bool> {
        let result = TagLinkEntity::update_many()
            .col_expr(tag_link::Column::ActiveSlotId, Expr::value(slot_id))
            .col_expr(tag_link::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(tag_link::Column::Id.eq(tag_link_id))
            .filter(tag_link::Column::ActiveSlotId.eq(0))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn set_active_slot(&self, tag_link_id: i32, slot_id: i32) -> StoreResult<TagLink> {
        let model = TagLinkEntity::find_by_id(tag_link_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("tag link {tag_link_id}")))?;

        let mut active: tag_link::ActiveModel = model.into();
        active.active_slot_id = Set(slot_id);
        active.updated_at = Set(Utc::now());
        Ok(active.update(&self.db).await?.into())
    }

    async fn create_slot(&self, new_slot: NewSlot) -> StoreResult<Slot> {
        let now = Utc::now();
        let model = slot::ActiveModel {
            name: Set(new_slot.name),
            link: Set(new_slot.link),
            tag_link_id: Set(new_slot.tag_link_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(model.into())
    }

    async fn list_slots(&self) -> StoreResult<Vec<Slot>> {
        let models = SlotEntity::find()
            .order_by_asc(slot::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Slot::from).collect())
    }
}
