mod common;

use async_trait::async_trait;

use taglink::db::models::{
    ActiveSlot, NewSlot, NewTagLink, NewUser, Slot, TagLink, TagLinkWithSlots, User,
    UserWithTagLinks,
};
use taglink::db::store::{SeaOrmStore, StoreError, StoreResult, TagLinkStore};
use taglink::services::{ServiceError, slot_service, tag_link_service};

use common::memory_store;

async fn seeded_store() -> (SeaOrmStore, User, TagLink) {
    let store = memory_store().await;
    let user = store
        .create_user(NewUser {
            name: "A".to_string(),
            email: "a@x.com".to_string(),
        })
        .await
        .unwrap();
    let tag_link = store
        .create_tag_link(NewTagLink {
            user_id: user.id,
            tag_id: "T1".to_string(),
        })
        .await
        .unwrap();
    (store, user, tag_link)
}

fn new_slot(name: &str, tag_link_id: i32) -> NewSlot {
    NewSlot {
        name: name.to_string(),
        link: format!("https://example.com/{name}"),
        tag_link_id,
    }
}

#[tokio::test]
async fn duplicate_tag_insert_is_a_unique_violation() {
    let (store, user, _) = seeded_store().await;

    let err = store
        .create_tag_link(NewTagLink {
            user_id: user.id,
            tag_id: "T1".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::UniqueViolation(_)), "got {err:?}");
    assert!(store.tag_id_claimed("T1").await.unwrap());
    assert!(!store.tag_id_claimed("T2").await.unwrap());
}

#[tokio::test]
async fn activate_if_unset_only_fills_an_empty_slot() {
    let (store, _, tag_link) = seeded_store().await;
    let first = store.create_slot(new_slot("s1", tag_link.id)).await.unwrap();
    let second = store.create_slot(new_slot("s2", tag_link.id)).await.unwrap();

    assert!(store.activate_if_unset(tag_link.id, first.id).await.unwrap());
    assert!(!store.activate_if_unset(tag_link.id, second.id).await.unwrap());

    let reloaded = store.find_tag_link(tag_link.id).await.unwrap().unwrap();
    assert_eq!(reloaded.active_slot, ActiveSlot::Set(first.id));
}

#[tokio::test]
async fn aggregates_are_fully_populated() {
    let (store, user, tag_link) = seeded_store().await;
    let slot = store.create_slot(new_slot("s1", tag_link.id)).await.unwrap();

    let with_slots = store
        .find_tag_link_with_slots(tag_link.id)
        .await
        .unwrap()
        .unwrap();
    let slot_ids: Vec<i32> = with_slots.slots.iter().map(|s| s.id).collect();
    assert_eq!(slot_ids, vec![slot.id]);
    assert_eq!(with_slots.slots[0].name, "s1");

    let users = store.list_users_with_tag_links().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].user.id, user.id);
    assert_eq!(users[0].tag_links.len(), 1);
    assert_eq!(users[0].tag_links[0].slots.len(), 1);
    assert_eq!(users[0].tag_links[0].slots[0].id, slot.id);

    assert!(store.find_tag_link_with_slots(999).await.unwrap().is_none());
}

#[tokio::test]
async fn set_active_slot_on_missing_tag_link_fails() {
    let store = memory_store().await;
    let err = store.set_active_slot(3, 1).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn slot_for_unknown_tag_link_violates_foreign_key() {
    let store = memory_store().await;

    let err = store.create_slot(new_slot("s1", 42)).await.unwrap_err();
    assert!(matches!(err, StoreError::Db(_)), "got {err:?}");
    assert!(store.list_slots().await.unwrap().is_empty());
}

#[tokio::test]
async fn tag_link_for_unknown_user_violates_foreign_key() {
    let store = memory_store().await;

    let err = store
        .create_tag_link(NewTagLink {
            user_id: 42,
            tag_id: "T9".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Db(_)), "got {err:?}");
    assert!(!store.tag_id_claimed("T9").await.unwrap());
}

#[tokio::test]
async fn slot_service_activates_the_first_slot_only() {
    let (store, _, tag_link) = seeded_store().await;

    let first = slot_service::create_slot(&store, new_slot("s1", tag_link.id))
        .await
        .unwrap();
    slot_service::create_slot(&store, new_slot("s2", tag_link.id))
        .await
        .unwrap();

    let reloaded = store.find_tag_link(tag_link.id).await.unwrap().unwrap();
    assert_eq!(reloaded.active_slot, ActiveSlot::Set(first.id));
}

/// Pretends every tag code is free, as a concurrent claim between the
/// existence check and the insert would.
struct StaleClaimCheck(SeaOrmStore);

#[async_trait]
impl TagLinkStore for StaleClaimCheck {
    async fn list_users_with_tag_links(&self) -> StoreResult<Vec<UserWithTagLinks>> {
        self.0.list_users_with_tag_links().await
    }
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        self.0.create_user(new_user).await
    }
    async fn find_user(&self, user_id: i32) -> StoreResult<Option<User>> {
        self.0.find_user(user_id).await
    }
    async fn tag_id_claimed(&self, _tag_id: &str) -> StoreResult<bool> {
        Ok(false)
    }
    async fn create_tag_link(&self, new_tag_link: NewTagLink) -> StoreResult<TagLink> {
        self.0.create_tag_link(new_tag_link).await
    }
    async fn find_tag_link(&self, tag_link_id: i32) -> StoreResult<Option<TagLink>> {
        self.0.find_tag_link(tag_link_id).await
    }
    async fn find_tag_link_with_slots(
        &self,
        tag_link_id: i32,
    ) -> StoreResult<Option<TagLinkWithSlots>> {
        self.0.find_tag_link_with_slots(tag_link_id).await
    }
    async fn list_tag_links_with_slots(&self) -> StoreResult<Vec<TagLinkWithSlots>> {
        self.0.list_tag_links_with_slots().await
    }
    async fn activate_if_unset(&self, tag_link_id: i32, slot_id: i32) -> StoreResult<bool> {
        self.0.activate_if_unset(tag_link_id, slot_id).await
    }
    async fn set_active_slot(&self, tag_link_id: i32, slot_id: i32) -> StoreResult<TagLink> {
        self.0.set_active_slot(tag_link_id, slot_id).await
    }
    async fn create_slot(&self, new_slot: NewSlot) -> StoreResult<Slot> {
        self.0.create_slot(new_slot).await
    }
    async fn list_slots(&self) -> StoreResult<Vec<Slot>> {
        self.0.list_slots().await
    }
}

#[tokio::test]
async fn racing_claim_still_reports_conflict() {
    let (store, user, _) = seeded_store().await;
    let racing = StaleClaimCheck(store);

    let err = tag_link_service::claim_tag(
        &racing,
        NewTagLink {
            user_id: user.id,
            tag_id: "T1".to_string(),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ServiceError::Conflict("Given tagId already claimed")));
    assert_eq!(racing.list_tag_links_with_slots().await.unwrap().len(), 1);
}
