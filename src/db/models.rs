//! Domain types returned by the store and serialized by the HTTP layer.
//!
//! Entity models never leave the `db` module; every read goes through one of
//! the `From` mappings below so the wire shape is defined here and only here.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::entities::{slot, tag_link, user};

/// Which slot a tag link currently points at.
///
/// Persisted and serialized as a plain integer where `0` means unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(into = "i32")]
pub enum ActiveSlot {
    #[default]
    Unset,
    Set(i32),
}

impl ActiveSlot {
    pub fn is_unset(self) -> bool {
        matches!(self, ActiveSlot::Unset)
    }

    pub fn slot_id(self) -> Option<i32> {
        match self {
            ActiveSlot::Unset => None,
            ActiveSlot::Set(id) => Some(id),
        }
    }
}

impl From<i32> for ActiveSlot {
    fn from(raw: i32) -> Self {
        if raw > 0 {
            ActiveSlot::Set(raw)
        } else {
            ActiveSlot::Unset
        }
    }
}

impl From<ActiveSlot> for i32 {
    fn from(active: ActiveSlot) -> Self {
        active.slot_id().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagLink {
    pub id: i32,
    pub tag_id: String,
    pub user_id: i32,
    #[serde(rename = "active_slot_id")]
    pub active_slot: ActiveSlot,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TagLink {
    /// Points the tag link at its first slot. Returns `false` and leaves the
    /// link untouched when a slot is already active.
    pub fn activate_first(&mut self, slot_id: i32) -> bool {
        if !self.active_slot.is_unset() {
            return false;
        }
        self.active_slot = ActiveSlot::Set(slot_id);
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub id: i32,
    pub name: String,
    pub link: String,
    pub tag_link_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A tag link together with every slot it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagLinkWithSlots {
    #[serde(flatten)]
    pub tag_link: TagLink,
    #[serde(rename = "Slots")]
    pub slots: Vec<Slot>,
}

/// Returned when activation targets a slot the tag link does not own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("slot {slot_id} is not owned by tag link {tag_link_id}")]
pub struct SlotNotOwned {
    pub tag_link_id: i32,
    pub slot_id: i32,
}

impl TagLinkWithSlots {
    pub fn owns_slot(&self, slot_id: i32) -> bool {
        self.slots.iter().any(|slot| slot.id == slot_id)
    }

    /// Makes `slot_id` the active slot, provided it belongs to this tag link.
    pub fn select_slot(&mut self, slot_id: i32) -> Result<(), SlotNotOwned> {
        if !self.owns_slot(slot_id) {
            return Err(SlotNotOwned {
                tag_link_id: self.tag_link.id,
                slot_id,
            });
        }
        self.tag_link.active_slot = ActiveSlot::Set(slot_id);
        Ok(())
    }
}

/// A user with its tag links, each carrying its slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserWithTagLinks {
    #[serde(flatten)]
    pub user: User,
    #[serde(rename = "TagLink")]
    pub tag_links: Vec<TagLinkWithSlots>,
}

// --- Write inputs ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTagLink {
    pub user_id: i32,
    pub tag_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSlot {
    pub name: String,
    pub link: String,
    pub tag_link_id: i32,
}

// --- Entity mappings ---

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        User {
            id: model.id,
            name: model.name,
            email: model.email,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<tag_link::Model> for TagLink {
    fn from(model: tag_link::Model) -> Self {
        TagLink {
            id: model.id,
            tag_id: model.tag_id,
            user_id: model.user_id,
            active_slot: ActiveSlot::from(model.active_slot_id),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<slot::Model> for Slot {
    fn from(model: slot::Model) -> Self {
        Slot {
            id: model.id,
            name: model.name,
            link: model.link,
            tag_link_id: model.tag_link_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<(tag_link::Model, Vec<slot::Model>)> for TagLinkWithSlots {
    fn from((link, slots): (tag_link::Model, Vec<slot::Model>)) -> Self {
        TagLinkWithSlots {
            tag_link: link.into(),
            slots: slots.into_iter().map(Slot::from).collect(),
        }
    }
}
