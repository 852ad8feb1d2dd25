use tracing::{error, info};

use crate::db::models::{NewSlot, Slot};
use crate::db::store::TagLinkStore;
use crate::services::ServiceError;

/// Adds a slot under an existing tag link. The first slot a tag link gets
/// also becomes its active slot; the returned value is the slot either way.
pub async fn create_slot(
    store: &dyn TagLinkStore,
    new_slot: NewSlot,
) -> Result<Slot, ServiceError> {
    const CREATE_FAILED: &str = "Failed to create slot, please try again";

    let mut tag_link = store
        .find_tag_link(new_slot.tag_link_id)
        .await
        .map_err(ServiceError::store(CREATE_FAILED))?
        .ok_or(ServiceError::NotFound("Given TagLink Id not exist"))?;

    let slot = store
        .create_slot(new_slot)
        .await
        .map_err(ServiceError::store(CREATE_FAILED))?;
    info!(slot_id = slot.id, tag_link_id = slot.tag_link_id, "Slot created.");

    if tag_link.activate_first(slot.id) {
        match store.activate_if_unset(tag_link.id, slot.id).await {
            Ok(true) => {
                info!(tag_link_id = tag_link.id, slot_id = slot.id, "First slot activated.")
            }
            Ok(false) => {}
            Err(e) => error!(
                tag_link_id = tag_link.id,
                slot_id = slot.id,
                error = %e,
                "Failed to activate first slot."
            ),
        }
    }

    Ok(slot)
}

pub async fn list_slots(store: &dyn TagLinkStore) -> Result<Vec<Slot>, ServiceError> {
    store
        .list_slots()
        .await
        .map_err(ServiceError::store("Failed to fetch slots, please try again"))
}
