use tracing::{info, warn};

use crate::db::models::{NewTagLink, TagLink, TagLinkWithSlots};
use crate::db::store::{StoreError, TagLinkStore};
use crate::services::ServiceError;

const TAG_ALREADY_CLAIMED: &str = "Given tagId already claimed";

/// Binds `tag_id` to an existing user. The tag code must not be claimed yet.
pub async fn claim_tag(
    store: &dyn TagLinkStore,
    new_tag_link: NewTagLink,
) -> Result<TagLink, ServiceError> {
    const CREATE_FAILED: &str = "Failed to create taglink, please try again";

    store
        .find_user(new_tag_link.user_id)
        .await
        .map_err(ServiceError::store(CREATE_FAILED))?
        .ok_or(ServiceError::NotFound("User not found"))?;

    if store
        .tag_id_claimed(&new_tag_link.tag_id)
        .await
        .map_err(ServiceError::store(CREATE_FAILED))?
    {
        return Err(ServiceError::Conflict(TAG_ALREADY_CLAIMED));
    }

    let tag_id = new_tag_link.tag_id.clone();
    match store.create_tag_link(new_tag_link).await {
        Ok(tag_link) => {
            info!(
                tag_link_id = tag_link.id,
                user_id = tag_link.user_id,
                tag_id = %tag_link.tag_id,
                "Tag claimed."
            );
            Ok(tag_link)
        }
        // Lost a race with a concurrent claim between the check and the insert.
        Err(StoreError::UniqueViolation(detail)) => {
            warn!(tag_id = %tag_id, detail = %detail, "Tag claimed concurrently.");
            Err(ServiceError::Conflict(TAG_ALREADY_CLAIMED))
        }
        Err(e) => Err(ServiceError::store(CREATE_FAILED)(e)),
    }
}

pub async fn list_tag_links(
    store: &dyn TagLinkStore,
) -> Result<Vec<TagLinkWithSlots>, ServiceError> {
    store
        .list_tag_links_with_slots()
        .await
        .map_err(ServiceError::store("Failed to fetch taglinks, please try again"))
}

/// Points a tag link at one of its own slots. Repeating the call is a no-op.
pub async fn set_active_slot(
    store: &dyn TagLinkStore,
    tag_link_id: i32,
    slot_id: i32,
) -> Result<TagLinkWithSlots, ServiceError> {
    const UPDATE_FAILED: &str = "Failed to set active slot id, please try again";

    let mut tag_link = store
        .find_tag_link_with_slots(tag_link_id)
        .await
        .map_err(ServiceError::store(UPDATE_FAILED))?
        .ok_or(ServiceError::NotFound("Given TagLink Id doesn't exist"))?;

    tag_link.select_slot(slot_id).map_err(|e| {
        warn!(error = %e, "Rejected activation of foreign slot.");
        ServiceError::NotFound("Given Slot Id doesn't exist")
    })?;

    let updated = store
        .set_active_slot(tag_link_id, slot_id)
        .await
        .map_err(ServiceError::store(UPDATE_FAILED))?;
    tag_link.tag_link = updated;

    info!(tag_link_id, slot_id, "Active slot updated.");
    Ok(tag_link)
}
