use tracing::info;

use crate::db::models::{NewUser, User, UserWithTagLinks};
use crate::db::store::TagLinkStore;
use crate::services::ServiceError;

pub async fn list_users(store: &dyn TagLinkStore) -> Result<Vec<UserWithTagLinks>, ServiceError> {
    store
        .list_users_with_tag_links()
        .await
        .map_err(ServiceError::store("Failed to fetch users, please try again"))
}

pub async fn register_user(
    store: &dyn TagLinkStore,
    new_user: NewUser,
) -> Result<User, ServiceError> {
    let user = store
        .create_user(new_user)
        .await
        .map_err(ServiceError::store("Failed to create user, please try again"))?;
    info!(user_id = user.id, "User registered.");
    Ok(user)
}
