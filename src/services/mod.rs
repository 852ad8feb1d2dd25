//! Business rules for users, tag links and slots.
//!
//! Each function takes the store as a `&dyn TagLinkStore`, so the same rules
//! run against any persistence backend the caller injects.

pub mod slot_service;
pub mod tag_link_service;
pub mod user_service;

use crate::db::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    /// A persistence call failed; `message` is what the caller gets to see.
    #[error("{message}")]
    Store {
        message: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ServiceError {
    pub(crate) fn store(message: &'static str) -> impl FnOnce(StoreError) -> ServiceError {
        move |source| ServiceError::Store { message, source }
    }
}
