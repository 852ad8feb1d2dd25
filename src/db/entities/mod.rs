//! SeaORM entities mapping the `users`, `tag_links` and `slots` tables.

pub mod slot;
pub mod tag_link;
pub mod user;

pub mod prelude {
    pub use super::slot::Entity as Slot;
    pub use super::tag_link::Entity as TagLink;
    pub use super::user::Entity as User;
}
