pub mod slot_routes;
pub mod tag_link_routes;
pub mod user_routes;
