//! SeaORM entities for the marketplace database.

pub mod categories;
pub mod items;
pub mod orders;
pub mod reviews;
pub mod shops;
pub mod users;
