//! Domain vocabulary shared by market services.

pub mod image;
pub mod pagination;
pub mod role;
pub mod validate;
