pub mod core_api;
pub mod document;
pub mod kind;
pub mod profile;
pub mod section;
