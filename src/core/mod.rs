pub mod autocomplete;
pub mod backup;
pub mod expense;
pub mod log;
pub mod ride;
pub mod shift;
pub mod summary;
