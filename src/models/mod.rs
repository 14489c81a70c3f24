pub mod expense;
pub mod payment;
pub mod reference;
pub mod ride;
pub mod shift;
pub mod summary;
