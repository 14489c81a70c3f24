pub mod backup;
pub mod config;
pub mod db;
pub mod expense;
pub mod export;
pub mod init;
pub mod log;
pub mod reference;
pub mod ride;
pub mod scan;
pub mod shift;
pub mod summary;
pub mod sync;
