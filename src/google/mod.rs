//! Thin wrappers over the Google OAuth, Drive and Sheets REST endpoints.

pub mod api;
pub mod auth;
pub mod client;

pub use api::{Rows, SheetsApi};
pub use client::GoogleClient;
