//! Data layer module
//!
//! Handles all data persistence:
//! - SQLite store operations through the explicit [`Database`] context
//! - Row models
//! - Read-only projections with derived engagement counts

mod database;
mod models;
mod projection;

pub use database::Database;
pub use models::*;
pub use projection::*;
