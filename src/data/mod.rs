//! Data layer module
//!
//! Handles all data persistence and caching:
//! - SQLite database operations
//! - Sidebar projection cache (volatile)

mod cache;
mod database;
mod models;

pub use cache::{GroupSidebar, SidebarCache, UserSidebar};
pub use database::Database;
pub use models::*;
