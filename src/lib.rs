//! Homeroom - the social-graph and feed core of a small social network
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │               Web Layer (external, not this crate)          │
//! │  - routing, templating, session handling                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Service Layer                            │
//! │  - authentication, relationship graph, content store        │
//! │  - authorization engine, feed aggregator                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Data Layer                              │
//! │  - SQLite (sqlx)                                            │
//! │  - sidebar projection cache (moka)                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The embedding web layer asks the authorization engine whether an action
//! is permitted, then invokes the matching content or relationship
//! mutation; the two steps are separate store transactions, so a
//! relationship change can land between them. That race is accepted:
//! closing it would require wrapping check and mutation in one
//! transaction.
//!
//! # Modules
//!
//! - `service`: business logic (auth, relationships, content, authz, feed)
//! - `data`: database and cache layer
//! - `config`: configuration management
//! - `error`: error types
//! - `metrics`: Prometheus instruments

pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod service;

use std::sync::Arc;

/// Application state shared across all request handlers
///
/// Cloned freely; all fields are reference-counted handles.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// Database connection pool
    pub db: Arc<data::Database>,

    /// Sidebar projection cache (volatile, bounded)
    pub sidebar_cache: Arc<data::SidebarCache>,
}

impl AppState {
    /// Initialize application state
    ///
    /// # Steps
    /// 1. Connect to SQLite database and run migrations
    /// 2. Initialize the sidebar cache
    ///
    /// # Errors
    /// Returns error if any initialization step fails
    pub async fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        tracing::info!("Initializing application state...");

        let db = data::Database::connect(&config.database.path).await?;
        tracing::info!("Database connected");

        let sidebar_cache = data::SidebarCache::new(config.cache.sidebar_max_entries);
        tracing::info!("Caches initialized");

        Ok(Self {
            config: Arc::new(config),
            db: Arc::new(db),
            sidebar_cache: Arc::new(sidebar_cache),
        })
    }
}

/// Initialize tracing for the embedding process.
///
/// Honors `RUST_LOG` when set, otherwise falls back to the configured
/// level for this crate.
pub fn init_tracing(logging: &config::LoggingConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("homeroom={}", logging.level).into());

    if logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
