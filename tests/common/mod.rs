//! Common test utilities for integration tests

use std::sync::Arc;

use homeroom::data::Database;
use homeroom::service::{
    AuthService, AuthzService, ContentService, FeedService, RelationshipService,
};
use homeroom::{AppState, config};
use tempfile::TempDir;

/// Test application instance backed by a temporary database
pub struct TestApp {
    pub state: AppState,
    pub _temp_dir: TempDir,
}

impl TestApp {
    /// Create a new test application instance
    pub async fn new() -> Self {
        // Create temporary directory for test database
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        // Create test configuration
        let config = config::AppConfig {
            database: config::DatabaseConfig { path: db_path },
            cache: config::CacheConfig {
                sidebar_max_entries: 64,
            },
            logging: config::LoggingConfig {
                level: "debug".to_string(),
                format: "pretty".to_string(),
            },
        };

        // Initialize app state
        let state = AppState::new(config).await.unwrap();

        Self {
            state,
            _temp_dir: temp_dir,
        }
    }

    pub fn db(&self) -> Arc<Database> {
        self.state.db.clone()
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.db())
    }

    pub fn relationships(&self) -> RelationshipService {
        RelationshipService::new(self.db())
    }

    pub fn content(&self) -> ContentService {
        ContentService::new(self.db(), self.state.sidebar_cache.clone())
    }

    pub fn authz(&self) -> AuthzService {
        AuthzService::new(self.db())
    }

    pub fn feed(&self) -> FeedService {
        FeedService::new(self.db())
    }

    /// Create a user directly with a placeholder credential hash.
    ///
    /// Suites that exercise real hashing go through `AuthService::register`
    /// instead.
    pub async fn create_user(&self, name: &str) -> i64 {
        self.db()
            .insert_user(name, "test-hash", chrono::Utc::now())
            .await
            .unwrap()
            .expect("user name should be free")
    }

    /// Create two users that are already confirmed friends.
    pub async fn create_friends(&self, a_name: &str, b_name: &str) -> (i64, i64) {
        let a = self.create_user(a_name).await;
        let b = self.create_user(b_name).await;

        let relationships = self.relationships();
        assert!(relationships.request_friendship(a, b_name).await.unwrap());
        assert!(relationships.accept_friendship(b, a).await.unwrap());

        (a, b)
    }
}
