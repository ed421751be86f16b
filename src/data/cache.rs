//! In-memory caches
//!
//! Sidebar projections are volatile and cleared on restart.
//! Uses Moka for high-performance concurrent caching.

use moka::future::Cache;
use std::sync::Arc;

use super::database::Database;
use crate::error::AppError;

// =============================================================================
// Sidebar projections
// =============================================================================

/// Cached sidebar entry for a user
///
/// A lightweight projection of the user row, only containing fields the
/// sidebar renders.
#[derive(Debug, Clone)]
pub struct UserSidebar {
    pub name: String,
}

/// Cached sidebar entry for a group
#[derive(Debug, Clone)]
pub struct GroupSidebar {
    pub group_id: i64,
    pub name: String,
}

// =============================================================================
// Sidebar Cache
// =============================================================================

/// Bounded cache of per-entity display projections.
///
/// Entries have no TTL: they stay until capacity-triggered eviction or an
/// explicit invalidation. Any mutation that changes a cached field (user
/// rename) must call [`SidebarCache::invalidate_user`] as part of its side
/// effects.
pub struct SidebarCache {
    /// User id -> UserSidebar
    users: Cache<i64, Arc<UserSidebar>>,
    /// Group id -> GroupSidebar
    groups: Cache<i64, Arc<GroupSidebar>>,
}

impl SidebarCache {
    /// Create a new sidebar cache
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of projections per entity kind
    pub fn new(max_entries: u64) -> Self {
        let users = Cache::builder().max_capacity(max_entries).build();
        let groups = Cache::builder().max_capacity(max_entries).build();

        Self { users, groups }
    }

    /// Get the sidebar projection for a user, loading it on a miss.
    ///
    /// # Returns
    /// `None` when the user does not exist.
    pub async fn user(
        &self,
        db: &Database,
        user_id: i64,
    ) -> Result<Option<Arc<UserSidebar>>, AppError> {
        use crate::metrics::{CACHE_HITS_TOTAL, CACHE_MISSES_TOTAL, CACHE_SIZE};

        if let Some(entry) = self.users.get(&user_id).await {
            CACHE_HITS_TOTAL.with_label_values(&["sidebar_user"]).inc();
            return Ok(Some(entry));
        }
        CACHE_MISSES_TOTAL
            .with_label_values(&["sidebar_user"])
            .inc();

        let Some(user) = db.get_user_by_id(user_id).await? else {
            return Ok(None);
        };

        let entry = Arc::new(UserSidebar { name: user.name });
        self.users.insert(user_id, entry.clone()).await;

        CACHE_SIZE
            .with_label_values(&["sidebar_user"])
            .set(self.users.entry_count() as i64);

        Ok(Some(entry))
    }

    /// Get the sidebar projection for a group, loading it on a miss.
    ///
    /// # Returns
    /// `None` when the group does not exist.
    pub async fn group(
        &self,
        db: &Database,
        group_id: i64,
    ) -> Result<Option<Arc<GroupSidebar>>, AppError> {
        use crate::metrics::{CACHE_HITS_TOTAL, CACHE_MISSES_TOTAL, CACHE_SIZE};

        if let Some(entry) = self.groups.get(&group_id).await {
            CACHE_HITS_TOTAL.with_label_values(&["sidebar_group"]).inc();
            return Ok(Some(entry));
        }
        CACHE_MISSES_TOTAL
            .with_label_values(&["sidebar_group"])
            .inc();

        let Some(group) = db.get_group(group_id).await? else {
            return Ok(None);
        };

        let entry = Arc::new(GroupSidebar {
            group_id,
            name: group.name,
        });
        self.groups.insert(group_id, entry.clone()).await;

        CACHE_SIZE
            .with_label_values(&["sidebar_group"])
            .set(self.groups.entry_count() as i64);

        Ok(Some(entry))
    }

    /// Evict a user's projection.
    ///
    /// Invalidation hook for mutations that change cached user fields.
    pub async fn invalidate_user(&self, user_id: i64) {
        self.users.invalidate(&user_id).await;
    }

    /// Evict a group's projection.
    pub async fn invalidate_group(&self, group_id: i64) {
        self.groups.invalidate(&group_id).await;
    }
}
