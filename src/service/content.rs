//! Content store service
//!
//! Wall posts, group posts, and their comments. The store performs no
//! authorization of its own; callers consult the authorization engine
//! first. Publish timestamps come from a process-wide monotonic clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::data::{Comment, Database, GroupPost, GroupSidebar, PostKind, SidebarCache, UserSidebar, WallPost};
use crate::error::AppError;

/// Process-wide source of publish timestamps.
///
/// Returns wall-clock nanoseconds, bumped past the previous value when the
/// clock stalls or steps backwards, so publish times are strictly
/// increasing within a process.
struct PublishClock {
    last: AtomicI64,
}

impl PublishClock {
    const fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    fn next(&self) -> i64 {
        // Nanosecond range holds until 2262.
        let now = chrono::Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);
        let mut candidate = now;
        loop {
            let last = self.last.load(Ordering::Acquire);
            if candidate <= last {
                candidate = last + 1;
            }
            match self
                .last
                .compare_exchange(last, candidate, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return candidate,
                Err(_) => continue,
            }
        }
    }
}

static PUBLISH_CLOCK: PublishClock = PublishClock::new();

/// Content store service
pub struct ContentService {
    db: Arc<Database>,
    sidebar_cache: Arc<SidebarCache>,
}

impl ContentService {
    /// Create new content service
    pub fn new(db: Arc<Database>, sidebar_cache: Arc<SidebarCache>) -> Self {
        Self { db, sidebar_cache }
    }

    // =========================================================================
    // Posts
    // =========================================================================

    /// Publish a post to a wall.
    ///
    /// # Returns
    /// The stored post, or `None` when the wall or author does not exist.
    pub async fn post_to_wall(
        &self,
        author_id: i64,
        content: &str,
        wall_id: i64,
    ) -> Result<Option<WallPost>, AppError> {
        let content = validated_content(content)?;

        let post = self
            .db
            .insert_wall_post(author_id, wall_id, content, PUBLISH_CLOCK.next())
            .await?;

        match &post {
            Some(post) => tracing::info!(
                author_id,
                wall_id,
                post_id = post.id,
                content_len = content.len(),
                "wall post created"
            ),
            None => tracing::debug!(author_id, wall_id, "wall post rejected by store"),
        }

        Ok(post)
    }

    /// Publish a post to a group.
    ///
    /// # Returns
    /// The stored post, or `None` when the group or author does not exist.
    pub async fn post_to_group(
        &self,
        author_id: i64,
        content: &str,
        group_id: i64,
    ) -> Result<Option<GroupPost>, AppError> {
        let content = validated_content(content)?;

        let post = self
            .db
            .insert_group_post(author_id, group_id, content, PUBLISH_CLOCK.next())
            .await?;

        match &post {
            Some(post) => tracing::info!(
                author_id,
                group_id,
                post_id = post.id,
                content_len = content.len(),
                "group post created"
            ),
            None => tracing::debug!(author_id, group_id, "group post rejected by store"),
        }

        Ok(post)
    }

    /// Get a wall post by id
    pub async fn get_wall_post(&self, post_id: i64) -> Result<Option<WallPost>, AppError> {
        self.db.get_wall_post(post_id).await
    }

    /// Get a group post by id
    pub async fn get_group_post(&self, post_id: i64) -> Result<Option<GroupPost>, AppError> {
        self.db.get_group_post(post_id).await
    }

    /// List all posts on a wall, newest first
    pub async fn list_wall_posts(&self, wall_id: i64) -> Result<Vec<WallPost>, AppError> {
        self.db.wall_posts_for(wall_id).await
    }

    /// List all posts in a group, newest first
    pub async fn list_group_posts(&self, group_id: i64) -> Result<Vec<GroupPost>, AppError> {
        self.db.group_posts_for(group_id).await
    }

    /// Delete a post of either kind, cascading to its comments.
    ///
    /// # Returns
    /// `false` when no such post exists.
    pub async fn delete_post(&self, kind: PostKind, post_id: i64) -> Result<bool, AppError> {
        let deleted = match kind {
            PostKind::Wall => self.db.delete_wall_post(post_id).await?,
            PostKind::Group => self.db.delete_group_post(post_id).await?,
        };

        if deleted {
            tracing::info!(kind = kind.as_str(), post_id, "post deleted");
        }

        Ok(deleted)
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// Comment on a wall post.
    ///
    /// # Returns
    /// The stored comment, or `None` when the post does not exist.
    pub async fn comment_on_wall_post(
        &self,
        author_id: i64,
        content: &str,
        post_id: i64,
    ) -> Result<Option<Comment>, AppError> {
        let content = validated_content(content)?;

        self.db
            .insert_wall_comment(author_id, post_id, content, PUBLISH_CLOCK.next())
            .await
    }

    /// Comment on a group post.
    ///
    /// # Returns
    /// The stored comment, or `None` when the post does not exist.
    pub async fn comment_on_group_post(
        &self,
        author_id: i64,
        content: &str,
        post_id: i64,
    ) -> Result<Option<Comment>, AppError> {
        let content = validated_content(content)?;

        self.db
            .insert_group_comment(author_id, post_id, content, PUBLISH_CLOCK.next())
            .await
    }

    /// List all comments on a post, newest first
    pub async fn list_comments_on(
        &self,
        kind: PostKind,
        post_id: i64,
    ) -> Result<Vec<Comment>, AppError> {
        match kind {
            PostKind::Wall => self.db.wall_comments_for(post_id).await,
            PostKind::Group => self.db.group_comments_for(post_id).await,
        }
    }

    // =========================================================================
    // Users and sidebar projections
    // =========================================================================

    /// Rename a user.
    ///
    /// Evicts the user's sidebar projection on success; the cache holds the
    /// old name otherwise indefinitely.
    ///
    /// # Returns
    /// `false` when the user does not exist or the name is taken.
    pub async fn rename_user(&self, user_id: i64, new_name: &str) -> Result<bool, AppError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(AppError::Validation("username cannot be empty".to_string()));
        }

        let renamed = self.db.rename_user(user_id, new_name).await?;

        if renamed {
            self.sidebar_cache.invalidate_user(user_id).await;
            tracing::info!(user_id, new_name, "user renamed");
        }

        Ok(renamed)
    }

    /// Get the cached sidebar projection for a user
    pub async fn user_sidebar(
        &self,
        user_id: i64,
    ) -> Result<Option<Arc<UserSidebar>>, AppError> {
        self.sidebar_cache.user(&self.db, user_id).await
    }

    /// Get the cached sidebar projection for a group
    pub async fn group_sidebar(
        &self,
        group_id: i64,
    ) -> Result<Option<Arc<GroupSidebar>>, AppError> {
        self.sidebar_cache.group(&self.db, group_id).await
    }
}

fn validated_content(content: &str) -> Result<&str, AppError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }
    Ok(trimmed)
}
