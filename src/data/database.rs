//! SQLite database operations
//!
//! All database access goes through this module. Each public method is one
//! store transaction; nothing here spans multiple calls, so a caller's
//! check-then-mutate sequence is not atomic with respect to its earlier
//! authorization check (accepted, documented race).

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, QueryBuilder, Sqlite};
use std::path::Path;
use std::time::Instant;

use super::models::*;
use crate::error::AppError;
use crate::metrics::observe_db_query;

/// Database connection pool wrapper.
pub struct Database {
    pool: Pool<Sqlite>,
}

/// Constraint violations (duplicate key, missing foreign key) are expected
/// write outcomes, surfaced to callers as failure results rather than errors.
fn is_constraint_violation(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Database(db_error)
            if db_error.is_unique_violation() || db_error.is_foreign_key_violation()
    )
}

impl Database {
    // =========================================================================
    // Connection
    // =========================================================================

    /// Connect to SQLite database
    ///
    /// Creates the database file if it doesn't exist.
    /// Runs pending migrations automatically.
    ///
    /// # Arguments
    /// * `path` - Path to SQLite database file
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
            }
        }

        // Foreign keys must be enforced per connection: cascade deletes and
        // orphaned-reference rejection both depend on it.
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        // Run migrations
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Migration failed: {}", e);
                AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
            })?;

        tracing::info!("Database connected and migrated successfully");

        Ok(Self { pool })
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Insert a new user.
    ///
    /// # Returns
    /// The new user's id, or `None` if the name is already taken.
    pub async fn insert_user(
        &self,
        name: &str,
        password_hash: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Option<i64>, AppError> {
        let result = sqlx::query(
            "INSERT INTO users (name, password_hash, is_site_admin, created_at) VALUES (?, ?, 0, ?)",
        )
        .bind(name)
        .bind(password_hash)
        .bind(created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(Some(done.last_insert_rowid())),
            Err(error) if is_constraint_violation(&error) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    /// Get a user by id
    pub async fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Get a user by name
    pub async fn get_user_by_name(&self, name: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Check whether a user exists
    pub async fn user_exists(&self, user_id: i64) -> Result<bool, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    /// Rename a user.
    ///
    /// # Returns
    /// `false` when the user does not exist or the name is already taken.
    pub async fn rename_user(&self, user_id: i64, new_name: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE users SET name = ? WHERE id = ?")
            .bind(new_name)
            .bind(user_id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(done.rows_affected() == 1),
            Err(error) if is_constraint_violation(&error) => Ok(false),
            Err(error) => Err(error.into()),
        }
    }

    /// Set or clear a user's site-admin flag (provisioning hook).
    ///
    /// # Returns
    /// `false` if no such user exists.
    pub async fn set_site_admin(&self, user_id: i64, is_site_admin: bool) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE users SET is_site_admin = ? WHERE id = ?")
            .bind(is_site_admin)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Check a user's site-admin flag. Missing users are not admins.
    pub async fn is_site_admin(&self, user_id: i64) -> Result<bool, AppError> {
        let flag = sqlx::query_scalar::<_, bool>("SELECT is_site_admin FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(flag.unwrap_or(false))
    }

    // =========================================================================
    // Friendships
    // =========================================================================

    /// Insert a pending friendship edge when none exists for the pair.
    ///
    /// The single-edge invariant covers both directions and both states, so
    /// the exists-check and the insert run in one IMMEDIATE transaction.
    ///
    /// # Returns
    /// `true` if inserted, `false` if an edge already existed.
    pub async fn insert_friend_request_if_absent(
        &self,
        requester_id: i64,
        target_id: i64,
        created_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let started = Instant::now();

        let mut conn = self.pool.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;

        let result: Result<bool, AppError> = async {
            let existing = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM friendships WHERE (first = ? AND second = ?) OR (first = ? AND second = ?)",
            )
            .bind(requester_id)
            .bind(target_id)
            .bind(target_id)
            .bind(requester_id)
            .fetch_one(&mut *conn)
            .await?;

            if existing > 0 {
                return Ok(false);
            }

            let inserted = sqlx::query(
                "INSERT INTO friendships (first, second, pending, created_at) VALUES (?, ?, 1, ?)",
            )
            .bind(requester_id)
            .bind(target_id)
            .bind(created_at)
            .execute(&mut *conn)
            .await;

            match inserted {
                Ok(done) => Ok(done.rows_affected() > 0),
                Err(error) if is_constraint_violation(&error) => Ok(false),
                Err(error) => Err(error.into()),
            }
        }
        .await;

        let outcome = match result {
            Ok(inserted) => {
                sqlx::query("COMMIT").execute(&mut *conn).await?;
                Ok(inserted)
            }
            Err(error) => {
                let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
                Err(error)
            }
        };

        observe_db_query("insert", "friendships", started.elapsed());
        outcome
    }

    /// Confirm a friend request.
    ///
    /// Matches only the edge `(first = other, second = accepter)`: the
    /// requester is always `first`, so acceptance has to come from `second`.
    ///
    /// # Returns
    /// `false` when no such edge exists.
    pub async fn accept_friendship(
        &self,
        accepter_id: i64,
        other_id: i64,
    ) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE friendships SET pending = 0 WHERE first = ? AND second = ?")
            .bind(other_id)
            .bind(accepter_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete any friendship edge between two users, regardless of direction
    /// or pending state.
    ///
    /// # Returns
    /// `false` when there was no edge to delete.
    pub async fn delete_friendship(&self, a_id: i64, b_id: i64) -> Result<bool, AppError> {
        let started = Instant::now();

        let result = sqlx::query(
            "DELETE FROM friendships WHERE (first = ? AND second = ?) OR (first = ? AND second = ?)",
        )
        .bind(a_id)
        .bind(b_id)
        .bind(b_id)
        .bind(a_id)
        .execute(&self.pool)
        .await?;

        observe_db_query("delete", "friendships", started.elapsed());
        Ok(result.rows_affected() > 0)
    }

    /// Check whether two users are friends.
    ///
    /// A pending request is not yet a friendship.
    pub async fn are_friends(&self, a_id: i64, b_id: i64) -> Result<bool, AppError> {
        let pending = sqlx::query_scalar::<_, bool>(
            "SELECT pending FROM friendships WHERE (first = ? AND second = ?) OR (first = ? AND second = ?)",
        )
        .bind(a_id)
        .bind(b_id)
        .bind(b_id)
        .bind(a_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(matches!(pending, Some(false)))
    }

    /// Get the friendship edge between two users, if any.
    pub async fn friendship_between(
        &self,
        a_id: i64,
        b_id: i64,
    ) -> Result<Option<Friendship>, AppError> {
        let edge = sqlx::query_as::<_, Friendship>(
            "SELECT * FROM friendships WHERE (first = ? AND second = ?) OR (first = ? AND second = ?)",
        )
        .bind(a_id)
        .bind(b_id)
        .bind(b_id)
        .bind(a_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(edge)
    }

    /// Get the requester of the edge between two users, if any.
    pub async fn friendship_requester(
        &self,
        a_id: i64,
        b_id: i64,
    ) -> Result<Option<i64>, AppError> {
        let requester = sqlx::query_scalar::<_, i64>(
            "SELECT first FROM friendships WHERE (first = ? AND second = ?) OR (first = ? AND second = ?)",
        )
        .bind(a_id)
        .bind(b_id)
        .bind(b_id)
        .bind(a_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(requester)
    }

    /// Get every user linked to `user_id` by a friendship edge, with the
    /// edge's pending flag.
    ///
    /// Includes unconfirmed requests in both directions; callers needing
    /// confirmed friends filter on the flag.
    pub async fn friend_links(&self, user_id: i64) -> Result<Vec<FriendLink>, AppError> {
        let links = sqlx::query_as::<_, FriendLink>(
            r#"
            SELECT second AS user_id, pending FROM friendships WHERE first = ?
            UNION
            SELECT first AS user_id, pending FROM friendships WHERE second = ?
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(links)
    }

    // =========================================================================
    // Groups
    // =========================================================================

    /// Create a group together with its founding admin membership.
    ///
    /// The two inserts run in one transaction: a group must never exist
    /// without at least one admin.
    ///
    /// # Returns
    /// The new group's id.
    pub async fn insert_group_with_admin(
        &self,
        owner_id: i64,
        name: &str,
        created_at: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let started = Instant::now();

        let mut tx = self.pool.begin().await?;

        let group_id = sqlx::query("INSERT INTO groups (name, created_at) VALUES (?, ?)")
            .bind(name)
            .bind(created_at)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        sqlx::query(
            "INSERT INTO group_memberships (member_id, group_id, is_admin, created_at) VALUES (?, ?, 1, ?)",
        )
        .bind(owner_id)
        .bind(group_id)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        observe_db_query("insert", "groups", started.elapsed());
        Ok(group_id)
    }

    /// Get a group by id
    pub async fn get_group(&self, group_id: i64) -> Result<Option<Group>, AppError> {
        let group = sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE id = ?")
            .bind(group_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(group)
    }

    /// Add a user as a non-admin member of a group.
    ///
    /// # Returns
    /// `false` when the user is already a member or the group does not exist.
    pub async fn insert_membership(
        &self,
        user_id: i64,
        group_id: i64,
        created_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "INSERT INTO group_memberships (member_id, group_id, is_admin, created_at) VALUES (?, ?, 0, ?)",
        )
        .bind(user_id)
        .bind(group_id)
        .bind(created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(done.rows_affected() > 0),
            Err(error) if is_constraint_violation(&error) => Ok(false),
            Err(error) => Err(error.into()),
        }
    }

    /// Check group membership
    pub async fn is_member(&self, user_id: i64, group_id: i64) -> Result<bool, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM group_memberships WHERE member_id = ? AND group_id = ?",
        )
        .bind(user_id)
        .bind(group_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Get a user's membership record in a group, `None` when not a member.
    pub async fn membership(
        &self,
        user_id: i64,
        group_id: i64,
    ) -> Result<Option<GroupMembership>, AppError> {
        let membership = sqlx::query_as::<_, GroupMembership>(
            "SELECT * FROM group_memberships WHERE member_id = ? AND group_id = ?",
        )
        .bind(user_id)
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(membership)
    }

    /// Check whether a user administers a group.
    ///
    /// True for an explicit membership-admin flag and for site admins, who
    /// are treated as admin of every group.
    pub async fn is_group_admin(&self, user_id: i64, group_id: i64) -> Result<bool, AppError> {
        if self.is_site_admin(user_id).await? {
            return Ok(true);
        }

        Ok(self
            .membership(user_id, group_id)
            .await?
            .is_some_and(|membership| membership.is_admin))
    }

    /// Get the ids of every group a user belongs to
    pub async fn group_ids_of(&self, user_id: i64) -> Result<Vec<i64>, AppError> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT group_id FROM group_memberships WHERE member_id = ?",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    /// Delete a group.
    ///
    /// Memberships, posts, and post comments cascade with it.
    ///
    /// # Returns
    /// `false` when no such group exists.
    pub async fn delete_group(&self, group_id: i64) -> Result<bool, AppError> {
        let started = Instant::now();

        let result = sqlx::query("DELETE FROM groups WHERE id = ?")
            .bind(group_id)
            .execute(&self.pool)
            .await?;

        observe_db_query("delete", "groups", started.elapsed());
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Wall posts
    // =========================================================================

    /// Insert a wall post.
    ///
    /// # Returns
    /// The stored post, or `None` when the author or wall does not exist.
    pub async fn insert_wall_post(
        &self,
        author_id: i64,
        wall_id: i64,
        content: &str,
        publish_time: i64,
    ) -> Result<Option<WallPost>, AppError> {
        let started = Instant::now();

        let result = sqlx::query(
            "INSERT INTO wall_posts (author_id, wall_id, content, publish_time) VALUES (?, ?, ?, ?)",
        )
        .bind(author_id)
        .bind(wall_id)
        .bind(content)
        .bind(publish_time)
        .execute(&self.pool)
        .await;

        observe_db_query("insert", "wall_posts", started.elapsed());

        match result {
            Ok(done) => Ok(Some(WallPost {
                id: done.last_insert_rowid(),
                author_id,
                wall_id,
                content: content.to_string(),
                publish_time,
            })),
            Err(error) if is_constraint_violation(&error) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    /// Get a wall post by id
    pub async fn get_wall_post(&self, post_id: i64) -> Result<Option<WallPost>, AppError> {
        let post = sqlx::query_as::<_, WallPost>("SELECT * FROM wall_posts WHERE id = ?")
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    /// Get all posts on a wall, newest first
    pub async fn wall_posts_for(&self, wall_id: i64) -> Result<Vec<WallPost>, AppError> {
        let posts = sqlx::query_as::<_, WallPost>(
            "SELECT * FROM wall_posts WHERE wall_id = ? ORDER BY publish_time DESC",
        )
        .bind(wall_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    /// Get all posts on any of the given walls, newest first.
    ///
    /// Used by the feed aggregator with the viewer's wall-target set.
    pub async fn wall_posts_for_walls(&self, wall_ids: &[i64]) -> Result<Vec<WallPost>, AppError> {
        if wall_ids.is_empty() {
            return Ok(vec![]);
        }

        let started = Instant::now();

        let mut query_builder =
            QueryBuilder::<Sqlite>::new("SELECT * FROM wall_posts WHERE wall_id IN (");
        {
            let mut separated = query_builder.separated(", ");
            for wall_id in wall_ids {
                separated.push_bind(wall_id);
            }
        }
        query_builder.push(") ORDER BY publish_time DESC, id ASC");

        let posts = query_builder
            .build_query_as::<WallPost>()
            .fetch_all(&self.pool)
            .await?;

        observe_db_query("select", "wall_posts", started.elapsed());
        Ok(posts)
    }

    /// Get the wall a post lives on
    pub async fn wall_of_post(&self, post_id: i64) -> Result<Option<i64>, AppError> {
        let wall_id = sqlx::query_scalar::<_, i64>("SELECT wall_id FROM wall_posts WHERE id = ?")
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(wall_id)
    }

    /// Get the author of a wall post
    pub async fn author_of_wall_post(&self, post_id: i64) -> Result<Option<i64>, AppError> {
        let author_id = sqlx::query_scalar::<_, i64>("SELECT author_id FROM wall_posts WHERE id = ?")
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(author_id)
    }

    /// Delete a wall post and its comments.
    ///
    /// # Returns
    /// `false` when no such post exists.
    pub async fn delete_wall_post(&self, post_id: i64) -> Result<bool, AppError> {
        let started = Instant::now();

        let result = sqlx::query("DELETE FROM wall_posts WHERE id = ?")
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        observe_db_query("delete", "wall_posts", started.elapsed());
        Ok(result.rows_affected() > 0)
    }

    /// Insert a comment on a wall post.
    ///
    /// # Returns
    /// The stored comment, or `None` when the post does not exist.
    pub async fn insert_wall_comment(
        &self,
        author_id: i64,
        post_id: i64,
        content: &str,
        publish_time: i64,
    ) -> Result<Option<Comment>, AppError> {
        let result = sqlx::query(
            "INSERT INTO wall_post_comments (post_id, author_id, content, publish_time) VALUES (?, ?, ?, ?)",
        )
        .bind(post_id)
        .bind(author_id)
        .bind(content)
        .bind(publish_time)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(Some(Comment {
                id: done.last_insert_rowid(),
                post_id,
                author_id,
                content: content.to_string(),
                publish_time,
            })),
            Err(error) if is_constraint_violation(&error) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    /// Get all comments on a wall post, newest first
    pub async fn wall_comments_for(&self, post_id: i64) -> Result<Vec<Comment>, AppError> {
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT * FROM wall_post_comments WHERE post_id = ? ORDER BY publish_time DESC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    // =========================================================================
    // Group posts
    // =========================================================================

    /// Insert a group post.
    ///
    /// # Returns
    /// The stored post, or `None` when the author or group does not exist.
    pub async fn insert_group_post(
        &self,
        author_id: i64,
        group_id: i64,
        content: &str,
        publish_time: i64,
    ) -> Result<Option<GroupPost>, AppError> {
        let started = Instant::now();

        let result = sqlx::query(
            "INSERT INTO group_posts (author_id, group_id, content, publish_time) VALUES (?, ?, ?, ?)",
        )
        .bind(author_id)
        .bind(group_id)
        .bind(content)
        .bind(publish_time)
        .execute(&self.pool)
        .await;

        observe_db_query("insert", "group_posts", started.elapsed());

        match result {
            Ok(done) => Ok(Some(GroupPost {
                id: done.last_insert_rowid(),
                author_id,
                group_id,
                content: content.to_string(),
                publish_time,
            })),
            Err(error) if is_constraint_violation(&error) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    /// Get a group post by id
    pub async fn get_group_post(&self, post_id: i64) -> Result<Option<GroupPost>, AppError> {
        let post = sqlx::query_as::<_, GroupPost>("SELECT * FROM group_posts WHERE id = ?")
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    /// Get all posts in a group, newest first
    pub async fn group_posts_for(&self, group_id: i64) -> Result<Vec<GroupPost>, AppError> {
        let posts = sqlx::query_as::<_, GroupPost>(
            "SELECT * FROM group_posts WHERE group_id = ? ORDER BY publish_time DESC",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    /// Get all posts in any of the given groups, newest first.
    ///
    /// Used by the feed aggregator with the viewer's group-target set.
    pub async fn group_posts_for_groups(
        &self,
        group_ids: &[i64],
    ) -> Result<Vec<GroupPost>, AppError> {
        if group_ids.is_empty() {
            return Ok(vec![]);
        }

        let started = Instant::now();

        let mut query_builder =
            QueryBuilder::<Sqlite>::new("SELECT * FROM group_posts WHERE group_id IN (");
        {
            let mut separated = query_builder.separated(", ");
            for group_id in group_ids {
                separated.push_bind(group_id);
            }
        }
        query_builder.push(") ORDER BY publish_time DESC, id ASC");

        let posts = query_builder
            .build_query_as::<GroupPost>()
            .fetch_all(&self.pool)
            .await?;

        observe_db_query("select", "group_posts", started.elapsed());
        Ok(posts)
    }

    /// Get the group a post belongs to
    pub async fn group_of_post(&self, post_id: i64) -> Result<Option<i64>, AppError> {
        let group_id = sqlx::query_scalar::<_, i64>("SELECT group_id FROM group_posts WHERE id = ?")
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(group_id)
    }

    /// Delete a group post and its comments.
    ///
    /// # Returns
    /// `false` when no such post exists.
    pub async fn delete_group_post(&self, post_id: i64) -> Result<bool, AppError> {
        let started = Instant::now();

        let result = sqlx::query("DELETE FROM group_posts WHERE id = ?")
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        observe_db_query("delete", "group_posts", started.elapsed());
        Ok(result.rows_affected() > 0)
    }

    /// Insert a comment on a group post.
    ///
    /// # Returns
    /// The stored comment, or `None` when the post does not exist.
    pub async fn insert_group_comment(
        &self,
        author_id: i64,
        post_id: i64,
        content: &str,
        publish_time: i64,
    ) -> Result<Option<Comment>, AppError> {
        let result = sqlx::query(
            "INSERT INTO group_post_comments (post_id, author_id, content, publish_time) VALUES (?, ?, ?, ?)",
        )
        .bind(post_id)
        .bind(author_id)
        .bind(content)
        .bind(publish_time)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(Some(Comment {
                id: done.last_insert_rowid(),
                post_id,
                author_id,
                content: content.to_string(),
                publish_time,
            })),
            Err(error) if is_constraint_violation(&error) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    /// Get all comments on a group post, newest first
    pub async fn group_comments_for(&self, post_id: i64) -> Result<Vec<Comment>, AppError> {
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT * FROM group_post_comments WHERE post_id = ? ORDER BY publish_time DESC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }
}
