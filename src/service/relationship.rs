//! Relationship graph service
//!
//! Maintains the friendship state machine between user pairs and the
//! membership state between users and groups. Every mutation is one store
//! transaction; callers authorize before calling.

use std::sync::Arc;

use crate::data::{Database, FriendLink, Group};
use crate::error::AppError;

/// Relationship graph service
pub struct RelationshipService {
    db: Arc<Database>,
}

impl RelationshipService {
    /// Create new relationship service
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    // =========================================================================
    // Friendships
    // =========================================================================

    /// Send a friend request to the user named `target_name`.
    ///
    /// # Returns
    /// `false` when no such user exists, the target is the requester, or an
    /// edge already exists between the pair in either direction or state.
    pub async fn request_friendship(
        &self,
        requester_id: i64,
        target_name: &str,
    ) -> Result<bool, AppError> {
        let Some(target) = self.db.get_user_by_name(target_name).await? else {
            tracing::debug!(requester_id, target_name, "friend request to unknown user");
            return Ok(false);
        };

        if target.id == requester_id {
            return Ok(false);
        }

        let created = self
            .db
            .insert_friend_request_if_absent(requester_id, target.id, chrono::Utc::now())
            .await?;

        if created {
            tracing::info!(requester_id, target_id = target.id, "friend request created");
        }

        Ok(created)
    }

    /// Accept a friend request from `other_id`.
    ///
    /// Only the requestee may accept: the edge is matched with `other_id`
    /// as requester, so a requester confirming their own request is a no-op
    /// failure.
    pub async fn accept_friendship(&self, accepter_id: i64, other_id: i64) -> Result<bool, AppError> {
        let accepted = self.db.accept_friendship(accepter_id, other_id).await?;

        if accepted {
            tracing::info!(accepter_id, other_id, "friendship accepted");
        }

        Ok(accepted)
    }

    /// End any relationship between two users.
    ///
    /// Covers both rejecting a pending request and dissolving an accepted
    /// friendship.
    ///
    /// # Returns
    /// `false` when there was no edge to delete.
    pub async fn end_relationship(&self, self_id: i64, other_id: i64) -> Result<bool, AppError> {
        let deleted = self.db.delete_friendship(self_id, other_id).await?;

        if deleted {
            tracing::info!(self_id, other_id, "relationship ended");
        }

        Ok(deleted)
    }

    /// Check whether two users are friends (accepted edge only)
    pub async fn are_friends(&self, a_id: i64, b_id: i64) -> Result<bool, AppError> {
        self.db.are_friends(a_id, b_id).await
    }

    /// Get who requested the edge between two users, for request-direction
    /// display.
    pub async fn who_requested(&self, a_id: i64, b_id: i64) -> Result<Option<i64>, AppError> {
        self.db.friendship_requester(a_id, b_id).await
    }

    /// Get all users linked to `user_id`, pending requests included.
    ///
    /// Callers needing confirmed friends only must filter on the flag.
    pub async fn friends_of(&self, user_id: i64) -> Result<Vec<FriendLink>, AppError> {
        self.db.friend_links(user_id).await
    }

    // =========================================================================
    // Groups
    // =========================================================================

    /// Create a group owned by `owner_id`.
    ///
    /// The group and the owner's admin membership are created atomically.
    ///
    /// # Returns
    /// The new group's id.
    pub async fn create_group(&self, owner_id: i64, name: &str) -> Result<i64, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "group name cannot be empty".to_string(),
            ));
        }

        let group_id = self
            .db
            .insert_group_with_admin(owner_id, name, chrono::Utc::now())
            .await?;

        tracing::info!(owner_id, group_id, name, "group created");
        Ok(group_id)
    }

    /// Get a group by id
    pub async fn get_group(&self, group_id: i64) -> Result<Option<Group>, AppError> {
        self.db.get_group(group_id).await
    }

    /// Join a group as a non-admin member.
    ///
    /// # Returns
    /// `false` when already a member or the group does not exist.
    pub async fn join_group(&self, user_id: i64, group_id: i64) -> Result<bool, AppError> {
        let joined = self
            .db
            .insert_membership(user_id, group_id, chrono::Utc::now())
            .await?;

        if joined {
            tracing::info!(user_id, group_id, "user joined group");
        }

        Ok(joined)
    }

    /// Check group membership
    pub async fn is_member(&self, user_id: i64, group_id: i64) -> Result<bool, AppError> {
        self.db.is_member(user_id, group_id).await
    }

    /// Check group admin rights (explicit flag or site admin)
    pub async fn is_group_admin(&self, user_id: i64, group_id: i64) -> Result<bool, AppError> {
        self.db.is_group_admin(user_id, group_id).await
    }

    /// Get the ids of every group a user belongs to
    pub async fn groups_of(&self, user_id: i64) -> Result<Vec<i64>, AppError> {
        self.db.group_ids_of(user_id).await
    }

    /// Delete a group, cascading memberships, posts, and comments.
    ///
    /// # Returns
    /// `false` when no such group exists.
    pub async fn delete_group(&self, group_id: i64) -> Result<bool, AppError> {
        let deleted = self.db.delete_group(group_id).await?;

        if deleted {
            tracing::info!(group_id, "group deleted");
        }

        Ok(deleted)
    }
}
