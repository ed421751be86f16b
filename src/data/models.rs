//! Data models
//!
//! Rust structs representing database entities. All ids are stable
//! integers (SQLite rowids). Post and comment `publish_time` values are
//! nanoseconds since the Unix epoch, assigned by the publish clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Users
// =============================================================================

/// A registered user
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    /// Globally unique display name
    pub name: String,
    /// Argon2id hash in PHC string format
    pub password_hash: String,
    /// Global override role: treated as admin of every wall and group
    pub is_site_admin: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Friendships
// =============================================================================

/// A friendship edge between two users
///
/// `first` is always the user who sent the request; acceptance must come
/// from `second`. While `pending` is set the edge is a request, not a
/// friendship.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Friendship {
    pub first: i64,
    pub second: i64,
    pub pending: bool,
    pub created_at: DateTime<Utc>,
}

/// One edge endpoint as seen from a particular user
///
/// Returned by the friend-list query, which deliberately includes pending
/// requests; callers that need confirmed friends filter on `pending`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct FriendLink {
    pub user_id: i64,
    pub pending: bool,
}

// =============================================================================
// Groups
// =============================================================================

/// A group
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Membership of a user in a group
///
/// A user belongs to a group at most once.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GroupMembership {
    pub member_id: i64,
    pub group_id: i64,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Posts and comments
// =============================================================================

/// A post on a user's wall
///
/// `wall_id` is whose wall the post lives on and governs its visibility;
/// `author_id` may differ.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct WallPost {
    pub id: i64,
    pub author_id: i64,
    pub wall_id: i64,
    pub content: String,
    pub publish_time: i64,
}

/// A post in a group
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct GroupPost {
    pub id: i64,
    pub author_id: i64,
    pub group_id: i64,
    pub content: String,
    pub publish_time: i64,
}

/// A comment on a wall or group post
///
/// Wall and group comments live in separate tables but share this shape;
/// `post_id` refers into the table matching the parent post's kind.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub content: String,
    pub publish_time: i64,
}

/// Post kind discriminant
///
/// Attached explicitly at projection time wherever wall and group posts
/// travel together — never inferred from row shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Wall,
    Group,
}

impl PostKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wall => "wall",
            Self::Group => "group",
        }
    }
}
