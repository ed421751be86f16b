//! Feed aggregation service
//!
//! Merges the wall-post and group-post streams visible to a user into one
//! reverse-chronological sequence. Each item carries an explicit kind tag
//! attached at projection time; the merge never infers kinds from row
//! shape.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::data::{Database, GroupPost, PostKind, WallPost};
use crate::error::AppError;
use crate::metrics::{FEED_GENERATION_DURATION_SECONDS, FEEDS_GENERATED_TOTAL};

/// One entry of a user's home feed
///
/// A projection pairing the stored post with its kind; `target_id` is the
/// wall owner for wall posts and the group for group posts.
#[derive(Debug, Clone, Serialize)]
pub struct FeedItem {
    pub kind: PostKind,
    pub id: i64,
    pub author_id: i64,
    pub target_id: i64,
    pub content: String,
    pub publish_time: i64,
}

impl FeedItem {
    fn from_wall(post: WallPost) -> Self {
        Self {
            kind: PostKind::Wall,
            id: post.id,
            author_id: post.author_id,
            target_id: post.wall_id,
            content: post.content,
            publish_time: post.publish_time,
        }
    }

    fn from_group(post: GroupPost) -> Self {
        Self {
            kind: PostKind::Group,
            id: post.id,
            author_id: post.author_id,
            target_id: post.group_id,
            content: post.content,
            publish_time: post.publish_time,
        }
    }
}

/// Feed aggregation service
pub struct FeedService {
    db: Arc<Database>,
}

impl FeedService {
    /// Create new feed service
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Generate a user's home feed.
    ///
    /// Wall targets are the user's own wall plus confirmed friends'
    /// walls; pending requests grant nothing. Group targets are the
    /// user's groups. The two reads are independent and need not observe
    /// one store snapshot (best-effort feed, not a security decision).
    /// A failure in either sub-stream fails the whole feed.
    pub async fn generate_feed(&self, user_id: i64) -> Result<Vec<FeedItem>, AppError> {
        let started = Instant::now();

        let mut wall_ids: Vec<i64> = vec![user_id];
        wall_ids.extend(
            self.db
                .friend_links(user_id)
                .await?
                .into_iter()
                .filter(|link| !link.pending)
                .map(|link| link.user_id),
        );

        let group_ids = self.db.group_ids_of(user_id).await?;

        let wall_posts = self.db.wall_posts_for_walls(&wall_ids).await?;
        let group_posts = self.db.group_posts_for_groups(&group_ids).await?;

        let feed = merge_streams(wall_posts, group_posts);

        FEEDS_GENERATED_TOTAL.inc();
        FEED_GENERATION_DURATION_SECONDS.observe(started.elapsed().as_secs_f64());
        tracing::debug!(user_id, items = feed.len(), "feed generated");

        Ok(feed)
    }
}

/// Feed order: newest first, ties by ascending id, then kind.
///
/// Publish times are unique within a process, so the tie-breakers only
/// matter for data written by other processes; they keep the order
/// deterministic either way.
fn feed_order(a: &FeedItem, b: &FeedItem) -> Ordering {
    b.publish_time
        .cmp(&a.publish_time)
        .then_with(|| a.id.cmp(&b.id))
        .then_with(|| a.kind.as_str().cmp(b.kind.as_str()))
}

/// Merge two streams already sorted newest-first into one.
fn merge_streams(wall_posts: Vec<WallPost>, group_posts: Vec<GroupPost>) -> Vec<FeedItem> {
    let mut merged = Vec::with_capacity(wall_posts.len() + group_posts.len());
    let mut wall = wall_posts.into_iter().map(FeedItem::from_wall).peekable();
    let mut group = group_posts.into_iter().map(FeedItem::from_group).peekable();

    loop {
        let take_wall = match (wall.peek(), group.peek()) {
            (Some(w), Some(g)) => feed_order(w, g) != Ordering::Greater,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };

        let next = if take_wall { wall.next() } else { group.next() };
        if let Some(item) = next {
            merged.push(item);
        }
    }

    merged
}
