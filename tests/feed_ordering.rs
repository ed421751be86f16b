//! Feed aggregation scenarios

mod common;

use std::collections::HashSet;

use common::TestApp;
use homeroom::data::PostKind;

#[tokio::test]
async fn feed_merges_wall_and_group_streams_newest_first() {
    let app = TestApp::new().await;
    let relationships = app.relationships();
    let content = app.content();
    let feed = app.feed();

    let (alice, bob) = app.create_friends("alice", "bob").await;
    let group_id = relationships.create_group(alice, "chess club").await.unwrap();

    // Interleave posts across the two streams; the publish clock orders them.
    content.post_to_wall(alice, "w1", alice).await.unwrap().unwrap();
    content.post_to_group(alice, "g1", group_id).await.unwrap().unwrap();
    content.post_to_wall(bob, "w2", bob).await.unwrap().unwrap();
    content.post_to_group(alice, "g2", group_id).await.unwrap().unwrap();
    content.post_to_wall(bob, "w3", alice).await.unwrap().unwrap();

    let items = feed.generate_feed(alice).await.unwrap();
    assert_eq!(items.len(), 5);

    // Strictly non-increasing publish times.
    for window in items.windows(2) {
        assert!(window[0].publish_time >= window[1].publish_time);
    }

    // Newest post first, and every item carries its kind tag.
    assert_eq!(items[0].content, "w3");
    assert_eq!(items[0].kind, PostKind::Wall);
    assert_eq!(items[1].content, "g2");
    assert_eq!(items[1].kind, PostKind::Group);

    // Every returned target is in the viewer's visible sets.
    let wall_targets: HashSet<i64> = [alice, bob].into_iter().collect();
    for item in &items {
        match item.kind {
            PostKind::Wall => assert!(wall_targets.contains(&item.target_id)),
            PostKind::Group => assert_eq!(item.target_id, group_id),
        }
    }
}

#[tokio::test]
async fn feed_excludes_pending_friends_walls() {
    let app = TestApp::new().await;
    let relationships = app.relationships();
    let content = app.content();
    let feed = app.feed();

    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;

    content.post_to_wall(bob, "bob post", bob).await.unwrap().unwrap();

    // Pending request: Bob's wall stays invisible to Alice.
    assert!(relationships.request_friendship(alice, "bob").await.unwrap());
    assert!(feed.generate_feed(alice).await.unwrap().is_empty());

    // Accepted: it appears.
    assert!(relationships.accept_friendship(bob, alice).await.unwrap());
    let items = feed.generate_feed(alice).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].content, "bob post");
    assert_eq!(items[0].author_id, bob);
}

#[tokio::test]
async fn feed_excludes_foreign_groups_and_walls() {
    let app = TestApp::new().await;
    let relationships = app.relationships();
    let content = app.content();
    let feed = app.feed();

    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;
    let carol = app.create_user("carol").await;

    let group_id = relationships.create_group(bob, "private club").await.unwrap();
    content.post_to_group(bob, "members only", group_id).await.unwrap().unwrap();
    content.post_to_wall(carol, "carol wall", carol).await.unwrap().unwrap();

    // Alice is in no group and has no friends: only her own wall counts.
    assert!(feed.generate_feed(alice).await.unwrap().is_empty());

    content.post_to_wall(alice, "own post", alice).await.unwrap().unwrap();
    let items = feed.generate_feed(alice).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].content, "own post");
    assert_eq!(items[0].target_id, alice);
}

#[tokio::test]
async fn feed_reflects_ended_relationship() {
    let app = TestApp::new().await;
    let relationships = app.relationships();
    let content = app.content();
    let feed = app.feed();

    let (alice, bob) = app.create_friends("alice", "bob").await;
    content.post_to_wall(bob, "while friends", bob).await.unwrap().unwrap();

    assert_eq!(feed.generate_feed(alice).await.unwrap().len(), 1);

    relationships.end_relationship(alice, bob).await.unwrap();
    assert!(feed.generate_feed(alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn feed_of_unknown_user_is_empty() {
    let app = TestApp::new().await;

    assert!(app.feed().generate_feed(9999).await.unwrap().is_empty());
}
