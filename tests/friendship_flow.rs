//! Friendship lifecycle scenarios

mod common;

use common::TestApp;
use homeroom::data::PostKind;

#[tokio::test]
async fn friendship_lifecycle_end_to_end() {
    let app = TestApp::new().await;
    let relationships = app.relationships();
    let authz = app.authz();
    let content = app.content();
    let feed = app.feed();

    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;

    // Strangers: no access anywhere.
    assert!(!relationships.are_friends(alice, bob).await.unwrap());
    assert!(!authz.can_access_wall(alice, bob).await.unwrap());

    // Alice requests friendship with Bob.
    assert!(relationships.request_friendship(alice, "bob").await.unwrap());
    assert_eq!(
        relationships.who_requested(alice, bob).await.unwrap(),
        Some(alice)
    );

    // A pending request is not a friendship and grants no wall access.
    assert!(!relationships.are_friends(alice, bob).await.unwrap());
    assert!(!authz.can_access_wall(alice, bob).await.unwrap());

    // Bob accepts; friendship is symmetric.
    assert!(relationships.accept_friendship(bob, alice).await.unwrap());
    assert!(relationships.are_friends(alice, bob).await.unwrap());
    assert!(relationships.are_friends(bob, alice).await.unwrap());

    // Alice posts "hello" to Bob's wall; it shows in Bob's feed.
    assert!(authz.can_post_to_wall(alice, bob).await.unwrap());
    let post = content
        .post_to_wall(alice, "hello", bob)
        .await
        .unwrap()
        .unwrap();

    let items = feed.generate_feed(bob).await.unwrap();
    assert!(
        items
            .iter()
            .any(|item| item.kind == PostKind::Wall && item.id == post.id)
    );

    // Ending the relationship removes the edge and all access.
    assert!(relationships.end_relationship(alice, bob).await.unwrap());
    assert!(!relationships.are_friends(alice, bob).await.unwrap());
    assert!(!authz.can_access_wall(alice, bob).await.unwrap());
    assert!(!authz.can_post_to_wall(alice, bob).await.unwrap());
}

#[tokio::test]
async fn second_request_between_linked_users_fails() {
    let app = TestApp::new().await;
    let relationships = app.relationships();

    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;

    assert!(relationships.request_friendship(alice, "bob").await.unwrap());

    // Same direction again
    assert!(!relationships.request_friendship(alice, "bob").await.unwrap());

    // Reverse direction while pending
    assert!(!relationships.request_friendship(bob, "alice").await.unwrap());

    // Still only one edge after acceptance
    assert!(relationships.accept_friendship(bob, alice).await.unwrap());
    assert!(!relationships.request_friendship(bob, "alice").await.unwrap());
}

#[tokio::test]
async fn requester_cannot_accept_own_request() {
    let app = TestApp::new().await;
    let relationships = app.relationships();

    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;

    assert!(relationships.request_friendship(alice, "bob").await.unwrap());

    assert!(!relationships.accept_friendship(alice, bob).await.unwrap());
    assert!(!relationships.are_friends(alice, bob).await.unwrap());
}

#[tokio::test]
async fn request_to_unknown_user_or_self_fails() {
    let app = TestApp::new().await;
    let relationships = app.relationships();

    let alice = app.create_user("alice").await;

    assert!(!relationships.request_friendship(alice, "nobody").await.unwrap());
    assert!(!relationships.request_friendship(alice, "alice").await.unwrap());
}

#[tokio::test]
async fn end_relationship_rejects_pending_request() {
    let app = TestApp::new().await;
    let relationships = app.relationships();

    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;

    assert!(relationships.request_friendship(alice, "bob").await.unwrap());

    // The requestee turns the request down.
    assert!(relationships.end_relationship(bob, alice).await.unwrap());
    assert_eq!(relationships.who_requested(alice, bob).await.unwrap(), None);

    // Ending a relationship that does not exist fails.
    assert!(!relationships.end_relationship(bob, alice).await.unwrap());
}

#[tokio::test]
async fn friends_of_returns_pending_and_confirmed_links() {
    let app = TestApp::new().await;
    let relationships = app.relationships();

    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;
    let carol = app.create_user("carol").await;

    assert!(relationships.request_friendship(alice, "bob").await.unwrap());
    assert!(relationships.accept_friendship(bob, alice).await.unwrap());
    assert!(relationships.request_friendship(carol, "alice").await.unwrap());

    let mut links = relationships.friends_of(alice).await.unwrap();
    links.sort_by_key(|link| link.user_id);

    assert_eq!(links.len(), 2);
    assert_eq!(links[0].user_id, bob);
    assert!(!links[0].pending);
    assert_eq!(links[1].user_id, carol);
    assert!(links[1].pending);
}
