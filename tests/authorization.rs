//! Authorization engine decision matrix

mod common;

use common::TestApp;
use homeroom::data::PostKind;

#[tokio::test]
async fn wall_visibility_matrix() {
    let app = TestApp::new().await;
    let relationships = app.relationships();
    let authz = app.authz();

    let (alice, bob) = app.create_friends("alice", "bob").await;
    let carol = app.create_user("carol").await;
    let dave = app.create_user("dave").await;

    // Carol has a one-sided pending request to Alice.
    assert!(relationships.request_friendship(carol, "alice").await.unwrap());

    // Own wall.
    assert!(authz.can_access_wall(alice, alice).await.unwrap());
    // Confirmed friend.
    assert!(authz.can_access_wall(bob, alice).await.unwrap());
    assert!(authz.can_access_wall(alice, bob).await.unwrap());
    // Pending request, either side.
    assert!(!authz.can_access_wall(carol, alice).await.unwrap());
    assert!(!authz.can_access_wall(alice, carol).await.unwrap());
    // Stranger.
    assert!(!authz.can_access_wall(dave, alice).await.unwrap());
}

#[tokio::test]
async fn wall_comment_permission_is_anchored_on_the_wall() {
    let app = TestApp::new().await;
    let authz = app.authz();
    let content = app.content();

    let relationships = app.relationships();

    // Alice authors a post on Bob's wall.
    let (alice, bob) = app.create_friends("alice", "bob").await;

    // Carol is Bob's friend but not Alice's.
    let carol = app.create_user("carol").await;
    assert!(relationships.request_friendship(carol, "bob").await.unwrap());
    assert!(relationships.accept_friendship(bob, carol).await.unwrap());

    // Dave is Alice's friend but not Bob's.
    let dave = app.create_user("dave").await;
    assert!(relationships.request_friendship(dave, "alice").await.unwrap());
    assert!(relationships.accept_friendship(alice, dave).await.unwrap());

    let post = content
        .post_to_wall(alice, "posted by alice on bob's wall", bob)
        .await
        .unwrap()
        .unwrap();

    // Commenting follows the wall the post lives on.
    assert!(authz.can_comment_on_wall_post(bob, post.id).await.unwrap());
    assert!(authz.can_comment_on_wall_post(carol, post.id).await.unwrap());
    assert!(!authz.can_comment_on_wall_post(dave, post.id).await.unwrap());

    // The detail view keys off the author instead, so the two checks
    // disagree for third parties.
    assert!(
        !authz
            .can_see_post_detail(PostKind::Wall, carol, post.id)
            .await
            .unwrap()
    );
    assert!(
        authz
            .can_see_post_detail(PostKind::Wall, dave, post.id)
            .await
            .unwrap()
    );

    // Missing posts deny everything.
    assert!(!authz.can_comment_on_wall_post(bob, post.id + 100).await.unwrap());
    assert!(
        !authz
            .can_see_post_detail(PostKind::Wall, bob, post.id + 100)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn group_comment_and_detail_require_membership() {
    let app = TestApp::new().await;
    let relationships = app.relationships();
    let authz = app.authz();
    let content = app.content();

    let carol = app.create_user("carol").await;
    let dave = app.create_user("dave").await;
    let eve = app.create_user("eve").await;

    let group_id = relationships.create_group(carol, "chess club").await.unwrap();
    relationships.join_group(dave, group_id).await.unwrap();

    let post = content
        .post_to_group(carol, "hello", group_id)
        .await
        .unwrap()
        .unwrap();

    assert!(authz.can_comment_on_group_post(dave, post.id).await.unwrap());
    assert!(!authz.can_comment_on_group_post(eve, post.id).await.unwrap());

    assert!(
        authz
            .can_see_post_detail(PostKind::Group, dave, post.id)
            .await
            .unwrap()
    );
    assert!(
        !authz
            .can_see_post_detail(PostKind::Group, eve, post.id)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn wall_post_admin_follows_the_wall_and_site_admins() {
    let app = TestApp::new().await;
    let authz = app.authz();
    let content = app.content();

    let (alice, bob) = app.create_friends("alice", "bob").await;
    let admin = app.create_user("admin").await;
    app.db().set_site_admin(admin, true).await.unwrap();

    let post = content
        .post_to_wall(alice, "on bob's wall", bob)
        .await
        .unwrap()
        .unwrap();

    // The wall owner administers posts on their wall; the author does not.
    assert!(authz.is_wall_post_admin(bob, post.id).await.unwrap());
    assert!(!authz.is_wall_post_admin(alice, post.id).await.unwrap());

    // Site admins administer every wall.
    assert!(authz.is_wall_post_admin(admin, post.id).await.unwrap());
    assert!(authz.is_wall_admin(admin, bob).await.unwrap());
    assert!(authz.is_wall_admin(bob, bob).await.unwrap());
    assert!(!authz.is_wall_admin(alice, bob).await.unwrap());

    // Missing post denies.
    assert!(!authz.is_wall_post_admin(admin, post.id + 100).await.unwrap());
}

#[tokio::test]
async fn group_membership_gates_posting() {
    let app = TestApp::new().await;
    let relationships = app.relationships();
    let authz = app.authz();

    let carol = app.create_user("carol").await;
    let eve = app.create_user("eve").await;

    let group_id = relationships.create_group(carol, "chess club").await.unwrap();

    // Posting rights coincide with membership; the caller checks before
    // invoking the content store.
    assert!(authz.can_access_group(carol, group_id).await.unwrap());
    assert!(!authz.can_access_group(eve, group_id).await.unwrap());
}
