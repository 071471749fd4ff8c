use super::*;
use shared::domain::{Comment, CommentId, Post, PostId, User, UserId};

fn author() -> User {
    User {
        user_id: UserId(1),
        username: "alice".to_string(),
        first_name: "Alice".to_string(),
        last_name: "Archer".to_string(),
        bio: "hi".to_string(),
    }
}

fn post(post_id: i64) -> Post {
    Post {
        post_id: PostId(post_id),
        author: author(),
        body: format!("post {post_id}"),
        like_count: 0,
        share_count: 0,
        comments: Vec::new(),
    }
}

fn comment(comment_id: i64, body: &str) -> Comment {
    Comment {
        comment_id: CommentId(comment_id),
        body: body.to_string(),
        like_count: 0,
    }
}

#[test]
fn snapshots_are_value_semantics() {
    let mut store = PostStore::new();
    let before = store.append(post(1));

    store.increment_like(PostId(1));

    assert_eq!(before[0].like_count, 0);
    assert_eq!(store.snapshot()[0].like_count, 1);
}

#[test]
fn set_all_replaces_entire_contents() {
    let mut store = PostStore::new();
    store.append(post(1));

    let snapshot = store.set_all(vec![post(7), post(8)]);

    assert_eq!(
        snapshot.iter().map(|p| p.post_id).collect::<Vec<_>>(),
        vec![PostId(7), PostId(8)]
    );
}

#[test]
fn increment_like_adds_exactly_one() {
    let mut store = PostStore::new();
    let mut seeded = post(1);
    seeded.like_count = 3;
    store.append(seeded);

    store.increment_like(PostId(1));
    let snapshot = store.increment_like(PostId(1));

    assert_eq!(snapshot[0].like_count, 5);
}

#[test]
fn increment_like_on_unknown_post_is_a_noop() {
    let mut store = PostStore::new();
    store.append(post(1));

    let snapshot = store.increment_like(PostId(99));

    assert_eq!(snapshot[0].like_count, 0);
}

#[test]
fn increment_share_is_independent_of_likes() {
    let mut store = PostStore::new();
    store.append(post(1));

    store.increment_like(PostId(1));
    let snapshot = store.increment_share(PostId(1));

    assert_eq!(snapshot[0].like_count, 1);
    assert_eq!(snapshot[0].share_count, 1);
}

#[test]
fn add_comment_preserves_insertion_order() {
    let mut store = PostStore::new();
    store.append(post(1));

    store.add_comment(PostId(1), comment(10, "first"));
    let snapshot = store.add_comment(PostId(1), comment(11, "second"));

    let bodies: Vec<_> = snapshot[0].comments.iter().map(|c| c.body.as_str()).collect();
    assert_eq!(bodies, vec!["first", "second"]);
}

#[test]
fn add_comment_to_unknown_post_is_a_noop() {
    let mut store = PostStore::new();
    store.append(post(1));

    let snapshot = store.add_comment(PostId(99), comment(10, "lost"));

    assert!(snapshot[0].comments.is_empty());
}

#[test]
fn update_comment_body_finds_comment_across_posts() {
    let mut store = PostStore::new();
    store.append(post(1));
    store.append(post(2));
    store.add_comment(PostId(2), comment(10, "original"));

    let snapshot = store.update_comment_body(CommentId(10), "edited");

    assert_eq!(snapshot[1].comments[0].body, "edited");
}

#[test]
fn updated_comment_keeps_its_id_and_position() {
    let mut store = PostStore::new();
    store.append(post(1));
    store.add_comment(PostId(1), comment(10, "keep"));
    store.add_comment(PostId(1), comment(11, "target"));
    store.add_comment(PostId(1), comment(12, "keep too"));

    let snapshot = store.update_comment_body(CommentId(11), "x");

    let middle = &snapshot[0].comments[1];
    assert_eq!(middle.comment_id, CommentId(11));
    assert_eq!(middle.body, "x");
}

#[test]
fn update_comment_body_with_unknown_id_is_a_noop() {
    let mut store = PostStore::new();
    store.append(post(1));
    store.add_comment(PostId(1), comment(10, "untouched"));

    let snapshot = store.update_comment_body(CommentId(99), "edited");

    assert_eq!(snapshot[0].comments[0].body, "untouched");
}

#[test]
fn remove_comment_is_idempotent() {
    let mut store = PostStore::new();
    store.append(post(1));
    store.add_comment(PostId(1), comment(10, "hi"));

    let once = store.remove_comment(PostId(1), CommentId(10));
    assert!(once[0].comments.is_empty());

    let twice = store.remove_comment(PostId(1), CommentId(10));
    assert!(twice[0].comments.is_empty());
}

#[test]
fn remove_comment_leaves_other_comments_in_place() {
    let mut store = PostStore::new();
    store.append(post(1));
    store.add_comment(PostId(1), comment(10, "goes"));
    store.add_comment(PostId(1), comment(11, "stays"));

    let snapshot = store.remove_comment(PostId(1), CommentId(10));

    assert_eq!(snapshot[0].comments.len(), 1);
    assert_eq!(snapshot[0].comments[0].comment_id, CommentId(11));
}

#[test]
fn post_comment_lookup_matches_by_id() {
    let mut target = post(1);
    target.comments.push(comment(10, "first"));
    target.comments.push(comment(11, "second"));

    assert_eq!(target.comment(CommentId(11)).map(|c| c.body.as_str()), Some("second"));
    assert_eq!(target.comment(CommentId(99)), None);
}

#[test]
fn comment_body_scans_all_posts() {
    let mut store = PostStore::new();
    store.append(post(1));
    store.append(post(2));
    store.add_comment(PostId(2), comment(20, "found"));

    assert_eq!(store.comment_body(CommentId(20)).as_deref(), Some("found"));
    assert_eq!(store.comment_body(CommentId(99)), None);
}
