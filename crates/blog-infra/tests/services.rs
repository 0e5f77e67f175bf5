//! Blog and account services running against the in-memory store.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};

use blog_core::domain::{Actor, CommentSort, NewComment, NewPost, PostSort};
use blog_core::ports::{CommentRepository, PostRepository};
use blog_core::services::{AccountService, BlogService};
use blog_core::validation::RegistrationForm;
use blog_core::{DomainError, PageRequest};
use blog_infra::{Argon2PasswordService, InMemoryDatabase};

struct Fixture {
    db: InMemoryDatabase,
    blog: BlogService,
    accounts: AccountService,
}

fn fixture() -> Fixture {
    let db = InMemoryDatabase::new();
    let blog = BlogService::new(
        Arc::new(db.users()),
        Arc::new(db.posts()),
        Arc::new(db.comments()),
    );
    let accounts = AccountService::new(Arc::new(db.users()), Arc::new(Argon2PasswordService::new()));
    Fixture { db, blog, accounts }
}

async fn register(fx: &Fixture, username: &str) -> Actor {
    let form = RegistrationForm {
        username,
        email: "someone@example.com",
        password: "testpass123",
        password_confirm: "testpass123",
    };
    fx.accounts.register(&form).await.unwrap().actor()
}

fn page(page: i64, size: i64) -> PageRequest {
    PageRequest::new(Some(page), Some(size), 10, 100).unwrap()
}

/// Insert a post whose timestamps are `minutes_ago` in the past.
async fn backdated_post(fx: &Fixture, author: &Actor, title: &str, minutes_ago: i64) -> i64 {
    let mut new = NewPost::new(author.user_id, title.into(), "Body".into());
    new.created_at = Utc::now() - TimeDelta::minutes(minutes_ago);
    fx.db.posts().insert(new).await.unwrap().id
}

#[tokio::test]
async fn test_pages_cover_all_posts() {
    let fx = fixture();
    let author = register(&fx, "author").await;
    for i in 0..25 {
        backdated_post(&fx, &author, &format!("Post {i}"), i).await;
    }

    let first = fx.blog.list_posts(PostSort::Newest, page(1, 10)).await.unwrap();
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.meta.total_pages, 3);
    assert!(first.meta.has_next);
    assert!(!first.meta.has_previous);

    let last = fx.blog.list_posts(PostSort::Newest, page(3, 10)).await.unwrap();
    assert_eq!(last.items.len(), 5);
    assert!(!last.meta.has_next);

    let clamped = fx.blog.list_posts(PostSort::Newest, page(99, 10)).await.unwrap();
    assert_eq!(clamped.meta.current_page, 3);

    let mut seen = Vec::new();
    for n in 1..=3 {
        let p = fx.blog.list_posts(PostSort::Newest, page(n, 10)).await.unwrap();
        seen.extend(p.items.into_iter().map(|s| s.post.id));
    }
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), 25);
}

#[tokio::test]
async fn test_newest_listing_is_non_increasing() {
    let fx = fixture();
    let author = register(&fx, "author").await;
    for (title, age) in [("middle", 5), ("old", 10), ("new", 1)] {
        backdated_post(&fx, &author, title, age).await;
    }

    let page = fx.blog.list_posts(PostSort::Newest, page(1, 10)).await.unwrap();
    let titles: Vec<&str> = page.items.iter().map(|s| s.post.title.as_str()).collect();
    assert_eq!(titles, vec!["new", "middle", "old"]);

    let stamps: Vec<_> = page.items.iter().map(|s| s.post.created_at).collect();
    assert!(stamps.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_empty_listing() {
    let fx = fixture();

    let page = fx.blog.list_posts(PostSort::Newest, page(3, 10)).await.unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.meta.total_pages, 0);
    assert_eq!(page.meta.current_page, 1);
}

#[tokio::test]
async fn test_comment_ties_break_by_id() {
    let fx = fixture();
    let author = register(&fx, "author").await;
    let post_id = backdated_post(&fx, &author, "Post", 0).await;

    let at = Utc::now();
    for text in ["first", "second", "third"] {
        let mut new = NewComment::new(post_id, author.user_id, text.into());
        new.created_at = at;
        fx.db.comments().insert(new).await.unwrap();
    }

    for sort in [CommentSort::Oldest, CommentSort::Newest] {
        let comments = fx.blog.sorted_comments(post_id, sort).await.unwrap();
        let texts: Vec<&str> = comments.iter().map(|c| c.comment.content.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }
}

#[tokio::test]
async fn test_comments_newest_first() {
    let fx = fixture();
    let author = register(&fx, "author").await;
    let post_id = backdated_post(&fx, &author, "Post", 0).await;

    for (text, age) in [("older", 10), ("newer", 1)] {
        let mut new = NewComment::new(post_id, author.user_id, text.into());
        new.created_at = Utc::now() - TimeDelta::minutes(age);
        fx.db.comments().insert(new).await.unwrap();
    }

    let detail = fx.blog.get_post(post_id, CommentSort::Newest).await.unwrap();
    assert_eq!(detail.comments[0].comment.content, "newer");
    assert_eq!(detail.comments[0].author, "author");
}

#[tokio::test]
async fn test_non_author_cannot_edit_or_delete() {
    let fx = fixture();
    let owner = register(&fx, "owner").await;
    let other = register(&fx, "other").await;

    let post = fx.blog.create_post(&owner, "Mine", "Content").await.unwrap();

    let edit = fx.blog.update_post(&other, post.id, "Hijacked", "x").await;
    assert!(matches!(edit, Err(DomainError::PermissionDenied)));

    let delete = fx.blog.delete_post(&other, post.id).await;
    assert!(matches!(delete, Err(DomainError::PermissionDenied)));

    let stored = fx.blog.get_post(post.id, CommentSort::Oldest).await.unwrap();
    assert_eq!(stored.post.title, "Mine");
}

#[tokio::test]
async fn test_author_edit_moves_updated_at() {
    let fx = fixture();
    let owner = register(&fx, "owner").await;
    let post = fx.blog.create_post(&owner, "Draft", "Content").await.unwrap();

    let edited = fx
        .blog
        .update_post(&owner, post.id, "  Final  ", "New content")
        .await
        .unwrap();

    assert_eq!(edited.title, "Final");
    assert_eq!(edited.created_at, post.created_at);
    assert!(edited.updated_at >= edited.created_at);
}

#[tokio::test]
async fn test_delete_post_cascades_to_comments() {
    let fx = fixture();
    let owner = register(&fx, "owner").await;
    let post = fx.blog.create_post(&owner, "Doomed", "Content").await.unwrap();
    let comment = fx
        .blog
        .create_comment(&owner, post.id, "Nice post!")
        .await
        .unwrap();

    fx.blog.delete_post(&owner, post.id).await.unwrap();

    assert!(matches!(
        fx.blog.get_post(post.id, CommentSort::Oldest).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(
        fx.db
            .comments()
            .list_for_post(post.id, CommentSort::Oldest)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(matches!(
        fx.blog.delete_comment(&owner, comment.comment.id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_comment_count_includes_unapproved() {
    let fx = fixture();
    let author = register(&fx, "author").await;
    let post_id = backdated_post(&fx, &author, "Post", 0).await;

    fx.blog
        .create_comment(&author, post_id, "Approved comment")
        .await
        .unwrap();
    let mut hidden = NewComment::new(post_id, author.user_id, "Pending comment".into());
    hidden.is_approved = false;
    fx.db.comments().insert(hidden).await.unwrap();

    let page = fx.blog.list_posts(PostSort::Newest, page(1, 10)).await.unwrap();
    assert_eq!(page.items[0].comment_count, 2);

    let detail = fx.blog.get_post(post_id, CommentSort::Oldest).await.unwrap();
    assert_eq!(detail.comment_count(), 2);
}

#[tokio::test]
async fn test_invalid_comment_is_not_stored() {
    let fx = fixture();
    let author = register(&fx, "author").await;
    let post_id = backdated_post(&fx, &author, "Post", 0).await;

    for content in ["ab", "Check this ![image](http://x/i.jpg)", "see [here](http://x)"] {
        let result = fx.blog.create_comment(&author, post_id, content).await;
        assert!(matches!(result, Err(DomainError::Validation(_))), "{content:?}");
    }

    let comments = fx
        .blog
        .sorted_comments(post_id, CommentSort::Oldest)
        .await
        .unwrap();
    assert!(comments.is_empty());
}

#[tokio::test]
async fn test_comment_on_missing_post() {
    let fx = fixture();
    let author = register(&fx, "author").await;

    let result = fx.blog.create_comment(&author, 404, "Hello there").await;
    assert!(matches!(
        result,
        Err(DomainError::NotFound {
            entity_type: "Post",
            id: 404
        })
    ));
}

#[tokio::test]
async fn test_only_comment_author_can_delete_comment() {
    let fx = fixture();
    let owner = register(&fx, "owner").await;
    let other = register(&fx, "other").await;
    let post = fx.blog.create_post(&owner, "Post", "Content").await.unwrap();
    let comment = fx
        .blog
        .create_comment(&other, post.id, "My comment")
        .await
        .unwrap();

    assert!(matches!(
        fx.blog.delete_comment(&owner, comment.comment.id).await,
        Err(DomainError::PermissionDenied)
    ));
    fx.blog
        .delete_comment(&other, comment.comment.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_posts_by_author() {
    let fx = fixture();
    let alice = register(&fx, "alice").await;
    let bob = register(&fx, "bob").await;
    backdated_post(&fx, &alice, "older", 10).await;
    backdated_post(&fx, &bob, "bob's", 5).await;
    backdated_post(&fx, &alice, "newer", 1).await;

    let posts = fx.blog.posts_by_author(alice.user_id).await.unwrap();
    let titles: Vec<&str> = posts.iter().map(|s| s.post.title.as_str()).collect();
    assert_eq!(titles, vec!["newer", "older"]);

    assert!(matches!(
        fx.blog.posts_by_author(999).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_register_and_authenticate() {
    let fx = fixture();
    let actor = register(&fx, "newuser").await;

    let user = fx
        .accounts
        .authenticate("newuser", "testpass123")
        .await
        .unwrap();
    assert_eq!(user.id, actor.user_id);

    assert!(matches!(
        fx.accounts.authenticate("newuser", "wrongpass").await,
        Err(DomainError::InvalidCredentials)
    ));
    assert!(matches!(
        fx.accounts.authenticate("nobody", "testpass123").await,
        Err(DomainError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_duplicate_registration() {
    let fx = fixture();
    register(&fx, "taken").await;

    let form = RegistrationForm {
        username: "taken",
        email: "again@example.com",
        password: "testpass123",
        password_confirm: "testpass123",
    };
    assert!(matches!(
        fx.accounts.register(&form).await,
        Err(DomainError::Duplicate(_))
    ));
}
