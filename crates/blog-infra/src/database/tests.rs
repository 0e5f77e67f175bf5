use chrono::{TimeDelta, Utc};
use sea_orm::sea_query::Values;
use sea_orm::{
    DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, MockExecResult, RuntimeErr,
    Statement,
};

use blog_core::domain::{CommentSort, Post, PostSort, User};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, CommentRepository, PostRepository, UserRepository};

use crate::database::entity::{comment, post, user};
use crate::database::postgres_base::query_error;
use crate::database::postgres_repo::{
    PostgresCommentRepository, PostgresPostRepository, PostgresUserRepository,
};

/// The single statement a mock connection saw.
fn only_statement(db: DatabaseConnection) -> Statement {
    let log = db.into_transaction_log();
    assert_eq!(log.len(), 1, "{log:?}");
    let statements = log[0].statements();
    assert_eq!(statements.len(), 1, "{statements:?}");
    statements[0].clone()
}

fn post_model(id: i64, title: &str) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        author_id: 7,
        title: title.to_owned(),
        content: "Content".to_owned(),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(1, "Test Post")]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(1).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, 1);
    assert_eq!(post.author_id, 7);
}

#[tokio::test]
async fn test_find_missing_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(42).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_list_posts_keeps_row_order() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![
            post_model(3, "Third"),
            post_model(2, "Second"),
        ]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let posts = repo.list(PostSort::Newest, 0, 10).await.unwrap();
    let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![3, 2]);
}

#[tokio::test]
async fn test_list_posts_orders_by_sort_key_then_id() {
    let cases = [
        (PostSort::Newest, r#""posts"."created_at" DESC"#),
        (PostSort::Oldest, r#""posts"."created_at" ASC"#),
        (PostSort::UpdatedNewest, r#""posts"."updated_at" DESC"#),
        (PostSort::UpdatedOldest, r#""posts"."updated_at" ASC"#),
    ];

    for (sort, key) in cases {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();
        let repo = PostgresPostRepository::new(db.clone());

        repo.list(sort, 20, 10).await.unwrap();

        let stmt = only_statement(db);
        let expected = format!(r#"ORDER BY {key}, "posts"."id" ASC LIMIT $1 OFFSET $2"#);
        assert!(stmt.sql.ends_with(&expected), "{sort:?}: {}", stmt.sql);
        assert_eq!(
            stmt.values,
            Some(Values(vec![10u64.into(), 20u64.into()])),
            "{sort:?}"
        );
    }
}

#[tokio::test]
async fn test_comments_for_post_break_ties_by_id() {
    for (sort, key) in [
        (CommentSort::Oldest, r#""comments"."created_at" ASC"#),
        (CommentSort::Newest, r#""comments"."created_at" DESC"#),
    ] {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<comment::Model>::new()])
            .into_connection();
        let repo = PostgresCommentRepository::new(db.clone());

        repo.list_for_post(4, sort).await.unwrap();

        let stmt = only_statement(db);
        assert!(
            stmt.sql.contains(r#"WHERE "comments"."post_id" = $1"#),
            "{}",
            stmt.sql
        );
        let expected = format!(r#"ORDER BY {key}, "comments"."id" ASC"#);
        assert!(stmt.sql.ends_with(&expected), "{sort:?}: {}", stmt.sql);
    }
}

#[tokio::test]
async fn test_count_for_posts_groups_by_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<comment::Model>::new()])
        .into_connection();
    let repo = PostgresCommentRepository::new(db.clone());

    let counts = repo.count_for_posts(&[3, 5]).await.unwrap();
    assert!(counts.is_empty());

    let stmt = only_statement(db);
    assert!(stmt.sql.starts_with(r#"SELECT "comments"."post_id", COUNT("#), "{}", stmt.sql);
    assert!(stmt.sql.contains(r#"AS "comment_count""#), "{}", stmt.sql);
    assert!(
        stmt.sql.contains(r#""comments"."post_id" IN ($1, $2)"#),
        "{}",
        stmt.sql
    );
    assert!(stmt.sql.ends_with(r#"GROUP BY "comments"."post_id""#), "{}", stmt.sql);
    assert_eq!(stmt.values, Some(Values(vec![3i64.into(), 5i64.into()])));
}

#[tokio::test]
async fn test_count_for_no_posts_skips_query() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = PostgresCommentRepository::new(db.clone());

    assert!(repo.count_for_posts(&[]).await.unwrap().is_empty());
    assert!(db.into_transaction_log().is_empty());
}

#[tokio::test]
async fn test_delete_missing_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = BaseRepository::<Post, i64>::delete(&repo, 5).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_find_user_by_username() {
    let joined = Utc::now() - TimeDelta::days(3);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![user::Model {
            id: 7,
            username: "testuser".to_owned(),
            email: "test@example.com".to_owned(),
            password_hash: "hash".to_owned(),
            is_staff: false,
            created_at: joined.into(),
        }]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let user: User = repo.find_by_username("testuser").await.unwrap().unwrap();
    assert_eq!(user.id, 7);
    assert_eq!(user.created_at, joined);
}

#[test]
fn test_query_error_classification() {
    let lost = query_error(DbErr::Conn(RuntimeErr::Internal("connection refused".into())));
    assert!(matches!(lost, RepoError::Connection(_)));

    let duplicate = query_error(DbErr::Custom(
        "duplicate key value violates unique constraint".into(),
    ));
    assert!(matches!(duplicate, RepoError::Constraint(_)));

    let other = query_error(DbErr::Custom("syntax error".into()));
    assert!(matches!(other, RepoError::Query(_)));
}
