mod common;

use stayrate_dal::reaction::{ReactionKind, ReactionRepositoryImpl};
use stayrate_dal::user::{CreateUser, UserRepositoryImpl};
use stayrate_dal::ListingParams;

#[tokio::test]
async fn test_reviews_amount() {
    let conn = common::init_db().await;
    let repo = UserRepositoryImpl::new(conn);

    let user = repo.get(1).await.unwrap();
    assert_eq!(user.username, "anna");
    assert_eq!(user.reviews_amount, 1);
}

#[tokio::test]
async fn test_search_by_name() {
    let conn = common::init_db().await;
    let repo = UserRepositoryImpl::new(conn);

    let all = repo.list(ListingParams::default()).await.unwrap();
    assert_eq!(all.total, 3);

    let found = repo
        .list(ListingParams::default().with_filter("nov"))
        .await
        .unwrap();
    assert_eq!(found.rows.len(), 1);
    assert_eq!(found.rows[0].first_name, "Clara");

    let by_first = repo
        .list(ListingParams::default().with_filter("Anna"))
        .await
        .unwrap();
    assert_eq!(by_first.rows.len(), 1);
    assert_eq!(by_first.rows[0].username, "anna");
}

#[tokio::test]
async fn test_liked_disliked_partition() {
    let conn = common::init_db().await;
    let reactions = ReactionRepositoryImpl::new(conn);

    // User 2 authored review 2, reacts to the other two.
    reactions
        .set_reaction(1, 2, ReactionKind::Like)
        .await
        .unwrap();
    reactions
        .set_reaction(3, 2, ReactionKind::Dislike)
        .await
        .unwrap();

    let liked = reactions.list_reacted(2, ReactionKind::Like).await.unwrap();
    let disliked = reactions
        .list_reacted(2, ReactionKind::Dislike)
        .await
        .unwrap();
    assert_eq!(liked.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1]);
    assert_eq!(disliked.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3]);

    // A cancelled reaction drops out of both lists.
    reactions
        .set_reaction(1, 2, ReactionKind::Like)
        .await
        .unwrap();
    let liked = reactions.list_reacted(2, ReactionKind::Like).await.unwrap();
    assert!(liked.is_empty());
}

#[tokio::test]
async fn test_create_user_hashes_password() {
    let conn = common::init_db().await;
    let repo = UserRepositoryImpl::new(conn.clone());

    let user = repo
        .create(CreateUser {
            username: "dmytro".to_string(),
            password: Some("correct horse".to_string()),
            first_name: "Dmytro".to_string(),
            last_name: "Bondar".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(user.reviews_amount, 0);

    let stored: Option<String> = sqlx::query_scalar("SELECT password FROM users WHERE id = ?")
        .bind(user.id)
        .fetch_one(&conn)
        .await
        .unwrap();
    let stored = stored.unwrap();
    assert!(stored.starts_with("$argon2"));
    assert_ne!(stored, "correct horse");
}

#[tokio::test]
async fn test_delete_user() {
    let conn = common::init_db().await;
    let repo = UserRepositoryImpl::new(conn);

    repo.delete(3).await.unwrap();
    assert!(repo.get(3).await.is_err());
    assert!(repo.delete(3).await.is_err());
}
