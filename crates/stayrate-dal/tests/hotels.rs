mod common;

use stayrate_dal::hotel::{CreateHotel, HotelRepositoryImpl};
use stayrate_dal::hotel_class::HotelClassRepositoryImpl;
use stayrate_dal::ListingParams;

#[tokio::test]
async fn test_average_rating() {
    let conn = common::init_db().await;
    let repo = HotelRepositoryImpl::new(conn);

    // Ratings 6, 8 and 10 in the fixture.
    let hotel = repo.get(1).await.unwrap();
    assert_eq!(hotel.average_rating, 8.0);

    let without_reviews = repo.get(2).await.unwrap();
    assert_eq!(without_reviews.average_rating, 0.0);
}

#[tokio::test]
async fn test_search_by_name() {
    let conn = common::init_db().await;
    let repo = HotelRepositoryImpl::new(conn);

    let all = repo.list(ListingParams::default()).await.unwrap();
    assert_eq!(all.total, 2);
    assert_eq!(all.rows.len(), 2);

    let found = repo
        .list(ListingParams::default().with_filter("kyiv"))
        .await
        .unwrap();
    assert_eq!(found.total, 1);
    assert_eq!(found.rows[0].name, "Grand Kyiv");

    let none = repo
        .list(ListingParams::default().with_filter("Helsinki"))
        .await
        .unwrap();
    assert!(none.rows.is_empty());
}

#[tokio::test]
async fn test_create_hotel_with_placement() {
    let conn = common::init_db().await;
    let repo = HotelRepositoryImpl::new(conn);

    let hotel = repo
        .create(CreateHotel {
            name: "Sea Breeze".to_string(),
            hotel_class_id: 2,
            country: "Ukraine".to_string(),
            city: "Odesa".to_string(),
            address: "3 Derybasivska St".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(hotel.name, "Sea Breeze");
    assert_eq!(hotel.placement.city, "Odesa");
    assert_eq!(hotel.hotel_class.name, "Budget");
    assert_eq!(hotel.average_rating, 0.0);
}

#[tokio::test]
async fn test_update_replaces_placement() {
    let conn = common::init_db().await;
    let repo = HotelRepositoryImpl::new(conn.clone());

    let before = repo.get(1).await.unwrap();
    let old_placement_id = before.placement.id;

    let updated = repo
        .update(
            1,
            CreateHotel {
                name: "Grand Kyiv".to_string(),
                hotel_class_id: 1,
                country: "Ukraine".to_string(),
                city: "Kyiv".to_string(),
                address: "12 Andriivskyi Descent".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, before.id);
    assert_eq!(updated.placement.address, "12 Andriivskyi Descent");
    assert_ne!(updated.placement.id, old_placement_id);

    // The old row is gone, not orphaned.
    let old_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM placement WHERE id = ?")
        .bind(old_placement_id)
        .fetch_optional(&conn)
        .await
        .unwrap();
    assert!(old_exists.is_none());
    let placements: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM placement")
        .fetch_one(&conn)
        .await
        .unwrap();
    assert_eq!(placements, 2);
}

#[tokio::test]
async fn test_delete_cascades_reviews_and_placement() {
    let conn = common::init_db().await;
    let repo = HotelRepositoryImpl::new(conn.clone());

    repo.delete(1).await.unwrap();

    let reviews: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM review WHERE hotel_id = 1")
        .fetch_one(&conn)
        .await
        .unwrap();
    assert_eq!(reviews, 0);
    let placements: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM placement")
        .fetch_one(&conn)
        .await
        .unwrap();
    assert_eq!(placements, 1);
}

#[tokio::test]
async fn test_class_delete_blocked_while_referenced() {
    let conn = common::init_db().await;
    let classes = HotelClassRepositoryImpl::new(conn.clone());

    // Class 1 is still referenced by hotel 1.
    assert!(classes.delete(1).await.is_err());
    let still_there: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM hotel_class WHERE id = 1")
        .fetch_one(&conn)
        .await
        .unwrap();
    assert_eq!(still_there, 1);

    // An unreferenced class goes away without a fuss.
    let hotels = HotelRepositoryImpl::new(conn);
    hotels.delete(2).await.unwrap();
    classes.delete(2).await.unwrap();
}
