use futures::TryStreamExt as _;
use sqlx::Executor;

pub const TEST_DATA: &str = r#"
INSERT INTO hotel_class (id, name, description) VALUES (1, 'Luxury', 'Five stars and a spa');
INSERT INTO hotel_class (id, name, description) VALUES (2, 'Budget', 'Cheap and cheerful');

INSERT INTO placement (id, country, city, address) VALUES (1, 'Ukraine', 'Kyiv', '1 Khreshchatyk St');
INSERT INTO placement (id, country, city, address) VALUES (2, 'Czechia', 'Prague', '7 Karlova St');

INSERT INTO hotel (id, name, placement_id, hotel_class_id) VALUES (1, 'Grand Kyiv', 1, 1);
INSERT INTO hotel (id, name, placement_id, hotel_class_id) VALUES (2, 'Vltava Inn', 2, 2);

INSERT INTO users (id, username, password, first_name, last_name) VALUES (1, 'anna', NULL, 'Anna', 'Kovac');
INSERT INTO users (id, username, password, first_name, last_name) VALUES (2, 'boris', NULL, 'Boris', 'Maly');
INSERT INTO users (id, username, password, first_name, last_name) VALUES (3, 'clara', NULL, 'Clara', 'Novak');

INSERT INTO review (id, author_id, hotel_id, caption, comment, created, hotel_rating)
VALUES (1, 1, 1, 'Great stay', 'Loved the view', '2024-05-01 10:00:00', 6);
INSERT INTO review (id, author_id, hotel_id, caption, comment, created, hotel_rating)
VALUES (2, 2, 1, 'Decent', 'Breakfast was cold', '2024-05-02 10:00:00', 8);
INSERT INTO review (id, author_id, hotel_id, caption, comment, created, hotel_rating)
VALUES (3, 3, 1, 'Perfect', 'Would come back', '2024-05-03 10:00:00', 10);
"#;

pub async fn init_db() -> sqlx::Pool<sqlx::Sqlite> {
    const DB_URL: &str = "sqlite::memory:";
    let conn = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect(DB_URL)
        .await
        .unwrap();
    conn.execute("PRAGMA foreign_keys = ON").await.unwrap();
    sqlx::migrate!("../../migrations").run(&conn).await.unwrap();

    conn.execute_many(TEST_DATA)
        .try_collect::<Vec<_>>()
        .await
        .unwrap();

    conn
}
