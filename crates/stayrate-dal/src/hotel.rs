use crate::{error::Result, hotel_class::HotelClassShort, Batch, ChosenRow, Error, ListingParams};
use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Row};

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct CreateHotel {
    #[garde(length(min = 1, max = 255))]
    pub name: String,
    #[garde(range(min = 1))]
    pub hotel_class_id: i64,
    #[garde(length(min = 1, max = 255))]
    pub country: String,
    #[garde(length(min = 1, max = 255))]
    pub city: String,
    #[garde(length(min = 1, max = 255))]
    pub address: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Placement {
    pub id: i64,
    pub country: String,
    pub city: String,
    pub address: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct HotelShort {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct Hotel {
    pub id: i64,
    pub name: String,
    pub placement: Placement,
    pub hotel_class: HotelClassShort,
    /// Mean of review ratings rounded to one decimal, 0.0 with no reviews.
    pub average_rating: f64,
}

impl sqlx::FromRow<'_, ChosenRow> for Hotel {
    fn from_row(row: &ChosenRow) -> Result<Self, sqlx::Error> {
        Ok(Hotel {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            placement: Placement {
                id: row.try_get("placement_id")?,
                country: row.try_get("placement_country")?,
                city: row.try_get("placement_city")?,
                address: row.try_get("placement_address")?,
            },
            hotel_class: HotelClassShort {
                id: row.try_get("class_id")?,
                name: row.try_get("class_name")?,
            },
            average_rating: row.try_get("average_rating")?,
        })
    }
}

const SELECT_HOTEL: &str = r#"
SELECT h.id, h.name,
    p.id AS placement_id, p.country AS placement_country, p.city AS placement_city, p.address AS placement_address,
    c.id AS class_id, c.name AS class_name,
    COALESCE(ROUND((SELECT AVG(hotel_rating) FROM review WHERE hotel_id = h.id), 1), 0.0) AS average_rating
FROM hotel h
JOIN placement p ON h.placement_id = p.id
JOIN hotel_class c ON h.hotel_class_id = c.id
"#;

pub type HotelRepository = HotelRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct HotelRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> HotelRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn get(&self, id: i64) -> Result<Hotel> {
        let sql = format!("{SELECT_HOTEL} WHERE h.id = ?");
        let record = sqlx::query_as::<_, Hotel>(&sql)
            .bind(id)
            .fetch_one(&self.executor)
            .await?;
        Ok(record)
    }

    pub async fn list(&self, params: ListingParams) -> Result<Batch<Hotel>> {
        let ordering = params.ordering(&["name", "average_rating", "id"])?;
        let order_clause = if ordering.is_empty() {
            "h.name".to_string()
        } else {
            ordering
        };
        let mut sql = String::from(SELECT_HOTEL);
        if params.filter.is_some() {
            sql.push_str(" WHERE h.name LIKE '%' || ? || '%'");
        }
        sql.push_str(&format!(" ORDER BY {order_clause} LIMIT ? OFFSET ?"));

        let mut query = sqlx::query_as::<_, Hotel>(&sql);
        if let Some(filter) = &params.filter {
            query = query.bind(filter);
        }
        let rows = query
            .bind(params.limit)
            .bind(params.offset)
            .fetch_all(&self.executor)
            .await?;
        let total = self.count(params.filter.as_deref()).await?;
        Ok(Batch {
            offset: params.offset,
            total,
            rows,
        })
    }

    pub async fn count(&self, filter: Option<&str>) -> Result<u64> {
        let count: i64 = match filter {
            Some(filter) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM hotel WHERE name LIKE '%' || ? || '%'")
                    .bind(filter)
                    .fetch_one(&self.executor)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM hotel")
                    .fetch_one(&self.executor)
                    .await?
            }
        };
        Ok(count as u64)
    }
}

impl HotelRepositoryImpl<Pool<crate::ChosenDB>> {
    pub async fn create(&self, payload: CreateHotel) -> Result<Hotel> {
        let mut tx = self.executor.begin().await?;
        let placement_id = sqlx::query("INSERT INTO placement (country, city, address) VALUES (?, ?, ?)")
            .bind(&payload.country)
            .bind(&payload.city)
            .bind(&payload.address)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();
        let hotel_id =
            sqlx::query("INSERT INTO hotel (name, placement_id, hotel_class_id) VALUES (?, ?, ?)")
                .bind(&payload.name)
                .bind(placement_id)
                .bind(payload.hotel_class_id)
                .execute(&mut *tx)
                .await?
                .last_insert_rowid();
        tx.commit().await?;

        self.get(hotel_id).await
    }

    /// Placement rows are replaced wholesale, never mutated in place: the
    /// update inserts a fresh row, relinks the hotel and drops the old one.
    pub async fn update(&self, id: i64, payload: CreateHotel) -> Result<Hotel> {
        let mut tx = self.executor.begin().await?;
        let old_placement: Option<i64> =
            sqlx::query_scalar("SELECT placement_id FROM hotel WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let old_placement =
            old_placement.ok_or_else(|| Error::RecordNotFound("Hotel".to_string()))?;

        let placement_id = sqlx::query("INSERT INTO placement (country, city, address) VALUES (?, ?, ?)")
            .bind(&payload.country)
            .bind(&payload.city)
            .bind(&payload.address)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();
        sqlx::query("UPDATE hotel SET name = ?, placement_id = ?, hotel_class_id = ? WHERE id = ?")
            .bind(&payload.name)
            .bind(placement_id)
            .bind(payload.hotel_class_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM placement WHERE id = ?")
            .bind(old_placement)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.executor.begin().await?;
        let placement: Option<i64> =
            sqlx::query_scalar("SELECT placement_id FROM hotel WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let placement = placement.ok_or_else(|| Error::RecordNotFound("Hotel".to_string()))?;

        // Reviews and their reactions go away through the cascade.
        sqlx::query("DELETE FROM hotel WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM placement WHERE id = ?")
            .bind(placement)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(())
    }
}
