use crate::{error::Result, Batch, Error, ListingParams};
use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::Pool;

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct CreateHotelClass {
    #[garde(length(min = 1, max = 255))]
    pub name: String,
    #[garde(length(min = 1, max = 5000))]
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct HotelClass {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct HotelClassShort {
    pub id: i64,
    pub name: String,
}

pub type HotelClassRepository = HotelClassRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct HotelClassRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> HotelClassRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn create(&self, payload: CreateHotelClass) -> Result<HotelClass> {
        let result = sqlx::query("INSERT INTO hotel_class (name, description) VALUES (?, ?)")
            .bind(&payload.name)
            .bind(&payload.description)
            .execute(&self.executor)
            .await?;

        self.get(result.last_insert_rowid()).await
    }

    pub async fn update(&self, id: i64, payload: CreateHotelClass) -> Result<HotelClass> {
        let result = sqlx::query("UPDATE hotel_class SET name = ?, description = ? WHERE id = ?")
            .bind(&payload.name)
            .bind(&payload.description)
            .bind(id)
            .execute(&self.executor)
            .await?;

        if result.rows_affected() == 0 {
            Err(Error::RecordNotFound("HotelClass".to_string()))
        } else {
            self.get(id).await
        }
    }

    pub async fn list(&self, params: ListingParams) -> Result<Batch<HotelClassShort>> {
        let ordering = params.ordering(&["name", "id"])?;
        let order_clause = if ordering.is_empty() {
            "name".to_string()
        } else {
            ordering
        };
        let sql = format!("SELECT id, name FROM hotel_class ORDER BY {order_clause} LIMIT ? OFFSET ?");
        let rows = sqlx::query_as::<_, HotelClassShort>(&sql)
            .bind(params.limit)
            .bind(params.offset)
            .fetch_all(&self.executor)
            .await?;
        let total = self.count().await?;
        Ok(Batch {
            offset: params.offset,
            total,
            rows,
        })
    }

    pub async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM hotel_class")
            .fetch_one(&self.executor)
            .await?;
        Ok(count as u64)
    }

    /// Hotels referencing the class are left untouched; the delete fails on
    /// the foreign key while any hotel still points at it.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM hotel_class WHERE id = ?")
            .bind(id)
            .execute(&self.executor)
            .await?;

        if res.rows_affected() == 0 {
            Err(Error::RecordNotFound("HotelClass".to_string()))
        } else {
            Ok(())
        }
    }

    pub async fn get(&self, id: i64) -> Result<HotelClass> {
        let record = sqlx::query_as::<_, HotelClass>(
            "SELECT id, name, description FROM hotel_class WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&self.executor)
        .await?;
        Ok(record)
    }
}
