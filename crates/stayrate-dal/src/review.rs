use crate::{
    error::Result, hotel::HotelShort, user::UserShort, Batch, ChosenRow, Error, ListingParams,
};
use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Row};

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct CreateReview {
    #[garde(length(min = 1, max = 255))]
    pub caption: String,
    #[garde(length(min = 1, max = 5000))]
    pub comment: String,
    #[garde(range(min = 0, max = 10))]
    pub hotel_rating: i64,
}

#[derive(Debug, Serialize, Clone)]
pub struct Review {
    pub id: i64,
    pub caption: String,
    pub comment: String,
    pub created: time::PrimitiveDateTime,
    pub hotel_rating: i64,
    pub author: UserShort,
    pub hotel: HotelShort,
    pub like_amount: i64,
    pub dislike_amount: i64,
    /// Net popularity, likes minus dislikes. Derived on read, never stored.
    pub review_rating: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct ReviewShort {
    pub id: i64,
    pub caption: String,
    pub hotel_id: i64,
}

impl sqlx::FromRow<'_, ChosenRow> for Review {
    fn from_row(row: &ChosenRow) -> Result<Self, sqlx::Error> {
        let like_amount: i64 = row.try_get("like_amount")?;
        let dislike_amount: i64 = row.try_get("dislike_amount")?;
        Ok(Review {
            id: row.try_get("id")?,
            caption: row.try_get("caption")?,
            comment: row.try_get("comment")?,
            created: row.try_get("created")?,
            hotel_rating: row.try_get("hotel_rating")?,
            author: UserShort {
                id: row.try_get("author_id")?,
                username: row.try_get("author_username")?,
                first_name: row.try_get("author_first_name")?,
                last_name: row.try_get("author_last_name")?,
            },
            hotel: HotelShort {
                id: row.try_get("hotel_id")?,
                name: row.try_get("hotel_name")?,
            },
            like_amount,
            dislike_amount,
            review_rating: like_amount - dislike_amount,
        })
    }
}

const SELECT_REVIEW: &str = r#"
SELECT r.id, r.caption, r.comment, r.created, r.hotel_rating,
    u.id AS author_id, u.username AS author_username, u.first_name AS author_first_name, u.last_name AS author_last_name,
    h.id AS hotel_id, h.name AS hotel_name,
    COUNT(CASE WHEN x.kind = 'like' THEN 1 END) AS like_amount,
    COUNT(CASE WHEN x.kind = 'dislike' THEN 1 END) AS dislike_amount
FROM review r
JOIN users u ON r.author_id = u.id
JOIN hotel h ON r.hotel_id = h.id
LEFT JOIN reaction x ON x.review_id = r.id
"#;

const REVIEW_ORDER_FIELDS: &[&str] = &["created", "hotel_rating", "id"];

pub type ReviewRepository = ReviewRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct ReviewRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> ReviewRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn create(
        &self,
        author_id: i64,
        hotel_id: i64,
        payload: CreateReview,
    ) -> Result<Review> {
        let result = sqlx::query(
            "INSERT INTO review (author_id, hotel_id, caption, comment, hotel_rating) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(author_id)
        .bind(hotel_id)
        .bind(&payload.caption)
        .bind(&payload.comment)
        .bind(payload.hotel_rating)
        .execute(&self.executor)
        .await?;

        self.get(result.last_insert_rowid()).await
    }

    /// Author, hotel and creation date are immutable.
    pub async fn update(&self, id: i64, payload: CreateReview) -> Result<Review> {
        let result =
            sqlx::query("UPDATE review SET caption = ?, comment = ?, hotel_rating = ? WHERE id = ?")
                .bind(&payload.caption)
                .bind(&payload.comment)
                .bind(payload.hotel_rating)
                .bind(id)
                .execute(&self.executor)
                .await?;

        if result.rows_affected() == 0 {
            Err(Error::RecordNotFound("Review".to_string()))
        } else {
            self.get(id).await
        }
    }

    pub async fn get(&self, id: i64) -> Result<Review> {
        let sql = format!("{SELECT_REVIEW} WHERE r.id = ? GROUP BY r.id");
        let record = sqlx::query_as::<_, Review>(&sql)
            .bind(id)
            .fetch_one(&self.executor)
            .await?;
        Ok(record)
    }

    pub async fn list(&self, params: ListingParams) -> Result<Batch<Review>> {
        let mut sql = String::from(SELECT_REVIEW);
        if params.filter.is_some() {
            sql.push_str(" WHERE r.caption LIKE '%' || ?1 || '%' OR r.comment LIKE '%' || ?1 || '%'");
        }
        sql.push_str(" GROUP BY r.id");
        sql.push_str(&self.order_clause(&params)?);

        let mut query = sqlx::query_as::<_, Review>(&sql);
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

    pub async fn list_for_hotel(&self, hotel_id: i64, params: ListingParams) -> Result<Batch<Review>> {
        let mut sql = String::from(SELECT_REVIEW);
        sql.push_str(" WHERE r.hotel_id = ? GROUP BY r.id");
        sql.push_str(&self.order_clause(&params)?);
        let rows = sqlx::query_as::<_, Review>(&sql)
            .bind(hotel_id)
            .bind(params.limit)
            .bind(params.offset)
            .fetch_all(&self.executor)
            .await?;
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM review WHERE hotel_id = ?")
            .bind(hotel_id)
            .fetch_one(&self.executor)
            .await?;
        Ok(Batch {
            offset: params.offset,
            total: total as u64,
            rows,
        })
    }

    pub async fn list_by_author(&self, author_id: i64, params: ListingParams) -> Result<Batch<Review>> {
        let mut sql = String::from(SELECT_REVIEW);
        sql.push_str(" WHERE r.author_id = ? GROUP BY r.id");
        sql.push_str(&self.order_clause(&params)?);
        let rows = sqlx::query_as::<_, Review>(&sql)
            .bind(author_id)
            .bind(params.limit)
            .bind(params.offset)
            .fetch_all(&self.executor)
            .await?;
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM review WHERE author_id = ?")
            .bind(author_id)
            .fetch_one(&self.executor)
            .await?;
        Ok(Batch {
            offset: params.offset,
            total: total as u64,
            rows,
        })
    }

    pub async fn count(&self, filter: Option<&str>) -> Result<u64> {
        let count: i64 = match filter {
            Some(filter) => sqlx::query_scalar(
                "SELECT COUNT(*) FROM review WHERE caption LIKE '%' || ?1 || '%' OR comment LIKE '%' || ?1 || '%'",
            )
            .bind(filter)
            .fetch_one(&self.executor)
            .await?,
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM review")
                    .fetch_one(&self.executor)
                    .await?
            }
        };
        Ok(count as u64)
    }

    // Most recent first unless the caller asks otherwise.
    fn order_clause(&self, params: &ListingParams) -> Result<String> {
        let ordering = params.ordering(REVIEW_ORDER_FIELDS)?;
        let order_clause = if ordering.is_empty() {
            "r.created DESC, r.id DESC".to_string()
        } else {
            ordering
        };
        Ok(format!(" ORDER BY {order_clause} LIMIT ? OFFSET ?"))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM review WHERE id = ?")
            .bind(id)
            .execute(&self.executor)
            .await?;

        if res.rows_affected() == 0 {
            Err(Error::RecordNotFound("Review".to_string()))
        } else {
            Ok(())
        }
    }
}
