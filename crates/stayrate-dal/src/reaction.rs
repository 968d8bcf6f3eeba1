use crate::{error::Result, review::ReviewShort, Error};
use serde::{Deserialize, Serialize};
use sqlx::Pool;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

/// One row per (user, review) pair; `kind` is NULL after a toggle-off.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Reaction {
    pub id: i64,
    pub user_id: i64,
    pub review_id: i64,
    pub kind: Option<ReactionKind>,
}

pub type ReactionRepository = ReactionRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct ReactionRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> ReactionRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Toggles the user's reaction to a review. Repeating the current kind
    /// clears it, anything else overwrites it. Authors cannot react to their
    /// own reviews.
    ///
    /// No locking here: a concurrent insert for the same pair trips the
    /// unique constraint and surfaces as a database error.
    pub async fn set_reaction(
        &self,
        review_id: i64,
        user_id: i64,
        desired: ReactionKind,
    ) -> Result<Reaction> {
        let author_id: Option<i64> = sqlx::query_scalar("SELECT author_id FROM review WHERE id = ?")
            .bind(review_id)
            .fetch_optional(&self.executor)
            .await?;
        let author_id = author_id.ok_or_else(|| Error::RecordNotFound("Review".to_string()))?;
        if author_id == user_id {
            debug!("User {user_id} tried to react to own review {review_id}");
            return Err(Error::OwnReviewReaction);
        }

        let existing: Option<Reaction> = sqlx::query_as(
            "SELECT id, user_id, review_id, kind FROM reaction WHERE user_id = ? AND review_id = ?",
        )
        .bind(user_id)
        .bind(review_id)
        .fetch_optional(&self.executor)
        .await?;

        match existing {
            Some(reaction) => {
                let next = if reaction.kind == Some(desired) {
                    None
                } else {
                    Some(desired)
                };
                sqlx::query("UPDATE reaction SET kind = ? WHERE id = ?")
                    .bind(next)
                    .bind(reaction.id)
                    .execute(&self.executor)
                    .await?;
                self.get(reaction.id).await
            }
            None => {
                let result =
                    sqlx::query("INSERT INTO reaction (user_id, review_id, kind) VALUES (?, ?, ?)")
                        .bind(user_id)
                        .bind(review_id)
                        .bind(desired)
                        .execute(&self.executor)
                        .await?;
                self.get(result.last_insert_rowid()).await
            }
        }
    }

    pub async fn get(&self, id: i64) -> Result<Reaction> {
        let record = sqlx::query_as::<_, Reaction>(
            "SELECT id, user_id, review_id, kind FROM reaction WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&self.executor)
        .await?;
        Ok(record)
    }

    /// Reviews the user currently reacts to with the given kind.
    pub async fn list_reacted(&self, user_id: i64, kind: ReactionKind) -> Result<Vec<ReviewShort>> {
        let records = sqlx::query_as::<_, ReviewShort>(
            r#"
            SELECT r.id, r.caption, r.hotel_id
            FROM review r
            JOIN reaction x ON x.review_id = r.id
            WHERE x.user_id = ? AND x.kind = ?
            ORDER BY r.created DESC, r.id DESC
            "#,
        )
        .bind(user_id)
        .bind(kind)
        .fetch_all(&self.executor)
        .await?;
        Ok(records)
    }
}
