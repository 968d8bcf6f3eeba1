use argon2::{
    password_hash::{rand_core::OsRng, Result as HashResult, SaltString},
    Argon2, PasswordHasher,
};
use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::Pool;

use crate::{error::Result, Batch, Error, ListingParams};

fn hash_password(password: &str) -> HashResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)?
        .to_string();
    Ok(password_hash)
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct CreateUser {
    #[garde(length(min = 1, max = 150))]
    pub username: String,
    #[garde(length(min = 8, max = 255))]
    pub password: Option<String>,
    #[garde(length(max = 150))]
    pub first_name: String,
    #[garde(length(max = 150))]
    pub last_name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub reviews_amount: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct UserShort {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

const SELECT_USER: &str = r#"
SELECT u.id, u.username, u.first_name, u.last_name,
    (SELECT COUNT(*) FROM review WHERE author_id = u.id) AS reviews_amount
FROM users u
"#;

pub type UserRepository = UserRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct UserRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> UserRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn create(&self, payload: CreateUser) -> Result<User> {
        let password = payload.password.map(|p| hash_password(&p)).transpose()?;
        let result = sqlx::query(
            "INSERT INTO users (username, password, first_name, last_name) VALUES (?, ?, ?, ?)",
        )
        .bind(&payload.username)
        .bind(&password)
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .execute(&self.executor)
        .await?;

        self.get(result.last_insert_rowid()).await
    }

    pub async fn list(&self, params: ListingParams) -> Result<Batch<User>> {
        let ordering = params.ordering(&["first_name", "last_name", "username", "id"])?;
        let order_clause = if ordering.is_empty() {
            "u.first_name, u.last_name".to_string()
        } else {
            ordering
        };
        let mut sql = String::from(SELECT_USER);
        if params.filter.is_some() {
            sql.push_str(
                " WHERE u.first_name LIKE '%' || ?1 || '%' OR u.last_name LIKE '%' || ?1 || '%'",
            );
        }
        sql.push_str(&format!(" ORDER BY {order_clause} LIMIT ? OFFSET ?"));

        let mut query = sqlx::query_as::<_, User>(&sql);
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
            Some(filter) => sqlx::query_scalar(
                "SELECT COUNT(*) FROM users WHERE first_name LIKE '%' || ?1 || '%' OR last_name LIKE '%' || ?1 || '%'",
            )
            .bind(filter)
            .fetch_one(&self.executor)
            .await?,
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM users")
                    .fetch_one(&self.executor)
                    .await?
            }
        };
        Ok(count as u64)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.executor)
            .await?;

        if res.rows_affected() == 0 {
            Err(Error::RecordNotFound("User".to_string()))
        } else {
            Ok(())
        }
    }

    pub async fn get(&self, id: i64) -> Result<User> {
        let sql = format!("{SELECT_USER} WHERE u.id = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_one(&self.executor)
            .await?;
        Ok(user)
    }
}
