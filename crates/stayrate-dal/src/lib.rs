pub mod error;
pub mod hotel;
pub mod hotel_class;
pub mod reaction;
pub mod review;
pub mod user;

use std::fmt::Display;
use std::str::FromStr;

pub use error::Error;
use serde::Serialize;
pub use sqlx::Error as SqlxError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::Result;

pub type ChosenDB = sqlx::Sqlite;
pub type ChosenRow = sqlx::sqlite::SqliteRow;
pub type Pool = sqlx::Pool<ChosenDB>;

pub const MAX_LIMIT: usize = 10_000;

pub async fn new_pool(database_url: &str) -> Result<Pool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(50)
        .connect_with(options)
        .await?;
    Ok(pool)
}

pub async fn migrate(pool: &Pool) -> Result<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

#[derive(Debug, Clone)]
pub enum Order {
    Asc(String),
    Desc(String),
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Order::Asc(s) => write!(f, "{}", s),
            Order::Desc(s) => write!(f, "{} DESC", s),
        }
    }
}

impl AsRef<str> for Order {
    fn as_ref(&self) -> &str {
        match self {
            Order::Asc(s) => s.as_str(),
            Order::Desc(s) => s.as_str(),
        }
    }
}

pub struct ListingParams {
    pub offset: i64,
    pub limit: i64,
    pub order: Option<Vec<Order>>,
    pub filter: Option<String>,
}

impl Default for ListingParams {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: MAX_LIMIT as i64,
            order: None,
            filter: None,
        }
    }
}

impl ListingParams {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            offset,
            limit,
            order: None,
            filter: None,
        }
    }

    pub fn with_order(mut self, order: Vec<Order>) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn ordering(&self, valid_fields: &[&str]) -> Result<String> {
        let ordering = self
            .order
            .as_ref()
            .map(|o| {
                o.iter()
                    .map(|o| {
                        if valid_fields.contains(&o.as_ref()) {
                            Ok(o.to_string())
                        } else {
                            Err(Error::InvalidOrderByField(o.as_ref().to_string()))
                        }
                    })
                    .collect::<Result<Vec<String>>>()
                    .map(|o| o.join(", "))
            })
            .transpose()?
            .unwrap_or_default();
        Ok(ordering)
    }
}

#[derive(Debug, Serialize)]
pub struct Batch<T> {
    pub offset: i64,
    pub total: u64,
    pub rows: Vec<T>,
}
