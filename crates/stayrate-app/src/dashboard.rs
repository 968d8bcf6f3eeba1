use axum::{response::IntoResponse, Json};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use stayrate_dal::{hotel::HotelRepository, review::ReviewRepository, user::UserRepository};
use tower_sessions::Session;

use crate::error::ApiResult;

const VISITS_KEY: &str = "stayrate_visits";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
struct VisitCounter {
    count: u32,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub num_users: u64,
    pub num_hotels: u64,
    pub num_reviews: u64,
    pub num_visits: u32,
}

/// Entity counts plus a per-session visit counter.
pub async fn dashboard(
    session: Session,
    users: UserRepository,
    hotels: HotelRepository,
    reviews: ReviewRepository,
) -> ApiResult<impl IntoResponse> {
    let mut counter: VisitCounter = session.get(VISITS_KEY).await?.unwrap_or_default();
    counter.count += 1;
    session.insert(VISITS_KEY, counter).await?;

    let stats = DashboardStats {
        num_users: users.count(None).await?,
        num_hotels: hotels.count(None).await?,
        num_reviews: reviews.count(None).await?,
        num_visits: counter.count,
    };

    Ok((StatusCode::OK, Json(stats)))
}
