use axum::extract::FromRequestParts;
use http::request::Parts;

use crate::{error::ApiError, state::AppState};

pub const USER_ID_HEADER: &str = "x-user-id";

/// Identity of the requesting user, as established by the fronting
/// authentication layer and passed down in the `x-user-id` header.
#[derive(Debug, Clone, Copy)]
pub struct Actor(pub i64);

impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<i64>().ok())
            .map(Actor)
            .ok_or(ApiError::Unauthorized)
    }
}
