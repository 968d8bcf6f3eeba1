use axum::response::{IntoResponse, Response};
use http::StatusCode;
use stayrate_dal::Error as DalError;

pub type ApiResult<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Missing or invalid user identity")]
    Unauthorized,

    #[error(transparent)]
    Dal(#[from] DalError),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Dal(DalError::RecordNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Dal(DalError::DatabaseError(stayrate_dal::SqlxError::RowNotFound)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Dal(DalError::OwnReviewReaction) => StatusCode::BAD_REQUEST,
            ApiError::Dal(DalError::InvalidOrderByField(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {self}");
        }
        (status, self.to_string()).into_response()
    }
}
