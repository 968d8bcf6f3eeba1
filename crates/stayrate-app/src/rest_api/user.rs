use crate::{
    error::ApiResult,
    repository_from_request,
    rest_api::{Page, Paging},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json,
};
use axum_valid::Garde;
use http::StatusCode;
use serde::Serialize;
use stayrate_dal::{
    reaction::{ReactionKind, ReactionRepository},
    review::{Review, ReviewRepository, ReviewShort},
    user::{CreateUser, User, UserRepository},
    ListingParams,
};

repository_from_request!(UserRepository);

pub async fn create_user(
    user_registry: UserRepository,
    Garde(Json(payload)): Garde<Json<CreateUser>>,
) -> ApiResult<impl IntoResponse> {
    let user = user_registry.create(payload).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_users(
    user_registry: UserRepository,
    State(state): State<AppState>,
    Garde(Query(paging)): Garde<Query<Paging>>,
) -> ApiResult<impl IntoResponse> {
    let default_page_size: u32 = state.config().default_page_size;
    let page_size = paging.page_size(default_page_size);
    let listing_params = paging.into_listing_params(default_page_size)?;
    let batch = user_registry.list(listing_params).await?;
    Ok((StatusCode::OK, Json(Page::from_batch(batch, page_size))))
}

#[derive(Debug, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub reviews: Vec<Review>,
    pub liked: Vec<ReviewShort>,
    pub disliked: Vec<ReviewShort>,
}

/// Profile with authored reviews and the reviews the user reacted to,
/// partitioned by reaction kind.
pub async fn get_user(
    Path(id): Path<i64>,
    user_registry: UserRepository,
    reviews: ReviewRepository,
    reactions: ReactionRepository,
) -> ApiResult<impl IntoResponse> {
    let user = user_registry.get(id).await?;
    let authored = reviews.list_by_author(id, ListingParams::default()).await?;
    let liked = reactions.list_reacted(id, ReactionKind::Like).await?;
    let disliked = reactions.list_reacted(id, ReactionKind::Dislike).await?;

    Ok((
        StatusCode::OK,
        Json(UserDetail {
            user,
            reviews: authored.rows,
            liked,
            disliked,
        }),
    ))
}

pub async fn delete_user(
    Path(id): Path<i64>,
    user_registry: UserRepository,
) -> ApiResult<impl IntoResponse> {
    user_registry.delete(id).await?;

    Ok((StatusCode::NO_CONTENT, ()))
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/{id}", get(get_user).delete(delete_user))
}
