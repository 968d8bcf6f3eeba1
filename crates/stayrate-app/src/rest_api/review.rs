use crate::{
    actor::Actor,
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
use garde::Validate;
use http::StatusCode;
use stayrate_dal::reaction::{ReactionKind, ReactionRepository};
use stayrate_dal::review::{CreateReview, ReviewRepository};

repository_from_request!(ReviewRepository);
repository_from_request!(ReactionRepository);

pub async fn list_reviews(
    repository: ReviewRepository,
    State(state): State<AppState>,
    Garde(Query(paging)): Garde<Query<Paging>>,
) -> ApiResult<impl IntoResponse> {
    let default_page_size: u32 = state.config().default_page_size;
    let page_size = paging.page_size(default_page_size);
    let listing_params = paging.into_listing_params(default_page_size)?;
    let batch = repository.list(listing_params).await?;
    Ok((StatusCode::OK, Json(Page::from_batch(batch, page_size))))
}

pub async fn get_review(
    Path(id): Path<i64>,
    repository: ReviewRepository,
) -> ApiResult<impl IntoResponse> {
    let record = repository.get(id).await?;

    Ok((StatusCode::OK, Json(record)))
}

pub async fn create_review(
    Path(hotel_id): Path<i64>,
    repository: ReviewRepository,
    actor: Actor,
    Garde(Json(payload)): Garde<Json<CreateReview>>,
) -> ApiResult<impl IntoResponse> {
    let record = repository.create(actor.0, hotel_id, payload).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_review(
    Path(id): Path<i64>,
    repository: ReviewRepository,
    Garde(Json(payload)): Garde<Json<CreateReview>>,
) -> ApiResult<impl IntoResponse> {
    let record = repository.update(id, payload).await?;

    Ok((StatusCode::OK, Json(record)))
}

pub async fn delete_review(
    Path(id): Path<i64>,
    repository: ReviewRepository,
) -> ApiResult<impl IntoResponse> {
    repository.delete(id).await?;

    Ok((StatusCode::NO_CONTENT, ()))
}

#[derive(Debug, serde::Deserialize, Validate)]
#[garde(allow_unvalidated)]
pub struct RateRequest {
    pub reaction: ReactionKind,
}

/// Toggles the actor's reaction and returns the review with fresh counts.
pub async fn rate_review(
    Path(id): Path<i64>,
    reactions: ReactionRepository,
    repository: ReviewRepository,
    actor: Actor,
    Garde(Json(payload)): Garde<Json<RateRequest>>,
) -> ApiResult<impl IntoResponse> {
    reactions.set_reaction(id, actor.0, payload.reaction).await?;
    let record = repository.get(id).await?;

    Ok((StatusCode::OK, Json(record)))
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(list_reviews))
        .route("/hotel/{hotel_id}", post(create_review))
        .route(
            "/{id}",
            get(get_review).put(update_review).delete(delete_review),
        )
        .route("/{id}/rate", post(rate_review))
}
