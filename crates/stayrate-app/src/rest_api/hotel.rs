use crate::crud_api;
use stayrate_dal::hotel::{CreateHotel, HotelRepository};

use crate::state::AppState;
#[allow(unused_imports)]
use axum::routing::{delete, get, post, put};

crud_api!(HotelRepository, CreateHotel, CreateHotel);

mod extra_api {
    use axum::{
        extract::{Path, Query, State},
        response::IntoResponse,
        Json,
    };
    use axum_valid::Garde;
    use http::StatusCode;
    use stayrate_dal::review::ReviewRepository;

    use crate::{
        error::ApiResult,
        rest_api::{Page, Paging},
        state::AppState,
    };

    /// Reviews of one hotel, aggregated with reaction counts, newest first.
    pub async fn list_reviews(
        Path(hotel_id): Path<i64>,
        repository: ReviewRepository,
        State(state): State<AppState>,
        Garde(Query(paging)): Garde<Query<Paging>>,
    ) -> ApiResult<impl IntoResponse> {
        let default_page_size: u32 = state.config().default_page_size;
        let page_size = paging.page_size(default_page_size);
        let listing_params = paging.into_listing_params(default_page_size)?;
        let batch = repository.list_for_hotel(hotel_id, listing_params).await?;
        Ok((StatusCode::OK, Json(Page::from_batch(batch, page_size))))
    }
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", post(crud_api::create).get(crud_api::list))
        .route(
            "/{id}",
            get(crud_api::get)
                .put(crud_api::update)
                .delete(crud_api::delete),
        )
        .route("/{id}/reviews", get(extra_api::list_reviews))
}
