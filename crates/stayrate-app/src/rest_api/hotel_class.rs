use crate::crud_api;
use stayrate_dal::hotel_class::{CreateHotelClass, HotelClassRepository};

use crate::state::AppState;
#[allow(unused_imports)]
use axum::routing::{delete, get, post, put};

crud_api!(HotelClassRepository, CreateHotelClass, CreateHotelClass);

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", post(crud_api::create).get(crud_api::list))
        .route(
            "/{id}",
            get(crud_api::get)
                .put(crud_api::update)
                .delete(crud_api::delete),
        )
}
