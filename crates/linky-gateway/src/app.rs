use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_link_handler, delete_link_handler, get_link_handler, health_handler,
    list_links_handler, redirect_handler, unlock_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .nest(
                "/api",
                Router::new()
                    .route("/create", post(create_link_handler))
                    .route("/links", get(list_links_handler))
                    .route(
                        "/links/{slug}",
                        get(get_link_handler).delete(delete_link_handler),
                    ),
            )
            .route("/{slug}", get(redirect_handler).post(unlock_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
