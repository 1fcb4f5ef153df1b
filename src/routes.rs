// region:    --- Imports
use crate::handlers::{self, AppState};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

// endregion: --- Imports

/// 라우터 설정
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::handle_index))
        .route("/watchlist", get(handlers::handle_watchlist))
        .route("/categories", get(handlers::handle_categories))
        .route("/categories/:category", get(handlers::handle_category))
        .route("/register", post(handlers::handle_register))
        .route("/new-listing", post(handlers::handle_new_listing))
        .route("/listing/:id/:url", get(handlers::handle_listing))
        .route("/listing/:id/:url/bid", post(handlers::handle_bid))
        .route(
            "/listing/:id/:url/watchlist",
            post(handlers::handle_toggle_watchlist),
        )
        .route(
            "/listing/:id/:url/close",
            post(handlers::handle_close_auction),
        )
        .route("/comment/:id/:url", post(handlers::handle_comment))
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .with_state(state)
}
