// region:    --- Imports
use crate::auction::commands::{self as auction_commands, CommentForm, NewListingForm};
use crate::auction::model::User;
use crate::bidding::commands::{submit_bid, PlaceBidForm};
use crate::config::Policy;
use crate::error::AppError;
use crate::query;
use crate::store::EntityStore;
use crate::users::{self, RegisterForm};
use async_trait::async_trait;
use axum::extract::{FromRequestParts, Path, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

// region:    --- State
/// 핸들러 공유 상태
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntityStore>,
    pub policy: Policy,
}

impl AppState {
    pub fn new(store: Arc<dyn EntityStore>, policy: Policy) -> Self {
        Self { store, policy }
    }
}

/// 요청 헤더로 전달되는 사용자 식별자
pub const USER_HEADER: &str = "x-user-id";

/// 요청을 수행하는 사용자 (인증 서비스가 x-user-id 헤더로 전달)
pub struct ActingUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for ActingUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i64>().ok())
            .ok_or(AppError::Unauthenticated)?;

        let user = state
            .store
            .get_user(user_id)
            .await?
            .ok_or(AppError::Unauthenticated)?;
        Ok(ActingUser(user))
    }
}
// endregion: --- State

// region:    --- Command Handlers

/// 입찰 요청 처리
pub async fn handle_bid(
    State(state): State<AppState>,
    ActingUser(bidder): ActingUser,
    Path((listing_id, _url)): Path<(i64, String)>,
    Json(form): Json<PlaceBidForm>,
) -> Result<Redirect, AppError> {
    info!("{:<12} --> 입찰 요청 id: {}", "HandlerCmd", listing_id);
    let receipt = submit_bid(
        state.store.as_ref(),
        &state.policy,
        listing_id,
        &bidder,
        &form.amount,
    )
    .await?;
    Ok(Redirect::to(&receipt.listing.path()))
}

/// 경매 종료 요청 처리
pub async fn handle_close_auction(
    State(state): State<AppState>,
    ActingUser(closer): ActingUser,
    Path((listing_id, _url)): Path<(i64, String)>,
) -> Result<Redirect, AppError> {
    info!("{:<12} --> 경매 종료 요청 id: {}", "HandlerCmd", listing_id);
    let listing =
        auction_commands::close_auction(state.store.as_ref(), &state.policy, listing_id, &closer)
            .await?;
    Ok(Redirect::to(&listing.path()))
}

/// 관심 목록 토글 요청 처리
pub async fn handle_toggle_watchlist(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path((listing_id, _url)): Path<(i64, String)>,
) -> Result<Redirect, AppError> {
    info!("{:<12} --> 관심 목록 토글 id: {}", "HandlerCmd", listing_id);
    let toggle =
        auction_commands::toggle_watchlist(state.store.as_ref(), &user, listing_id).await?;
    Ok(Redirect::to(&toggle.listing.path()))
}

/// 댓글 작성 요청 처리
pub async fn handle_comment(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path((listing_id, _url)): Path<(i64, String)>,
    Json(form): Json<CommentForm>,
) -> Result<Redirect, AppError> {
    info!("{:<12} --> 댓글 작성 id: {}", "HandlerCmd", listing_id);
    let (listing, _) = auction_commands::post_comment(
        state.store.as_ref(),
        &state.policy,
        &user,
        listing_id,
        form.comment,
    )
    .await?;
    Ok(Redirect::to(&listing.path()))
}

/// 상품 등록 요청 처리
pub async fn handle_new_listing(
    State(state): State<AppState>,
    ActingUser(author): ActingUser,
    Json(form): Json<NewListingForm>,
) -> Result<Redirect, AppError> {
    info!("{:<12} --> 상품 등록 요청", "HandlerCmd");
    auction_commands::create_listing(state.store.as_ref(), &author, form).await?;
    Ok(Redirect::to("/"))
}

/// 회원가입 요청 처리
pub async fn handle_register(
    State(state): State<AppState>,
    Json(form): Json<RegisterForm>,
) -> Result<Response, AppError> {
    info!("{:<12} --> 회원가입 요청: {}", "HandlerCmd", form.username);
    let user = users::register_user(state.store.as_ref(), form).await?;
    Ok((StatusCode::CREATED, Json(user)).into_response())
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 진행 중인 상품 조회
pub async fn handle_index(State(state): State<AppState>) -> Result<Response, AppError> {
    let page = query::handlers::active_listings(state.store.as_ref()).await?;
    Ok(Json(page).into_response())
}

/// 관심 목록 조회
pub async fn handle_watchlist(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
) -> Result<Response, AppError> {
    let page = query::handlers::watchlist_listings(state.store.as_ref(), &user).await?;
    Ok(Json(page).into_response())
}

/// 카테고리 목록 조회
pub async fn handle_categories() -> impl IntoResponse {
    Json(query::handlers::categories())
}

/// 카테고리별 상품 조회
pub async fn handle_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Response, AppError> {
    let page = query::handlers::category_listings(state.store.as_ref(), &category).await?;
    Ok(Json(page).into_response())
}

/// 상품 상세 조회
pub async fn handle_listing(
    State(state): State<AppState>,
    viewer: Option<ActingUser>,
    Path((listing_id, _url)): Path<(i64, String)>,
) -> Result<Response, AppError> {
    info!("{:<12} --> 상품 조회 id: {}", "HandlerQuery", listing_id);
    let viewer = viewer.map(|ActingUser(user)| user);
    let detail =
        query::handlers::listing_detail(state.store.as_ref(), listing_id, viewer.as_ref()).await?;
    Ok(Json(detail).into_response())
}

// endregion: --- Query Handlers
