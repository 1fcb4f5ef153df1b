// region:    --- Imports
use crate::auction::model::{Bid, Category, Comment, Listing, User};
use crate::bidding::validator;
use crate::error::{AppError, AppResult};
use crate::money::Money;
use crate::store::{EntityStore, ListingFilter};
use serde::Serialize;
use tracing::info;

// endregion: --- Imports

// region:    --- Views
/// 상품 목록 화면
#[derive(Debug, Serialize)]
pub struct ListingPage {
    pub title: String,
    pub listings: Vec<Listing>,
}

/// 카테고리 항목
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CategoryEntry {
    pub code: &'static str,
    pub label: &'static str,
    pub path: String,
}

/// 상품 상세 화면
#[derive(Debug, Serialize)]
pub struct ListingDetail {
    pub listing: Listing,
    pub slug: String,
    pub bids: Vec<Bid>,
    pub comments: Vec<Comment>,
    pub current_floor: Money,
    pub current_floor_display: String,
    /// 로그인한 사용자에게만 표시
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watching: Option<bool>,
}
// endregion: --- Views

// region:    --- Query Handlers

/// 진행 중인 상품 조회
pub async fn active_listings(store: &dyn EntityStore) -> AppResult<ListingPage> {
    info!("{:<12} --> 진행 중인 상품 조회", "Query");
    Ok(ListingPage {
        title: "Active Listings".to_string(),
        listings: store.filter_listings(ListingFilter::Active).await?,
    })
}

/// 관심 목록 조회
pub async fn watchlist_listings(store: &dyn EntityStore, user: &User) -> AppResult<ListingPage> {
    info!("{:<12} --> 관심 목록 조회 user: {}", "Query", user.id);
    Ok(ListingPage {
        title: "Watchlist".to_string(),
        listings: store
            .filter_listings(ListingFilter::WatchedBy(user.id))
            .await?,
    })
}

/// 카테고리 목록
pub fn categories() -> Vec<CategoryEntry> {
    Category::ALL
        .iter()
        .map(|category| CategoryEntry {
            code: category.code(),
            label: category.label(),
            path: format!("/categories/{}", category.label().replace(' ', "-")),
        })
        .collect()
}

/// 카테고리별 상품 조회 (알 수 없는 카테고리는 빈 목록)
pub async fn category_listings(store: &dyn EntityStore, segment: &str) -> AppResult<ListingPage> {
    info!("{:<12} --> 카테고리 상품 조회: {}", "Query", segment);
    let listings = match Category::resolve(segment) {
        Some(category) => {
            store
                .filter_listings(ListingFilter::Category(category))
                .await?
        }
        None => Vec::new(),
    };
    Ok(ListingPage {
        title: segment.replace('-', " "),
        listings,
    })
}

/// 상품 상세 조회
pub async fn listing_detail(
    store: &dyn EntityStore,
    listing_id: i64,
    viewer: Option<&User>,
) -> AppResult<ListingDetail> {
    info!("{:<12} --> 상품 조회 id: {}", "Query", listing_id);
    let listing = store
        .get_listing(listing_id)
        .await?
        .ok_or_else(|| AppError::listing_not_found(listing_id))?;

    let bids = store.bids_for(listing_id).await?;
    let comments = store.comments_for(listing_id).await?;
    let current_floor = validator::floor(listing.start_bid, &bids);

    let watching = match viewer {
        Some(user) => Some(store.is_watching(user.id, listing_id).await?),
        None => None,
    };

    Ok(ListingDetail {
        slug: listing.slug(),
        listing,
        bids,
        comments,
        current_floor,
        current_floor_display: current_floor.to_usd(),
        watching,
    })
}

// endregion: --- Query Handlers

// endregion: --- Tests
