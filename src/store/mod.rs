/// 엔티티 저장소
/// 1. 사용자 / 상품 / 입찰 / 댓글 생성, 조회, 필터, 저장
/// 2. 관심 목록(watchlist) 관계 관리
// region:    --- Imports
use crate::auction::model::{
    Bid, Category, Comment, Listing, NewBid, NewComment, NewListing, NewUser, User,
};
use crate::money::Money;
use async_trait::async_trait;
use thiserror::Error;

// endregion: --- Imports

// region:    --- Modules
pub mod memory;
pub mod postgres;
pub mod queries;

pub use memory::MemoryEntityStore;
pub use postgres::PostgresEntityStore;
// endregion: --- Modules

// region:    --- Types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already taken: {0}")]
    DuplicateIdentity(String),
    #[error("listing {0} does not exist")]
    MissingListing(i64),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// 상품 필터 조건
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingFilter {
    All,
    Active,
    Category(Category),
    WatchedBy(i64),
}

/// 입찰 저장 결과
#[derive(Debug, Clone, PartialEq)]
pub enum BidInsert {
    Created(Bid),
    /// 저장 직전 재확인한 최저가보다 높지 않아 저장하지 않음
    Outbid { floor: Money },
    /// 종료된 경매라 저장하지 않음
    Closed,
}

/// 경매 종료 결과
#[derive(Debug, Clone, PartialEq)]
pub enum ListingClose {
    /// was_active 가 false 면 이미 종료된 경매를 다시 종료한 것
    Closed { listing: Listing, was_active: bool },
    AlreadyClosed,
}
// endregion: --- Types

// region:    --- Entity Store Trait
/// 엔티티 저장소 트레이트
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn create_user(&self, new: NewUser) -> StoreResult<User>;
    async fn get_user(&self, user_id: i64) -> StoreResult<Option<User>>;

    async fn create_listing(&self, new: NewListing) -> StoreResult<Listing>;
    async fn get_listing(&self, listing_id: i64) -> StoreResult<Option<Listing>>;
    async fn filter_listings(&self, filter: ListingFilter) -> StoreResult<Vec<Listing>>;
    async fn save_listing(&self, listing: &Listing) -> StoreResult<()>;

    /// 생성 순서대로 정렬된 입찰 이력
    async fn bids_for(&self, listing_id: i64) -> StoreResult<Vec<Bid>>;
    /// 종료 여부와 최저가를 원자적으로 재확인한 뒤 입찰 저장
    async fn create_bid(&self, new: NewBid, reject_when_closed: bool) -> StoreResult<BidInsert>;
    /// 입찰 저장과 같은 잠금 아래에서 낙찰자 결정 후 종료
    /// 입찰이 있으면 가장 최근 입찰자, 없으면 closer_id
    async fn close_listing(
        &self,
        listing_id: i64,
        closer_id: i64,
        reject_reclose: bool,
    ) -> StoreResult<ListingClose>;

    async fn comments_for(&self, listing_id: i64) -> StoreResult<Vec<Comment>>;
    async fn create_comment(&self, new: NewComment) -> StoreResult<Comment>;

    async fn is_watching(&self, user_id: i64, listing_id: i64) -> StoreResult<bool>;
    async fn add_to_watchlist(&self, user_id: i64, listing_id: i64) -> StoreResult<()>;
    async fn remove_from_watchlist(&self, user_id: i64, listing_id: i64) -> StoreResult<()>;
}
// endregion: --- Entity Store Trait
