// region:    --- Imports
use super::queries;
use super::{BidInsert, EntityStore, ListingClose, ListingFilter, StoreError, StoreResult};
use crate::auction::model::{
    Bid, Category, Comment, Listing, NewBid, NewComment, NewListing, NewUser, User,
};
use crate::database::DatabaseManager;
use crate::money::Money;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

// endregion: --- Imports

// region:    --- Rows
/// listings 테이블 행
#[derive(sqlx::FromRow)]
struct ListingRow {
    id: i64,
    title: String,
    description: String,
    start_bid: Money,
    image: Option<String>,
    category: String,
    active: bool,
    created_at: DateTime<Utc>,
    author_id: i64,
    winner_id: Option<i64>,
}

impl From<ListingRow> for Listing {
    fn from(row: ListingRow) -> Self {
        Listing {
            id: row.id,
            title: row.title,
            description: row.description,
            start_bid: row.start_bid,
            image: row.image,
            category: Category::from_code(&row.category),
            active: row.active,
            created_at: row.created_at,
            author_id: row.author_id,
            winner_id: row.winner_id,
        }
    }
}

fn category_code(category: Option<Category>) -> &'static str {
    category.map(|c| c.code()).unwrap_or("")
}
// endregion: --- Rows

// region:    --- Postgres Entity Store
/// PostgreSQL 기반 엔티티 저장소
pub struct PostgresEntityStore {
    db_manager: Arc<DatabaseManager>,
}

impl PostgresEntityStore {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        Self { db_manager }
    }
}

#[async_trait]
impl EntityStore for PostgresEntityStore {
    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        debug!("{:<12} --> 사용자 생성: {}", "Store", new.username);
        sqlx::query_as::<_, User>(queries::INSERT_USER)
            .bind(&new.username)
            .bind(&new.email)
            .fetch_one(self.db_manager.pool())
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    StoreError::DuplicateIdentity(new.username.clone())
                }
                other => StoreError::Database(other),
            })
    }

    async fn get_user(&self, user_id: i64) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(queries::GET_USER)
            .bind(user_id)
            .fetch_optional(self.db_manager.pool())
            .await?;
        Ok(user)
    }

    async fn create_listing(&self, new: NewListing) -> StoreResult<Listing> {
        debug!("{:<12} --> 상품 생성: {}", "Store", new.title);
        let row = sqlx::query_as::<_, ListingRow>(queries::INSERT_LISTING)
            .bind(&new.title)
            .bind(&new.description)
            .bind(new.start_bid)
            .bind(&new.image)
            .bind(category_code(new.category))
            .bind(new.author_id)
            .fetch_one(self.db_manager.pool())
            .await?;
        Ok(row.into())
    }

    async fn get_listing(&self, listing_id: i64) -> StoreResult<Option<Listing>> {
        let row = sqlx::query_as::<_, ListingRow>(queries::GET_LISTING)
            .bind(listing_id)
            .fetch_optional(self.db_manager.pool())
            .await?;
        Ok(row.map(Listing::from))
    }

    async fn filter_listings(&self, filter: ListingFilter) -> StoreResult<Vec<Listing>> {
        let pool = self.db_manager.pool();
        let rows = match filter {
            ListingFilter::All => {
                sqlx::query_as::<_, ListingRow>(queries::GET_ALL_LISTINGS)
                    .fetch_all(pool)
                    .await?
            }
            ListingFilter::Active => {
                sqlx::query_as::<_, ListingRow>(queries::GET_ACTIVE_LISTINGS)
                    .fetch_all(pool)
                    .await?
            }
            ListingFilter::Category(category) => {
                sqlx::query_as::<_, ListingRow>(queries::GET_CATEGORY_LISTINGS)
                    .bind(category.code())
                    .fetch_all(pool)
                    .await?
            }
            ListingFilter::WatchedBy(user_id) => {
                sqlx::query_as::<_, ListingRow>(queries::GET_WATCHED_LISTINGS)
                    .bind(user_id)
                    .fetch_all(pool)
                    .await?
            }
        };
        Ok(rows.into_iter().map(Listing::from).collect())
    }

    async fn save_listing(&self, listing: &Listing) -> StoreResult<()> {
        debug!("{:<12} --> 상품 저장 id: {}", "Store", listing.id);
        let result = sqlx::query(queries::UPDATE_LISTING)
            .bind(listing.id)
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(&listing.image)
            .bind(category_code(listing.category))
            .bind(listing.active)
            .bind(listing.winner_id)
            .execute(self.db_manager.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::MissingListing(listing.id));
        }
        Ok(())
    }

    async fn bids_for(&self, listing_id: i64) -> StoreResult<Vec<Bid>> {
        let bids = sqlx::query_as::<_, Bid>(queries::GET_BID_HISTORY)
            .bind(listing_id)
            .fetch_all(self.db_manager.pool())
            .await?;
        Ok(bids)
    }

    async fn create_bid(&self, new: NewBid, reject_when_closed: bool) -> StoreResult<BidInsert> {
        self.db_manager
            .transaction::<_, BidInsert, StoreError>(move |tx| {
                Box::pin(async move {
                    // 같은 상품에 대한 입찰과 종료는 행 잠금으로 직렬화
                    let locked: Option<(Money, bool)> =
                        sqlx::query_as(queries::LOCK_LISTING_FOR_BID)
                            .bind(new.listing_id)
                            .fetch_optional(&mut **tx)
                            .await?;
                    let (start_bid, active) =
                        locked.ok_or(StoreError::MissingListing(new.listing_id))?;
                    if !active && reject_when_closed {
                        info!(
                            "{:<12} --> 입찰 실패: 종료된 경매 id: {}",
                            "Store", new.listing_id
                        );
                        return Ok(BidInsert::Closed);
                    }

                    let highest: Option<Money> = sqlx::query_scalar(queries::GET_HIGHEST_BID)
                        .bind(new.listing_id)
                        .fetch_one(&mut **tx)
                        .await?;
                    let floor = highest.unwrap_or(start_bid);

                    if new.amount <= floor {
                        info!(
                            "{:<12} --> 입찰 실패: 최저가 {} 이하 (요청 {})",
                            "Store", floor, new.amount
                        );
                        return Ok(BidInsert::Outbid { floor });
                    }

                    let bid = sqlx::query_as::<_, Bid>(queries::INSERT_BID)
                        .bind(new.listing_id)
                        .bind(new.bidder_id)
                        .bind(new.amount)
                        .fetch_one(&mut **tx)
                        .await?;
                    Ok(BidInsert::Created(bid))
                })
            })
            .await
    }

    async fn close_listing(
        &self,
        listing_id: i64,
        closer_id: i64,
        reject_reclose: bool,
    ) -> StoreResult<ListingClose> {
        self.db_manager
            .transaction::<_, ListingClose, StoreError>(move |tx| {
                Box::pin(async move {
                    let was_active: bool = sqlx::query_scalar(queries::LOCK_LISTING_FOR_CLOSE)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or(StoreError::MissingListing(listing_id))?;
                    if !was_active && reject_reclose {
                        return Ok(ListingClose::AlreadyClosed);
                    }

                    let last_bidder: Option<i64> = sqlx::query_scalar(queries::GET_LAST_BIDDER)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?;
                    let winner_id = last_bidder.unwrap_or(closer_id);

                    let row = sqlx::query_as::<_, ListingRow>(queries::CLOSE_LISTING)
                        .bind(listing_id)
                        .bind(winner_id)
                        .fetch_one(&mut **tx)
                        .await?;
                    debug!(
                        "{:<12} --> 경매 종료 저장 id: {}, winner: {}",
                        "Store", listing_id, winner_id
                    );
                    Ok(ListingClose::Closed {
                        listing: row.into(),
                        was_active,
                    })
                })
            })
            .await
    }

    async fn comments_for(&self, listing_id: i64) -> StoreResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(queries::GET_COMMENTS)
            .bind(listing_id)
            .fetch_all(self.db_manager.pool())
            .await?;
        Ok(comments)
    }

    async fn create_comment(&self, new: NewComment) -> StoreResult<Comment> {
        let comment = sqlx::query_as::<_, Comment>(queries::INSERT_COMMENT)
            .bind(new.listing_id)
            .bind(new.author_id)
            .bind(&new.body)
            .fetch_one(self.db_manager.pool())
            .await?;
        Ok(comment)
    }

    async fn is_watching(&self, user_id: i64, listing_id: i64) -> StoreResult<bool> {
        let watching: bool = sqlx::query_scalar(queries::IS_WATCHING)
            .bind(user_id)
            .bind(listing_id)
            .fetch_one(self.db_manager.pool())
            .await?;
        Ok(watching)
    }

    async fn add_to_watchlist(&self, user_id: i64, listing_id: i64) -> StoreResult<()> {
        sqlx::query(queries::ADD_WATCH)
            .bind(user_id)
            .bind(listing_id)
            .execute(self.db_manager.pool())
            .await?;
        Ok(())
    }

    async fn remove_from_watchlist(&self, user_id: i64, listing_id: i64) -> StoreResult<()> {
        sqlx::query(queries::REMOVE_WATCH)
            .bind(user_id)
            .bind(listing_id)
            .execute(self.db_manager.pool())
            .await?;
        Ok(())
    }
}
// endregion: --- Postgres Entity Store

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    /// DATABASE_URL 이 있을 때만 PostgreSQL 저장소 생성
    async fn setup() -> Option<Arc<PostgresEntityStore>> {
        let config = Config::from_env().unwrap();
        let database_url = config.database_url.clone()?;
        let db_manager = DatabaseManager::new(&database_url, &config).await.unwrap();
        db_manager.initialize_database(false).await.unwrap();
        Some(Arc::new(PostgresEntityStore::new(Arc::new(db_manager))))
    }

    async fn seed(store: &PostgresEntityStore, prefix: &str) -> (User, Listing) {
        let username = format!("{}-{}", prefix, Utc::now().timestamp_micros());
        let user = store
            .create_user(NewUser {
                email: format!("{}@example.com", username),
                username,
            })
            .await
            .unwrap();
        let listing = store
            .create_listing(NewListing {
                title: "Widget".to_string(),
                description: "A widget".to_string(),
                start_bid: Money::from_cents(500),
                image: None,
                category: Some(Category::Electronics),
                author_id: user.id,
            })
            .await
            .unwrap();
        (user, listing)
    }

    fn new_bid(listing_id: i64, bidder_id: i64, cents: i64) -> NewBid {
        NewBid {
            listing_id,
            bidder_id,
            amount: Money::from_cents(cents),
        }
    }

    #[tokio::test]
    #[ignore = "DATABASE_URL 필요"]
    async fn concurrent_equal_bids_store_only_one() {
        let Some(store) = setup().await else { return };
        let (user, listing) = seed(&store, "pg-concurrent").await;

        let mut handles = vec![];
        for _ in 0..10 {
            let store = Arc::clone(&store);
            let (listing_id, bidder_id) = (listing.id, user.id);
            handles.push(tokio::spawn(async move {
                store
                    .create_bid(new_bid(listing_id, bidder_id, 900), true)
                    .await
                    .unwrap()
            }));
        }

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                BidInsert::Created(_) => created += 1,
                other => assert_eq!(
                    other,
                    BidInsert::Outbid {
                        floor: Money::from_cents(900)
                    }
                ),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(store.bids_for(listing.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    #[ignore = "DATABASE_URL 필요"]
    async fn close_then_bid_is_rejected() {
        let Some(store) = setup().await else { return };
        let (user, listing) = seed(&store, "pg-close").await;

        store
            .create_bid(new_bid(listing.id, user.id, 700), true)
            .await
            .unwrap();
        let closed = store.close_listing(listing.id, user.id, false).await.unwrap();
        assert!(matches!(
            closed,
            ListingClose::Closed { ref listing, was_active: true }
                if !listing.active && listing.winner_id == Some(user.id)
        ));
        assert_eq!(
            store.close_listing(listing.id, user.id, true).await.unwrap(),
            ListingClose::AlreadyClosed
        );

        let late = store
            .create_bid(new_bid(listing.id, user.id, 10_000), true)
            .await
            .unwrap();
        assert_eq!(late, BidInsert::Closed);
        assert_eq!(store.bids_for(listing.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    #[ignore = "DATABASE_URL 필요"]
    async fn save_missing_listing_fails() {
        let Some(store) = setup().await else { return };
        let (_, mut listing) = seed(&store, "pg-missing").await;

        listing.id = -1;
        let result = store.save_listing(&listing).await;
        assert!(matches!(result, Err(StoreError::MissingListing(-1))));
    }
}
// endregion: --- Tests
