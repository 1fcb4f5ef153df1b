// region:    --- Imports
use super::{BidInsert, EntityStore, ListingClose, ListingFilter, StoreError, StoreResult};
use crate::auction::model::{
    Bid, Comment, Listing, NewBid, NewComment, NewListing, NewUser, User,
};
use crate::bidding::validator;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use tokio::sync::Mutex;

// endregion: --- Imports

// region:    --- Memory Entity Store
#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    listings: BTreeMap<i64, Listing>,
    bids: BTreeMap<i64, Bid>,
    comments: BTreeMap<i64, Comment>,
    watchlist: HashSet<(i64, i64)>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn bids_for(&self, listing_id: i64) -> Vec<Bid> {
        self.bids
            .values()
            .filter(|bid| bid.listing_id == listing_id)
            .cloned()
            .collect()
    }
}

/// 메모리 기반 엔티티 저장소 (테스트 및 DATABASE_URL 미설정 시)
#[derive(Default)]
pub struct MemoryEntityStore {
    tables: Mutex<Tables>,
}

impl MemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryEntityStore {
    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.lock().await;
        if tables.users.values().any(|u| u.username == new.username) {
            return Err(StoreError::DuplicateIdentity(new.username));
        }
        let user = User {
            id: tables.next_id(),
            username: new.username,
            email: new.email,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: i64) -> StoreResult<Option<User>> {
        Ok(self.tables.lock().await.users.get(&user_id).cloned())
    }

    async fn create_listing(&self, new: NewListing) -> StoreResult<Listing> {
        let mut tables = self.tables.lock().await;
        let listing = Listing {
            id: tables.next_id(),
            title: new.title,
            description: new.description,
            start_bid: new.start_bid,
            image: new.image,
            category: new.category,
            active: true,
            created_at: Utc::now(),
            author_id: new.author_id,
            winner_id: None,
        };
        tables.listings.insert(listing.id, listing.clone());
        Ok(listing)
    }

    async fn get_listing(&self, listing_id: i64) -> StoreResult<Option<Listing>> {
        Ok(self.tables.lock().await.listings.get(&listing_id).cloned())
    }

    async fn filter_listings(&self, filter: ListingFilter) -> StoreResult<Vec<Listing>> {
        let tables = self.tables.lock().await;
        let listings = tables
            .listings
            .values()
            .filter(|listing| match filter {
                ListingFilter::All => true,
                ListingFilter::Active => listing.active,
                ListingFilter::Category(category) => listing.category == Some(category),
                ListingFilter::WatchedBy(user_id) => {
                    tables.watchlist.contains(&(user_id, listing.id))
                }
            })
            .cloned()
            .collect();
        Ok(listings)
    }

    async fn save_listing(&self, listing: &Listing) -> StoreResult<()> {
        let mut tables = self.tables.lock().await;
        match tables.listings.get_mut(&listing.id) {
            Some(stored) => {
                *stored = listing.clone();
                Ok(())
            }
            None => Err(StoreError::MissingListing(listing.id)),
        }
    }

    async fn bids_for(&self, listing_id: i64) -> StoreResult<Vec<Bid>> {
        Ok(self.tables.lock().await.bids_for(listing_id))
    }

    async fn create_bid(&self, new: NewBid, reject_when_closed: bool) -> StoreResult<BidInsert> {
        // 잠금을 쥔 채로 종료 여부와 최저가 재확인 후 저장
        let mut tables = self.tables.lock().await;
        let (start_bid, active) = tables
            .listings
            .get(&new.listing_id)
            .map(|listing| (listing.start_bid, listing.active))
            .ok_or(StoreError::MissingListing(new.listing_id))?;
        if !active && reject_when_closed {
            return Ok(BidInsert::Closed);
        }

        let floor = validator::floor(start_bid, &tables.bids_for(new.listing_id));
        if new.amount <= floor {
            return Ok(BidInsert::Outbid { floor });
        }

        let bid = Bid {
            id: tables.next_id(),
            listing_id: new.listing_id,
            bidder_id: new.bidder_id,
            amount: new.amount,
            created_at: Utc::now(),
        };
        tables.bids.insert(bid.id, bid.clone());
        Ok(BidInsert::Created(bid))
    }

    async fn close_listing(
        &self,
        listing_id: i64,
        closer_id: i64,
        reject_reclose: bool,
    ) -> StoreResult<ListingClose> {
        let mut tables = self.tables.lock().await;
        let winner_id = tables
            .bids_for(listing_id)
            .last()
            .map(|bid| bid.bidder_id)
            .unwrap_or(closer_id);

        let listing = tables
            .listings
            .get_mut(&listing_id)
            .ok_or(StoreError::MissingListing(listing_id))?;
        let was_active = listing.active;
        if !was_active && reject_reclose {
            return Ok(ListingClose::AlreadyClosed);
        }
        listing.active = false;
        listing.winner_id = Some(winner_id);
        Ok(ListingClose::Closed {
            listing: listing.clone(),
            was_active,
        })
    }

    async fn comments_for(&self, listing_id: i64) -> StoreResult<Vec<Comment>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .comments
            .values()
            .filter(|comment| comment.listing_id == listing_id)
            .cloned()
            .collect())
    }

    async fn create_comment(&self, new: NewComment) -> StoreResult<Comment> {
        let mut tables = self.tables.lock().await;
        if !tables.listings.contains_key(&new.listing_id) {
            return Err(StoreError::MissingListing(new.listing_id));
        }
        let comment = Comment {
            id: tables.next_id(),
            listing_id: new.listing_id,
            author_id: new.author_id,
            body: new.body,
            created_at: Utc::now(),
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn is_watching(&self, user_id: i64, listing_id: i64) -> StoreResult<bool> {
        Ok(self
            .tables
            .lock()
            .await
            .watchlist
            .contains(&(user_id, listing_id)))
    }

    async fn add_to_watchlist(&self, user_id: i64, listing_id: i64) -> StoreResult<()> {
        self.tables
            .lock()
            .await
            .watchlist
            .insert((user_id, listing_id));
        Ok(())
    }

    async fn remove_from_watchlist(&self, user_id: i64, listing_id: i64) -> StoreResult<()> {
        self.tables
            .lock()
            .await
            .watchlist
            .remove(&(user_id, listing_id));
        Ok(())
    }
}
// endregion: --- Memory Entity Store

// endregion: --- Tests
