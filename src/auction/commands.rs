/// 상품 관련 커맨드 처리
/// 1. 상품 등록
/// 2. 경매 종료 (낙찰자 결정)
/// 3. 관심 목록 토글
/// 4. 댓글 작성
// region:    --- Imports
use super::model::{Category, Comment, Listing, NewComment, NewListing, User};
use crate::config::Policy;
use crate::error::{AppError, AppResult};
use crate::money::Money;
use crate::store::{EntityStore, ListingClose};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Forms
/// 상품 등록 요청 본문
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct NewListingForm {
    pub title: String,
    pub description: String,
    pub start_bid: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// 댓글 요청 본문
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CommentForm {
    #[serde(default)]
    pub comment: String,
}

const MAX_TITLE_LEN: usize = 200;
// endregion: --- Forms

// region:    --- Commands
/// 1. 상품 등록
pub async fn create_listing(
    store: &dyn EntityStore,
    author: &User,
    form: NewListingForm,
) -> AppResult<Listing> {
    info!("{:<12} --> 상품 등록 요청: {:?}", "Command", form.title);

    let title = form.title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::invalid("title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::invalid("title must be at most 200 characters"));
    }

    let description = form.description.trim().to_string();
    if description.is_empty() {
        return Err(AppError::invalid("description is required"));
    }

    let start_bid = Money::parse(&form.start_bid)
        .map_err(|e| AppError::invalid(format!("invalid starting price: {}", e)))?;

    let image = match form.image.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
            Some(url.to_string())
        }
        Some(_) => return Err(AppError::invalid("image must be an http(s) URL")),
    };

    let category = match form.category.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(code) => Some(
            Category::from_code(code)
                .ok_or_else(|| AppError::invalid(format!("unknown category: {}", code)))?,
        ),
    };

    let listing = store
        .create_listing(NewListing {
            title,
            description,
            start_bid,
            image,
            category,
            author_id: author.id,
        })
        .await?;
    info!("{:<12} --> 상품 등록 완료 id: {}", "Command", listing.id);
    Ok(listing)
}

/// 2. 경매 종료
/// 입찰이 있으면 가장 최근 입찰자, 없으면 종료한 사용자가 낙찰자가 된다
pub async fn close_auction(
    store: &dyn EntityStore,
    policy: &Policy,
    listing_id: i64,
    closer: &User,
) -> AppResult<Listing> {
    info!(
        "{:<12} --> 경매 종료 요청 id: {}, closer: {}",
        "Command", listing_id, closer.id
    );

    // 낙찰자 결정과 종료 기록은 입찰 저장과 같은 잠금 아래에서 수행
    let listing = match store
        .close_listing(listing_id, closer.id, policy.reject_reclose)
        .await?
    {
        ListingClose::AlreadyClosed => return Err(AppError::AlreadyClosed(listing_id)),
        ListingClose::Closed {
            listing,
            was_active,
        } => {
            if !was_active {
                warn!(
                    "{:<12} --> 이미 종료된 경매를 다시 종료 id: {}",
                    "Command", listing_id
                );
            }
            listing
        }
    };
    info!(
        "{:<12} --> 경매 종료 완료 id: {}, winner: {:?}",
        "Command", listing_id, listing.winner_id
    );
    Ok(listing)
}

/// 관심 목록 토글 결과
#[derive(Debug, Clone)]
pub struct WatchToggle {
    pub listing: Listing,
    pub watching: bool,
}

/// 3. 관심 목록 토글
pub async fn toggle_watchlist(
    store: &dyn EntityStore,
    user: &User,
    listing_id: i64,
) -> AppResult<WatchToggle> {
    let listing = store
        .get_listing(listing_id)
        .await?
        .ok_or_else(|| AppError::listing_not_found(listing_id))?;

    let watching = if store.is_watching(user.id, listing_id).await? {
        store.remove_from_watchlist(user.id, listing_id).await?;
        false
    } else {
        store.add_to_watchlist(user.id, listing_id).await?;
        true
    };

    info!(
        "{:<12} --> 관심 목록 변경 user: {}, listing: {}, watching: {}",
        "Command", user.id, listing_id, watching
    );
    Ok(WatchToggle { listing, watching })
}

/// 4. 댓글 작성
pub async fn post_comment(
    store: &dyn EntityStore,
    policy: &Policy,
    user: &User,
    listing_id: i64,
    body: String,
) -> AppResult<(Listing, Comment)> {
    let listing = store
        .get_listing(listing_id)
        .await?
        .ok_or_else(|| AppError::listing_not_found(listing_id))?;

    if body.trim().is_empty() {
        if policy.reject_empty_comments {
            return Err(AppError::invalid("comment must not be empty"));
        }
        warn!(
            "{:<12} --> 빈 댓글 저장 listing: {}, user: {}",
            "Command", listing_id, user.id
        );
    }

    let comment = store
        .create_comment(NewComment {
            listing_id,
            author_id: user.id,
            body,
        })
        .await?;
    Ok((listing, comment))
}
// endregion: --- Commands

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::model::NewUser;
    use crate::bidding::commands::submit_bid;
    use crate::auction::model::NewBid;
    use crate::store::{BidInsert, ListingFilter, MemoryEntityStore};

    async fn user(store: &MemoryEntityStore, name: &str) -> User {
        store
            .create_user(NewUser {
                username: name.to_string(),
                email: String::new(),
            })
            .await
            .unwrap()
    }

    fn widget_form() -> NewListingForm {
        NewListingForm {
            title: "Widget".to_string(),
            description: "A fine widget".to_string(),
            start_bid: "5.00".to_string(),
            image: None,
            category: Some("EL".to_string()),
        }
    }

    #[tokio::test]
    async fn create_listing_starts_active_without_winner() {
        let store = MemoryEntityStore::new();
        let seller = user(&store, "seller").await;

        let listing = create_listing(&store, &seller, widget_form()).await.unwrap();
        assert!(listing.active);
        assert_eq!(listing.winner_id, None);
        assert_eq!(listing.author_id, seller.id);
        assert_eq!(listing.category, Some(Category::Electronics));
        assert_eq!(listing.start_bid, Money::from_cents(500));
    }

    #[tokio::test]
    async fn create_listing_validates_form() {
        let store = MemoryEntityStore::new();
        let seller = user(&store, "seller").await;

        let cases = [
            NewListingForm {
                title: "  ".to_string(),
                ..widget_form()
            },
            NewListingForm {
                description: String::new(),
                ..widget_form()
            },
            NewListingForm {
                start_bid: "cheap".to_string(),
                ..widget_form()
            },
            NewListingForm {
                image: Some("ftp://example.com/a.png".to_string()),
                ..widget_form()
            },
            NewListingForm {
                category: Some("XX".to_string()),
                ..widget_form()
            },
            NewListingForm {
                title: "x".repeat(201),
                ..widget_form()
            },
        ];
        for form in cases {
            let result = create_listing(&store, &seller, form).await;
            assert!(matches!(result, Err(AppError::ValidationRejected { .. })));
        }
        assert!(store
            .filter_listings(ListingFilter::All)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn close_picks_most_recent_bidder() {
        let store = MemoryEntityStore::new();
        let seller = user(&store, "seller").await;
        let bidders = [
            user(&store, "a").await,
            user(&store, "b").await,
            user(&store, "c").await,
        ];
        let listing = create_listing(&store, &seller, widget_form()).await.unwrap();
        let policy = Policy::default();

        for (bidder, amount) in bidders.iter().zip(["10.00", "15.00", "20.00"]) {
            submit_bid(&store, &policy, listing.id, bidder, amount)
                .await
                .unwrap();
        }

        let closed = close_auction(&store, &policy, listing.id, &seller)
            .await
            .unwrap();
        assert!(!closed.active);
        assert_eq!(closed.winner_id, Some(bidders[2].id));

        let stored = store.get_listing(listing.id).await.unwrap().unwrap();
        assert_eq!(stored, closed);
    }

    #[tokio::test]
    async fn late_bid_after_close_is_not_stored() {
        let store = MemoryEntityStore::new();
        let seller = user(&store, "seller").await;
        let bidder = user(&store, "bidder").await;
        let listing = create_listing(&store, &seller, widget_form()).await.unwrap();
        let policy = Policy::default();

        let closed = close_auction(&store, &policy, listing.id, &seller)
            .await
            .unwrap();
        assert_eq!(closed.winner_id, Some(seller.id));

        // 입찰 사전 확인을 통과한 요청이 종료 뒤에 저장되는 경우
        let late = store
            .create_bid(
                NewBid {
                    listing_id: listing.id,
                    bidder_id: bidder.id,
                    amount: Money::from_cents(10_000),
                },
                policy.reject_bids_when_closed,
            )
            .await
            .unwrap();
        assert_eq!(late, BidInsert::Closed);
        assert!(store.bids_for(listing.id).await.unwrap().is_empty());

        let stored = store.get_listing(listing.id).await.unwrap().unwrap();
        assert_eq!(stored.winner_id, Some(seller.id));
    }

    #[tokio::test]
    async fn close_without_bids_awards_closer() {
        let store = MemoryEntityStore::new();
        let seller = user(&store, "seller").await;
        let closer = user(&store, "closer").await;
        let listing = create_listing(&store, &seller, widget_form()).await.unwrap();

        let closed = close_auction(&store, &Policy::default(), listing.id, &closer)
            .await
            .unwrap();
        assert!(!closed.active);
        assert_eq!(closed.winner_id, Some(closer.id));
    }

    #[tokio::test]
    async fn reclose_follows_policy() {
        let store = MemoryEntityStore::new();
        let seller = user(&store, "seller").await;
        let listing = create_listing(&store, &seller, widget_form()).await.unwrap();
        let policy = Policy::default();

        close_auction(&store, &policy, listing.id, &seller)
            .await
            .unwrap();
        assert!(close_auction(&store, &policy, listing.id, &seller)
            .await
            .is_ok());

        let strict = Policy {
            reject_reclose: true,
            ..policy
        };
        let result = close_auction(&store, &strict, listing.id, &seller).await;
        assert!(matches!(result, Err(AppError::AlreadyClosed(id)) if id == listing.id));
    }

    #[tokio::test]
    async fn close_unknown_listing_is_not_found() {
        let store = MemoryEntityStore::new();
        let closer = user(&store, "closer").await;
        let result = close_auction(&store, &Policy::default(), 77, &closer).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn toggle_twice_restores_watchlist() {
        let store = MemoryEntityStore::new();
        let seller = user(&store, "seller").await;
        let viewer = user(&store, "viewer").await;
        let listing = create_listing(&store, &seller, widget_form()).await.unwrap();

        let first = toggle_watchlist(&store, &viewer, listing.id).await.unwrap();
        assert!(first.watching);
        assert!(store.is_watching(viewer.id, listing.id).await.unwrap());

        let second = toggle_watchlist(&store, &viewer, listing.id).await.unwrap();
        assert!(!second.watching);
        assert!(store
            .filter_listings(ListingFilter::WatchedBy(viewer.id))
            .await
            .unwrap()
            .is_empty());

        let missing = toggle_watchlist(&store, &viewer, 999).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn post_comment_persists_and_follows_empty_policy() {
        let store = MemoryEntityStore::new();
        let seller = user(&store, "seller").await;
        let listing = create_listing(&store, &seller, widget_form()).await.unwrap();
        let policy = Policy::default();

        let (_, comment) = post_comment(&store, &policy, &seller, listing.id, "Nice".to_string())
            .await
            .unwrap();
        assert_eq!(comment.body, "Nice");
        assert_eq!(comment.author_id, seller.id);

        post_comment(&store, &policy, &seller, listing.id, String::new())
            .await
            .unwrap();
        assert_eq!(store.comments_for(listing.id).await.unwrap().len(), 2);

        let strict = Policy {
            reject_empty_comments: true,
            ..policy
        };
        let result = post_comment(&store, &strict, &seller, listing.id, "  ".to_string()).await;
        assert!(matches!(result, Err(AppError::ValidationRejected { .. })));

        let missing = post_comment(&store, &policy, &seller, 999, "hi".to_string()).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
// endregion: --- Tests
