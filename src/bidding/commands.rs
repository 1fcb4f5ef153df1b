/// 입찰 관련 커맨드 처리
/// 1. 입찰 금액 검증
/// 2. 최저가 재확인 후 입찰 저장
// region:    --- Imports
use super::validator::{self, BidRejection};
use crate::auction::model::{Bid, Listing, NewBid, User};
use crate::config::Policy;
use crate::error::{AppError, AppResult};
use crate::store::{BidInsert, EntityStore};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Commands
/// 입찰 요청 본문
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidForm {
    pub amount: String,
}

/// 입찰 성공 결과
#[derive(Debug, Clone)]
pub struct BidReceipt {
    pub listing: Listing,
    pub bid: Bid,
}

/// 입찰 제출
pub async fn submit_bid(
    store: &dyn EntityStore,
    policy: &Policy,
    listing_id: i64,
    bidder: &User,
    proposed: &str,
) -> AppResult<BidReceipt> {
    info!(
        "{:<12} --> 입찰 요청 처리 시작: listing={}, bidder={}, amount={}",
        "Command", listing_id, bidder.id, proposed
    );

    let listing = store
        .get_listing(listing_id)
        .await?
        .ok_or_else(|| AppError::listing_not_found(listing_id))?;

    if !listing.active {
        if policy.reject_bids_when_closed {
            info!("{:<12} --> 종료된 경매 입찰 거절 id: {}", "Command", listing_id);
            return Err(BidRejection::AuctionClosed.into());
        }
        warn!(
            "{:<12} --> 종료된 경매에 입찰 허용 (정책) id: {}",
            "Command", listing_id
        );
    }

    let amount = validator::parse_amount(proposed)?;

    // 검증 직전에 최저가 조회
    let bids = store.bids_for(listing_id).await?;
    let floor = validator::floor(listing.start_bid, &bids);
    validator::validate(amount, floor)?;

    // 종료 여부와 최저가는 저장소가 잠금 아래에서 다시 확인
    match store
        .create_bid(
            NewBid {
                listing_id,
                bidder_id: bidder.id,
                amount,
            },
            policy.reject_bids_when_closed,
        )
        .await?
    {
        BidInsert::Created(bid) => {
            info!(
                "{:<12} --> 입찰 성공: listing={}, amount={}",
                "Command", listing_id, bid.amount
            );
            Ok(BidReceipt { listing, bid })
        }
        BidInsert::Outbid { floor } => {
            warn!(
                "{:<12} --> 저장 직전 최저가 변경으로 입찰 거절: floor={}",
                "Command", floor
            );
            Err(BidRejection::NotAboveFloor { floor }.into())
        }
        BidInsert::Closed => {
            info!(
                "{:<12} --> 저장 직전 경매 종료로 입찰 거절 id: {}",
                "Command", listing_id
            );
            Err(BidRejection::AuctionClosed.into())
        }
    }
}
// endregion: --- Commands

// endregion: --- Tests
