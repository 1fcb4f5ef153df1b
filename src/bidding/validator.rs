/// 입찰 금액 검증
// region:    --- Imports
use crate::auction::model::Bid;
use crate::money::{Money, MoneyError};
use thiserror::Error;

// endregion: --- Imports

// region:    --- Bid Validator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BidRejection {
    #[error("invalid bid amount: {0}")]
    Malformed(MoneyError),
    #[error("bid must exceed current floor")]
    NotAboveFloor { floor: Money },
    #[error("auction is closed")]
    AuctionClosed,
}

impl BidRejection {
    /// 거절 시 함께 보여줄 현재 최저가
    pub fn floor(&self) -> Option<Money> {
        match self {
            BidRejection::NotAboveFloor { floor } => Some(*floor),
            _ => None,
        }
    }
}

/// 입찰 금액 파싱 (음수 불가, 소수점 둘째 자리까지)
pub fn parse_amount(text: &str) -> Result<Money, BidRejection> {
    Money::parse(text).map_err(BidRejection::Malformed)
}

/// 입찰가가 최저가보다 엄격히 커야 한다
pub fn validate(proposed: Money, floor: Money) -> Result<(), BidRejection> {
    if proposed > floor {
        Ok(())
    } else {
        Err(BidRejection::NotAboveFloor { floor })
    }
}

/// 최저가: 기존 최고 입찰가, 입찰이 없으면 시작가
pub fn floor(start_bid: Money, bids: &[Bid]) -> Money {
    bids.iter().map(|bid| bid.amount).max().unwrap_or(start_bid)
}
// endregion: --- Bid Validator

// endregion: --- Tests
