use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 사용자 모델 (인증 정보는 외부 인증 서비스 소유)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}

// 카테고리
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "GM")]
    GeneralMerchandise,
    #[serde(rename = "EL")]
    Electronics,
    #[serde(rename = "FA")]
    Fashion,
    #[serde(rename = "HG")]
    HomeAndGarden,
    #[serde(rename = "HB")]
    HealthAndBeauty,
    #[serde(rename = "TH")]
    ToysAndHobbies,
    #[serde(rename = "SO")]
    SportsAndOutdoors,
    #[serde(rename = "ME")]
    MediaAndEntertainment,
    #[serde(rename = "AU")]
    Automotive,
    #[serde(rename = "MS")]
    Miscellaneous,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::GeneralMerchandise,
        Category::Electronics,
        Category::Fashion,
        Category::HomeAndGarden,
        Category::HealthAndBeauty,
        Category::ToysAndHobbies,
        Category::SportsAndOutdoors,
        Category::MediaAndEntertainment,
        Category::Automotive,
        Category::Miscellaneous,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Category::GeneralMerchandise => "GM",
            Category::Electronics => "EL",
            Category::Fashion => "FA",
            Category::HomeAndGarden => "HG",
            Category::HealthAndBeauty => "HB",
            Category::ToysAndHobbies => "TH",
            Category::SportsAndOutdoors => "SO",
            Category::MediaAndEntertainment => "ME",
            Category::Automotive => "AU",
            Category::Miscellaneous => "MS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::GeneralMerchandise => "General Merchandise",
            Category::Electronics => "Electronics",
            Category::Fashion => "Fashion",
            Category::HomeAndGarden => "Home & Garden",
            Category::HealthAndBeauty => "Health & Beauty",
            Category::ToysAndHobbies => "Toys & Hobbies",
            Category::SportsAndOutdoors => "Sports & Outdoors",
            Category::MediaAndEntertainment => "Media & Entertainment",
            Category::Automotive => "Automotive",
            Category::Miscellaneous => "Miscellaneous",
        }
    }

    pub fn from_code(code: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// URL 세그먼트로 카테고리 찾기 (라벨 우선, 이후 코드)
    pub fn resolve(segment: &str) -> Option<Category> {
        let label = segment.replace('-', " ");
        Self::ALL
            .into_iter()
            .find(|c| c.label() == label)
            .or_else(|| Self::from_code(segment))
    }
}

// 상품(리스팅) 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub start_bid: Money,
    pub image: Option<String>,
    pub category: Option<Category>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub author_id: i64,
    pub winner_id: Option<i64>,
}

impl Listing {
    /// 상품 URL에 쓰이는 제목 슬러그
    pub fn slug(&self) -> String {
        slugify(&self.title)
    }

    pub fn path(&self) -> String {
        format!("/listing/{}/{}", self.id, self.slug())
    }
}

pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.chars() {
        let mapped = match ch {
            ' ' | ',' | '(' | ')' | '-' => '-',
            c if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '~') => c,
            _ => continue,
        };
        if mapped == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(mapped);
    }

    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "listing".to_string()
    } else {
        slug.to_string()
    }
}

// 입찰 모델 (생성 후 변경 불가)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub listing_id: i64,
    pub bidder_id: i64,
    pub amount: Money,
    pub created_at: DateTime<Utc>,
}

// 댓글 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub listing_id: i64,
    pub author_id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

// region:    --- New Entities
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub start_bid: Money,
    pub image: Option<String>,
    pub category: Option<Category>,
    pub author_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewBid {
    pub listing_id: i64,
    pub bidder_id: i64,
    pub amount: Money,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub listing_id: i64,
    pub author_id: i64,
    pub body: String,
}
// endregion: --- New Entities

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_replaces_separators() {
        assert_eq!(slugify("Vintage Lamp (Brass), Large"), "Vintage-Lamp-Brass-Large");
        assert_eq!(slugify("Widget"), "Widget");
        assert_eq!(slugify("  -- "), "listing");
        assert_eq!(slugify("Home & Garden set"), "Home-Garden-set");
    }

    #[test]
    fn resolve_category_by_label_or_code() {
        assert_eq!(Category::resolve("Home-&-Garden"), Some(Category::HomeAndGarden));
        assert_eq!(Category::resolve("Electronics"), Some(Category::Electronics));
        assert_eq!(Category::resolve("TH"), Some(Category::ToysAndHobbies));
        assert_eq!(Category::resolve("Nope"), None);
    }

    #[test]
    fn category_serializes_as_code() {
        let json = serde_json::to_string(&Category::SportsAndOutdoors).unwrap();
        assert_eq!(json, "\"SO\"");
    }
}
