/// 사용자 생성
pub const INSERT_USER: &str =
    "INSERT INTO users (username, email) VALUES ($1, $2) RETURNING id, username, email";

/// 사용자 조회
pub const GET_USER: &str = "SELECT id, username, email FROM users WHERE id = $1";

/// 상품 생성
pub const INSERT_LISTING: &str = r#"
    INSERT INTO listings (title, description, start_bid, image, category, active, created_at, author_id)
    VALUES ($1, $2, $3, $4, $5, TRUE, NOW(), $6)
    RETURNING id, title, description, start_bid, image, category, active, created_at, author_id, winner_id
"#;

/// 상품 조회
pub const GET_LISTING: &str = "SELECT id, title, description, start_bid, image, category, active, created_at, author_id, winner_id FROM listings WHERE id = $1";

/// 모든 상품 조회
pub const GET_ALL_LISTINGS: &str = "SELECT id, title, description, start_bid, image, category, active, created_at, author_id, winner_id FROM listings ORDER BY id";

/// 진행 중인 상품 조회
pub const GET_ACTIVE_LISTINGS: &str = "SELECT id, title, description, start_bid, image, category, active, created_at, author_id, winner_id FROM listings WHERE active = TRUE ORDER BY id";

/// 카테고리별 상품 조회
pub const GET_CATEGORY_LISTINGS: &str = "SELECT id, title, description, start_bid, image, category, active, created_at, author_id, winner_id FROM listings WHERE category = $1 ORDER BY id";

/// 관심 목록 상품 조회
pub const GET_WATCHED_LISTINGS: &str = r#"
    SELECT l.id, l.title, l.description, l.start_bid, l.image, l.category, l.active, l.created_at, l.author_id, l.winner_id
    FROM listings l
    JOIN watchlist w ON w.listing_id = l.id
    WHERE w.user_id = $1
    ORDER BY l.id
"#;

/// 상품 상태 저장 (종료 여부, 낙찰자)
pub const UPDATE_LISTING: &str = r#"
    UPDATE listings
    SET title = $2, description = $3, image = $4, category = $5, active = $6, winner_id = $7
    WHERE id = $1
"#;

/// 입찰 직전 상품 행 잠금 (시작가, 진행 여부)
pub const LOCK_LISTING_FOR_BID: &str =
    "SELECT start_bid, active FROM listings WHERE id = $1 FOR UPDATE";

/// 경매 종료 직전 상품 행 잠금
pub const LOCK_LISTING_FOR_CLOSE: &str = "SELECT active FROM listings WHERE id = $1 FOR UPDATE";

/// 가장 최근 입찰자
pub const GET_LAST_BIDDER: &str =
    "SELECT bidder_id FROM bids WHERE listing_id = $1 ORDER BY id DESC LIMIT 1";

/// 경매 종료 (낙찰자 기록)
pub const CLOSE_LISTING: &str = r#"
    UPDATE listings
    SET active = FALSE, winner_id = $2
    WHERE id = $1
    RETURNING id, title, description, start_bid, image, category, active, created_at, author_id, winner_id
"#;

/// 최고 입찰가 조회
pub const GET_HIGHEST_BID: &str = "SELECT MAX(amount) FROM bids WHERE listing_id = $1";

/// 입찰 생성
pub const INSERT_BID: &str = r#"
    INSERT INTO bids (listing_id, bidder_id, amount, created_at)
    VALUES ($1, $2, $3, NOW())
    RETURNING id, listing_id, bidder_id, amount, created_at
"#;

/// 입찰 이력 조회 (생성 순)
pub const GET_BID_HISTORY: &str = r#"
    SELECT id, listing_id, bidder_id, amount, created_at
    FROM bids
    WHERE listing_id = $1
    ORDER BY id
"#;

/// 댓글 생성
pub const INSERT_COMMENT: &str = r#"
    INSERT INTO comments (listing_id, author_id, body, created_at)
    VALUES ($1, $2, $3, NOW())
    RETURNING id, listing_id, author_id, body, created_at
"#;

/// 댓글 조회
pub const GET_COMMENTS: &str = r#"
    SELECT id, listing_id, author_id, body, created_at
    FROM comments
    WHERE listing_id = $1
    ORDER BY id
"#;

/// 관심 목록 포함 여부
pub const IS_WATCHING: &str =
    "SELECT EXISTS (SELECT 1 FROM watchlist WHERE user_id = $1 AND listing_id = $2)";

/// 관심 목록 추가
pub const ADD_WATCH: &str =
    "INSERT INTO watchlist (user_id, listing_id) VALUES ($1, $2) ON CONFLICT DO NOTHING";

/// 관심 목록 제거
pub const REMOVE_WATCH: &str = "DELETE FROM watchlist WHERE user_id = $1 AND listing_id = $2";
