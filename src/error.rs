// region:    --- Imports
use crate::bidding::validator::BidRejection;
use crate::money::Money;
use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

// endregion: --- Imports

// region:    --- App Error
/// 요청 단위로 처리되는 오류 (프로세스에 치명적인 오류는 없음)
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{message}")]
    ValidationRejected {
        message: String,
        floor: Option<Money>,
    },
    #[error("username already taken: {0}")]
    DuplicateIdentity(String),
    #[error("listing {0} is already closed")]
    AlreadyClosed(i64),
    #[error("an authenticated user is required")]
    Unauthenticated,
    #[error("store failure: {0}")]
    Store(StoreError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn listing_not_found(listing_id: i64) -> Self {
        AppError::NotFound(format!("listing {}", listing_id))
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::ValidationRejected {
            message: message.into(),
            floor: None,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ValidationRejected { .. } => "VALIDATION_REJECTED",
            AppError::DuplicateIdentity(_) => "DUPLICATE_IDENTITY",
            AppError::AlreadyClosed(_) => "ALREADY_CLOSED",
            AppError::Unauthenticated => "UNAUTHENTICATED",
            AppError::Store(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationRejected { .. } => StatusCode::BAD_REQUEST,
            AppError::DuplicateIdentity(_) | AppError::AlreadyClosed(_) => StatusCode::CONFLICT,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateIdentity(username) => AppError::DuplicateIdentity(username),
            StoreError::MissingListing(listing_id) => AppError::listing_not_found(listing_id),
            other => AppError::Store(other),
        }
    }
}

impl From<BidRejection> for AppError {
    fn from(rejection: BidRejection) -> Self {
        AppError::ValidationRejected {
            message: rejection.to_string(),
            floor: rejection.floor(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Store(e) => {
                error!("{:<12} --> 저장소 오류: {:?}", "Error", e);
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        let mut body = serde_json::json!({
            "error": message,
            "code": self.code(),
        });
        if let AppError::ValidationRejected {
            floor: Some(floor), ..
        } = &self
        {
            body["current_floor"] = serde_json::json!(floor);
        }

        (status, Json(body)).into_response()
    }
}
// endregion: --- App Error
