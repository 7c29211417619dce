// region:    --- Imports
use crate::auction::AuctionError;
use crate::billing::BillingError;
use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

// endregion: --- Imports

// region:    --- App Error
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auction(#[from] AuctionError),

    #[error(transparent)]
    Billing(#[from] BillingError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    /// Stable machine-readable code returned alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Auction(e) => match e {
                AuctionError::NotFound(_) => "NOT_FOUND",
                AuctionError::NotLive(_) => "NOT_LIVE",
                AuctionError::Expired => "ALREADY_ENDED",
                AuctionError::BidTooLow { .. } => "LOW_BID",
                AuctionError::AmountOutOfRange { .. } => "AMOUNT_OUT_OF_RANGE",
                AuctionError::VendorOnly => "VENDOR_ONLY",
                AuctionError::BuyNowUnavailable => "BUY_NOW_UNAVAILABLE",
                AuctionError::QuestionNotFound(_) => "QUESTION_NOT_FOUND",
                AuctionError::AlreadyAnswered(_) => "ALREADY_ANSWERED",
                AuctionError::EmptyText => "EMPTY_TEXT",
                AuctionError::InvalidAuction(_) => "INVALID_AUCTION",
            },
            AppError::Billing(e) => match e {
                BillingError::Validation(_) => "INVALID_BILL",
                BillingError::BillNotFound(_) | BillingError::ItemNotFound(_) => "NOT_FOUND",
                BillingError::NumbersExhausted(_) => "NUMBERS_EXHAUSTED",
            },
            AppError::Store(_) => "STORE_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Auction(e) => match e {
                AuctionError::NotFound(_) | AuctionError::QuestionNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                AuctionError::NotLive(_)
                | AuctionError::Expired
                | AuctionError::BuyNowUnavailable
                | AuctionError::AlreadyAnswered(_) => StatusCode::CONFLICT,
                AuctionError::BidTooLow { .. }
                | AuctionError::AmountOutOfRange { .. }
                | AuctionError::VendorOnly
                | AuctionError::EmptyText
                | AuctionError::InvalidAuction(_) => StatusCode::BAD_REQUEST,
            },
            AppError::Billing(BillingError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Billing(BillingError::BillNotFound(_) | BillingError::ItemNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Billing(BillingError::NumbersExhausted(_)) => StatusCode::CONFLICT,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{:<12} --> {}", "Handler", self);
        }

        let mut body = serde_json::json!({
            "error": self.to_string(),
            "code": self.code(),
        });
        match &self {
            AppError::Auction(AuctionError::BidTooLow { minimum, .. }) => {
                body["minimum_bid"] = serde_json::json!(minimum);
            }
            AppError::Billing(BillingError::Validation(issues)) => {
                body["issues"] = serde_json::json!(issues);
            }
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}
// endregion: --- App Error
