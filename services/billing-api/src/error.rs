//! Error types for the Billing API service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use tempo_billing_core::BillingError;

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Billing(#[from] BillingError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Billing(e) => match e {
                _ if e.is_not_found() => StatusCode::NOT_FOUND,
                BillingError::EmailTaken
                | BillingError::DuplicateSubscription
                | BillingError::InvalidState(_)
                | BillingError::AlreadyPaid => StatusCode::CONFLICT,
                BillingError::PaymentDeclined(_) => StatusCode::PAYMENT_REQUIRED,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Billing(e) => match e {
                BillingError::UserNotFound => "USER_NOT_FOUND",
                BillingError::PlanNotFound => "PLAN_NOT_FOUND",
                BillingError::SubscriptionNotFound => "SUBSCRIPTION_NOT_FOUND",
                BillingError::InvoiceNotFound => "INVOICE_NOT_FOUND",
                BillingError::EmailTaken => "EMAIL_TAKEN",
                BillingError::DuplicateSubscription => "DUPLICATE_SUBSCRIPTION",
                BillingError::InvalidState(_) => "INVALID_STATE",
                BillingError::AlreadyPaid => "ALREADY_PAID",
                BillingError::PaymentDeclined(_) => "PAYMENT_DECLINED",
                BillingError::Database(_) | BillingError::Internal(_) => "INTERNAL_ERROR",
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Log internal errors
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = ?self, "Internal API error");
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
