//! Billing errors

use thiserror::Error;

/// Billing errors
#[derive(Error, Debug)]
pub enum BillingError {
    /// User not found
    #[error("user not found")]
    UserNotFound,

    /// Plan not found
    #[error("plan not found")]
    PlanNotFound,

    /// Subscription not found
    #[error("subscription not found")]
    SubscriptionNotFound,

    /// Invoice not found
    #[error("invoice not found")]
    InvoiceNotFound,

    /// Email already registered
    #[error("email already registered")]
    EmailTaken,

    /// User already has an active subscription to the plan
    #[error("user already has an active subscription to this plan")]
    DuplicateSubscription,

    /// Operation illegal in the current lifecycle state
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Invoice already paid
    #[error("invoice already paid")]
    AlreadyPaid,

    /// Payment processor declined the charge
    #[error("payment declined: {0}")]
    PaymentDeclined(String),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] tempo_db::DbError),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl BillingError {
    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound
                | Self::PlanNotFound
                | Self::SubscriptionNotFound
                | Self::InvoiceNotFound
        )
    }

    /// Check if this is a conflict with existing state
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::EmailTaken | Self::DuplicateSubscription | Self::InvalidState(_) | Self::AlreadyPaid
        )
    }
}
