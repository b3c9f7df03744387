//! Payment and notification collaborator abstractions

use async_trait::async_trait;

use tempo_types::Invoice;

use crate::BillingError;

/// Payment processor trait
///
/// Abstracts payment capture so a test double (or eventually a real
/// gateway) can be substituted without touching billing logic.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Capture payment for an invoice.
    ///
    /// A decline surfaces as `BillingError::PaymentDeclined`; the caller
    /// must leave the invoice status unchanged in that case.
    async fn capture(&self, invoice: &Invoice) -> Result<(), BillingError>;
}

/// Notification sender trait
///
/// Side-effect only: a failed or dropped reminder never fails the caller.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Send a payment reminder for an invoice to the given address.
    async fn send_reminder(&self, email: &str, invoice: &Invoice);
}
