//! Mock payment and notification collaborators
//!
//! Deterministic stand-ins for the external integrations. The payment
//! mock either always approves or always declines, so tests and local
//! runs are reproducible.

use async_trait::async_trait;
use tracing::{info, warn};

use tempo_types::Invoice;

use crate::provider::{NotificationSender, PaymentProcessor};
use crate::BillingError;

/// Deterministic mock payment processor
#[derive(Debug, Clone, Copy)]
pub struct MockPaymentProcessor {
    decline: bool,
}

impl MockPaymentProcessor {
    /// A processor that approves every charge
    pub fn approving() -> Self {
        Self { decline: false }
    }

    /// A processor that declines every charge
    pub fn declining() -> Self {
        Self { decline: true }
    }
}

#[async_trait]
impl PaymentProcessor for MockPaymentProcessor {
    async fn capture(&self, invoice: &Invoice) -> Result<(), BillingError> {
        info!(
            invoice_id = %invoice.id,
            user_id = %invoice.user_id,
            amount_cents = invoice.amount_cents,
            "Mock charge started"
        );

        if self.decline {
            warn!(invoice_id = %invoice.id, "Mock charge declined");
            return Err(BillingError::PaymentDeclined(
                "mock processor declined the charge".to_string(),
            ));
        }

        info!(invoice_id = %invoice.id, "Payment authorized and captured");
        Ok(())
    }
}

/// Notification sender that writes reminders to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl NotificationSender for ConsoleNotifier {
    async fn send_reminder(&self, email: &str, invoice: &Invoice) {
        info!(
            to = %email,
            invoice_id = %invoice.id,
            status = %invoice.status,
            due_date = %invoice.due_date,
            "Sending mock payment reminder"
        );
    }
}
