//! Tempo Billing Core - Billing business logic
//!
//! Core billing functionality: subscription lifecycle, invoice ledger,
//! the scheduled billing-cycle jobs, and the payment/notification
//! collaborator seams.
//!
//! # Example
//!
//! ```rust,ignore
//! use tempo_billing_core::{BillingConfig, BillingService, ConsoleNotifier, MockPaymentProcessor};
//! use tempo_db::Repositories;
//!
//! let config = BillingConfig::new().with_grace_period(15);
//! let billing = BillingService::new(
//!     repos.users, repos.plans, repos.subscriptions, repos.invoices,
//!     Arc::new(MockPaymentProcessor::approving()),
//!     Arc::new(ConsoleNotifier),
//!     config,
//! );
//!
//! // Subscribe, then issue the first invoice
//! let sub = billing.subscribe(&user_id, &plan_id, today).await?;
//! billing.generate_initial_invoice(&sub.id).await?;
//! ```

pub mod config;
pub mod error;
pub mod jobs;
pub mod mock;
pub mod provider;
pub mod schedule;
pub mod service;

pub use config::BillingConfig;
pub use error::BillingError;
pub use jobs::RunSummary;
pub use mock::{ConsoleNotifier, MockPaymentProcessor};
pub use provider::{NotificationSender, PaymentProcessor};
pub use service::BillingService;
