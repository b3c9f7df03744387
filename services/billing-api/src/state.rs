//! Application state for the Billing API service.

use std::sync::Arc;

use tokio::sync::mpsc;

use tempo_billing_core::BillingService;
use tempo_db::pg::{
    PgInvoiceRepository, PgPlanRepository, PgSubscriptionRepository, PgUserRepository,
};
use tempo_db::DbPool;

use crate::config::Config;
use crate::worker::BillingTask;

/// The billing service wired against the PostgreSQL repositories
pub type Billing = BillingService<
    PgUserRepository,
    PgPlanRepository,
    PgSubscriptionRepository,
    PgInvoiceRepository,
>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Billing service (users, plans, subscriptions, invoices, jobs)
    pub billing: Arc<Billing>,
    /// Database pool (for readiness checks)
    pub pool: DbPool,
    /// Queue of fire-and-forget billing tasks
    pub tasks: mpsc::Sender<BillingTask>,
    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        billing: Billing,
        pool: DbPool,
        tasks: mpsc::Sender<BillingTask>,
        config: Config,
    ) -> Self {
        Self {
            billing: Arc::new(billing),
            pool,
            tasks,
            config: Arc::new(config),
        }
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
