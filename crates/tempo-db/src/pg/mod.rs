//! PostgreSQL repository implementations

mod invoice;
mod plan;
mod subscription;
mod user;

pub use invoice::PgInvoiceRepository;
pub use plan::PgPlanRepository;
pub use subscription::PgSubscriptionRepository;
pub use user::PgUserRepository;

use crate::DbPool;

/// All repositories bundled together
#[derive(Clone)]
pub struct Repositories {
    pub users: PgUserRepository,
    pub plans: PgPlanRepository,
    pub subscriptions: PgSubscriptionRepository,
    pub invoices: PgInvoiceRepository,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            plans: PgPlanRepository::new(pool.clone()),
            subscriptions: PgSubscriptionRepository::new(pool.clone()),
            invoices: PgInvoiceRepository::new(pool),
        }
    }
}
