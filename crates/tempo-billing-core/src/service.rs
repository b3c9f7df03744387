//! Billing service - subscription lifecycle, invoice ledger, and the
//! catalog/user operations the API layer calls into

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use tempo_db::{
    CreatePlan, CreateSubscription, CreateUser, InvoiceRepository, InvoiceRow, PlanRepository,
    SubscriptionRepository, SubscriptionRow, UserRepository,
};
use tempo_types::{
    Invoice, InvoiceId, InvoiceStatus, Plan, PlanId, Subscription, SubscriptionId,
    SubscriptionStatus, User, UserId, PLAN_CATALOG,
};

use crate::config::BillingConfig;
use crate::provider::{NotificationSender, PaymentProcessor};
use crate::BillingError;

/// Billing service
///
/// Generic over the repository traits so tests can substitute in-memory
/// implementations. Payment and notification collaborators are injected
/// behind their capability traits.
pub struct BillingService<U, P, S, I> {
    pub(crate) users: Arc<U>,
    pub(crate) plans: Arc<P>,
    pub(crate) subscriptions: Arc<S>,
    pub(crate) invoices: Arc<I>,
    pub(crate) payments: Arc<dyn PaymentProcessor>,
    pub(crate) notifier: Arc<dyn NotificationSender>,
    pub(crate) config: BillingConfig,
}

impl<U, P, S, I> BillingService<U, P, S, I>
where
    U: UserRepository,
    P: PlanRepository,
    S: SubscriptionRepository,
    I: InvoiceRepository,
{
    /// Create a new billing service
    pub fn new(
        users: Arc<U>,
        plans: Arc<P>,
        subscriptions: Arc<S>,
        invoices: Arc<I>,
        payments: Arc<dyn PaymentProcessor>,
        notifier: Arc<dyn NotificationSender>,
        config: BillingConfig,
    ) -> Self {
        Self {
            users,
            plans,
            subscriptions,
            invoices,
            payments,
            notifier,
            config,
        }
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Register a new user with a hashed credential
    pub async fn register_user(&self, email: &str, password: &str) -> Result<User, BillingError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(BillingError::EmailTaken);
        }

        let password_hash = hash_password(password)?;
        let row = self
            .users
            .create(CreateUser {
                id: UserId::new().0,
                email: email.to_string(),
                password_hash,
            })
            .await?;

        info!(user_id = %row.id, "User registered");
        Ok(row.into())
    }

    /// Get a user's public profile
    pub async fn get_user(&self, user_id: &UserId) -> Result<User, BillingError> {
        let row = self
            .users
            .find_by_id(user_id.0)
            .await?
            .ok_or(BillingError::UserNotFound)?;
        Ok(row.into())
    }

    // =========================================================================
    // Plan catalog
    // =========================================================================

    /// List the plan catalog
    pub async fn list_plans(&self) -> Result<Vec<Plan>, BillingError> {
        let rows = self.plans.list().await?;
        Ok(rows.into_iter().map(Plan::from).collect())
    }

    /// Seed the predefined plan catalog
    ///
    /// Idempotent: plans whose names already exist are left untouched.
    /// Returns the number of plans created.
    pub async fn seed_plans(&self) -> Result<usize, BillingError> {
        let mut created = 0;
        for seed in PLAN_CATALOG {
            if self.plans.find_by_name(seed.name).await?.is_some() {
                continue;
            }
            self.plans
                .create(CreatePlan {
                    id: PlanId::new().0,
                    name: seed.name.to_string(),
                    price_cents: seed.price_cents,
                    description: Some(seed.description.to_string()),
                    billing_interval_months: 1,
                })
                .await?;
            created += 1;
        }

        if created > 0 {
            info!(created, "Seeded plan catalog");
        }
        Ok(created)
    }

    // =========================================================================
    // Subscription lifecycle
    // =========================================================================

    /// Subscribe a user to a plan
    ///
    /// The subscription starts today with `next_billing_date = today`; the
    /// initial invoice is issued asynchronously by the scheduler, so a
    /// listing immediately after subscribing may show no invoices yet.
    pub async fn subscribe(
        &self,
        user_id: &UserId,
        plan_id: &PlanId,
        today: NaiveDate,
    ) -> Result<Subscription, BillingError> {
        if self.users.find_by_id(user_id.0).await?.is_none() {
            return Err(BillingError::UserNotFound);
        }
        if self.plans.find_by_id(plan_id.0).await?.is_none() {
            return Err(BillingError::PlanNotFound);
        }

        if self
            .subscriptions
            .find_active_by_user_and_plan(user_id.0, plan_id.0)
            .await?
            .is_some()
        {
            return Err(BillingError::DuplicateSubscription);
        }

        let row = self
            .subscriptions
            .create(CreateSubscription {
                id: SubscriptionId::new().0,
                user_id: user_id.0,
                plan_id: plan_id.0,
                start_date: today,
                next_billing_date: today,
            })
            .await?;

        info!(
            subscription_id = %row.id,
            user_id = %user_id,
            plan_id = %plan_id,
            "Subscription created"
        );
        subscription_from_row(row)
    }

    /// Cancel a subscription
    ///
    /// Terminal: sets status=cancelled and end_date=today, and freezes
    /// billing by clearing the next billing date. Cancelling an already
    /// terminal subscription is rejected, not a no-op.
    pub async fn cancel_subscription(
        &self,
        subscription_id: &SubscriptionId,
        today: NaiveDate,
    ) -> Result<Subscription, BillingError> {
        let row = self
            .subscriptions
            .find_by_id(subscription_id.0)
            .await?
            .ok_or(BillingError::SubscriptionNotFound)?;

        let sub = subscription_from_row(row)?;
        match sub.status {
            SubscriptionStatus::Active => {}
            SubscriptionStatus::Cancelled => {
                return Err(BillingError::InvalidState("subscription is already cancelled"))
            }
            SubscriptionStatus::Expired => {
                return Err(BillingError::InvalidState("subscription has expired"))
            }
        }

        self.subscriptions.cancel(subscription_id.0, today).await?;

        let row = self
            .subscriptions
            .find_by_id(subscription_id.0)
            .await?
            .ok_or(BillingError::SubscriptionNotFound)?;

        info!(subscription_id = %subscription_id, "Subscription cancelled");
        subscription_from_row(row)
    }

    /// List a user's subscriptions
    pub async fn list_subscriptions(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Subscription>, BillingError> {
        if self.users.find_by_id(user_id.0).await?.is_none() {
            return Err(BillingError::UserNotFound);
        }

        let rows = self.subscriptions.find_by_user_id(user_id.0).await?;
        rows.into_iter().map(subscription_from_row).collect()
    }

    // =========================================================================
    // Invoice ledger
    // =========================================================================

    /// List a user's invoices, most recently issued first
    pub async fn list_invoices(&self, user_id: &UserId) -> Result<Vec<Invoice>, BillingError> {
        if self.users.find_by_id(user_id.0).await?.is_none() {
            return Err(BillingError::UserNotFound);
        }

        let rows = self.invoices.find_by_user_id(user_id.0).await?;
        rows.into_iter().map(invoice_from_row).collect()
    }

    /// Get a single invoice
    pub async fn get_invoice(&self, invoice_id: &InvoiceId) -> Result<Invoice, BillingError> {
        let row = self
            .invoices
            .find_by_id(invoice_id.0)
            .await?
            .ok_or(BillingError::InvoiceNotFound)?;
        invoice_from_row(row)
    }

    /// Pay an invoice via the payment processor
    ///
    /// The charge is captured first; the status change is only persisted
    /// when the processor reports success. A decline leaves the invoice in
    /// its current state (pending or overdue). Paying an overdue invoice
    /// is allowed - late payment transitions overdue -> paid.
    pub async fn pay_invoice(
        &self,
        invoice_id: &InvoiceId,
        now: DateTime<Utc>,
    ) -> Result<Invoice, BillingError> {
        let row = self
            .invoices
            .find_by_id(invoice_id.0)
            .await?
            .ok_or(BillingError::InvoiceNotFound)?;
        let invoice = invoice_from_row(row)?;

        if invoice.status == InvoiceStatus::Paid {
            return Err(BillingError::AlreadyPaid);
        }

        self.payments.capture(&invoice).await?;
        self.invoices.mark_paid(invoice_id.0, now).await?;

        let row = self
            .invoices
            .find_by_id(invoice_id.0)
            .await?
            .ok_or(BillingError::InvoiceNotFound)?;

        info!(invoice_id = %invoice_id, "Invoice paid");
        invoice_from_row(row)
    }
}

impl<U, P, S, I> std::fmt::Debug for BillingService<U, P, S, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BillingService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Hash a password with Argon2id
fn hash_password(password: &str) -> Result<String, BillingError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| BillingError::Internal(format!("password hashing failed: {e}")))
}

pub(crate) fn subscription_from_row(row: SubscriptionRow) -> Result<Subscription, BillingError> {
    Subscription::try_from(row).map_err(|e| BillingError::Internal(e.to_string()))
}

pub(crate) fn invoice_from_row(row: InvoiceRow) -> Result<Invoice, BillingError> {
    Invoice::try_from(row).map_err(|e| BillingError::Internal(e.to_string()))
}
