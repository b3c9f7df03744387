//! Repository traits
//!
//! Define async repository interfaces for database operations.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::*;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<UserRow>>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>>;

    /// Create a new user
    async fn create(&self, user: CreateUser) -> DbResult<UserRow>;
}

/// Create user input
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
}

/// Plan repository trait
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// Find a plan by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<PlanRow>>;

    /// Find a plan by name
    async fn find_by_name(&self, name: &str) -> DbResult<Option<PlanRow>>;

    /// List all plans
    async fn list(&self) -> DbResult<Vec<PlanRow>>;

    /// Create a new plan
    async fn create(&self, plan: CreatePlan) -> DbResult<PlanRow>;
}

/// Create plan input
#[derive(Debug, Clone)]
pub struct CreatePlan {
    pub id: Uuid,
    pub name: String,
    pub price_cents: i64,
    pub description: Option<String>,
    pub billing_interval_months: i32,
}

/// Subscription repository trait
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Find a subscription by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<SubscriptionRow>>;

    /// Find all subscriptions for a user
    async fn find_by_user_id(&self, user_id: Uuid) -> DbResult<Vec<SubscriptionRow>>;

    /// Find a user's active subscription to a specific plan
    async fn find_active_by_user_and_plan(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> DbResult<Option<SubscriptionRow>>;

    /// Find active subscriptions whose next billing date is exactly the given date
    async fn find_due_for_renewal(&self, billing_date: NaiveDate) -> DbResult<Vec<SubscriptionRow>>;

    /// Create a new subscription
    async fn create(&self, sub: CreateSubscription) -> DbResult<SubscriptionRow>;

    /// Cancel a subscription: status=cancelled, end_date set, billing frozen
    async fn cancel(&self, id: Uuid, end_date: NaiveDate) -> DbResult<()>;

    /// Advance the next billing date
    async fn update_next_billing_date(&self, id: Uuid, next_billing_date: NaiveDate)
        -> DbResult<()>;
}

/// Create subscription input
#[derive(Debug, Clone)]
pub struct CreateSubscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub start_date: NaiveDate,
    pub next_billing_date: NaiveDate,
}

/// Invoice repository trait
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Find an invoice by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<InvoiceRow>>;

    /// Find all invoices for a user, most recently issued first
    async fn find_by_user_id(&self, user_id: Uuid) -> DbResult<Vec<InvoiceRow>>;

    /// Find the invoice a subscription was issued on a specific date, if any
    ///
    /// Used as the duplicate-generation guard: at most one invoice exists
    /// per subscription and issue date.
    async fn find_by_subscription_and_issue_date(
        &self,
        subscription_id: Uuid,
        issue_date: NaiveDate,
    ) -> DbResult<Option<InvoiceRow>>;

    /// Find pending invoices whose due date has passed
    async fn find_pending_past_due(&self, today: NaiveDate) -> DbResult<Vec<InvoiceRow>>;

    /// Find invoices needing a payment reminder: pending and due within
    /// the window, or already overdue
    async fn find_due_for_reminder(
        &self,
        today: NaiveDate,
        horizon: NaiveDate,
    ) -> DbResult<Vec<InvoiceRow>>;

    /// Create a new invoice
    async fn create(&self, invoice: CreateInvoice) -> DbResult<InvoiceRow>;

    /// Mark a pending invoice as overdue
    async fn mark_overdue(&self, id: Uuid) -> DbResult<()>;

    /// Mark an invoice as paid
    async fn mark_paid(&self, id: Uuid, paid_at: DateTime<Utc>) -> DbResult<()>;
}

/// Create invoice input
#[derive(Debug, Clone)]
pub struct CreateInvoice {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub subscription_id: Uuid,
    pub amount_cents: i64,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
}
