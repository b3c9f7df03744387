//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.
//! Status columns are stored as lowercase text and parsed into the typed
//! enums when converting to domain types.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use tempo_types::{
    Invoice, InvoiceId, Plan, PlanId, StatusParseError, Subscription, SubscriptionId, User, UserId,
};

/// User row from the database
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Plan row from the database
#[derive(Debug, Clone, FromRow)]
pub struct PlanRow {
    pub id: Uuid,
    pub name: String,
    pub price_cents: i64,
    pub description: Option<String>,
    pub billing_interval_months: i32,
}

/// Subscription row from the database
#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub next_billing_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Invoice row from the database
#[derive(Debug, Clone, FromRow)]
pub struct InvoiceRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub subscription_id: Uuid,
    pub amount_cents: i64,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

// Conversions from row types to tempo-types domain types

impl UserRow {
    /// Convert to domain UserId
    pub fn user_id(&self) -> UserId {
        UserId(self.id)
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId(row.id),
            email: row.email,
            created_at: row.created_at,
        }
    }
}

impl From<PlanRow> for Plan {
    fn from(row: PlanRow) -> Self {
        // billing_interval_months has a > 0 check constraint
        Plan {
            id: PlanId(row.id),
            name: row.name,
            price_cents: row.price_cents,
            description: row.description,
            billing_interval_months: row.billing_interval_months as u32,
        }
    }
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = StatusParseError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        Ok(Subscription {
            id: SubscriptionId(row.id),
            user_id: UserId(row.user_id),
            plan_id: PlanId(row.plan_id),
            status: row.status.parse()?,
            start_date: row.start_date,
            end_date: row.end_date,
            next_billing_date: row.next_billing_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = StatusParseError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        Ok(Invoice {
            id: InvoiceId(row.id),
            user_id: UserId(row.user_id),
            plan_id: PlanId(row.plan_id),
            subscription_id: SubscriptionId(row.subscription_id),
            amount_cents: row.amount_cents,
            issue_date: row.issue_date,
            due_date: row.due_date,
            status: row.status.parse()?,
            created_at: row.created_at,
            paid_at: row.paid_at,
        })
    }
}
