//! Invoice ledger types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::subscription::StatusParseError;
use crate::{PlanId, SubscriptionId, UserId};

/// Unique invoice identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(pub Uuid);

impl InvoiceId {
    /// Create a new random invoice ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an invoice ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for InvoiceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for InvoiceId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Invoice status
///
/// Monotonic: pending -> {paid, overdue}; overdue -> paid remains possible
/// (late payment); paid is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Issued and awaiting payment
    Pending,
    /// Paid (terminal)
    Paid,
    /// Past the due date without payment
    Overdue,
}

impl InvoiceStatus {
    /// The lowercase string stored in the database
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "overdue" => Ok(Self::Overdue),
            _ => Err(StatusParseError(s.to_string())),
        }
    }
}

/// A billable document for one subscription cycle
///
/// User and plan are denormalized for listing convenience; the invoice is
/// exclusively owned by its subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice ID
    pub id: InvoiceId,
    /// User billed by this invoice
    pub user_id: UserId,
    /// Plan the amount was taken from
    pub plan_id: PlanId,
    /// Owning subscription
    pub subscription_id: SubscriptionId,
    /// Amount in cents
    pub amount_cents: i64,
    /// Day the invoice was issued
    pub issue_date: NaiveDate,
    /// Issue date plus the grace period
    pub due_date: NaiveDate,
    /// Ledger status
    pub status: InvoiceStatus,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When the invoice was paid (if paid)
    pub paid_at: Option<DateTime<Utc>>,
}
