//! Plan catalog types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique plan identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(pub Uuid);

impl PlanId {
    /// Create a new random plan ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a plan ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for PlanId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for PlanId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Subscription plan
///
/// Plans are seeded once and immutable at runtime. Prices are integer
/// cents; the billing interval is fixed at one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Plan ID
    pub id: PlanId,
    /// Plan name (unique)
    pub name: String,
    /// Monthly price in cents
    pub price_cents: i64,
    /// Human-readable description
    pub description: Option<String>,
    /// Billing interval in calendar months (fixed at 1)
    pub billing_interval_months: u32,
}

/// A plan in the predefined catalog, seeded via `POST /seed-plans`
#[derive(Debug, Clone, Copy)]
pub struct PlanSeed {
    /// Plan name
    pub name: &'static str,
    /// Monthly price in cents
    pub price_cents: i64,
    /// Description
    pub description: &'static str,
}

/// The predefined plan catalog
pub const PLAN_CATALOG: &[PlanSeed] = &[
    PlanSeed {
        name: "Basic",
        price_cents: 1_000,
        description: "Basic monthly plan",
    },
    PlanSeed {
        name: "Pro",
        price_cents: 2_500,
        description: "Pro monthly plan with more features",
    },
    PlanSeed {
        name: "Enterprise",
        price_cents: 7_500,
        description: "Enterprise plan for large teams",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_names_are_unique() {
        let mut names: Vec<_> = PLAN_CATALOG.iter().map(|p| p.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), PLAN_CATALOG.len());
    }

    #[test]
    fn catalog_prices_are_positive() {
        assert!(PLAN_CATALOG.iter().all(|p| p.price_cents > 0));
    }
}
