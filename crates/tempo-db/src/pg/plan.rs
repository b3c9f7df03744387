//! PostgreSQL plan repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::PlanRow;
use crate::repo::{CreatePlan, PlanRepository};

/// PostgreSQL plan repository
#[derive(Clone)]
pub struct PgPlanRepository {
    pool: PgPool,
}

impl PgPlanRepository {
    /// Create a new plan repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanRepository for PgPlanRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<PlanRow>> {
        let plan = sqlx::query_as::<_, PlanRow>(
            r#"
            SELECT id, name, price_cents, description, billing_interval_months
            FROM plans
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(plan)
    }

    async fn find_by_name(&self, name: &str) -> DbResult<Option<PlanRow>> {
        let plan = sqlx::query_as::<_, PlanRow>(
            r#"
            SELECT id, name, price_cents, description, billing_interval_months
            FROM plans
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(plan)
    }

    async fn list(&self) -> DbResult<Vec<PlanRow>> {
        let plans = sqlx::query_as::<_, PlanRow>(
            r#"
            SELECT id, name, price_cents, description, billing_interval_months
            FROM plans
            ORDER BY price_cents ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(plans)
    }

    async fn create(&self, plan: CreatePlan) -> DbResult<PlanRow> {
        let row = sqlx::query_as::<_, PlanRow>(
            r#"
            INSERT INTO plans (id, name, price_cents, description, billing_interval_months)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, price_cents, description, billing_interval_months
            "#,
        )
        .bind(plan.id)
        .bind(&plan.name)
        .bind(plan.price_cents)
        .bind(&plan.description)
        .bind(plan.billing_interval_months)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
