//! PostgreSQL subscription repository implementation

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::SubscriptionRow;
use crate::repo::{CreateSubscription, SubscriptionRepository};

/// PostgreSQL subscription repository
#[derive(Clone)]
pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    /// Create a new subscription repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<SubscriptionRow>> {
        let sub = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, user_id, plan_id, status, start_date, end_date,
                   next_billing_date, created_at, updated_at
            FROM subscriptions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sub)
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> DbResult<Vec<SubscriptionRow>> {
        let subs = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, user_id, plan_id, status, start_date, end_date,
                   next_billing_date, created_at, updated_at
            FROM subscriptions
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(subs)
    }

    async fn find_active_by_user_and_plan(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> DbResult<Option<SubscriptionRow>> {
        let sub = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, user_id, plan_id, status, start_date, end_date,
                   next_billing_date, created_at, updated_at
            FROM subscriptions
            WHERE user_id = $1 AND plan_id = $2 AND status = 'active'
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(plan_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sub)
    }

    async fn find_due_for_renewal(
        &self,
        billing_date: NaiveDate,
    ) -> DbResult<Vec<SubscriptionRow>> {
        let subs = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, user_id, plan_id, status, start_date, end_date,
                   next_billing_date, created_at, updated_at
            FROM subscriptions
            WHERE status = 'active' AND next_billing_date = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(billing_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(subs)
    }

    async fn create(&self, sub: CreateSubscription) -> DbResult<SubscriptionRow> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            INSERT INTO subscriptions (id, user_id, plan_id, start_date, next_billing_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, plan_id, status, start_date, end_date,
                      next_billing_date, created_at, updated_at
            "#,
        )
        .bind(sub.id)
        .bind(sub.user_id)
        .bind(sub.plan_id)
        .bind(sub.start_date)
        .bind(sub.next_billing_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn cancel(&self, id: Uuid, end_date: NaiveDate) -> DbResult<()> {
        sqlx::query(
            r#"
            UPDATE subscriptions
            SET status = 'cancelled', end_date = $1, next_billing_date = NULL,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(end_date)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_next_billing_date(
        &self,
        id: Uuid,
        next_billing_date: NaiveDate,
    ) -> DbResult<()> {
        sqlx::query(
            "UPDATE subscriptions SET next_billing_date = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(next_billing_date)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
