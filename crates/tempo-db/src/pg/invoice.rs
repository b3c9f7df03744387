//! PostgreSQL invoice repository implementation

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::InvoiceRow;
use crate::repo::{CreateInvoice, InvoiceRepository};

/// PostgreSQL invoice repository
#[derive(Clone)]
pub struct PgInvoiceRepository {
    pool: PgPool,
}

impl PgInvoiceRepository {
    /// Create a new invoice repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvoiceRepository for PgInvoiceRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<InvoiceRow>> {
        let invoice = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, user_id, plan_id, subscription_id, amount_cents,
                   issue_date, due_date, status, created_at, paid_at
            FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> DbResult<Vec<InvoiceRow>> {
        let invoices = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, user_id, plan_id, subscription_id, amount_cents,
                   issue_date, due_date, status, created_at, paid_at
            FROM invoices
            WHERE user_id = $1
            ORDER BY issue_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    async fn find_by_subscription_and_issue_date(
        &self,
        subscription_id: Uuid,
        issue_date: NaiveDate,
    ) -> DbResult<Option<InvoiceRow>> {
        let invoice = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, user_id, plan_id, subscription_id, amount_cents,
                   issue_date, due_date, status, created_at, paid_at
            FROM invoices
            WHERE subscription_id = $1 AND issue_date = $2
            LIMIT 1
            "#,
        )
        .bind(subscription_id)
        .bind(issue_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    async fn find_pending_past_due(&self, today: NaiveDate) -> DbResult<Vec<InvoiceRow>> {
        let invoices = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, user_id, plan_id, subscription_id, amount_cents,
                   issue_date, due_date, status, created_at, paid_at
            FROM invoices
            WHERE status = 'pending' AND due_date < $1
            ORDER BY due_date ASC
            "#,
        )
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    async fn find_due_for_reminder(
        &self,
        today: NaiveDate,
        horizon: NaiveDate,
    ) -> DbResult<Vec<InvoiceRow>> {
        let invoices = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, user_id, plan_id, subscription_id, amount_cents,
                   issue_date, due_date, status, created_at, paid_at
            FROM invoices
            WHERE (status = 'pending' AND due_date BETWEEN $1 AND $2)
               OR status = 'overdue'
            ORDER BY due_date ASC
            "#,
        )
        .bind(today)
        .bind(horizon)
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    async fn create(&self, invoice: CreateInvoice) -> DbResult<InvoiceRow> {
        let row = sqlx::query_as::<_, InvoiceRow>(
            r#"
            INSERT INTO invoices (id, user_id, plan_id, subscription_id,
                                  amount_cents, issue_date, due_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, plan_id, subscription_id, amount_cents,
                      issue_date, due_date, status, created_at, paid_at
            "#,
        )
        .bind(invoice.id)
        .bind(invoice.user_id)
        .bind(invoice.plan_id)
        .bind(invoice.subscription_id)
        .bind(invoice.amount_cents)
        .bind(invoice.issue_date)
        .bind(invoice.due_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn mark_overdue(&self, id: Uuid) -> DbResult<()> {
        // Guard keeps the transition monotonic even under a stale selection
        sqlx::query("UPDATE invoices SET status = 'overdue' WHERE id = $1 AND status = 'pending'")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn mark_paid(&self, id: Uuid, paid_at: DateTime<Utc>) -> DbResult<()> {
        sqlx::query("UPDATE invoices SET status = 'paid', paid_at = $1 WHERE id = $2")
            .bind(paid_at)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
