//! Billing scheduler jobs
//!
//! The four periodic/triggered operations of the billing cycle. Each is
//! idempotent per run and safe to re-trigger; batch jobs process one
//! record at a time, log per-record failures, and continue - a single bad
//! record never halts daily invoicing for the rest of the population.

use chrono::NaiveDate;
use tracing::{info, warn};

use tempo_db::{
    CreateInvoice, InvoiceRepository, PlanRepository, SubscriptionRepository, SubscriptionRow,
    UserRepository,
};
use tempo_types::{InvoiceId, SubscriptionId, SubscriptionStatus};

use crate::schedule::{advance_billing_date, due_date_for, reminder_horizon};
use crate::service::{invoice_from_row, subscription_from_row, BillingService};
use crate::BillingError;

/// Outcome counts for one batch job run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Records selected by the job
    pub processed: usize,
    /// Records the job acted on
    pub succeeded: usize,
    /// Records skipped by an idempotency guard or missing collaborator data
    pub skipped: usize,
    /// Records that errored (logged, batch continued)
    pub failed: usize,
}

impl<U, P, S, I> BillingService<U, P, S, I>
where
    U: UserRepository,
    P: PlanRepository,
    S: SubscriptionRepository,
    I: InvoiceRepository,
{
    // =========================================================================
    // 1. Initial invoice generation (triggered per new subscription)
    // =========================================================================

    /// Generate the first invoice for a new subscription.
    ///
    /// Issued on the subscription's start date. Safe against double
    /// triggering and queue re-delivery: if the start-date invoice already
    /// exists, nothing is created, but the next billing date is still
    /// advanced if the first advancement was lost.
    pub async fn generate_initial_invoice(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<(), BillingError> {
        let Some(row) = self.subscriptions.find_by_id(subscription_id.0).await? else {
            warn!(
                subscription_id = %subscription_id,
                "Subscription not found for initial invoice, skipping"
            );
            return Ok(());
        };
        let sub = subscription_from_row(row)?;

        if sub.status != SubscriptionStatus::Active {
            info!(
                subscription_id = %subscription_id,
                status = %sub.status,
                "Subscription not active, skipping initial invoice"
            );
            return Ok(());
        }

        let next = advance_billing_date(sub.start_date, self.config.billing_interval_months);

        if self
            .invoices
            .find_by_subscription_and_issue_date(sub.id.0, sub.start_date)
            .await?
            .is_some()
        {
            info!(
                subscription_id = %subscription_id,
                issue_date = %sub.start_date,
                "Initial invoice already exists"
            );
            // Recover a lost advancement from a partially applied trigger
            if sub.next_billing_date == Some(sub.start_date) {
                self.subscriptions
                    .update_next_billing_date(sub.id.0, next)
                    .await?;
            }
            return Ok(());
        }

        let invoice_id = self.issue_invoice(&sub, sub.start_date).await?;
        self.subscriptions
            .update_next_billing_date(sub.id.0, next)
            .await?;

        info!(
            invoice_id = %invoice_id,
            subscription_id = %subscription_id,
            next_billing_date = %next,
            "Generated initial invoice"
        );
        Ok(())
    }

    // =========================================================================
    // 2. Renewal invoice generation (daily)
    // =========================================================================

    /// Generate renewal invoices for every active subscription whose next
    /// billing date is exactly `today`, advancing each by one interval.
    pub async fn generate_renewal_invoices(
        &self,
        today: NaiveDate,
    ) -> Result<RunSummary, BillingError> {
        info!(%today, "Running renewal invoice generation");

        let due = self.subscriptions.find_due_for_renewal(today).await?;
        let mut summary = RunSummary {
            processed: due.len(),
            ..RunSummary::default()
        };

        for row in due {
            let subscription_id = row.id;
            match self.renew_one(row, today).await {
                Ok(true) => summary.succeeded += 1,
                Ok(false) => summary.skipped += 1,
                Err(e) => {
                    warn!(
                        subscription_id = %subscription_id,
                        error = %e,
                        "Renewal failed for subscription, continuing batch"
                    );
                    summary.failed += 1;
                }
            }
        }

        info!(?summary, "Renewal invoice generation finished");
        Ok(summary)
    }

    /// Renew a single subscription. Returns false when the idempotency
    /// guard found an invoice already issued today.
    async fn renew_one(&self, row: SubscriptionRow, today: NaiveDate) -> Result<bool, BillingError> {
        let sub = subscription_from_row(row)?;
        let next = advance_billing_date(today, self.config.billing_interval_months);

        if self
            .invoices
            .find_by_subscription_and_issue_date(sub.id.0, today)
            .await?
            .is_some()
        {
            info!(
                subscription_id = %sub.id,
                issue_date = %today,
                "Invoice already issued today, skipping"
            );
            // Still advance so the subscription is not reselected tomorrow
            if sub.next_billing_date == Some(today) {
                self.subscriptions
                    .update_next_billing_date(sub.id.0, next)
                    .await?;
            }
            return Ok(false);
        }

        let invoice_id = self.issue_invoice(&sub, today).await?;
        self.subscriptions
            .update_next_billing_date(sub.id.0, next)
            .await?;

        info!(
            invoice_id = %invoice_id,
            subscription_id = %sub.id,
            next_billing_date = %next,
            "Generated renewal invoice"
        );
        Ok(true)
    }

    /// Create a pending invoice for one billing cycle of a subscription
    async fn issue_invoice(
        &self,
        sub: &tempo_types::Subscription,
        issue_date: NaiveDate,
    ) -> Result<InvoiceId, BillingError> {
        let plan = self
            .plans
            .find_by_id(sub.plan_id.0)
            .await?
            .ok_or(BillingError::PlanNotFound)?;

        let id = InvoiceId::new();
        self.invoices
            .create(CreateInvoice {
                id: id.0,
                user_id: sub.user_id.0,
                plan_id: sub.plan_id.0,
                subscription_id: sub.id.0,
                amount_cents: plan.price_cents,
                issue_date,
                due_date: due_date_for(issue_date, self.config.grace_period_days),
            })
            .await?;

        Ok(id)
    }

    // =========================================================================
    // 3. Overdue marking (daily)
    // =========================================================================

    /// Mark pending invoices past their due date as overdue.
    ///
    /// Idempotent: a run with nothing newly overdue is a no-op.
    pub async fn mark_overdue_invoices(
        &self,
        today: NaiveDate,
    ) -> Result<RunSummary, BillingError> {
        info!(%today, "Running overdue invoice marking");

        let past_due = self.invoices.find_pending_past_due(today).await?;
        let mut summary = RunSummary {
            processed: past_due.len(),
            ..RunSummary::default()
        };

        for row in past_due {
            match self.invoices.mark_overdue(row.id).await {
                Ok(()) => {
                    info!(invoice_id = %row.id, due_date = %row.due_date, "Marked invoice overdue");
                    summary.succeeded += 1;
                }
                Err(e) => {
                    warn!(
                        invoice_id = %row.id,
                        error = %e,
                        "Failed to mark invoice overdue, continuing batch"
                    );
                    summary.failed += 1;
                }
            }
        }

        info!(?summary, "Overdue invoice marking finished");
        Ok(summary)
    }

    // =========================================================================
    // 4. Reminder dispatch (daily)
    // =========================================================================

    /// Send payment reminders for pending invoices due within the
    /// configured window and for every overdue invoice.
    ///
    /// Side-effect only: mutates no subscription or invoice state.
    pub async fn send_payment_reminders(
        &self,
        today: NaiveDate,
    ) -> Result<RunSummary, BillingError> {
        info!(%today, "Running payment reminder dispatch");

        let horizon = reminder_horizon(today, self.config.reminder_window_days);
        let due = self.invoices.find_due_for_reminder(today, horizon).await?;
        let mut summary = RunSummary {
            processed: due.len(),
            ..RunSummary::default()
        };

        for row in due {
            let invoice_id = row.id;
            let result = async {
                let invoice = invoice_from_row(row)?;
                let user = self.users.find_by_id(invoice.user_id.0).await?;
                Ok::<_, BillingError>((invoice, user))
            }
            .await;

            match result {
                Ok((invoice, Some(user))) => {
                    self.notifier.send_reminder(&user.email, &invoice).await;
                    summary.succeeded += 1;
                }
                Ok((invoice, None)) => {
                    warn!(
                        invoice_id = %invoice.id,
                        user_id = %invoice.user_id,
                        "Invoice has no matching user, skipping reminder"
                    );
                    summary.skipped += 1;
                }
                Err(e) => {
                    warn!(
                        invoice_id = %invoice_id,
                        error = %e,
                        "Failed to prepare reminder, continuing batch"
                    );
                    summary.failed += 1;
                }
            }
        }

        info!(?summary, "Payment reminder dispatch finished");
        Ok(summary)
    }
}
