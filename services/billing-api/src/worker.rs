//! Background billing worker
//!
//! Two kinds of work run outside the request path:
//! - the task queue: fire-and-forget operations enqueued by handlers
//!   (currently initial invoice generation after subscribe)
//! - the daily jobs: renewal invoicing, overdue marking, and reminder
//!   dispatch, each triggered once per day at its configured UTC hour
//!
//! Delivery is at-least-once; the jobs carry their own idempotency guards,
//! so re-running any of them is safe.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{error, info};

use tempo_billing_core::schedule::duration_until_hour;
use tempo_billing_core::RunSummary;
use tempo_types::SubscriptionId;

use crate::state::Billing;

/// Fire-and-forget billing work enqueued by the API layer
#[derive(Debug, Clone)]
pub enum BillingTask {
    /// Issue the first invoice for a freshly created subscription
    GenerateInitialInvoice { subscription_id: SubscriptionId },
}

/// Consume the billing task queue until all senders are dropped
pub async fn run_task_worker(billing: Arc<Billing>, mut rx: mpsc::Receiver<BillingTask>) {
    info!("Billing task worker started");

    while let Some(task) = rx.recv().await {
        match task {
            BillingTask::GenerateInitialInvoice { subscription_id } => {
                metrics::counter!("billing_tasks_processed_total", "task" => "initial_invoice")
                    .increment(1);

                if let Err(e) = billing.generate_initial_invoice(&subscription_id).await {
                    error!(
                        subscription_id = %subscription_id,
                        error = %e,
                        "Initial invoice task failed"
                    );
                }
            }
        }
    }

    info!("Billing task worker stopped");
}

/// The three time-driven scheduler operations
#[derive(Debug, Clone, Copy)]
pub enum DailyJob {
    /// Generate renewal invoices for subscriptions due today
    Renewal,
    /// Mark pending invoices past their due date as overdue
    Overdue,
    /// Send payment reminders for due-soon and overdue invoices
    Reminders,
}

impl DailyJob {
    fn name(&self) -> &'static str {
        match self {
            Self::Renewal => "renewal_invoices",
            Self::Overdue => "overdue_marking",
            Self::Reminders => "payment_reminders",
        }
    }
}

/// Run one scheduler job once per day at `hour:00` UTC, forever.
///
/// Each run uses the current UTC calendar date; a failed run is logged and
/// the loop keeps going - the next day's trigger retries naturally.
pub async fn run_daily(billing: Arc<Billing>, job: DailyJob, hour: u32) {
    loop {
        let wait = duration_until_hour(Utc::now(), hour);
        info!(
            job = job.name(),
            wait_secs = wait.as_secs(),
            "Scheduled next daily run"
        );
        tokio::time::sleep(wait).await;

        let today = Utc::now().date_naive();
        let result = match job {
            DailyJob::Renewal => billing.generate_renewal_invoices(today).await,
            DailyJob::Overdue => billing.mark_overdue_invoices(today).await,
            DailyJob::Reminders => billing.send_payment_reminders(today).await,
        };

        match result {
            Ok(summary) => record_run(job, summary),
            Err(e) => {
                metrics::counter!("billing_job_failures_total", "job" => job.name()).increment(1);
                error!(job = job.name(), error = %e, "Daily billing job failed");
            }
        }
    }
}

fn record_run(job: DailyJob, summary: RunSummary) {
    metrics::counter!("billing_job_runs_total", "job" => job.name()).increment(1);

    let counter = match job {
        DailyJob::Renewal => "billing_invoices_generated_total",
        DailyJob::Overdue => "billing_invoices_marked_overdue_total",
        DailyJob::Reminders => "billing_reminders_sent_total",
    };
    metrics::counter!(counter).increment(summary.succeeded as u64);

    info!(
        job = job.name(),
        processed = summary.processed,
        succeeded = summary.succeeded,
        skipped = summary.skipped,
        failed = summary.failed,
        "Daily billing job finished"
    );
}
