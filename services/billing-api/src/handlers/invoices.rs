//! Invoice handlers

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;

use tempo_types::{Invoice, InvoiceId, UserId};

use crate::error::ApiResult;
use crate::state::AppState;

/// Record HTTP operation duration with result label
#[inline]
fn record_op_duration(operation: &'static str, start: Instant, success: bool) {
    let result = if success { "ok" } else { "err" };
    metrics::histogram!(
        "billing_operation_duration_seconds",
        "operation" => operation,
        "result" => result
    )
    .record(start.elapsed().as_secs_f64());
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub id: String,
    pub user_id: String,
    pub plan_id: String,
    pub subscription_id: String,
    pub amount_cents: i64,
    pub issue_date: String,
    pub due_date: String,
    pub status: String,
    pub created_at: String,
    pub paid_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListInvoicesResponse {
    pub invoices: Vec<InvoiceResponse>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /users/{id}/invoices
#[instrument(skip(state), fields(user_id = %user_id))]
pub async fn list_user_invoices(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<ListInvoicesResponse>> {
    let start = Instant::now();

    let invoices = state.billing.list_invoices(&UserId(user_id)).await?;

    record_op_duration("list_invoices", start, true);

    Ok(Json(ListInvoicesResponse {
        invoices: invoices.into_iter().map(invoice_to_response).collect(),
    }))
}

/// GET /invoices/{id}
#[instrument(skip(state), fields(invoice_id = %invoice_id))]
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> ApiResult<Json<InvoiceResponse>> {
    let start = Instant::now();

    let invoice = state.billing.get_invoice(&InvoiceId(invoice_id)).await?;

    record_op_duration("get_invoice", start, true);

    Ok(Json(invoice_to_response(invoice)))
}

/// POST /invoices/{id}/pay
#[instrument(skip(state), fields(invoice_id = %invoice_id))]
pub async fn pay_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> ApiResult<Json<InvoiceResponse>> {
    let start = Instant::now();

    let result = state
        .billing
        .pay_invoice(&InvoiceId(invoice_id), Utc::now())
        .await;

    match &result {
        Ok(_) => metrics::counter!("billing_payments_captured_total").increment(1),
        Err(_) => metrics::counter!("billing_payments_failed_total").increment(1),
    }
    record_op_duration("pay_invoice", start, result.is_ok());

    let invoice = result?;
    tracing::info!(invoice_id = %invoice.id, "Payment captured");

    Ok(Json(invoice_to_response(invoice)))
}

fn invoice_to_response(inv: Invoice) -> InvoiceResponse {
    InvoiceResponse {
        id: inv.id.to_string(),
        user_id: inv.user_id.to_string(),
        plan_id: inv.plan_id.to_string(),
        subscription_id: inv.subscription_id.to_string(),
        amount_cents: inv.amount_cents,
        issue_date: inv.issue_date.to_string(),
        due_date: inv.due_date.to_string(),
        status: inv.status.to_string(),
        created_at: inv.created_at.to_rfc3339(),
        paid_at: inv.paid_at.map(|t| t.to_rfc3339()),
    }
}
