//! Subscription handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;

use tempo_types::{PlanId, Subscription, SubscriptionId, UserId};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::worker::BillingTask;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub plan_id: String,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub id: String,
    pub user_id: String,
    pub plan_id: String,
    pub status: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub next_billing_date: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct ListSubscriptionsResponse {
    pub subscriptions: Vec<SubscriptionResponse>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /users/{id}/subscribe
#[instrument(skip(state, req), fields(user_id = %user_id, plan_id = %req.plan_id))]
pub async fn subscribe(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<SubscribeRequest>,
) -> ApiResult<(StatusCode, Json<SubscriptionResponse>)> {
    let start = Instant::now();

    let plan_id = PlanId::parse(&req.plan_id)
        .map_err(|_| ApiError::BadRequest("Invalid plan_id".to_string()))?;

    let today = Utc::now().date_naive();
    let subscription = state
        .billing
        .subscribe(&UserId(user_id), &plan_id, today)
        .await?;

    // Fire-and-forget: the first invoice is issued by the worker. A full
    // queue only costs the immediate trigger - the guard-protected job can
    // be re-driven safely.
    if let Err(e) = state.tasks.try_send(BillingTask::GenerateInitialInvoice {
        subscription_id: subscription.id,
    }) {
        tracing::warn!(
            subscription_id = %subscription.id,
            error = %e,
            "Failed to enqueue initial invoice task"
        );
    }

    metrics::counter!("billing_subscriptions_created_total").increment(1);
    metrics::histogram!("billing_operation_duration_seconds", "operation" => "subscribe")
        .record(start.elapsed().as_secs_f64());

    Ok((
        StatusCode::CREATED,
        Json(subscription_to_response(subscription)),
    ))
}

/// PUT /subscriptions/{id}/cancel
#[instrument(skip(state), fields(subscription_id = %subscription_id))]
pub async fn cancel_subscription(
    State(state): State<AppState>,
    Path(subscription_id): Path<Uuid>,
) -> ApiResult<Json<SubscriptionResponse>> {
    let start = Instant::now();

    let today = Utc::now().date_naive();
    let subscription = state
        .billing
        .cancel_subscription(&SubscriptionId(subscription_id), today)
        .await?;

    metrics::counter!("billing_subscriptions_cancelled_total").increment(1);
    metrics::histogram!("billing_operation_duration_seconds", "operation" => "cancel_subscription")
        .record(start.elapsed().as_secs_f64());

    Ok(Json(subscription_to_response(subscription)))
}

/// GET /users/{id}/subscriptions
#[instrument(skip(state), fields(user_id = %user_id))]
pub async fn list_subscriptions(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<ListSubscriptionsResponse>> {
    let subscriptions = state.billing.list_subscriptions(&UserId(user_id)).await?;

    Ok(Json(ListSubscriptionsResponse {
        subscriptions: subscriptions
            .into_iter()
            .map(subscription_to_response)
            .collect(),
    }))
}

fn subscription_to_response(sub: Subscription) -> SubscriptionResponse {
    SubscriptionResponse {
        id: sub.id.to_string(),
        user_id: sub.user_id.to_string(),
        plan_id: sub.plan_id.to_string(),
        status: sub.status.to_string(),
        start_date: sub.start_date.to_string(),
        end_date: sub.end_date.map(|d| d.to_string()),
        next_billing_date: sub.next_billing_date.map(|d| d.to_string()),
        created_at: sub.created_at.to_rfc3339(),
    }
}
