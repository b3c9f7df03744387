//! Plan catalog handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::instrument;

use tempo_types::Plan;

use crate::error::ApiResult;
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub id: String,
    pub name: String,
    pub price_cents: i64,
    pub description: Option<String>,
    pub billing_interval_months: u32,
}

#[derive(Debug, Serialize)]
pub struct ListPlansResponse {
    pub plans: Vec<PlanResponse>,
}

#[derive(Debug, Serialize)]
pub struct SeedPlansResponse {
    pub created: usize,
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /plans
#[instrument(skip(state))]
pub async fn list_plans(State(state): State<AppState>) -> ApiResult<Json<ListPlansResponse>> {
    let plans = state.billing.list_plans().await?;
    Ok(Json(ListPlansResponse {
        plans: plans.into_iter().map(plan_to_response).collect(),
    }))
}

/// POST /seed-plans
#[instrument(skip(state))]
pub async fn seed_plans(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<SeedPlansResponse>)> {
    let created = state.billing.seed_plans().await?;

    let message = if created > 0 {
        format!("{created} new plans seeded successfully")
    } else {
        "Plans already exist, nothing to seed".to_string()
    };

    Ok((StatusCode::CREATED, Json(SeedPlansResponse { created, message })))
}

fn plan_to_response(plan: Plan) -> PlanResponse {
    PlanResponse {
        id: plan.id.to_string(),
        name: plan.name,
        price_cents: plan.price_cents,
        description: plan.description,
        billing_interval_months: plan.billing_interval_months,
    }
}
