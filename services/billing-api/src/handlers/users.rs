//! User handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;

use tempo_types::{User, UserId};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Maximum accepted email length (RFC 5321 limit)
const MAX_EMAIL_LEN: usize = 254;
/// Minimum accepted password length
const MIN_PASSWORD_LEN: usize = 8;
/// Maximum accepted password length
const MAX_PASSWORD_LEN: usize = 128;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub created_at: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /users
#[instrument(skip(state, req))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let start = Instant::now();

    validate_email(&req.email).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    validate_password(&req.password).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let user = state.billing.register_user(&req.email, &req.password).await?;

    metrics::counter!("billing_users_registered_total").increment(1);
    metrics::histogram!("billing_operation_duration_seconds", "operation" => "create_user")
        .record(start.elapsed().as_secs_f64());

    Ok((StatusCode::CREATED, Json(user_to_response(user))))
}

/// GET /users/{id}
#[instrument(skip(state), fields(user_id = %user_id))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.billing.get_user(&UserId(user_id)).await?;
    Ok(Json(user_to_response(user)))
}

fn user_to_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        email: user.email,
        created_at: user.created_at.to_rfc3339(),
    }
}

/// Validate an email address: one `@`, non-empty local part, and a domain
/// with at least one dot
fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.is_empty() {
        return Err("Email cannot be empty");
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err("Email too long");
    }
    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err("Email contains invalid characters");
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err("Email must contain '@'");
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err("Malformed email address");
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err("Malformed email domain");
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err("Password too short");
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err("Password too long");
    }
    Ok(())
}
