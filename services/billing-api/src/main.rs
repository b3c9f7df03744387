//! Tempo Billing API
//!
//! Subscription billing backend: user sign-up, a fixed plan catalog,
//! monthly invoice generation, overdue detection, mock payment reminders,
//! and mock payment capture.
//!
//! ## REST Endpoints
//!
//! - `POST /users` - Create user
//! - `GET /users/{id}` - Get user profile
//! - `GET /plans` - List the plan catalog
//! - `POST /seed-plans` - Seed predefined plans (idempotent)
//! - `POST /users/{id}/subscribe` - Subscribe a user to a plan
//! - `PUT /subscriptions/{id}/cancel` - Cancel a subscription
//! - `GET /users/{id}/subscriptions` - List a user's subscriptions
//! - `GET /users/{id}/invoices` - List a user's invoices
//! - `GET /invoices/{id}` - Get an invoice
//! - `POST /invoices/{id}/pay` - Capture payment (mock)
//!
//! ## Background Work
//!
//! A task worker issues initial invoices enqueued by the subscribe
//! endpoint; three daily loops run renewal invoicing, overdue marking,
//! and reminder dispatch at their configured UTC hours.
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics

mod config;
mod error;
mod handlers;
mod state;
mod worker;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use tokio::signal;
use tokio::sync::mpsc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use tempo_billing_core::{BillingService, ConsoleNotifier, MockPaymentProcessor};
use tempo_db::pg::Repositories;

use crate::config::Config;
use crate::handlers::{health, ready};
use crate::state::AppState;
use crate::worker::DailyJob;

/// Capacity of the fire-and-forget billing task queue
const TASK_QUEUE_CAPACITY: usize = 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("billing_api=debug".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Tempo Billing API");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        http_port = config.http_port,
        grace_period_days = config.billing.grace_period_days,
        reminder_window_days = config.billing.reminder_window_days,
        "Configuration loaded"
    );

    // Initialize metrics
    let metrics_handle = if config.metrics_enabled {
        Some(setup_metrics()?)
    } else {
        None
    };

    // Create database pool
    let pool = tempo_db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Create repositories and billing service
    let repos = Repositories::new(pool.clone());
    let payments = if config.payment_decline {
        MockPaymentProcessor::declining()
    } else {
        MockPaymentProcessor::approving()
    };
    let billing = BillingService::new(
        Arc::new(repos.users),
        Arc::new(repos.plans),
        Arc::new(repos.subscriptions),
        Arc::new(repos.invoices),
        Arc::new(payments),
        Arc::new(ConsoleNotifier),
        config.billing.clone(),
    );

    // Create application state with the billing task queue
    let (task_tx, task_rx) = mpsc::channel(TASK_QUEUE_CAPACITY);
    let state = AppState::new(billing, pool, task_tx, config.clone());

    // Spawn the background worker: task queue + the three daily jobs
    tokio::spawn(worker::run_task_worker(state.billing.clone(), task_rx));
    tokio::spawn(worker::run_daily(
        state.billing.clone(),
        DailyJob::Renewal,
        config.renewal_hour_utc,
    ));
    tokio::spawn(worker::run_daily(
        state.billing.clone(),
        DailyJob::Overdue,
        config.overdue_hour_utc,
    ));
    tokio::spawn(worker::run_daily(
        state.billing.clone(),
        DailyJob::Reminders,
        config.reminder_hour_utc,
    ));

    // Build HTTP router and serve
    let app = build_router(state, metrics_handle);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));

    tracing::info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn build_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let request_timeout = state.request_timeout();

    let api = Router::new()
        // Users
        .route("/users", post(handlers::create_user))
        .route("/users/{id}", get(handlers::get_user))
        // Plan catalog
        .route("/plans", get(handlers::list_plans))
        .route("/seed-plans", post(handlers::seed_plans))
        // Subscriptions
        .route("/users/{id}/subscribe", post(handlers::subscribe))
        .route(
            "/subscriptions/{id}/cancel",
            put(handlers::cancel_subscription),
        )
        .route(
            "/users/{id}/subscriptions",
            get(handlers::list_subscriptions),
        )
        // Invoices
        .route("/users/{id}/invoices", get(handlers::list_user_invoices))
        .route("/invoices/{id}", get(handlers::get_invoice))
        .route("/invoices/{id}/pay", post(handlers::pay_invoice));

    // Health routes (no timeout - must always respond quickly)
    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    // Metrics route (no timeout)
    let metrics_route = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        // Request ID propagation (outermost)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        // Tracing with request details
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // CORS
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // Request timeout (innermost - closest to handler)
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .merge(api)
        .layer(middleware)
        .merge(health_routes) // Health routes without timeout
        .merge(metrics_route) // Metrics route without timeout
        .with_state(state)
}

fn setup_metrics() -> anyhow::Result<PrometheusHandle> {
    // Latency buckets for billing operations; payment capture is the
    // slowest path and still mocked, so sub-second buckets dominate
    let billing_latency_buckets = &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.2, 0.5, 1.0, 2.5];

    let builder = PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full("billing_operation_duration_seconds".to_string()),
        billing_latency_buckets,
    )?;

    let handle = builder.install_recorder()?;

    // Register metrics with descriptions
    metrics::describe_counter!("billing_users_registered_total", "Total users registered");
    metrics::describe_counter!(
        "billing_subscriptions_created_total",
        "Total subscriptions created"
    );
    metrics::describe_counter!(
        "billing_subscriptions_cancelled_total",
        "Total subscriptions cancelled"
    );
    metrics::describe_counter!(
        "billing_payments_captured_total",
        "Total invoice payments captured"
    );
    metrics::describe_counter!(
        "billing_payments_failed_total",
        "Total invoice payment attempts that failed"
    );
    metrics::describe_counter!(
        "billing_invoices_generated_total",
        "Total renewal invoices generated by the daily job"
    );
    metrics::describe_counter!(
        "billing_invoices_marked_overdue_total",
        "Total invoices marked overdue by the daily job"
    );
    metrics::describe_counter!(
        "billing_reminders_sent_total",
        "Total payment reminders dispatched"
    );
    metrics::describe_counter!(
        "billing_job_runs_total",
        "Total daily billing job runs by job"
    );
    metrics::describe_counter!(
        "billing_job_failures_total",
        "Total daily billing job runs that failed outright"
    );
    metrics::describe_counter!(
        "billing_tasks_processed_total",
        "Total queued billing tasks processed"
    );
    metrics::describe_histogram!(
        "billing_operation_duration_seconds",
        "Billing operation latency in seconds by operation type"
    );

    Ok(handle)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
