//! Configuration for the Billing API service.

use std::time::Duration;

use tempo_billing_core::BillingConfig;

/// Billing API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,
    /// Database URL
    pub database_url: String,
    /// Billing core configuration
    pub billing: BillingConfig,
    /// Hour (UTC) the renewal invoice job runs
    pub renewal_hour_utc: u32,
    /// Hour (UTC) the overdue marking job runs
    pub overdue_hour_utc: u32,
    /// Hour (UTC) the reminder dispatch job runs
    pub reminder_hour_utc: u32,
    /// Whether the mock payment processor declines every charge
    pub payment_decline: bool,
    /// Request timeout
    pub request_timeout: Duration,
    /// Metrics enabled
    pub metrics_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Database
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        // Server port
        let http_port = std::env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        // Billing cadence
        let grace_period_days: u32 = std::env::var("GRACE_PERIOD_DAYS")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("GRACE_PERIOD_DAYS"))?;

        let reminder_window_days: u32 = std::env::var("REMINDER_WINDOW_DAYS")
            .unwrap_or_else(|_| "3".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REMINDER_WINDOW_DAYS"))?;

        // Daily trigger hours (UTC)
        let renewal_hour_utc = parse_hour("RENEWAL_HOUR_UTC", 1)?;
        let overdue_hour_utc = parse_hour("OVERDUE_HOUR_UTC", 2)?;
        let reminder_hour_utc = parse_hour("REMINDER_HOUR_UTC", 3)?;

        // Mock payment behavior
        let payment_decline = std::env::var("PAYMENT_DECLINE")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("PAYMENT_DECLINE"))?;

        // Request timeout
        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))?;

        // Metrics
        let metrics_enabled = std::env::var("METRICS_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        let billing = BillingConfig::new()
            .with_grace_period(grace_period_days)
            .with_reminder_window(reminder_window_days);

        Ok(Self {
            http_port,
            database_url,
            billing,
            renewal_hour_utc,
            overdue_hour_utc,
            reminder_hour_utc,
            payment_decline,
            request_timeout: Duration::from_secs(request_timeout_secs),
            metrics_enabled,
        })
    }
}

fn parse_hour(var: &'static str, default: u32) -> Result<u32, ConfigError> {
    let hour: u32 = std::env::var(var)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| ConfigError::Invalid(var))?;
    if hour >= 24 {
        return Err(ConfigError::Invalid(var));
    }
    Ok(hour)
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
