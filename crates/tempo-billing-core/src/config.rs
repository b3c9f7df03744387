//! Billing configuration

/// Default days between invoice issue and due date
pub const DEFAULT_GRACE_PERIOD_DAYS: u32 = 15;

/// Default reminder look-ahead window in days
pub const DEFAULT_REMINDER_WINDOW_DAYS: u32 = 3;

/// Default billing interval in calendar months
pub const DEFAULT_BILLING_INTERVAL_MONTHS: u32 = 1;

/// Billing service configuration
#[derive(Debug, Clone)]
pub struct BillingConfig {
    /// Days between an invoice's issue date and its due date
    pub grace_period_days: u32,
    /// Pending invoices due within this many days get a reminder
    pub reminder_window_days: u32,
    /// Calendar months between invoices (fixed at 1 in practice)
    pub billing_interval_months: u32,
}

impl BillingConfig {
    /// Create a config with the default cadence
    pub fn new() -> Self {
        Self {
            grace_period_days: DEFAULT_GRACE_PERIOD_DAYS,
            reminder_window_days: DEFAULT_REMINDER_WINDOW_DAYS,
            billing_interval_months: DEFAULT_BILLING_INTERVAL_MONTHS,
        }
    }

    /// Set the grace period in days
    pub fn with_grace_period(mut self, days: u32) -> Self {
        self.grace_period_days = days;
        self
    }

    /// Set the reminder look-ahead window in days
    pub fn with_reminder_window(mut self, days: u32) -> Self {
        self.reminder_window_days = days;
        self
    }

    /// Set the billing interval in calendar months
    pub fn with_billing_interval(mut self, months: u32) -> Self {
        self.billing_interval_months = months;
        self
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self::new()
    }
}
