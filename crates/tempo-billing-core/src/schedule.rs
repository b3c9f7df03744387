//! Billing-cycle date arithmetic
//!
//! All billing dates are calendar dates; month advancement is
//! calendar-aware (Jan 31 + 1 month = Feb 28/29, never Mar 2/3).

use chrono::{DateTime, Days, Months, NaiveDate, Utc};

/// Advance a billing date by whole calendar months.
///
/// Month-end dates clamp to the last day of the target month.
pub fn advance_billing_date(date: NaiveDate, months: u32) -> NaiveDate {
    date + Months::new(months)
}

/// Due date for an invoice: issue date plus the grace period.
pub fn due_date_for(issue_date: NaiveDate, grace_period_days: u32) -> NaiveDate {
    issue_date + Days::new(u64::from(grace_period_days))
}

/// Last day of the reminder look-ahead window.
pub fn reminder_horizon(today: NaiveDate, window_days: u32) -> NaiveDate {
    today + Days::new(u64::from(window_days))
}

/// Time until the next daily trigger at `hour:00:00` UTC, strictly in the
/// future.
pub fn duration_until_hour(now: DateTime<Utc>, hour: u32) -> std::time::Duration {
    let hour = hour % 24;
    let mut target = now
        .date_naive()
        .and_hms_opt(hour, 0, 0)
        .expect("hour reduced modulo 24")
        .and_utc();
    if target <= now {
        target += chrono::Duration::days(1);
    }
    (target - now).to_std().unwrap_or_default()
}
