//! Property-based tests for billing-cycle date arithmetic
//!
//! These pin the calendar behavior the renewal job depends on:
//! - month advancement is calendar-aware and clamps at month end
//! - the day of month is stable for days that exist in every month
//! - due dates sit exactly one grace period after issue
//! - daily triggers always land on the requested hour, within 24h

use chrono::{Datelike, NaiveDate, Timelike};
use proptest::prelude::*;

use tempo_billing_core::schedule::{advance_billing_date, due_date_for, duration_until_hour};

// ============================================================================
// Strategies
// ============================================================================

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=31)
        .prop_filter_map("invalid calendar day", |(y, m, d)| {
            NaiveDate::from_ymd_opt(y, m, d)
        })
}

fn arb_safe_day_date() -> impl Strategy<Value = NaiveDate> {
    // Days that exist in every month
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

// ============================================================================
// Month advancement
// ============================================================================

proptest! {
    /// Property: one month forward is always 28-31 days ahead
    #[test]
    fn prop_one_month_is_one_calendar_month(date in arb_date()) {
        let next = advance_billing_date(date, 1);
        let delta = (next - date).num_days();
        prop_assert!((28..=31).contains(&delta), "jumped {delta} days from {date} to {next}");
    }

    /// Property: the day of month never grows (equal, or clamped down at
    /// month end)
    #[test]
    fn prop_day_of_month_never_grows(date in arb_date()) {
        let next = advance_billing_date(date, 1);
        prop_assert!(next.day() <= date.day());
    }

    /// Property: days 1-28 are preserved exactly
    #[test]
    fn prop_safe_days_are_preserved(date in arb_safe_day_date()) {
        let next = advance_billing_date(date, 1);
        prop_assert_eq!(next.day(), date.day());
        let expected_month = if date.month() == 12 { 1 } else { date.month() + 1 };
        prop_assert_eq!(next.month(), expected_month);
    }

    /// Property: twelve single-month advances land on the same day next
    /// year for days that exist in every month
    #[test]
    fn prop_twelve_advances_make_a_year(date in arb_safe_day_date()) {
        let mut cursor = date;
        for _ in 0..12 {
            cursor = advance_billing_date(cursor, 1);
        }
        prop_assert_eq!(cursor, advance_billing_date(date, 12));
        prop_assert_eq!(cursor.year(), date.year() + 1);
        prop_assert_eq!(cursor.month(), date.month());
        prop_assert_eq!(cursor.day(), date.day());
    }
}

// ============================================================================
// Due dates
// ============================================================================

proptest! {
    /// Property: the due date is exactly the grace period after issue
    #[test]
    fn prop_due_date_is_issue_plus_grace(date in arb_date(), grace in 0u32..60) {
        let due = due_date_for(date, grace);
        prop_assert_eq!((due - date).num_days(), i64::from(grace));
    }
}

// ============================================================================
// Daily triggers
// ============================================================================

proptest! {
    /// Property: the next trigger is strictly in the future, at most a day
    /// away, and lands exactly on the requested hour
    #[test]
    fn prop_trigger_lands_on_the_hour(
        date in arb_date(),
        now_secs in 0u32..86_400,
        hour in 0u32..24,
    ) {
        let now = date
            .and_hms_opt(now_secs / 3600, (now_secs / 60) % 60, now_secs % 60)
            .unwrap()
            .and_utc();

        let wait = duration_until_hour(now, hour);
        let fire = now + chrono::Duration::from_std(wait).unwrap();

        prop_assert!(fire > now);
        prop_assert!(fire - now <= chrono::Duration::days(1));
        prop_assert_eq!(fire.hour(), hour);
        prop_assert_eq!(fire.minute(), 0);
        prop_assert_eq!(fire.second(), 0);
    }
}
