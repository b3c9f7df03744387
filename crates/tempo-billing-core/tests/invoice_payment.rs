//! Invoice payment tests
//!
//! Payment capture goes through the mock processor first; the ledger only
//! changes when the processor approves.

mod common;

use chrono::{TimeZone, Utc};

use tempo_billing_core::{BillingError, MockPaymentProcessor};
use tempo_types::{Invoice, InvoiceId, InvoiceStatus};

use common::{date, TestHarness};

fn paid_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 20, 12, 0, 0).unwrap()
}

async fn issued_invoice(h: &TestHarness) -> Invoice {
    let user = h.user("payer@example.com").await;
    let plan = h.plan("Pro", 2_000);
    let sub = h
        .service
        .subscribe(&user, &plan, date(2024, 1, 15))
        .await
        .unwrap();
    h.service.generate_initial_invoice(&sub.id).await.unwrap();
    h.service.list_invoices(&user).await.unwrap().remove(0)
}

#[tokio::test]
async fn paying_a_pending_invoice_succeeds() {
    let h = TestHarness::new();
    let invoice = issued_invoice(&h).await;

    let paid = h.service.pay_invoice(&invoice.id, paid_at()).await.unwrap();
    assert_eq!(paid.status, InvoiceStatus::Paid);
    assert_eq!(paid.paid_at, Some(paid_at()));
}

#[tokio::test]
async fn paying_twice_is_rejected() {
    let h = TestHarness::new();
    let invoice = issued_invoice(&h).await;

    h.service.pay_invoice(&invoice.id, paid_at()).await.unwrap();
    let err = h
        .service
        .pay_invoice(&invoice.id, paid_at())
        .await
        .unwrap_err();
    assert!(matches!(err, BillingError::AlreadyPaid));
}

#[tokio::test]
async fn declined_payment_leaves_invoice_pending() {
    let h = TestHarness::with_payments(MockPaymentProcessor::declining());
    let invoice = issued_invoice(&h).await;

    let err = h
        .service
        .pay_invoice(&invoice.id, paid_at())
        .await
        .unwrap_err();
    assert!(matches!(err, BillingError::PaymentDeclined(_)));

    let after = h.service.get_invoice(&invoice.id).await.unwrap();
    assert_eq!(after.status, InvoiceStatus::Pending);
    assert_eq!(after.paid_at, None);
}

#[tokio::test]
async fn late_payment_settles_an_overdue_invoice() {
    let h = TestHarness::new();
    let invoice = issued_invoice(&h).await;

    // Past due on 2024-01-31
    h.service
        .mark_overdue_invoices(date(2024, 1, 31))
        .await
        .unwrap();
    let overdue = h.service.get_invoice(&invoice.id).await.unwrap();
    assert_eq!(overdue.status, InvoiceStatus::Overdue);

    let paid = h.service.pay_invoice(&invoice.id, paid_at()).await.unwrap();
    assert_eq!(paid.status, InvoiceStatus::Paid);
}

#[tokio::test]
async fn declined_payment_leaves_overdue_invoice_overdue() {
    let h = TestHarness::with_payments(MockPaymentProcessor::declining());
    let invoice = issued_invoice(&h).await;

    h.service
        .mark_overdue_invoices(date(2024, 1, 31))
        .await
        .unwrap();
    let err = h
        .service
        .pay_invoice(&invoice.id, paid_at())
        .await
        .unwrap_err();
    assert!(matches!(err, BillingError::PaymentDeclined(_)));

    let after = h.service.get_invoice(&invoice.id).await.unwrap();
    assert_eq!(after.status, InvoiceStatus::Overdue);
}

#[tokio::test]
async fn paying_a_missing_invoice_is_not_found() {
    let h = TestHarness::new();
    let err = h
        .service
        .pay_invoice(&InvoiceId::new(), paid_at())
        .await
        .unwrap_err();
    assert!(matches!(err, BillingError::InvoiceNotFound));
    assert!(err.is_not_found());
}
