//! Shared test harness: in-memory repositories, a recording notifier, and
//! a pre-wired billing service.

// Not every test binary uses every helper
#![allow(dead_code)]

pub mod mock_repos;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use tempo_billing_core::{
    BillingConfig, BillingService, MockPaymentProcessor, NotificationSender, PaymentProcessor,
};
use tempo_db::PlanRow;
use tempo_types::{Invoice, InvoiceId, PlanId, UserId};

use mock_repos::{
    MockInvoiceRepository, MockPlanRepository, MockSubscriptionRepository, MockUserRepository,
};

/// Notification sender that records every reminder for assertions
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    pub sent: Arc<Mutex<Vec<(String, InvoiceId)>>>,
}

impl RecordingNotifier {
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationSender for RecordingNotifier {
    async fn send_reminder(&self, email: &str, invoice: &Invoice) {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), invoice.id));
    }
}

pub type TestService = BillingService<
    MockUserRepository,
    MockPlanRepository,
    MockSubscriptionRepository,
    MockInvoiceRepository,
>;

/// A billing service wired against in-memory repositories
pub struct TestHarness {
    pub service: TestService,
    pub plans: Arc<MockPlanRepository>,
    pub invoices: Arc<MockInvoiceRepository>,
    pub notifier: RecordingNotifier,
}

impl TestHarness {
    /// Harness with an approving payment processor
    pub fn new() -> Self {
        Self::with_payments(MockPaymentProcessor::approving())
    }

    /// Harness with a specific payment processor
    pub fn with_payments(payments: impl PaymentProcessor + 'static) -> Self {
        let users = Arc::new(MockUserRepository::new());
        let plans = Arc::new(MockPlanRepository::new());
        let subscriptions = Arc::new(MockSubscriptionRepository::new());
        let invoices = Arc::new(MockInvoiceRepository::new());
        let notifier = RecordingNotifier::default();

        let service = BillingService::new(
            users,
            plans.clone(),
            subscriptions,
            invoices.clone(),
            Arc::new(payments),
            Arc::new(notifier.clone()),
            BillingConfig::new(),
        );

        Self {
            service,
            plans,
            invoices,
            notifier,
        }
    }

    /// Register a user and return its ID
    pub async fn user(&self, email: &str) -> UserId {
        self.service
            .register_user(email, "correct horse battery staple")
            .await
            .unwrap()
            .id
    }

    /// Insert a plan directly and return its ID
    pub fn plan(&self, name: &str, price_cents: i64) -> PlanId {
        let row = plan_row(name, price_cents);
        let id = PlanId(row.id);
        self.plans.insert_plan(row);
        id
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn plan_row(name: &str, price_cents: i64) -> PlanRow {
    PlanRow {
        id: Uuid::new_v4(),
        name: name.to_string(),
        price_cents,
        description: None,
        billing_interval_months: 1,
    }
}
