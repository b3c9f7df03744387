//! Mock repositories for testing

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use tempo_db::{
    CreateInvoice, CreatePlan, CreateSubscription, CreateUser, DbResult, InvoiceRepository,
    InvoiceRow, PlanRepository, PlanRow, SubscriptionRepository, SubscriptionRow, UserRepository,
    UserRow,
};

/// In-memory user repository for testing
#[derive(Default, Clone)]
pub struct MockUserRepository {
    users: Arc<DashMap<Uuid, UserRow>>,
    by_email: Arc<DashMap<String, Uuid>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<UserRow>> {
        Ok(self.users.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>> {
        Ok(self
            .by_email
            .get(email)
            .and_then(|id| self.users.get(id.value()).map(|r| r.value().clone())))
    }

    async fn create(&self, user: CreateUser) -> DbResult<UserRow> {
        let row = UserRow {
            id: user.id,
            email: user.email.clone(),
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        self.by_email.insert(user.email, user.id);
        self.users.insert(user.id, row.clone());
        Ok(row)
    }
}

/// In-memory plan repository for testing
#[derive(Default, Clone)]
pub struct MockPlanRepository {
    plans: Arc<DashMap<Uuid, PlanRow>>,
}

impl MockPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a test plan directly
    pub fn insert_plan(&self, plan: PlanRow) {
        self.plans.insert(plan.id, plan);
    }

    /// Remove a plan, leaving any subscriptions to it orphaned
    pub fn remove_plan(&self, id: Uuid) {
        self.plans.remove(&id);
    }
}

#[async_trait]
impl PlanRepository for MockPlanRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<PlanRow>> {
        Ok(self.plans.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_name(&self, name: &str) -> DbResult<Option<PlanRow>> {
        Ok(self
            .plans
            .iter()
            .find(|r| r.value().name == name)
            .map(|r| r.value().clone()))
    }

    async fn list(&self) -> DbResult<Vec<PlanRow>> {
        let mut plans: Vec<PlanRow> = self.plans.iter().map(|r| r.value().clone()).collect();
        plans.sort_by_key(|p| p.price_cents);
        Ok(plans)
    }

    async fn create(&self, plan: CreatePlan) -> DbResult<PlanRow> {
        let row = PlanRow {
            id: plan.id,
            name: plan.name,
            price_cents: plan.price_cents,
            description: plan.description,
            billing_interval_months: plan.billing_interval_months,
        };
        self.plans.insert(plan.id, row.clone());
        Ok(row)
    }
}

/// In-memory subscription repository for testing
#[derive(Default, Clone)]
pub struct MockSubscriptionRepository {
    subscriptions: Arc<DashMap<Uuid, SubscriptionRow>>,
}

impl MockSubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionRepository for MockSubscriptionRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<SubscriptionRow>> {
        Ok(self.subscriptions.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> DbResult<Vec<SubscriptionRow>> {
        Ok(self
            .subscriptions
            .iter()
            .filter(|r| r.value().user_id == user_id)
            .map(|r| r.value().clone())
            .collect())
    }

    async fn find_active_by_user_and_plan(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> DbResult<Option<SubscriptionRow>> {
        Ok(self
            .subscriptions
            .iter()
            .find(|r| {
                let s = r.value();
                s.user_id == user_id && s.plan_id == plan_id && s.status == "active"
            })
            .map(|r| r.value().clone()))
    }

    async fn find_due_for_renewal(
        &self,
        billing_date: NaiveDate,
    ) -> DbResult<Vec<SubscriptionRow>> {
        Ok(self
            .subscriptions
            .iter()
            .filter(|r| {
                let s = r.value();
                s.status == "active" && s.next_billing_date == Some(billing_date)
            })
            .map(|r| r.value().clone())
            .collect())
    }

    async fn create(&self, sub: CreateSubscription) -> DbResult<SubscriptionRow> {
        let row = SubscriptionRow {
            id: sub.id,
            user_id: sub.user_id,
            plan_id: sub.plan_id,
            status: "active".to_string(),
            start_date: sub.start_date,
            end_date: None,
            next_billing_date: Some(sub.next_billing_date),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.subscriptions.insert(sub.id, row.clone());
        Ok(row)
    }

    async fn cancel(&self, id: Uuid, end_date: NaiveDate) -> DbResult<()> {
        if let Some(mut sub) = self.subscriptions.get_mut(&id) {
            sub.status = "cancelled".to_string();
            sub.end_date = Some(end_date);
            sub.next_billing_date = None;
            sub.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_next_billing_date(
        &self,
        id: Uuid,
        next_billing_date: NaiveDate,
    ) -> DbResult<()> {
        if let Some(mut sub) = self.subscriptions.get_mut(&id) {
            sub.next_billing_date = Some(next_billing_date);
            sub.updated_at = Utc::now();
        }
        Ok(())
    }
}

/// In-memory invoice repository for testing
#[derive(Default, Clone)]
pub struct MockInvoiceRepository {
    invoices: Arc<DashMap<Uuid, InvoiceRow>>,
}

impl MockInvoiceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// All invoices for a subscription, ordered by issue date
    pub fn for_subscription(&self, subscription_id: Uuid) -> Vec<InvoiceRow> {
        let mut invoices: Vec<InvoiceRow> = self
            .invoices
            .iter()
            .filter(|r| r.value().subscription_id == subscription_id)
            .map(|r| r.value().clone())
            .collect();
        invoices.sort_by_key(|i| i.issue_date);
        invoices
    }
}

#[async_trait]
impl InvoiceRepository for MockInvoiceRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<InvoiceRow>> {
        Ok(self.invoices.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> DbResult<Vec<InvoiceRow>> {
        let mut invoices: Vec<InvoiceRow> = self
            .invoices
            .iter()
            .filter(|r| r.value().user_id == user_id)
            .map(|r| r.value().clone())
            .collect();
        invoices.sort_by(|a, b| b.issue_date.cmp(&a.issue_date));
        Ok(invoices)
    }

    async fn find_by_subscription_and_issue_date(
        &self,
        subscription_id: Uuid,
        issue_date: NaiveDate,
    ) -> DbResult<Option<InvoiceRow>> {
        Ok(self
            .invoices
            .iter()
            .find(|r| {
                let i = r.value();
                i.subscription_id == subscription_id && i.issue_date == issue_date
            })
            .map(|r| r.value().clone()))
    }

    async fn find_pending_past_due(&self, today: NaiveDate) -> DbResult<Vec<InvoiceRow>> {
        Ok(self
            .invoices
            .iter()
            .filter(|r| {
                let i = r.value();
                i.status == "pending" && i.due_date < today
            })
            .map(|r| r.value().clone())
            .collect())
    }

    async fn find_due_for_reminder(
        &self,
        today: NaiveDate,
        horizon: NaiveDate,
    ) -> DbResult<Vec<InvoiceRow>> {
        Ok(self
            .invoices
            .iter()
            .filter(|r| {
                let i = r.value();
                (i.status == "pending" && i.due_date >= today && i.due_date <= horizon)
                    || i.status == "overdue"
            })
            .map(|r| r.value().clone())
            .collect())
    }

    async fn create(&self, invoice: CreateInvoice) -> DbResult<InvoiceRow> {
        let row = InvoiceRow {
            id: invoice.id,
            user_id: invoice.user_id,
            plan_id: invoice.plan_id,
            subscription_id: invoice.subscription_id,
            amount_cents: invoice.amount_cents,
            issue_date: invoice.issue_date,
            due_date: invoice.due_date,
            status: "pending".to_string(),
            created_at: Utc::now(),
            paid_at: None,
        };
        self.invoices.insert(invoice.id, row.clone());
        Ok(row)
    }

    async fn mark_overdue(&self, id: Uuid) -> DbResult<()> {
        if let Some(mut invoice) = self.invoices.get_mut(&id) {
            if invoice.status == "pending" {
                invoice.status = "overdue".to_string();
            }
        }
        Ok(())
    }

    async fn mark_paid(&self, id: Uuid, paid_at: DateTime<Utc>) -> DbResult<()> {
        if let Some(mut invoice) = self.invoices.get_mut(&id) {
            invoice.status = "paid".to_string();
            invoice.paid_at = Some(paid_at);
        }
        Ok(())
    }
}
