//! In-process fakes shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use billing_core::{
    BillRecord, DailySummary, Money, PaymentMethod, SessionUser, SubmissionPayload, SubmittedBill,
};

use crate::error::ApiError;
use crate::gateway::{BillingApi, LoginResponse};
use crate::workflow::Navigator;

pub fn cashier() -> SessionUser {
    SessionUser {
        id: 7,
        username: "asha".into(),
        email: None,
        full_name: "Asha Rao".into(),
        role: "CASHIER".into(),
    }
}

pub fn submitted_bill(total_cents: i64) -> SubmittedBill {
    BillRecord {
        bill_id: 1,
        bill_number: "BILL-0001".into(),
        user_id: Some(7),
        customer_name: None,
        customer_phone: None,
        subtotal: Money::from_cents(total_cents),
        discount_percent: Some(10.0),
        discount_amount: Money::zero(),
        total_amount: Money::from_cents(total_cents),
        payment_method: PaymentMethod::Cash,
        bill_status: None,
        created_at: None,
        items: Vec::new(),
    }
}

/// Scriptable [`BillingApi`] that records what it was asked.
pub struct FakeApi {
    login_result: Mutex<Result<LoginResponse, ApiError>>,
    login_delay: Duration,
    login_calls: AtomicUsize,
    suggestions: Mutex<Result<Vec<String>, ApiError>>,
    suggest_calls: AtomicUsize,
    last_query: Mutex<Option<String>>,
    create_result: Mutex<Result<SubmittedBill, ApiError>>,
    create_delay: Duration,
    create_calls: AtomicUsize,
    last_payload: Mutex<Option<SubmissionPayload>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        FakeApi {
            login_result: Mutex::new(Ok(LoginResponse {
                token: "jwt-fake".into(),
                user: cashier(),
            })),
            login_delay: Duration::ZERO,
            login_calls: AtomicUsize::new(0),
            suggestions: Mutex::new(Ok(Vec::new())),
            suggest_calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
            create_result: Mutex::new(Ok(submitted_bill(0))),
            create_delay: Duration::ZERO,
            create_calls: AtomicUsize::new(0),
            last_payload: Mutex::new(None),
        }
    }
}

impl FakeApi {
    pub fn with_delays(login_delay: Duration, create_delay: Duration) -> Self {
        FakeApi {
            login_delay,
            create_delay,
            ..Self::default()
        }
    }

    pub fn set_login(&self, result: Result<LoginResponse, ApiError>) {
        *self.login_result.lock().unwrap() = result;
    }

    pub fn set_suggestions(&self, result: Result<Vec<String>, ApiError>) {
        *self.suggestions.lock().unwrap() = result;
    }

    pub fn set_create(&self, result: Result<SubmittedBill, ApiError>) {
        *self.create_result.lock().unwrap() = result;
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn suggest_calls(&self) -> usize {
        self.suggest_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<String> {
        self.last_query.lock().unwrap().clone()
    }

    pub fn last_payload(&self) -> Option<SubmissionPayload> {
        self.last_payload.lock().unwrap().clone()
    }
}

#[async_trait]
impl BillingApi for FakeApi {
    async fn login(&self, _username: &str, _password: &str) -> Result<LoginResponse, ApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if !self.login_delay.is_zero() {
            tokio::time::sleep(self.login_delay).await;
        }
        self.login_result.lock().unwrap().clone()
    }

    async fn current_user(&self) -> Result<SessionUser, ApiError> {
        Ok(cashier())
    }

    async fn suggest_products(&self, query: &str) -> Result<Vec<String>, ApiError> {
        self.suggest_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.to_string());
        self.suggestions.lock().unwrap().clone()
    }

    async fn create_bill(&self, payload: &SubmissionPayload) -> Result<SubmittedBill, ApiError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_payload.lock().unwrap() = Some(payload.clone());
        if !self.create_delay.is_zero() {
            tokio::time::sleep(self.create_delay).await;
        }
        self.create_result.lock().unwrap().clone()
    }

    async fn todays_bills(&self) -> Result<Vec<BillRecord>, ApiError> {
        Ok(Vec::new())
    }

    async fn bill(&self, _bill_id: i64) -> Result<BillRecord, ApiError> {
        Err(ApiError::Http {
            status: 404,
            message: Some("Bill not found".into()),
        })
    }

    async fn todays_summary(&self) -> Result<DailySummary, ApiError> {
        Ok(DailySummary {
            total_bills: 0,
            total_sales: Money::zero(),
            total_discounts: Money::zero(),
        })
    }
}

/// Counts return-home signals.
#[derive(Default)]
pub struct CountingNavigator {
    calls: AtomicUsize,
}

impl CountingNavigator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Navigator for CountingNavigator {
    async fn return_home(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}
