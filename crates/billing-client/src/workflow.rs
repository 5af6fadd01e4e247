//! # Bill Submission Workflow
//!
//! Drives one draft bill from composition to a server-assigned bill.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Submission States                                 │
//! │                                                                         │
//! │            submit()                       201 Created                  │
//! │   Idle ─────────────────► Submitting ─────────────────► Succeeded      │
//! │    ▲                        │    ▲                        │             │
//! │    │ discard()       error  │    │ submit()               │ settle      │
//! │    │                        ▼    │                        ▼ delay       │
//! │    └────────────────────── Failed                    return_home()     │
//! │                                                                         │
//! │  Guards on submit():                                                   │
//! │   • no items            → EmptyBill           (state unchanged)        │
//! │   • already Submitting  → SubmissionInFlight  (no request sent)        │
//! │   • nobody logged in    → NotAuthenticated                             │
//! │   • already Succeeded   → AlreadySubmitted                             │
//! │                                                                         │
//! │  While Submitting, edit() and discard() return SubmissionInFlight.     │
//! │                                                                         │
//! │  On failure the draft is kept so the cashier can fix and resubmit.    │
//! │  There is no automatic retry.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! The state check and the switch to Submitting happen under one short lock.
//! The lock is released before the network call, so readers (totals,
//! state) never wait on the backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use billing_core::{BillComposer, SubmittedBill, ValidationError};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::error::{ApiErrorKind, ClientError, ClientResult, DEFAULT_SUBMIT_FAILURE};
use crate::gateway::BillingApi;
use crate::session::SessionManager;

/// Receives the "go back to the home screen" signal.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn return_home(&self);
}

/// Where a submission currently is.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded(SubmittedBill),
    /// Message to show the cashier.
    Failed(String),
}

impl SubmissionState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionState::Submitting)
    }
}

struct Inner {
    composer: BillComposer,
    state: SubmissionState,
}

/// A draft bill plus the state of its submission.
pub struct SubmissionWorkflow {
    api: Arc<dyn BillingApi>,
    session: Arc<SessionManager>,
    navigator: Arc<dyn Navigator>,
    settle_delay: Duration,
    inner: Mutex<Inner>,
}

impl SubmissionWorkflow {
    pub fn new(
        api: Arc<dyn BillingApi>,
        session: Arc<SessionManager>,
        navigator: Arc<dyn Navigator>,
        settle_delay: Duration,
    ) -> Self {
        SubmissionWorkflow {
            api,
            session,
            navigator,
            settle_delay,
            inner: Mutex::new(Inner {
                composer: BillComposer::new(),
                state: SubmissionState::Idle,
            }),
        }
    }

    /// Applies a change to the draft.
    ///
    /// Rejected with `SubmissionInFlight` while a request is out: the
    /// payload already sent is the draft the backend will store, and a
    /// success resets the draft.
    pub async fn edit<R>(&self, f: impl FnOnce(&mut BillComposer) -> R) -> ClientResult<R> {
        let mut inner = self.inner.lock().await;
        if inner.state.is_submitting() {
            debug!("Edit rejected, request already in flight");
            return Err(ClientError::SubmissionInFlight);
        }
        Ok(f(&mut inner.composer))
    }

    /// Snapshot of the draft.
    pub async fn composer(&self) -> BillComposer {
        self.inner.lock().await.composer.clone()
    }

    pub async fn state(&self) -> SubmissionState {
        self.inner.lock().await.state.clone()
    }

    /// Sends the draft to the backend.
    pub async fn submit(&self) -> ClientResult<SubmittedBill> {
        let user = self.session.current_user().await;

        let payload = {
            let mut inner = self.inner.lock().await;

            if inner.composer.is_empty() {
                return Err(ValidationError::EmptyBill.into());
            }
            if inner.state.is_submitting() {
                debug!("Submit ignored, request already in flight");
                return Err(ClientError::SubmissionInFlight);
            }
            let user = user.ok_or(ClientError::NotAuthenticated)?;
            if let SubmissionState::Succeeded(_) = inner.state {
                return Err(ClientError::AlreadySubmitted);
            }

            let payload = inner.composer.to_submission_payload(user.id)?;
            inner.state = SubmissionState::Submitting;
            payload
        };

        info!(
            user_id = payload.user_id,
            items = payload.items.len(),
            payment_method = %payload.payment_method,
            "Submitting bill"
        );

        let result = self.api.create_bill(&payload).await;

        let mut inner = self.inner.lock().await;
        match result {
            Ok(bill) => {
                info!(bill_id = bill.bill_id, bill_number = %bill.bill_number, "Bill created");
                inner.composer.reset();
                inner.state = SubmissionState::Succeeded(bill.clone());
                drop(inner);

                self.schedule_return_home();
                Ok(bill)
            }
            Err(err) => {
                let message = err
                    .message()
                    .map(str::to_string)
                    .unwrap_or_else(|| DEFAULT_SUBMIT_FAILURE.to_string());
                inner.state = SubmissionState::Failed(message);
                drop(inner);

                if err.is_auth_expired() {
                    self.session.invalidate().await;
                } else if err.kind() == ApiErrorKind::NetworkError {
                    // The request may have reached the server; no idempotency key is sent
                    warn!(error = %err, "Bill submission outcome unknown");
                } else {
                    error!(error = %err, "Bill submission failed");
                }
                Err(err.into())
            }
        }
    }

    /// Throws the draft away, e.g. when the cashier leaves the screen.
    pub async fn discard(&self) -> ClientResult<()> {
        let mut inner = self.inner.lock().await;
        if inner.state.is_submitting() {
            return Err(ClientError::SubmissionInFlight);
        }
        inner.composer.reset();
        inner.state = SubmissionState::Idle;
        debug!("Draft discarded");
        Ok(())
    }

    fn schedule_return_home(&self) {
        let navigator = Arc::clone(&self.navigator);
        let delay = self.settle_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.return_home().await;
        });
    }
}
