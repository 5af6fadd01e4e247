//! # API Gateway Client
//!
//! The single way the billing client talks to the backend.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Request Pipeline                               │
//! │                                                                         │
//! │  caller ──► ApiClient::request(method, path)                           │
//! │               │                                                         │
//! │               ├── url = base_url + path                                │
//! │               ├── token = SessionStore::token()   (read every time)    │
//! │               └── Authorization: Bearer <token>   (only if present)    │
//! │                                                                         │
//! │  send ──► no response ─────────────────────────► ApiError::Network     │
//! │       ──► 401 ─────────────────────────────────► ApiError::AuthExpired │
//! │       ──► other non-2xx ───────────────────────► ApiError::Http        │
//! │       ──► 2xx, body fails to decode ───────────► InvalidResponse       │
//! │       ──► 2xx ─────────────────────────────────► Ok(T)                 │
//! │                                                                         │
//! │  No retry. No circuit breaker. Every failure goes straight back.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use billing_core::{BillRecord, DailySummary, SessionUser, SubmissionPayload, SubmittedBill};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, ClientError, ClientResult};
use crate::store::SessionStore;

// =============================================================================
// Wire Types
// =============================================================================

/// Response from `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(flatten)]
    pub user: SessionUser,
}

/// Error body returned by the backend.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

// =============================================================================
// Billing API
// =============================================================================

/// Backend operations used by the billing client.
#[async_trait]
pub trait BillingApi: Send + Sync {
    /// `POST /auth/login`
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError>;

    /// `GET /auth/me`
    async fn current_user(&self) -> Result<SessionUser, ApiError>;

    /// `GET /products/suggestions?query=`
    async fn suggest_products(&self, query: &str) -> Result<Vec<String>, ApiError>;

    /// `POST /bills`
    async fn create_bill(&self, payload: &SubmissionPayload) -> Result<SubmittedBill, ApiError>;

    /// `GET /bills/today`
    async fn todays_bills(&self) -> Result<Vec<BillRecord>, ApiError>;

    /// `GET /bills/{id}`
    async fn bill(&self, bill_id: i64) -> Result<BillRecord, ApiError>;

    /// `GET /reports/today`
    async fn todays_summary(&self) -> Result<DailySummary, ApiError>;
}

// =============================================================================
// HTTP Implementation
// =============================================================================

/// reqwest-backed [`BillingApi`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: SessionStore) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(ApiClient {
            base_url: config.base_url().to_string(),
            http,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Builds a request carrying the token stored right now.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "Request failed without a response");
            ApiError::from(e)
        })?;

        let status = response.status();
        let url = response.url().path().to_string();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.message)
                .filter(|m| !m.is_empty());

            warn!(status = status.as_u16(), path = %url, ?message, "Request rejected");

            return Err(if status == StatusCode::UNAUTHORIZED {
                ApiError::AuthExpired { message }
            } else {
                ApiError::Http {
                    status: status.as_u16(),
                    message,
                }
            });
        }

        let bytes = response.bytes().await?;
        debug!(status = status.as_u16(), path = %url, len = bytes.len(), "Response received");

        serde_json::from_slice(&bytes).map_err(|e| ApiError::InvalidResponse {
            status: status.as_u16(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl BillingApi for ApiClient {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });

        // No stale token on the way in
        let builder = self.http.post(self.url("/auth/login")).json(&body);
        self.send(builder).await
    }

    async fn current_user(&self) -> Result<SessionUser, ApiError> {
        self.send(self.request(Method::GET, "/auth/me")).await
    }

    async fn suggest_products(&self, query: &str) -> Result<Vec<String>, ApiError> {
        let builder = self
            .request(Method::GET, "/products/suggestions")
            .query(&[("query", query)]);
        self.send(builder).await
    }

    async fn create_bill(&self, payload: &SubmissionPayload) -> Result<SubmittedBill, ApiError> {
        self.send(self.request(Method::POST, "/bills").json(payload))
            .await
    }

    async fn todays_bills(&self) -> Result<Vec<BillRecord>, ApiError> {
        self.send(self.request(Method::GET, "/bills/today")).await
    }

    async fn bill(&self, bill_id: i64) -> Result<BillRecord, ApiError> {
        self.send(self.request(Method::GET, &format!("/bills/{}", bill_id)))
            .await
    }

    async fn todays_summary(&self) -> Result<DailySummary, ApiError> {
        self.send(self.request(Method::GET, "/reports/today")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorKind;
    use crate::store::Session;
    use billing_core::{BillComposer, ItemCandidate};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn client_for(server: &MockServer, session: SessionStore) -> ApiClient {
        let mut config = ClientConfig::default();
        config.api.base_url = server.uri();
        ApiClient::new(&config, session).unwrap()
    }

    fn session(token: &str) -> Session {
        Session {
            token: token.to_string(),
            user: SessionUser {
                id: 1,
                username: "owner".into(),
                email: None,
                full_name: "Shop Owner".into(),
                role: "OWNER".into(),
            },
        }
    }

    fn bill_json() -> serde_json::Value {
        json!({
            "billId": 42,
            "billNumber": "BILL-20240501-0042",
            "userId": 1,
            "customerName": null,
            "customerPhone": null,
            "subtotal": 25.0,
            "discountPercent": 10.0,
            "discountAmount": 2.5,
            "totalAmount": 22.5,
            "paymentMethod": "CASH",
            "billStatus": "COMPLETED",
            "createdAt": "2024-05-01T10:15:30",
            "items": [{
                "itemId": 7,
                "productName": "Pen",
                "quantity": 10,
                "unitPrice": 2.5,
                "totalPrice": 25.0
            }]
        })
    }

    #[tokio::test]
    async fn test_login_parses_token_and_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({"username": "owner", "password": "secret"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "jwt-abc",
                "type": "Bearer",
                "userId": 1,
                "username": "owner",
                "email": "owner@shop.test",
                "fullName": "Shop Owner",
                "role": "OWNER"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, SessionStore::in_memory());
        let response = client.login("owner", "secret").await.unwrap();

        assert_eq!(response.token, "jwt-abc");
        assert_eq!(response.user.id, 1);
        assert_eq!(response.user.full_name, "Shop Owner");
    }

    #[tokio::test]
    async fn test_create_bill_sends_bearer_and_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bills"))
            .and(header("authorization", "Bearer jwt-1"))
            .and(body_json(json!({
                "userId": 1,
                "customerName": null,
                "customerPhone": null,
                "items": [{
                    "productName": "Pen",
                    "quantity": 10,
                    "unitPrice": 2.5,
                    "totalPrice": 25.0
                }],
                "manualDiscountAmount": 0.0,
                "paymentMethod": "CASH"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(bill_json()))
            .expect(1)
            .mount(&server)
            .await;

        let store = SessionStore::in_memory();
        store.save(&session("jwt-1")).unwrap();
        let client = client_for(&server, store);

        let mut composer = BillComposer::new();
        composer.add_item(ItemCandidate::new("Pen", "10", "2.5")).unwrap();
        let payload = composer.to_submission_payload(1).unwrap();

        let bill = client.create_bill(&payload).await.unwrap();
        assert_eq!(bill.bill_number, "BILL-20240501-0042");
        assert_eq!(bill.total_amount.cents(), 2_250);
    }

    #[tokio::test]
    async fn test_latest_token_is_used() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bills/today"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(2)
            .mount(&server)
            .await;

        let store = SessionStore::in_memory();
        let client = client_for(&server, store.clone());

        store.save(&session("old-token")).unwrap();
        client.todays_bills().await.unwrap();

        store.save(&session("new-token")).unwrap();
        client.todays_bills().await.unwrap();

        let requests: Vec<Request> = server.received_requests().await.unwrap();
        let auth: Vec<_> = requests
            .iter()
            .map(|r| r.headers.get("authorization").unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(auth, ["Bearer old-token", "Bearer new-token"]);
    }

    #[tokio::test]
    async fn test_no_token_no_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reports/today"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "totalBills": 3,
                "totalSales": 150.75,
                "totalDiscounts": 15.08
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, SessionStore::in_memory());
        let summary = client.todays_summary().await.unwrap();
        assert_eq!(summary.total_bills, 3);
        assert_eq!(summary.total_sales.cents(), 15_075);

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_unauthorized_is_auth_expired() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "Token expired"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, SessionStore::in_memory());
        let err = client.current_user().await.unwrap_err();

        assert!(err.is_auth_expired());
        assert_eq!(err.kind(), ApiErrorKind::HttpError);
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.message(), Some("Token expired"));
    }

    #[tokio::test]
    async fn test_server_message_surfaces() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bills"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "status": 400,
                "message": "Bill must contain at least one item"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, SessionStore::in_memory());
        let mut composer = BillComposer::new();
        composer.add_item(ItemCandidate::new("Pen", "1", "1")).unwrap();
        let payload = composer.to_submission_payload(1).unwrap();

        match client.create_bill(&payload).await {
            Err(ApiError::Http { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message.as_deref(), Some("Bill must contain at least one item"));
            }
            other => panic!("expected Http error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body_has_no_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bills/9"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server, SessionStore::in_memory());
        let err = client.bill(9).await.unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.message(), None);
    }

    #[tokio::test]
    async fn test_undecodable_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bills/today"))
            .respond_with(ResponseTemplate::new(200).set_body_string("surprise"))
            .mount(&server)
            .await;

        let client = client_for(&server, SessionStore::in_memory());
        let err = client.todays_bills().await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse { status: 200, .. }));
        assert_eq!(err.kind(), ApiErrorKind::HttpError);
    }

    #[tokio::test]
    async fn test_suggestions_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/suggestions"))
            .and(query_param("query", "ri"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["Rice", "Rice Flour"])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, SessionStore::in_memory());
        let names = client.suggest_products("ri").await.unwrap();
        assert_eq!(names, ["Rice", "Rice Flour"]);
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let mut config = ClientConfig::default();
        config.api.base_url = "http://127.0.0.1:1/api".to_string();
        let client = ApiClient::new(&config, SessionStore::in_memory()).unwrap();

        let err = client.todays_summary().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(err.kind(), ApiErrorKind::NetworkError);
        assert_eq!(err.status(), None);
    }
}
