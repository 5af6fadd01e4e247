//! Login, logout and identity commands.

use std::io::BufRead;

use anyhow::Context;
use billing_core::SessionUser;
use tracing::{debug, warn};

use crate::context::{user_facing, AppContext};

pub async fn login(ctx: &AppContext, username: &str, password: Option<String>) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };

    let user = ctx
        .session
        .login(username, &password)
        .await
        .map_err(user_facing)?;

    println!("Welcome, {} ({})", user.full_name, user.role);
    Ok(())
}

pub async fn logout(ctx: &AppContext) -> anyhow::Result<()> {
    ctx.session.logout().await;
    println!("Logged out");
    Ok(())
}

pub async fn whoami(ctx: &AppContext) -> anyhow::Result<()> {
    let user = server_identity(ctx).await?;
    println!("{} ({}) - {}", user.full_name, user.username, user.role);
    if let Some(email) = &user.email {
        println!("{}", email);
    }
    Ok(())
}

/// Asks the backend who the stored token belongs to.
async fn server_identity(ctx: &AppContext) -> anyhow::Result<SessionUser> {
    let local = ctx.require_login().await?;

    let user = match ctx.api.current_user().await {
        Ok(user) => user,
        Err(e) => return Err(ctx.handle_error(e.into()).await),
    };
    if user.id != local.id {
        warn!(local_id = local.id, server_id = user.id, "Stored user differs from token owner");
    }
    Ok(user)
}

fn read_password() -> anyhow::Result<String> {
    debug!("Reading password from stdin");
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use billing_client::{ApiClient, BillingApi, ClientConfig, Session, SessionStore};
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn context_for(server: &MockServer) -> (AppContext, SessionStore) {
        let mut config = ClientConfig::default();
        config.api.base_url = server.uri();

        let store = SessionStore::in_memory();
        store
            .save(&Session {
                token: "jwt-1".into(),
                user: SessionUser {
                    id: 7,
                    username: "asha".into(),
                    email: None,
                    full_name: "Asha".into(),
                    role: "CASHIER".into(),
                },
            })
            .unwrap();

        let api: Arc<dyn BillingApi> = Arc::new(ApiClient::new(&config, store.clone()).unwrap());
        (AppContext::from_parts(config, store.clone(), api), store)
    }

    #[tokio::test]
    async fn test_whoami_reports_server_identity() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .and(header("authorization", "Bearer jwt-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "userId": 7,
                "username": "asha",
                "email": "asha@shop.example",
                "fullName": "Asha Rao",
                "role": "CASHIER",
                "status": "ACTIVE"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (ctx, _) = context_for(&server);
        let user = server_identity(&ctx).await.unwrap();

        assert_eq!(user.full_name, "Asha Rao");
        assert_eq!(user.email.as_deref(), Some("asha@shop.example"));
    }

    #[tokio::test]
    async fn test_whoami_with_expired_token_logs_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let (ctx, store) = context_for(&server);
        let err = server_identity(&ctx).await.unwrap_err();

        assert_eq!(err.to_string(), "Session expired. Please log in again.");
        assert!(!ctx.session.is_authenticated().await);
        assert_eq!(store.token(), None);
    }
}
