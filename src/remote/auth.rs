use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::errors::{DebtError, Result};
use crate::remote::envelope::parse_reply;
use crate::remote::{ApiRequest, HttpTransport, LOGIN_PATH, REGISTER_PATH};
use crate::session::{SessionToken, TokenStore};
use crate::types::UserProfile;

/// outcome of a register or login call
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub token: Option<SessionToken>,
    pub user: Option<UserProfile>,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// register / login / logout against the remote service
pub struct AuthGateway {
    transport: Arc<dyn HttpTransport>,
    tokens: Arc<dyn TokenStore>,
}

impl AuthGateway {
    pub fn new(transport: Arc<dyn HttpTransport>, tokens: Arc<dyn TokenStore>) -> Self {
        Self { transport, tokens }
    }

    /// create an account; stores the session token if the service hands one out
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<AuthSession> {
        require("name", name)?;
        require("email", email)?;
        require("password", password)?;

        let body = to_body(&RegisterRequest {
            name: name.trim(),
            email: email.trim(),
            password,
        })?;
        let session = self.authenticate(REGISTER_PATH, body).await?;
        log::info!("registered {}", email.trim());
        Ok(session)
    }

    /// log in and store the session token
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        require("email", email)?;
        require("password", password)?;

        let body = to_body(&LoginRequest {
            email: email.trim(),
            password,
        })?;
        let session = self.authenticate(LOGIN_PATH, body).await?;
        if session.token.is_none() {
            return Err(DebtError::malformed("login response carried no token"));
        }
        log::info!("logged in as {}", email.trim());
        Ok(session)
    }

    /// forget the session token; nothing is sent to the service
    pub fn logout(&self) -> Result<()> {
        self.tokens.clear_token()?;
        log::info!("session token cleared");
        Ok(())
    }

    pub fn is_logged_in(&self) -> bool {
        self.tokens.get_token().is_some()
    }

    async fn authenticate(&self, path: &str, body: Value) -> Result<AuthSession> {
        let reply = self.transport.send(ApiRequest::post(path, body)).await?;
        let (data, token) = parse_reply(&reply)?.into_success()?;

        // some deployments nest the token inside data
        let token = token.or_else(|| {
            data.as_ref()
                .and_then(|d| d.get("token"))
                .and_then(Value::as_str)
                .and_then(SessionToken::new)
        });
        let user = data.as_ref().and_then(user_profile);

        if let Some(token) = &token {
            self.tokens.set_token(token.clone())?;
        }

        Ok(AuthSession { token, user })
    }
}

fn user_profile(data: &Value) -> Option<UserProfile> {
    let candidate = data.get("user").unwrap_or(data);
    if !candidate.is_object() {
        return None;
    }
    match serde_json::from_value::<UserProfile>(candidate.clone()) {
        Ok(user) if !user.email.is_empty() || !user.id.is_empty() => Some(user),
        Ok(_) => None,
        Err(err) => {
            log::debug!("auth response data is not a user profile: {err}");
            None
        }
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DebtError::invalid_input(format!("{field} is required")));
    }
    Ok(())
}

fn to_body<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| DebtError::invalid_input(format!("cannot encode request: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::fake::FakeTransport;
    use crate::session::MemoryTokenStore;
    use serde_json::json;

    fn gateway(transport: FakeTransport) -> (AuthGateway, Arc<FakeTransport>, Arc<MemoryTokenStore>) {
        let transport = Arc::new(transport);
        let tokens = Arc::new(MemoryTokenStore::new());
        let gateway = AuthGateway::new(transport.clone(), tokens.clone());
        (gateway, transport, tokens)
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let (auth, transport, tokens) = gateway(FakeTransport::new().reply(
            200,
            json!({
                "status": "success",
                "data": {"id": "u1", "email": "a@b.c", "name": "Ada"},
                "token": "jwt-1"
            }),
        ));

        let session = auth.login("a@b.c", "pw").await.unwrap();
        assert_eq!(session.token.unwrap().as_str(), "jwt-1");
        assert_eq!(session.user.unwrap().name, "Ada");
        assert_eq!(tokens.get_token().unwrap().as_str(), "jwt-1");
        assert!(auth.is_logged_in());

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].path, LOGIN_PATH);
        assert_eq!(sent[0].body, Some(json!({"email": "a@b.c", "password": "pw"})));
    }

    #[tokio::test]
    async fn test_auth_requests_never_carry_bearer() {
        let (auth, transport, tokens) = gateway(
            FakeTransport::new()
                .reply(200, json!({"status": "success", "data": {}, "token": "new"}))
                .reply(200, json!({"status": "success", "data": {}, "token": "newer"})),
        );
        tokens.set_token(SessionToken::new("old").unwrap()).unwrap();

        auth.register("Ada", "a@b.c", "pw").await.unwrap();
        auth.login("a@b.c", "pw").await.unwrap();

        assert!(transport.requests().iter().all(|r| r.bearer.is_none()));
        assert_eq!(tokens.get_token().unwrap().as_str(), "newer");
    }

    #[tokio::test]
    async fn test_token_nested_in_data() {
        let (auth, _, tokens) = gateway(FakeTransport::new().reply(
            200,
            json!({"status": "success", "data": {"token": "nested", "user": {"id": "u2", "email": "x@y.z", "name": "X"}}}),
        ));

        let session = auth.login("x@y.z", "pw").await.unwrap();
        assert_eq!(session.user.unwrap().id, "u2");
        assert_eq!(tokens.get_token().unwrap().as_str(), "nested");
    }

    #[tokio::test]
    async fn test_login_failure_keeps_store_untouched() {
        let (auth, _, tokens) = gateway(
            FakeTransport::new().reply(401, json!({"status": "error", "data": "Invalid credentials"})),
        );

        let err = auth.login("a@b.c", "wrong").await.unwrap_err();
        assert!(matches!(err, DebtError::RemoteOperationFailed { ref message } if message == "Invalid credentials"));
        assert!(tokens.get_token().is_none());
    }

    #[tokio::test]
    async fn test_login_without_token_is_malformed() {
        let (auth, _, _) = gateway(FakeTransport::new().reply(200, json!({"status": "success", "data": {}})));
        let err = auth.login("a@b.c", "pw").await.unwrap_err();
        assert!(matches!(err, DebtError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_register_without_token_is_fine() {
        let (auth, _, tokens) = gateway(
            FakeTransport::new().reply(201, json!({"status": "success", "data": {"id": "u3", "email": "n@e.w", "name": "New"}})),
        );
        let session = auth.register("New", "n@e.w", "pw").await.unwrap();
        assert!(session.token.is_none());
        assert!(tokens.get_token().is_none());
    }

    #[tokio::test]
    async fn test_blank_credentials_send_nothing() {
        let (auth, transport, _) = gateway(FakeTransport::new());
        let err = auth.login("  ", "pw").await.unwrap_err();
        assert!(matches!(err, DebtError::InvalidInput { .. }));
        let err = auth.register("Ada", "a@b.c", "").await.unwrap_err();
        assert!(matches!(err, DebtError::InvalidInput { .. }));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_logout_clears() {
        let (auth, _, tokens) = gateway(FakeTransport::new());
        tokens.set_token(SessionToken::new("t").unwrap()).unwrap();
        auth.logout().unwrap();
        assert!(tokens.get_token().is_none());
        assert!(!auth.is_logged_in());
    }
}
