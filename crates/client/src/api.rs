use std::sync::{Mutex, MutexGuard, PoisonError};

use common::types::MessageBody;
use models::{rating, store};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use service::admin::domain::{PlatformStats, UserSummary};
use service::auth::domain::{AuthUser, ChangePasswordInput, CreateUserInput, LoginInput, RegisterInput, SessionClaims};
use service::rating::domain::SubmitRatingInput;
use service::store::domain::{CreateStoreInput, OwnerDashboard, StoreListing};
use tracing::debug;
use uuid::Uuid;

use crate::errors::ClientError;
use crate::session::{Dashboard, SessionContext};

#[derive(Deserialize)]
struct UserEnvelope {
    user: AuthUser,
}

#[derive(Deserialize)]
struct LoginEnvelope {
    token: String,
}

#[derive(Deserialize)]
struct StoreEnvelope {
    store: store::Model,
}

#[derive(Deserialize)]
struct RatingEnvelope {
    rating: rating::Model,
}

#[derive(Deserialize)]
struct HealthBody {
    status: String,
}

/// One async method per endpoint; the bearer token comes from the session.
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Mutex<SessionContext>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: SessionContext) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session: Mutex::new(session),
        }
    }

    fn session(&self) -> MutexGuard<'_, SessionContext> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, req: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.session().token().ok_or(ClientError::NotAuthenticated)?;
        Ok(req.bearer_auth(token))
    }

    /// Decode a success body or turn the `{"message"}` error body into `ClientError::Api`.
    /// A 401 on an authenticated call ends the local session.
    async fn parse<T: DeserializeOwned>(&self, resp: Response) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<T>().await?);
        }
        let fallback = status.canonical_reason().unwrap_or("request failed").to_string();
        let message = resp.json::<MessageBody>().await.map(|b| b.message).unwrap_or(fallback);
        Err(self.rejected(status, message))
    }

    fn rejected(&self, status: StatusCode, message: String) -> ClientError {
        debug!(status = status.as_u16(), %message, "api error");
        if status == StatusCode::UNAUTHORIZED {
            self.session().discard();
        }
        ClientError::Api { status: status.as_u16(), message }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let resp = req.send().await?;
        self.parse(resp).await
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(&self, req: RequestBuilder, body: &B) -> Result<T, ClientError> {
        self.send(req.json(body)).await
    }

    pub fn current_user(&self) -> Option<SessionClaims> {
        self.session().current().cloned()
    }

    pub fn dashboard(&self) -> Option<Dashboard> {
        self.session().dashboard()
    }

    pub async fn health(&self) -> Result<String, ClientError> {
        let body: HealthBody = self.send(self.http.get(self.url("/health"))).await?;
        Ok(body.status)
    }

    pub async fn register(&self, input: &RegisterInput) -> Result<AuthUser, ClientError> {
        let env: UserEnvelope = self.send_json(self.http.post(self.url("/api/auth/register")), input).await?;
        Ok(env.user)
    }

    /// Log in and establish the session; returns the decoded claims.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionClaims, ClientError> {
        let input = LoginInput { email: email.into(), password: password.into() };
        let env: LoginEnvelope = self.send_json(self.http.post(self.url("/api/auth/login")), &input).await?;
        let mut session = self.session();
        let claims = session.establish(env.token)?;
        Ok(claims.clone())
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.session().logout()
    }

    pub async fn update_password(&self, current: &str, new: &str) -> Result<String, ClientError> {
        let body = ChangePasswordInput { current_password: current.into(), new_password: new.into() };
        let req = self.authed(self.http.post(self.url("/api/users/update-password")))?;
        let msg: MessageBody = self.send_json(req, &body).await?;
        Ok(msg.message)
    }

    pub async fn change_password(&self, current: &str, new: &str) -> Result<String, ClientError> {
        let body = ChangePasswordInput { current_password: current.into(), new_password: new.into() };
        let req = self.authed(self.http.put(self.url("/api/users/change-password")))?;
        let msg: MessageBody = self.send_json(req, &body).await?;
        Ok(msg.message)
    }

    pub async fn add_user(&self, input: &CreateUserInput) -> Result<AuthUser, ClientError> {
        let req = self.authed(self.http.post(self.url("/api/users/add")))?;
        let env: UserEnvelope = self.send_json(req, input).await?;
        Ok(env.user)
    }

    pub async fn list_users(&self) -> Result<Vec<UserSummary>, ClientError> {
        let req = self.authed(self.http.get(self.url("/api/users")))?;
        self.send(req).await
    }

    pub async fn stats(&self) -> Result<PlatformStats, ClientError> {
        let req = self.authed(self.http.get(self.url("/api/stats")))?;
        self.send(req).await
    }

    pub async fn create_store(&self, input: &CreateStoreInput) -> Result<store::Model, ClientError> {
        let req = self.authed(self.http.post(self.url("/api/stores")))?;
        let env: StoreEnvelope = self.send_json(req, input).await?;
        Ok(env.store)
    }

    pub async fn list_stores(&self) -> Result<Vec<StoreListing>, ClientError> {
        let req = self.authed(self.http.get(self.url("/api/stores")))?;
        self.send(req).await
    }

    pub async fn submit_rating(&self, store_id: Uuid, value: i32) -> Result<rating::Model, ClientError> {
        let body = SubmitRatingInput { store_id: Some(store_id), rating: Some(value) };
        let req = self.authed(self.http.post(self.url("/api/ratings")))?;
        let env: RatingEnvelope = self.send_json(req, &body).await?;
        Ok(env.rating)
    }

    pub async fn my_store(&self) -> Result<OwnerDashboard, ClientError> {
        let req = self.authed(self.http.get(self.url("/api/my-store")))?;
        self.send(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn authenticated_calls_need_a_session() {
        let client = ApiClient::new("http://127.0.0.1:9/", SessionContext::in_memory());
        assert_eq!(client.url("/health"), "http://127.0.0.1:9/health");
        assert!(matches!(client.list_stores().await, Err(ClientError::NotAuthenticated)));
        assert!(client.dashboard().is_none());
    }

    #[test]
    fn unauthorized_ends_session_and_keeps_server_message() {
        let path = std::env::temp_dir().join(format!("store-rating-api-{}.token", Uuid::new_v4()));
        let mut session = SessionContext::load(&path).unwrap();
        let user = AuthUser {
            id: Uuid::new_v4(),
            name: "Session Context Test User".into(),
            email: "session@b.com".into(),
            address: None,
            role: models::user::UserRole::NormalUser,
        };
        let tok = service::auth::token::issue(&user, "any-secret", chrono::Duration::hours(8), chrono::Utc::now()).unwrap();
        session.establish(tok).unwrap();
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        let client = ApiClient::new("http://127.0.0.1:9", session);

        let err = client.rejected(StatusCode::UNAUTHORIZED, "Invalid Token".into());
        assert!(matches!(err, ClientError::Api { status: 401, ref message } if message == "Invalid Token"));
        assert!(client.current_user().is_none());
        std::fs::remove_dir(&path).unwrap();
    }
}
