use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use models::user::UserRole;
use service::auth::domain::SessionClaims;
use tracing::{debug, info, warn};

use crate::errors::ClientError;

/// Which top-level view a signed-in user lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dashboard {
    UserDashboard,
    StoreOwnerDashboard,
    AdminDashboard,
}

impl Dashboard {
    pub fn for_role(role: UserRole) -> Self {
        match role {
            UserRole::NormalUser => Dashboard::UserDashboard,
            UserRole::StoreOwner => Dashboard::StoreOwnerDashboard,
            UserRole::SystemAdministrator => Dashboard::AdminDashboard,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated { token: String, claims: SessionClaims },
}

/// Client-side session: one token at a time, optionally persisted to a file.
///
/// The signature is not checked here (the client has no secret); the server
/// does that on every request. Expiry is checked locally so a stale token is
/// dropped before it is sent.
#[derive(Debug)]
pub struct SessionContext {
    path: Option<PathBuf>,
    state: SessionState,
}

/// Read the claims without verifying the signature.
fn read_claims(token: &str) -> Result<SessionClaims, ClientError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();
    decode::<SessionClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| ClientError::Session(format!("undecodable token: {e}")))
}

fn now() -> i64 {
    Utc::now().timestamp()
}

impl SessionContext {
    /// Anonymous session that is never written to disk.
    pub fn in_memory() -> Self {
        Self { path: None, state: SessionState::Anonymous }
    }

    /// Restore a persisted session; an expired or unreadable token is discarded.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref().to_path_buf();
        let mut ctx = Self { path: Some(path.clone()), state: SessionState::Anonymous };
        if !path.exists() {
            return Ok(ctx);
        }
        let token = fs::read_to_string(&path)?.trim().to_string();
        match read_claims(&token) {
            Ok(claims) if !claims.is_expired_at(now()) => {
                debug!(user_id = %claims.id, "session restored");
                ctx.state = SessionState::Authenticated { token, claims };
            }
            Ok(_) | Err(_) => {
                debug!(path = %path.display(), "discarding stale session file");
                fs::remove_file(&path)?;
            }
        }
        Ok(ctx)
    }

    /// Anonymous -> Authenticated. A different identity needs `logout` first.
    pub fn establish(&mut self, token: String) -> Result<&SessionClaims, ClientError> {
        if matches!(self.state, SessionState::Authenticated { .. }) {
            return Err(ClientError::Session("already authenticated; log out first".into()));
        }
        let claims = read_claims(&token)?;
        if claims.is_expired_at(now()) {
            return Err(ClientError::Session("token already expired".into()));
        }
        if let Some(path) = &self.path {
            fs::write(path, &token)?;
        }
        info!(user_id = %claims.id, role = %claims.role, "session established");
        self.state = SessionState::Authenticated { token, claims };
        match &self.state {
            SessionState::Authenticated { claims, .. } => Ok(claims),
            SessionState::Anonymous => Err(ClientError::NotAuthenticated),
        }
    }

    /// Claims of a live session; an expired one drops back to Anonymous.
    pub fn current(&mut self) -> Option<&SessionClaims> {
        let expired = match &self.state {
            SessionState::Authenticated { claims, .. } => claims.is_expired_at(now()),
            SessionState::Anonymous => return None,
        };
        if expired {
            info!("session expired");
            self.discard();
            return None;
        }
        match &self.state {
            SessionState::Authenticated { claims, .. } => Some(claims),
            SessionState::Anonymous => None,
        }
    }

    pub fn token(&mut self) -> Option<String> {
        self.current()?;
        match &self.state {
            SessionState::Authenticated { token, .. } => Some(token.clone()),
            SessionState::Anonymous => None,
        }
    }

    pub fn dashboard(&mut self) -> Option<Dashboard> {
        self.current().map(|c| Dashboard::for_role(c.role))
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.state = SessionState::Anonymous;
        if let Some(path) = &self.path {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    /// Logout that always reaches Anonymous; a token file that cannot be removed is logged.
    pub(crate) fn discard(&mut self) {
        if let Err(e) = self.logout() {
            warn!(error = %e, "session cleared but token file could not be removed");
        }
    }
}
