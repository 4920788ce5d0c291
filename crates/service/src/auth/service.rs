use std::sync::Arc;

use chrono::{Duration, Utc};
use models::user::{self, UserRole};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::domain::{
    AuthSession, AuthUser, ChangePasswordInput, CreateUserInput, LoginInput, NewPasswordRule, NewUser,
    RegisterInput, SessionClaims,
};
use super::errors::AuthError;
use super::password::{hash_password, verify_password};
use super::repository::AuthRepository;
use super::token;

pub const CREDENTIALS_REQUIRED: &str = "Email and password are required.";
pub const ALL_FIELDS_REQUIRED: &str = "All fields are required";
pub const ROLE_RULE: &str = "Role must be one of: Normal User, Store Owner, System Administrator.";

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self { jwt_secret: jwt_secret.into(), token_ttl: Duration::hours(8) }
    }

    pub fn with_ttl_hours(mut self, hours: i64) -> Self {
        self.token_ttl = Duration::hours(hours);
        self
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository + ?Sized> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a Normal User with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthConfig};
    /// use service::auth::domain::RegisterInput;
    /// use service::mock::MockRepository;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MockRepository::default()), AuthConfig::new("secret"));
    /// let input = RegisterInput {
    ///     name: "Alexandra Catherine Smith".into(),
    ///     email: "user@example.com".into(),
    ///     password: "Passw0rd!".into(),
    ///     address: None,
    /// };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// assert_eq!(user.role.as_str(), "Normal User");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        let user = self
            .create_account(input.name, input.email, &input.password, input.address, UserRole::NormalUser)
            .await?;
        info!(user_id = %user.id, email = %user.email, "user_registered");
        Ok(user)
    }

    /// Administrator path: same rules as `register`, caller picks the role.
    #[instrument(skip(self, input), fields(email = %input.email, role = ?input.role))]
    pub async fn create_user(&self, input: CreateUserInput) -> Result<AuthUser, AuthError> {
        let role = match input.role.as_deref().map(str::trim) {
            None | Some("") => UserRole::default(),
            Some(label) => label.parse::<UserRole>().map_err(|_| AuthError::Validation(ROLE_RULE.into()))?,
        };
        let user = self.create_account(input.name, input.email, &input.password, input.address, role).await?;
        info!(user_id = %user.id, email = %user.email, role = %user.role, "user_added");
        Ok(user)
    }

    /// Create a System Administrator unless the email is already taken.
    /// Returns `None` when an account with that email exists.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn ensure_admin(&self, input: RegisterInput) -> Result<Option<AuthUser>, AuthError> {
        if let Some(existing) = self.repo.find_user_by_email(&input.email).await? {
            if existing.user.role != UserRole::SystemAdministrator {
                warn!(email = %existing.user.email, role = %existing.user.role, "bootstrap email belongs to a non-admin account");
            }
            return Ok(None);
        }
        let admin = self
            .create_account(input.name, input.email, &input.password, input.address, UserRole::SystemAdministrator)
            .await?;
        info!(user_id = %admin.id, "bootstrap_admin_created");
        Ok(Some(admin))
    }

    async fn create_account(
        &self,
        name: String,
        email: String,
        password: &str,
        address: Option<String>,
        role: UserRole,
    ) -> Result<AuthUser, AuthError> {
        user::validate_name(&name)?;
        user::validate_address(address.as_deref())?;
        user::validate_password(password)?;
        user::validate_email(&email)?;

        let password_hash = hash_password(password).await?;
        self.repo.create_user(NewUser { name, email, password_hash, address, role }).await
    }

    /// Check credentials and issue a session token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthConfig};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use service::mock::MockRepository;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MockRepository::default()), AuthConfig::new("secret"));
    /// tokio_test::block_on(svc.register(RegisterInput {
    ///     name: "Alexandra Catherine Smith".into(),
    ///     email: "u@e.com".into(),
    ///     password: "Passw0rd!".into(),
    ///     address: None,
    /// })).unwrap();
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd!".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert_eq!(svc.verify_token(&session.token).unwrap().id, session.user.id);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        if input.email.is_empty() || input.password.is_empty() {
            return Err(AuthError::Validation(CREDENTIALS_REQUIRED.into()));
        }
        let stored = self.repo.find_user_by_email(&input.email).await?.ok_or(AuthError::UnknownEmail)?;
        if !verify_password(&input.password, &stored.password_hash).await? {
            debug!(user_id = %stored.user.id, "password mismatch");
            return Err(AuthError::IncorrectPassword);
        }
        let token = self.issue_token(&stored.user)?;
        info!(user_id = %stored.user.id, role = %stored.user.role, "user_logged_in");
        Ok(AuthSession { user: stored.user, token })
    }

    pub fn issue_token(&self, user: &AuthUser) -> Result<String, AuthError> {
        token::issue(user, &self.cfg.jwt_secret, self.cfg.token_ttl, Utc::now())
    }

    pub fn verify_token(&self, token: &str) -> Result<SessionClaims, AuthError> {
        token::verify(token, &self.cfg.jwt_secret)
    }

    #[instrument(skip(self, input))]
    pub async fn change_password(
        &self,
        user_id: Uuid,
        input: ChangePasswordInput,
        rule: NewPasswordRule,
    ) -> Result<(), AuthError> {
        match rule {
            NewPasswordRule::Enforce => user::validate_password(&input.new_password)
                .map_err(|_| AuthError::Validation(format!("New {}", user::PASSWORD_RULE.to_lowercase())))?,
            NewPasswordRule::RequirePresent => {
                if input.current_password.is_empty() || input.new_password.is_empty() {
                    return Err(AuthError::Validation(ALL_FIELDS_REQUIRED.into()));
                }
            }
        }
        let stored = self
            .repo
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::NotFound("User not found.".into()))?;
        if !verify_password(&input.current_password, &stored.password_hash).await? {
            return Err(AuthError::IncorrectPassword);
        }
        let hash = hash_password(&input.new_password).await?;
        self.repo.update_password(user_id, hash).await?;
        info!("password_changed");
        Ok(())
    }
}

/// Authorization gate for role-restricted operations.
pub fn require_role(claims: &SessionClaims, role: UserRole) -> Result<(), AuthError> {
    if claims.role == role {
        return Ok(());
    }
    let msg = match role {
        UserRole::SystemAdministrator => "Access denied. Admins only.",
        UserRole::StoreOwner => "Access denied. Store Owners only.",
        UserRole::NormalUser => "Access denied. Normal Users only.",
    };
    Err(AuthError::Forbidden(msg.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::AuthRepository;
    use crate::mock::MockRepository;

    const GOOD_NAME: &str = "Alexandra Catherine Smith";

    fn svc() -> (Arc<MockRepository>, AuthService<MockRepository>) {
        let repo = Arc::new(MockRepository::default());
        (repo.clone(), AuthService::new(repo, AuthConfig::new("test-secret")))
    }

    fn reg(email: &str) -> RegisterInput {
        RegisterInput {
            name: GOOD_NAME.into(),
            email: email.into(),
            password: "Passw0rd!".into(),
            address: Some("12 High Street".into()),
        }
    }

    #[tokio::test]
    async fn register_stores_hash_not_plaintext() {
        let (repo, svc) = svc();
        let user = svc.register(reg("a@b.com")).await.unwrap();
        assert_eq!(user.role, UserRole::NormalUser);
        let stored = repo.find_user_by_email("a@b.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "Passw0rd!");
        assert!(stored.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn register_validates_in_order() {
        let (_, svc) = svc();
        let mut bad = reg("not-an-email");
        bad.name = "short".into();
        bad.password = "weak".into();
        let err = svc.register(bad).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(m) if m == user::NAME_RULE));

        let mut bad = reg("not-an-email");
        bad.password = "weak".into();
        let err = svc.register(bad).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(m) if m == user::PASSWORD_RULE));

        let err = svc.register(reg("not-an-email")).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(m) if m == user::EMAIL_RULE));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let (_, svc) = svc();
        svc.register(reg("dup@b.com")).await.unwrap();
        let err = svc.register(reg("dup@b.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict(m) if m == "Email already exists."));
    }

    #[tokio::test]
    async fn login_roundtrip_and_failures() {
        let (_, svc) = svc();
        let user = svc.register(reg("l@b.com")).await.unwrap();

        let session = svc
            .login(LoginInput { email: "l@b.com".into(), password: "Passw0rd!".into() })
            .await
            .unwrap();
        let claims = svc.verify_token(&session.token).unwrap();
        assert_eq!(claims.id, user.id);
        assert_eq!(claims.name, GOOD_NAME);
        assert_eq!(claims.exp - claims.iat, 8 * 3600);

        let err = svc.login(LoginInput { email: "l@b.com".into(), password: "Passw0rd?".into() }).await;
        assert!(matches!(err, Err(AuthError::IncorrectPassword)));
        let err = svc.login(LoginInput { email: "nobody@b.com".into(), password: "Passw0rd!".into() }).await;
        assert!(matches!(err, Err(AuthError::UnknownEmail)));
        let err = svc.login(LoginInput { email: "".into(), password: "x".into() }).await;
        assert!(matches!(err, Err(AuthError::Validation(m)) if m == CREDENTIALS_REQUIRED));
    }

    #[tokio::test]
    async fn ttl_is_configurable() {
        let repo = Arc::new(MockRepository::default());
        let svc = AuthService::new(repo, AuthConfig::new("k").with_ttl_hours(1));
        let user = svc.register(reg("ttl@b.com")).await.unwrap();
        let claims = svc.verify_token(&svc.issue_token(&user).unwrap()).unwrap();
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[tokio::test]
    async fn create_user_with_role() {
        let (_, svc) = svc();
        let input = CreateUserInput {
            name: GOOD_NAME.into(),
            email: "owner@b.com".into(),
            password: "Passw0rd!".into(),
            address: None,
            role: Some("Store Owner".into()),
        };
        assert_eq!(svc.create_user(input.clone()).await.unwrap().role, UserRole::StoreOwner);

        let defaulted = CreateUserInput { email: "plain@b.com".into(), role: None, ..input.clone() };
        assert_eq!(svc.create_user(defaulted).await.unwrap().role, UserRole::NormalUser);

        let bogus = CreateUserInput { email: "x@b.com".into(), role: Some("Root".into()), ..input };
        assert!(matches!(svc.create_user(bogus).await, Err(AuthError::Validation(m)) if m == ROLE_RULE));
    }

    #[tokio::test]
    async fn ensure_admin_is_idempotent() {
        let (_, svc) = svc();
        let first = svc.ensure_admin(reg("root@b.com")).await.unwrap();
        assert_eq!(first.unwrap().role, UserRole::SystemAdministrator);
        assert!(svc.ensure_admin(reg("root@b.com")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn change_password_enforced() {
        let (_, svc) = svc();
        let user = svc.register(reg("cp@b.com")).await.unwrap();

        let weak = ChangePasswordInput { current_password: "Passw0rd!".into(), new_password: "weak".into() };
        assert!(matches!(
            svc.change_password(user.id, weak, NewPasswordRule::Enforce).await,
            Err(AuthError::Validation(m)) if m.starts_with("New password must be")
        ));

        let wrong = ChangePasswordInput { current_password: "Wrong000!".into(), new_password: "N3wPass!!".into() };
        assert!(matches!(
            svc.change_password(user.id, wrong, NewPasswordRule::Enforce).await,
            Err(AuthError::IncorrectPassword)
        ));

        let ok = ChangePasswordInput { current_password: "Passw0rd!".into(), new_password: "N3wPass!!".into() };
        svc.change_password(user.id, ok, NewPasswordRule::Enforce).await.unwrap();
        assert!(svc.login(LoginInput { email: "cp@b.com".into(), password: "N3wPass!!".into() }).await.is_ok());
        assert!(svc.login(LoginInput { email: "cp@b.com".into(), password: "Passw0rd!".into() }).await.is_err());
    }

    #[tokio::test]
    async fn change_password_presence_only() {
        let (_, svc) = svc();
        let user = svc.register(reg("cp2@b.com")).await.unwrap();

        let empty = ChangePasswordInput { current_password: "".into(), new_password: "x".into() };
        assert!(matches!(
            svc.change_password(user.id, empty, NewPasswordRule::RequirePresent).await,
            Err(AuthError::Validation(m)) if m == ALL_FIELDS_REQUIRED
        ));

        // no policy on this path
        let lax = ChangePasswordInput { current_password: "Passw0rd!".into(), new_password: "simple".into() };
        svc.change_password(user.id, lax, NewPasswordRule::RequirePresent).await.unwrap();

        let missing = ChangePasswordInput { current_password: "a".into(), new_password: "b".into() };
        assert!(matches!(
            svc.change_password(Uuid::new_v4(), missing, NewPasswordRule::RequirePresent).await,
            Err(AuthError::NotFound(_))
        ));
    }

    #[test]
    fn role_gate() {
        let claims = SessionClaims {
            id: Uuid::new_v4(),
            email: "o@b.com".into(),
            name: GOOD_NAME.into(),
            role: UserRole::StoreOwner,
            iat: 0,
            exp: 1,
        };
        assert!(require_role(&claims, UserRole::StoreOwner).is_ok());
        assert!(matches!(
            require_role(&claims, UserRole::SystemAdministrator),
            Err(AuthError::Forbidden(m)) if m == "Access denied. Admins only."
        ));
    }
}
