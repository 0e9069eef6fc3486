use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use models::Role;
use rand::rngs::OsRng;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::domain::{
    AccountInput, AuthSession, AuthUser, Claims, CustomerProfile, LoginInput, NewAccount, ProfessionalProfile,
    RegisterCustomerInput, RegisterProfessionalInput,
};
use super::errors::AuthError;
use super::repository::AuthRepository;
use crate::gate::AuthContext;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

impl AuthConfig {
    pub fn from_settings(settings: &configs::AuthSettings) -> Self {
        Self { jwt_secret: settings.jwt_secret.clone(), token_ttl_hours: settings.token_ttl_hours }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

fn required(field: &str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    fn validate_account(account: &AccountInput) -> Result<(), AuthError> {
        required("username", &account.username)?;
        required("email", &account.email)?;
        required("password", &account.password)?;
        if account.password != account.confirm_password {
            return Err(AuthError::Validation("passwords do not match".into()));
        }
        if account.password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!("password too short (>={})", MIN_PASSWORD_LEN)));
        }
        models::user::validate_username(&account.username)?;
        models::user::validate_email(&account.email)?;
        if let Some(phone) = account.phone_number.as_deref().filter(|p| !p.trim().is_empty()) {
            models::user::validate_phone(phone)?;
        }
        Ok(())
    }

    fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string())
    }

    /// Uniqueness check plus hashing; yields the row the repository persists.
    async fn prepare_account(&self, account: AccountInput, role: Role) -> Result<NewAccount, AuthError> {
        Self::validate_account(&account)?;
        let phone = non_blank(account.phone_number);
        if let Some(field) = self.repo.taken_field(account.username.trim(), &account.email, phone.as_deref()).await? {
            debug!(field, "registration_conflict");
            return Err(AuthError::Conflict(field));
        }
        Ok(NewAccount {
            username: account.username.trim().to_string(),
            email: account.email.trim().to_lowercase(),
            phone_number: phone,
            password_hash: Self::hash_password(&account.password)?,
            role,
        })
    }

    /// Register a customer account.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{AccountInput, RegisterCustomerInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 1 });
    /// let account = AccountInput {
    ///     username: "alice".into(), email: "alice@example.com".into(), phone_number: None,
    ///     password: "Secret123".into(), confirm_password: "Secret123".into(),
    /// };
    /// let user = tokio_test::block_on(svc.register_customer(RegisterCustomerInput { account, address: None, pin_code: None })).unwrap();
    /// assert_eq!(user.email, "alice@example.com");
    /// assert_eq!(user.role, models::Role::Customer);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.account.email))]
    pub async fn register_customer(&self, input: RegisterCustomerInput) -> Result<AuthUser, AuthError> {
        if let Some(pin) = input.pin_code.as_deref().filter(|p| !p.trim().is_empty()) {
            models::customer::validate_pin_code(pin)?;
        }
        let account = self.prepare_account(input.account, Role::Customer).await?;
        let profile = CustomerProfile { address: non_blank(input.address), pin_code: non_blank(input.pin_code) };
        let user = self.repo.create_customer(account, profile).await?;
        info!(user_id = %user.id, role = %user.role, "user_registered");
        Ok(user)
    }

    /// Register a professional for one catalog service; the account starts unapproved.
    #[instrument(skip(self, input), fields(email = %input.account.email, service_id = %input.service_id))]
    pub async fn register_professional(&self, input: RegisterProfessionalInput) -> Result<AuthUser, AuthError> {
        required("service_type", &input.service_type)?;
        models::professional::validate_experience(input.experience)?;
        if let Some(pin) = input.pin_code.as_deref().filter(|p| !p.trim().is_empty()) {
            models::customer::validate_pin_code(pin)?;
        }
        if !self.repo.service_exists(input.service_id).await? {
            return Err(AuthError::NotFound("service".into()));
        }
        let account = self.prepare_account(input.account, Role::Professional).await?;
        let profile = ProfessionalProfile {
            service_id: input.service_id,
            service_type: input.service_type.trim().to_string(),
            experience: input.experience,
            resume_ref: non_blank(input.resume_ref),
            address: non_blank(input.address),
            pin_code: non_blank(input.pin_code),
            description: non_blank(input.description),
        };
        let user = self.repo.create_professional(account, profile).await?;
        info!(user_id = %user.id, role = %user.role, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and issue a session token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{AccountInput, LoginInput, RegisterCustomerInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 1 });
    /// let account = AccountInput {
    ///     username: "u1".into(), email: "u@e.com".into(), phone_number: None,
    ///     password: "Passw0rd".into(), confirm_password: "Passw0rd".into(),
    /// };
    /// let _ = tokio_test::block_on(svc.register_customer(RegisterCustomerInput { account, address: None, pin_code: None }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }
        if !user.is_active {
            warn!(user_id = %user.id, "blocked_user_login");
            return Err(AuthError::Blocked);
        }

        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, role = %user.role, "user_logged_in");
        Ok(AuthSession { user, token })
    }

    pub fn issue_token(&self, user: &AuthUser) -> Result<String, AuthError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            iat: now.timestamp() as usize,
            exp: (now + chrono::Duration::hours(self.cfg.token_ttl_hours)).timestamp() as usize,
        };
        encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| AuthError::TokenError(e.to_string()))?;
        Ok(data.claims)
    }

    /// Token -> caller context; the account must still exist and be active.
    pub async fn authenticate(&self, token: &str) -> Result<AuthContext, AuthError> {
        let claims = self.verify_token(token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|e| AuthError::TokenError(e.to_string()))?;
        let user = self.repo.find_user_by_id(user_id).await?.ok_or(AuthError::Unauthorized)?;
        if !user.is_active {
            return Err(AuthError::Blocked);
        }
        Ok(AuthContext::new(user.id, user.role))
    }

    async fn try_bootstrap_admin(&self, username: &str, email: &str, password: &str) -> Result<bool, AuthError> {
        if self.repo.admin_exists().await? {
            return Ok(false);
        }
        let account = AccountInput {
            username: username.to_string(),
            email: email.to_string(),
            phone_number: None,
            password: password.to_string(),
            confirm_password: password.to_string(),
        };
        let account = self.prepare_account(account, Role::Admin).await?;
        let admin = self.repo.create_admin(account).await?;
        info!(user_id = %admin.id, email = %admin.email, "admin_bootstrapped");
        Ok(true)
    }

    /// Create the admin account when none exists. Failures are logged, never raised.
    pub async fn bootstrap_admin(&self, username: &str, email: &str, password: &str) -> bool {
        match self.try_bootstrap_admin(username, email, password).await {
            Ok(created) => created,
            Err(e) => {
                error!(code = e.code(), error = %e, "admin_bootstrap_failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc(repo: Arc<MockAuthRepository>) -> AuthService<MockAuthRepository> {
        AuthService::new(repo, AuthConfig { jwt_secret: "test-secret".into(), token_ttl_hours: 1 })
    }

    fn account(name: &str, password: &str, confirm: &str) -> AccountInput {
        AccountInput {
            username: name.into(),
            email: format!("{}@example.com", name),
            phone_number: None,
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    fn customer(name: &str) -> RegisterCustomerInput {
        RegisterCustomerInput { account: account(name, "Secret123", "Secret123"), address: None, pin_code: None }
    }

    #[tokio::test]
    async fn register_rejects_mismatched_or_short_passwords() {
        let s = svc(Arc::new(MockAuthRepository::default()));
        let err = s
            .register_customer(RegisterCustomerInput { account: account("a", "Secret123", "Secret124"), address: None, pin_code: None })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(m) if m.contains("match")));
        let err = s
            .register_customer(RegisterCustomerInput { account: account("a", "short", "short"), address: None, pin_code: None })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let s = svc(Arc::new(MockAuthRepository::default()));
        s.register_customer(customer("bob")).await.unwrap();
        let mut dup = customer("bob2");
        dup.account.email = "BOB@example.com".into();
        let err = s.register_customer(dup).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict("email")));
    }

    #[tokio::test]
    async fn professional_needs_existing_service() {
        let service_id = Uuid::new_v4();
        let s = svc(Arc::new(MockAuthRepository::default().with_service(service_id)));
        let mut input = RegisterProfessionalInput {
            account: account("pro", "Secret123", "Secret123"),
            service_id: Uuid::new_v4(),
            service_type: "plumbing".into(),
            experience: 2.0,
            resume_ref: None,
            address: None,
            pin_code: None,
            description: None,
        };
        assert!(matches!(s.register_professional(input.clone()).await, Err(AuthError::NotFound(_))));
        input.service_id = service_id;
        let user = s.register_professional(input).await.unwrap();
        assert_eq!(user.role, Role::Professional);
    }

    #[tokio::test]
    async fn login_issues_token_that_authenticates() {
        let s = svc(Arc::new(MockAuthRepository::default()));
        let user = s.register_customer(customer("carol")).await.unwrap();
        let session = s
            .login(LoginInput { email: "carol@example.com".into(), password: "Secret123".into() })
            .await
            .unwrap();
        let claims = s.verify_token(&session.token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.role, Role::Customer);
        let ctx = s.authenticate(&session.token).await.unwrap();
        assert_eq!(ctx, AuthContext::new(user.id, Role::Customer));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_unauthorized() {
        let s = svc(Arc::new(MockAuthRepository::default()));
        s.register_customer(customer("dave")).await.unwrap();
        let bad = s.login(LoginInput { email: "dave@example.com".into(), password: "nope-nope".into() }).await;
        assert!(matches!(bad, Err(AuthError::Unauthorized)));
        let missing = s.login(LoginInput { email: "ghost@example.com".into(), password: "Secret123".into() }).await;
        assert!(matches!(missing, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn blocked_user_cannot_login_or_reuse_token() {
        let repo = Arc::new(MockAuthRepository::default());
        let s = svc(repo.clone());
        let user = s.register_customer(customer("erin")).await.unwrap();
        let session = s
            .login(LoginInput { email: "erin@example.com".into(), password: "Secret123".into() })
            .await
            .unwrap();
        repo.set_active(user.id, false);
        let again = s.login(LoginInput { email: "erin@example.com".into(), password: "Secret123".into() }).await;
        assert!(matches!(again, Err(AuthError::Blocked)));
        assert!(matches!(s.authenticate(&session.token).await, Err(AuthError::Blocked)));
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_rejected() {
        let repo = Arc::new(MockAuthRepository::default());
        let s = svc(repo.clone());
        let user = s.register_customer(customer("frank")).await.unwrap();
        let other = AuthService::new(repo, AuthConfig { jwt_secret: "other".into(), token_ttl_hours: 1 });
        let token = other.issue_token(&user).unwrap();
        assert!(matches!(s.verify_token(&token), Err(AuthError::TokenError(_))));
    }

    #[tokio::test]
    async fn bootstrap_admin_runs_once() {
        let s = svc(Arc::new(MockAuthRepository::default()));
        assert!(s.bootstrap_admin("admin", "admin@example.com", "admin-pass-1").await);
        assert!(!s.bootstrap_admin("admin", "admin@example.com", "admin-pass-1").await);
        // 密码过短时仅记录日志
        let fresh = svc(Arc::new(MockAuthRepository::default()));
        assert!(!fresh.bootstrap_admin("admin", "admin@example.com", "short").await);
    }
}
