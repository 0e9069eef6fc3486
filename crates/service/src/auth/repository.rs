use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{AuthUser, Credentials, CustomerProfile, NewAccount, ProfessionalProfile};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError>;
    /// First unique field (`username`, `email`, `phone_number`) already in use.
    async fn taken_field(&self, username: &str, email: &str, phone: Option<&str>) -> Result<Option<&'static str>, AuthError>;
    async fn service_exists(&self, service_id: Uuid) -> Result<bool, AuthError>;
    async fn admin_exists(&self) -> Result<bool, AuthError>;

    async fn create_customer(&self, account: NewAccount, profile: CustomerProfile) -> Result<AuthUser, AuthError>;
    async fn create_professional(&self, account: NewAccount, profile: ProfessionalProfile) -> Result<AuthUser, AuthError>;
    async fn create_admin(&self, account: NewAccount) -> Result<AuthUser, AuthError>;

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use models::Role;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<Uuid, AuthUser>>,
        phones: Mutex<HashSet<String>>,
        creds: Mutex<HashMap<Uuid, Credentials>>, // key: user_id
        services: Mutex<HashSet<Uuid>>,
    }

    impl MockAuthRepository {
        /// Register a catalog service id so professionals can sign up for it.
        pub fn with_service(self, service_id: Uuid) -> Self {
            self.services.lock().unwrap().insert(service_id);
            self
        }

        pub fn set_active(&self, user_id: Uuid, active: bool) {
            if let Some(u) = self.users.lock().unwrap().get_mut(&user_id) {
                u.is_active = active;
            }
        }

        fn insert(&self, account: NewAccount) -> Result<AuthUser, AuthError> {
            let user = AuthUser {
                id: Uuid::new_v4(),
                username: account.username,
                email: account.email.to_lowercase(),
                role: account.role,
                is_active: true,
            };
            if let Some(p) = account.phone_number {
                self.phones.lock().unwrap().insert(p);
            }
            self.creds
                .lock()
                .unwrap()
                .insert(user.id, Credentials { user_id: user.id, password_hash: account.password_hash });
            self.users.lock().unwrap().insert(user.id, user.clone());
            Ok(user)
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let email = email.trim().to_lowercase();
            let users = self.users.lock().unwrap();
            Ok(users.values().find(|u| u.email == email).cloned())
        }

        async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
            Ok(self.users.lock().unwrap().get(&id).cloned())
        }

        async fn taken_field(&self, username: &str, email: &str, phone: Option<&str>) -> Result<Option<&'static str>, AuthError> {
            let users = self.users.lock().unwrap();
            if users.values().any(|u| u.username == username) {
                return Ok(Some("username"));
            }
            let email = email.to_lowercase();
            if users.values().any(|u| u.email == email) {
                return Ok(Some("email"));
            }
            if let Some(p) = phone {
                if self.phones.lock().unwrap().contains(p) {
                    return Ok(Some("phone_number"));
                }
            }
            Ok(None)
        }

        async fn service_exists(&self, service_id: Uuid) -> Result<bool, AuthError> {
            Ok(self.services.lock().unwrap().contains(&service_id))
        }

        async fn admin_exists(&self) -> Result<bool, AuthError> {
            Ok(self.users.lock().unwrap().values().any(|u| u.role == Role::Admin))
        }

        async fn create_customer(&self, account: NewAccount, _profile: CustomerProfile) -> Result<AuthUser, AuthError> {
            self.insert(account)
        }

        async fn create_professional(&self, account: NewAccount, _profile: ProfessionalProfile) -> Result<AuthUser, AuthError> {
            self.insert(account)
        }

        async fn create_admin(&self, account: NewAccount) -> Result<AuthUser, AuthError> {
            self.insert(account)
        }

        async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
            let creds = self.creds.lock().unwrap();
            Ok(creds.get(&user_id).cloned())
        }
    }
}
