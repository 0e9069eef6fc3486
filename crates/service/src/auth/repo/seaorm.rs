use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, TransactionTrait};
use uuid::Uuid;

use models::{admin, customer, professional, service, user, Role};

use crate::auth::domain::{AuthUser, Credentials, CustomerProfile, NewAccount, ProfessionalProfile};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAuthRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn repo_err(e: impl std::fmt::Display) -> AuthError { AuthError::Repository(e.to_string()) }

fn to_domain(u: user::Model) -> AuthUser {
    AuthUser { id: u.id, username: u.username, email: u.email, role: u.role, is_active: u.is_active }
}

fn new_user(account: &NewAccount) -> user::NewUser<'_> {
    user::NewUser {
        username: &account.username,
        email: &account.email,
        phone_number: account.phone_number.as_deref(),
        password_hash: account.password_hash.clone(),
        role: account.role,
    }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = user::find_by_email(&self.db, email).await?;
        Ok(res.map(to_domain))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
        let res = user::Entity::find_by_id(id).one(&self.db).await.map_err(repo_err)?;
        Ok(res.map(to_domain))
    }

    async fn taken_field(&self, username: &str, email: &str, phone: Option<&str>) -> Result<Option<&'static str>, AuthError> {
        Ok(user::taken_field(&self.db, username, email, phone).await?)
    }

    async fn service_exists(&self, service_id: Uuid) -> Result<bool, AuthError> {
        let found = service::Entity::find_by_id(service_id).one(&self.db).await.map_err(repo_err)?;
        Ok(found.is_some())
    }

    async fn admin_exists(&self) -> Result<bool, AuthError> {
        let n = user::Entity::find()
            .filter(user::Column::Role.eq(Role::Admin))
            .count(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(n > 0)
    }

    async fn create_customer(&self, account: NewAccount, profile: CustomerProfile) -> Result<AuthUser, AuthError> {
        let txn = self.db.begin().await.map_err(repo_err)?;
        let u = user::create(&txn, new_user(&account)).await?;
        customer::create(&txn, u.id, profile.address.as_deref(), profile.pin_code.as_deref()).await?;
        txn.commit().await.map_err(repo_err)?;
        Ok(to_domain(u))
    }

    async fn create_professional(&self, account: NewAccount, profile: ProfessionalProfile) -> Result<AuthUser, AuthError> {
        let txn = self.db.begin().await.map_err(repo_err)?;
        let u = user::create(&txn, new_user(&account)).await?;
        professional::create(
            &txn,
            professional::NewProfessional {
                user_id: u.id,
                service_id: profile.service_id,
                service_type: &profile.service_type,
                experience: profile.experience,
                resume_ref: profile.resume_ref.as_deref(),
                address: profile.address.as_deref(),
                pin_code: profile.pin_code.as_deref(),
                description: profile.description.as_deref(),
            },
        )
        .await?;
        txn.commit().await.map_err(repo_err)?;
        Ok(to_domain(u))
    }

    async fn create_admin(&self, account: NewAccount) -> Result<AuthUser, AuthError> {
        let txn = self.db.begin().await.map_err(repo_err)?;
        let u = user::create(&txn, new_user(&account)).await?;
        admin::create(&txn, u.id).await?;
        txn.commit().await.map_err(repo_err)?;
        Ok(to_domain(u))
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let res = user::Entity::find_by_id(user_id).one(&self.db).await.map_err(repo_err)?;
        Ok(res.map(|u| Credentials { user_id: u.id, password_hash: u.password_hash }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::domain::{AccountInput, LoginInput, RegisterCustomerInput, RegisterProfessionalInput};
    use crate::auth::service::{AuthConfig, AuthService};
    use crate::test_support::{get_db, seed_service};

    fn account(name: &str) -> AccountInput {
        AccountInput {
            username: name.into(),
            email: format!("{}@example.com", name),
            phone_number: Some("9876543210".into()),
            password: "Secret123".into(),
            confirm_password: "Secret123".into(),
        }
    }

    #[tokio::test]
    async fn registrations_persist_profiles() -> anyhow::Result<()> {
        let db = get_db().await?;
        let svc = seed_service(&db, "Plumbing").await?;
        let auth = AuthService::new(
            Arc::new(SeaOrmAuthRepository::new(db.clone())),
            AuthConfig { jwt_secret: "s".into(), token_ttl_hours: 1 },
        );

        let cust = auth
            .register_customer(RegisterCustomerInput { account: account("cust"), address: Some("1 Road".into()), pin_code: Some("560001".into()) })
            .await?;
        assert!(customer::find_by_user(&db, cust.id).await?.is_some());

        let mut pro_account = account("pro");
        pro_account.phone_number = None;
        let pro = auth
            .register_professional(RegisterProfessionalInput {
                account: pro_account,
                service_id: svc.id,
                service_type: "plumbing".into(),
                experience: 4.0,
                resume_ref: Some("resumes/pro.pdf".into()),
                address: None,
                pin_code: None,
                description: None,
            })
            .await?;
        let profile = professional::find_by_user(&db, pro.id).await?.expect("profile");
        assert!(!profile.is_approved);
        assert_eq!(profile.service_id, svc.id);

        // 手机号重复
        let mut dup = account("other");
        dup.email = "other@example.com".into();
        let err = auth.register_customer(RegisterCustomerInput { account: dup, address: None, pin_code: None }).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict("phone_number")));

        let session = auth.login(LoginInput { email: "CUST@example.com".into(), password: "Secret123".into() }).await?;
        assert_eq!(session.user.id, cust.id);
        Ok(())
    }

    #[tokio::test]
    async fn bootstrap_creates_admin_row() -> anyhow::Result<()> {
        let db = get_db().await?;
        let auth = AuthService::new(
            Arc::new(SeaOrmAuthRepository::new(db.clone())),
            AuthConfig { jwt_secret: "s".into(), token_ttl_hours: 1 },
        );
        assert!(auth.bootstrap_admin("admin", "admin@example.com", "admin-pass-1").await);
        assert_eq!(user::count_by_role(&db, Role::Admin).await?, 1);
        assert_eq!(admin::Entity::find().count(&db).await?, 1);
        assert!(!auth.bootstrap_admin("admin", "admin@example.com", "admin-pass-1").await);
        Ok(())
    }
}
