use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::auth::{repo::SeaOrmAuthRepository, AuthConfig, AuthService};
use service::lifecycle::{repo::SeaOrmRequestRepository, LifecycleService};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub auth: Arc<AuthService<SeaOrmAuthRepository>>,
    pub lifecycle: Arc<LifecycleService<SeaOrmRequestRepository>>,
    /// Mark the session cookie `Secure` (behind TLS).
    pub cookie_secure: bool,
}

impl AppState {
    pub fn new(db: DatabaseConnection, settings: &configs::AuthSettings) -> Self {
        let auth = AuthService::new(Arc::new(SeaOrmAuthRepository::new(db.clone())), AuthConfig::from_settings(settings));
        let lifecycle = LifecycleService::new(Arc::new(SeaOrmRequestRepository::new(db.clone())));
        Self { db, auth: Arc::new(auth), lifecycle: Arc::new(lifecycle), cookie_secure: settings.cookie_secure }
    }
}
