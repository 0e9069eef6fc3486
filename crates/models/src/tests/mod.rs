

use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

use crate::db::connect_with_config;

/// Fresh migrated in-memory database per test
pub(crate) async fn setup_test_db() -> Result<DatabaseConnection> {
    let cfg = configs::DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// customer user + customer row + one catalog service
pub(crate) async fn seed_customer_and_service(
    db: &DatabaseConnection,
) -> Result<(crate::customer::Model, crate::service::Model)> {
    use crate::{customer, service, user, Role};
    let u = user::create(db, user::NewUser {
        username: "carol",
        email: "carol@example.com",
        phone_number: None,
        password_hash: "x".into(),
        role: Role::Customer,
    }).await?;
    let c = customer::create(db, u.id, Some("1 Main St"), Some("560001")).await?;
    let s = service::create(db, "Plumbing", 50.0, "Pipes and taps").await?;
    Ok((c, s))
}
