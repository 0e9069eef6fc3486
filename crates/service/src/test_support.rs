#![cfg(test)]
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use configs::DatabaseConfig;
use models::db::connect_with_config;
use models::{customer, professional, service, user, Role};

/// Fresh migrated in-memory SQLite database, one per test.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let cfg = DatabaseConfig { url: "sqlite::memory:".into(), ..DatabaseConfig::default() };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub async fn seed_service(db: &DatabaseConnection, name: &str) -> anyhow::Result<service::Model> {
    Ok(service::create(db, name, 50.0, &format!("{} at home", name)).await?)
}

pub async fn seed_user(db: &DatabaseConnection, name: &str, role: Role) -> anyhow::Result<user::Model> {
    let email = format!("{}@example.com", name);
    Ok(user::create(
        db,
        user::NewUser { username: name, email: &email, phone_number: None, password_hash: "x".into(), role },
    )
    .await?)
}

pub async fn seed_customer(db: &DatabaseConnection, name: &str) -> anyhow::Result<(user::Model, customer::Model)> {
    let u = seed_user(db, name, Role::Customer).await?;
    let c = customer::create(db, u.id, Some("1 Main St"), Some("560001")).await?;
    Ok((u, c))
}

pub async fn seed_professional(
    db: &DatabaseConnection,
    name: &str,
    service_id: Uuid,
    approved: bool,
) -> anyhow::Result<(user::Model, professional::Model)> {
    let u = seed_user(db, name, Role::Professional).await?;
    let p = professional::create(
        db,
        professional::NewProfessional {
            user_id: u.id,
            service_id,
            service_type: "plumbing",
            experience: 3.0,
            resume_ref: None,
            address: None,
            pin_code: None,
            description: None,
        },
    )
    .await?;
    if approved {
        professional::set_approved(db, p.id, true).await?;
    }
    Ok((u, p))
}
