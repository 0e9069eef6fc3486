use models::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fields shared by every registration form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInput {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

/// Customer registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterCustomerInput {
    pub account: AccountInput,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub pin_code: Option<String>,
}

/// Professional registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterProfessionalInput {
    pub account: AccountInput,
    pub service_id: Uuid,
    pub service_type: String,
    pub experience: f64,
    #[serde(default)]
    pub resume_ref: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub pin_code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Account row handed to the repository; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerProfile {
    pub address: Option<String>,
    pub pin_code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProfessionalProfile {
    pub service_id: Uuid,
    pub service_type: String,
    pub experience: f64,
    pub resume_ref: Option<String>,
    pub address: Option<String>,
    pub pin_code: Option<String>,
    pub description: Option<String>,
}

/// Domain user (business view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
}

/// Domain credentials (hashed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub user_id: Uuid,
    pub password_hash: String,
}

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
}
