use axum::{extract::State, response::Response, Form};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use service::auth::domain::{AccountInput, LoginInput, RegisterCustomerInput, RegisterProfessionalInput};
use service::{catalog, ServiceError};

use crate::errors::form_failure;
use crate::flash::{self, Flash};
use crate::metrics;
use crate::routes::page;
use crate::session::{clear_session, session_cookie};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CustomerForm {
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub password: String,
    pub confirm_password: String,
    pub address: Option<String>,
    pub pin_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProfessionalForm {
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub password: String,
    pub confirm_password: String,
    pub service_id: Uuid,
    pub service_type: String,
    pub experience: f64,
    pub resume_ref: Option<String>,
    pub address: Option<String>,
    pub pin_code: Option<String>,
    pub description: Option<String>,
}

#[derive(Serialize)]
struct LoginPage {
    message: &'static str,
}

#[derive(Serialize)]
struct RegisterPage {
    services: Vec<models::service::Model>,
}

pub async fn login_page(jar: CookieJar) -> Response {
    page(jar, Ok(LoginPage { message: "POST email and password to /login" }))
}

/// Registration pages list the catalog so professionals can pick their service.
pub async fn register_page(State(state): State<AppState>, jar: CookieJar) -> Response {
    let services = catalog::list_services(&state.db).await;
    page(jar, services.map(|services| RegisterPage { services }))
}

pub async fn register_customer(State(state): State<AppState>, jar: CookieJar, Form(f): Form<CustomerForm>) -> Response {
    let input = RegisterCustomerInput {
        account: AccountInput {
            username: f.username,
            email: f.email,
            phone_number: f.phone_number,
            password: f.password,
            confirm_password: f.confirm_password,
        },
        address: f.address,
        pin_code: f.pin_code,
    };
    match state.auth.register_customer(input).await {
        Ok(_) => flash::redirect(jar, "/login", Flash::success("Registration successful, please log in")),
        Err(e) => form_failure(jar, "/register/customer", ServiceError::from(e)),
    }
}

pub async fn register_professional(State(state): State<AppState>, jar: CookieJar, Form(f): Form<ProfessionalForm>) -> Response {
    let input = RegisterProfessionalInput {
        account: AccountInput {
            username: f.username,
            email: f.email,
            phone_number: f.phone_number,
            password: f.password,
            confirm_password: f.confirm_password,
        },
        service_id: f.service_id,
        service_type: f.service_type,
        experience: f.experience,
        resume_ref: f.resume_ref,
        address: f.address,
        pin_code: f.pin_code,
        description: f.description,
    };
    match state.auth.register_professional(input).await {
        Ok(_) => flash::redirect(
            jar,
            "/login",
            Flash::success("Registration successful, wait for admin approval before accepting requests"),
        ),
        Err(e) => form_failure(jar, "/register/professional", ServiceError::from(e)),
    }
}

pub async fn login(State(state): State<AppState>, jar: CookieJar, Form(input): Form<LoginInput>) -> Response {
    match state.auth.login(input).await {
        Ok(session) => {
            metrics::LOGINS_TOTAL.inc();
            let jar = jar.add(session_cookie(session.token, state.cookie_secure));
            flash::redirect(jar, session.user.role.dashboard_path(), Flash::success("Logged in"))
        }
        Err(e) => {
            metrics::LOGIN_FAILURES_TOTAL.inc();
            flash::redirect(jar, "/login", Flash::danger(e.to_string()))
        }
    }
}

pub async fn logout(jar: CookieJar) -> Response {
    let jar = clear_session(jar);
    flash::redirect(jar, "/login", Flash::info("Logged out"))
}
