//! Session token transport and the authenticated-caller extractor.

use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::{header, request::Parts, HeaderMap};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use models::Role;
use service::{gate, AuthContext, ServiceError};
use tracing::warn;

use crate::errors::ApiError;
use crate::flash::{self, Flash};
use crate::state::AppState;

pub const AUTH_COOKIE: &str = "auth_token";

/// 读取 Authorization: Bearer；缺失时回退到 auth_token Cookie
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(h) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return h.strip_prefix("Bearer ").map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
    }
    CookieJar::from_headers(headers)
        .get(AUTH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}

pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(secure);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

pub fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(AUTH_COOKIE).path("/"))
}

/// The authenticated caller of this request.
#[derive(Debug, Clone, Copy)]
pub struct Session(pub AuthContext);

/// Rejection: JSON 401 under `/api`, otherwise a redirect to the login page.
pub struct SessionRejection {
    api: bool,
    message: String,
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        if self.api {
            return ApiError::unauthorized(self.message).into_response();
        }
        flash::redirect(CookieJar::new(), "/login", Flash::danger(self.message))
    }
}

async fn resolve(state: &AppState, path: &str, headers: &HeaderMap) -> Result<AuthContext, SessionRejection> {
    let api = path.starts_with("/api");
    let Some(token) = extract_token(headers) else {
        return Err(SessionRejection { api, message: "please log in".into() });
    };
    state.auth.authenticate(&token).await.map_err(|e| {
        warn!(path, error = %e, "session rejected");
        SessionRejection { api, message: "session expired or invalid, please log in again".into() }
    })
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // 角色守卫已解析过的会话直接复用
        if let Some(session) = parts.extensions.get::<Session>() {
            return Ok(*session);
        }
        resolve(state, parts.uri.path(), &parts.headers).await.map(Session)
    }
}

/// Role check in front of a route group: runs before the handler parses its
/// path or body, so a wrong role is refused whatever the request carries.
async fn guard(state: AppState, roles: &[Role], mut req: Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    let ctx = match resolve(&state, &path, req.headers()).await {
        Ok(ctx) => ctx,
        Err(rejection) => return rejection.into_response(),
    };
    if let Err(e) = gate::require_any(&ctx, roles) {
        let message = match e {
            ServiceError::Unauthorized(m) => m,
            other => other.to_string(),
        };
        return SessionRejection { api: path.starts_with("/api"), message }.into_response();
    }
    req.extensions_mut().insert(Session(ctx));
    next.run(req).await
}

pub async fn admin_only(State(state): State<AppState>, req: Request, next: Next) -> Response {
    guard(state, &[Role::Admin], req, next).await
}

pub async fn customer_only(State(state): State<AppState>, req: Request, next: Next) -> Response {
    guard(state, &[Role::Customer], req, next).await
}

pub async fn professional_only(State(state): State<AppState>, req: Request, next: Next) -> Response {
    guard(state, &[Role::Professional], req, next).await
}

/// Closing a job: the assigned professional or an admin.
pub async fn staff_only(State(state): State<AppState>, req: Request, next: Next) -> Response {
    guard(state, &[Role::Professional, Role::Admin], req, next).await
}
