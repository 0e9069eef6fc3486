//! One-shot flash messages carried in a cookie across a redirect.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub kind: String,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self { Self { kind: "success".into(), message: message.into() } }
    pub fn info(message: impl Into<String>) -> Self { Self { kind: "info".into(), message: message.into() } }
    pub fn danger(message: impl Into<String>) -> Self { Self { kind: "danger".into(), message: message.into() } }

    fn encode(&self) -> String { format!("{}:{}", self.kind, self.message) }

    fn decode(raw: &str) -> Option<Self> {
        let (kind, message) = raw.split_once(':')?;
        Some(Self { kind: kind.to_string(), message: message.to_string() })
    }
}

/// 303 to `to`, leaving a flash message for the next page.
pub fn redirect(jar: CookieJar, to: &str, flash: Flash) -> Response {
    let cookie = Cookie::build((FLASH_COOKIE, flash.encode()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), Redirect::to(to)).into_response()
}

/// Read and clear the pending flash message.
pub fn take(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let flash = jar.get(FLASH_COOKIE).and_then(|c| Flash::decode(c.value()));
    if flash.is_none() {
        return (jar, None);
    }
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), flash)
}
