use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use configs::AppConfig;

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin-pass-123";

async fn build_app() -> anyhow::Result<Router> {
    let mut cfg = AppConfig::default();
    cfg.database.url = "sqlite::memory:".into();
    cfg.auth.jwt_secret = "test-secret".into();
    cfg.admin.password = ADMIN_PASSWORD.into();
    Ok(server::startup::build_app(&cfg).await?)
}

fn form(uri: &str, body: &str, cookie: Option<&str>) -> anyhow::Result<Request<Body>> {
    let mut b = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(c) = cookie { b = b.header(header::COOKIE, c); }
    Ok(b.body(Body::from(body.to_string()))?)
}

fn get(uri: &str, cookie: Option<&str>) -> anyhow::Result<Request<Body>> {
    let mut b = Request::builder().method("GET").uri(uri);
    if let Some(c) = cookie { b = b.header(header::COOKIE, c); }
    Ok(b.body(Body::empty())?)
}

fn location(resp: &Response<Body>) -> &str {
    resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()).unwrap_or("")
}

fn set_cookie(resp: &Response<Body>, name: &str) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{}=", name)))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

async fn json(resp: Response<Body>) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

async fn register_customer(app: &Router, name: &str) -> anyhow::Result<()> {
    let body = format!(
        "username={name}&email={name}%40example.com&password=Secret123&confirm_password=Secret123&address=1+Main+St&pin_code=560001"
    );
    let resp = app.clone().oneshot(form("/register/customer", &body, None)?).await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    Ok(())
}

/// Returns the `auth_token=...` cookie pair and the redirect target.
async fn login(app: &Router, email: &str, password: &str) -> anyhow::Result<(Option<String>, String)> {
    let body = format!("email={}&password={}", email.replace('@', "%40"), password);
    let resp = app.clone().oneshot(form("/login", &body, None)?).await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    Ok((set_cookie(&resp, "auth_token"), location(&resp).to_string()))
}

#[tokio::test]
async fn test_register_and_login_flow() -> anyhow::Result<()> {
    let app = build_app().await?;
    register_customer(&app, "alice").await?;

    let (cookie, to) = login(&app, "alice@example.com", "Secret123").await?;
    assert_eq!(to, "/customer_dashboard");
    let cookie = cookie.expect("session cookie");

    let resp = app.clone().oneshot(get("/customer_dashboard", Some(&cookie))?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json(resp).await?;
    assert_eq!(body["service_requests"], Value::Array(vec![]));

    // 未登录访问页面 -> 跳转登录
    let resp = app.clone().oneshot(get("/customer_dashboard", None)?).await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    Ok(())
}

#[tokio::test]
async fn test_bad_credentials_and_duplicate_registration() -> anyhow::Result<()> {
    let app = build_app().await?;
    register_customer(&app, "bob").await?;

    let (cookie, to) = login(&app, "bob@example.com", "wrong-pass").await?;
    assert!(cookie.is_none());
    assert_eq!(to, "/login");

    let body = "username=bob2&email=bob%40example.com&password=Secret123&confirm_password=Secret123";
    let resp = app.clone().oneshot(form("/register/customer", body, None)?).await?;
    assert_eq!(location(&resp), "/register/customer");
    let flash = set_cookie(&resp, "flash").expect("flash cookie");
    assert!(flash.contains("already"));
    Ok(())
}

#[tokio::test]
async fn test_api_requires_token() -> anyhow::Result<()> {
    let app = build_app().await?;
    let resp = app.clone().oneshot(get("/api/service_requests", None)?).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = json(resp).await?;
    assert_eq!(body["error"], "unauthorized");

    let req = Request::builder()
        .uri("/api/service_requests")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())?;
    assert_eq!(app.clone().oneshot(req).await?.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_role_mismatch_refused_regardless_of_entity() -> anyhow::Result<()> {
    let app = build_app().await?;
    register_customer(&app, "carol").await?;
    let (cookie, _) = login(&app, "carol@example.com", "Secret123").await?;
    let cookie = cookie.expect("session cookie");
    let missing = Uuid::new_v4();

    for uri in [
        format!("/accept_request/{missing}"),
        format!("/admin/approve_professional/{missing}"),
        format!("/service/{missing}/delete"),
    ] {
        let resp = app.clone().oneshot(form(&uri, "", Some(&cookie))?).await?;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&resp), "/login", "{uri}");
    }

    let token = cookie.trim_start_matches("auth_token=");
    let req = Request::builder()
        .method("POST")
        .uri(format!("/api/service_requests/{missing}/accept"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())?;
    assert_eq!(app.clone().oneshot(req).await?.status(), StatusCode::UNAUTHORIZED);

    let resp = app.clone().oneshot(get("/admin_dashboard", Some(&cookie))?).await?;
    assert_eq!(location(&resp), "/login");
    Ok(())
}

#[tokio::test]
async fn test_role_refused_before_body_and_path_parsing() -> anyhow::Result<()> {
    let app = build_app().await?;
    register_customer(&app, "erin").await?;
    let (cookie, _) = login(&app, "erin@example.com", "Secret123").await?;
    let cookie = cookie.expect("session cookie");

    // 错误角色：无论请求体或路径参数是否合法，都跳转登录
    for (uri, body) in [
        ("/service/add", ""),
        ("/service/add", "price=not-a-number"),
        ("/accept_request/not-a-uuid", ""),
        ("/close_request/not-a-uuid", ""),
        ("/admin/block/42", ""),
    ] {
        let resp = app.clone().oneshot(form(uri, body, Some(&cookie))?).await?;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&resp), "/login", "{uri}");
        assert!(set_cookie(&resp, "flash").expect("flash").contains("requires"), "{uri}");
    }

    let token = cookie.trim_start_matches("auth_token=");
    let req = Request::builder()
        .method("POST")
        .uri("/api/service_requests/not-a-uuid/accept")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{"))?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json(resp).await?["error"], "unauthorized");

    // 正确角色才会进入请求体解析
    let (admin, _) = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await?;
    let resp = app.clone().oneshot(form("/service/add", "", Some(&admin.expect("admin cookie")))?).await?;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = app.clone().oneshot(get("/my_requests", Some(&cookie))?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json(resp).await?["service_requests"], Value::Array(vec![]));
    Ok(())
}

#[tokio::test]
async fn test_admin_bootstrap_and_blocking() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (admin, to) = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await?;
    assert_eq!(to, "/admin_dashboard");
    let admin = admin.expect("admin cookie");

    register_customer(&app, "dave").await?;
    let (dave, _) = login(&app, "dave@example.com", "Secret123").await?;
    let dave = dave.expect("customer cookie");

    let dash = json(app.clone().oneshot(get("/admin_dashboard", Some(&admin))?).await?).await?;
    assert_eq!(dash["users"]["customer"], 1);
    assert_eq!(dash["users"]["admin"], 1);
    let id_of = |email: &str| {
        dash["accounts"]
            .as_array()
            .and_then(|a| a.iter().find(|u| u["email"] == email))
            .and_then(|u| u["id"].as_str())
            .map(str::to_string)
            .expect("account listed")
    };
    let dave_id = id_of("dave@example.com");
    let admin_id = id_of(ADMIN_EMAIL);
    assert!(dash["accounts"][0].get("password_hash").is_none());

    let resp = app.clone().oneshot(form(&format!("/admin/block/{dave_id}"), "", Some(&admin))?).await?;
    assert_eq!(location(&resp), "/admin_dashboard");
    assert!(set_cookie(&resp, "flash").expect("flash").contains("success"));

    // 被封禁后旧会话失效且无法重新登录
    let resp = app.clone().oneshot(get("/customer_dashboard", Some(&dave))?).await?;
    assert_eq!(location(&resp), "/login");
    let (cookie, to) = login(&app, "dave@example.com", "Secret123").await?;
    assert!(cookie.is_none());
    assert_eq!(to, "/login");

    let resp = app.clone().oneshot(form(&format!("/admin/block/{admin_id}"), "", Some(&admin))?).await?;
    assert!(set_cookie(&resp, "flash").expect("flash").contains("danger"));

    let resp = app.clone().oneshot(form(&format!("/admin/unblock/{dave_id}"), "", Some(&admin))?).await?;
    assert_eq!(location(&resp), "/admin_dashboard");
    let (cookie, _) = login(&app, "dave@example.com", "Secret123").await?;
    assert!(cookie.is_some());
    Ok(())
}
