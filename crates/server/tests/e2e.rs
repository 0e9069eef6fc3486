use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode as HttpStatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use configs::AppConfig;

struct TestApp {
    base_url: String,
}

impl TestApp {
    fn url(&self, path: &str) -> String { format!("{}{}", self.base_url, path) }

    /// One browser per actor: own cookie jar, redirects left to the test.
    fn browser(&self) -> anyhow::Result<Client> {
        Ok(Client::builder().cookie_store(true).redirect(Policy::none()).build()?)
    }

    async fn page(&self, client: &Client, path: &str) -> anyhow::Result<Value> {
        let resp = client.get(self.url(path)).send().await?;
        assert_eq!(resp.status(), HttpStatusCode::OK, "GET {path}");
        Ok(resp.json().await?)
    }

    /// POST a form and return the redirect target.
    async fn submit(&self, client: &Client, path: &str, fields: &[(&str, &str)]) -> anyhow::Result<String> {
        let resp = client.post(self.url(path)).form(fields).send().await?;
        assert_eq!(resp.status(), HttpStatusCode::SEE_OTHER, "POST {path}");
        Ok(resp.headers()["location"].to_str()?.to_string())
    }
}

async fn start_server() -> anyhow::Result<TestApp> {
    let mut cfg = AppConfig::default();
    cfg.database.url = "sqlite::memory:".into();
    cfg.auth.jwt_secret = "e2e-secret".into();
    cfg.admin.password = "admin-pass-123".into();
    let app = server::startup::build_app(&cfg).await?;

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(TestApp { base_url: format!("http://{}", addr) })
}

#[tokio::test]
async fn test_health_and_metrics() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = Client::new();
    let health: Value = client.get(app.url("/health")).send().await?.json().await?;
    assert_eq!(health, json!({"status": "ok"}));

    let resp = client.get(app.url("/metrics")).send().await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);

    let doc: Value = client.get(app.url("/api-docs/openapi.json")).send().await?.json().await?;
    assert!(doc["paths"].get("/api/reviews").is_some());
    Ok(())
}

#[tokio::test]
async fn test_plumbing_request_lifecycle() -> anyhow::Result<()> {
    let app = start_server().await?;

    // 管理员添加服务
    let admin = app.browser()?;
    let to = app.submit(&admin, "/login", &[("email", "admin@example.com"), ("password", "admin-pass-123")]).await?;
    assert_eq!(to, "/admin_dashboard");
    app.submit(&admin, "/service/add", &[("name", "Plumbing"), ("price", "50.0"), ("description", "Pipes and taps")]).await?;
    let services: Value = admin.get(app.url("/api/services")).send().await?.json().await?;
    let service_id = services[0]["id"].as_str().expect("service id").to_string();
    assert_eq!(services[0]["price"], 50.0);

    // 专业人员注册并由管理员审批
    let pro = app.browser()?;
    app.submit(&pro, "/register/professional", &[
        ("username", "xavier"), ("email", "x@example.com"), ("password", "Secret123"),
        ("confirm_password", "Secret123"), ("service_id", &service_id), ("service_type", "plumbing"),
        ("experience", "5"),
    ]).await?;
    let dash = app.page(&admin, "/admin_dashboard").await?;
    assert_eq!(dash["pending_approvals"], 1);
    let pro_user_id = dash["accounts"]
        .as_array()
        .and_then(|a| a.iter().find(|u| u["email"] == "x@example.com"))
        .and_then(|u| u["id"].as_str())
        .expect("pro listed")
        .to_string();
    app.submit(&admin, &format!("/admin/approve_professional/{pro_user_id}"), &[]).await?;

    // 客户下单
    let customer = app.browser()?;
    app.submit(&customer, "/register/customer", &[
        ("username", "casey"), ("email", "casey@example.com"), ("password", "Secret123"), ("confirm_password", "Secret123"),
    ]).await?;
    let to = app.submit(&customer, "/login", &[("email", "casey@example.com"), ("password", "Secret123")]).await?;
    assert_eq!(to, "/customer_dashboard");
    app.submit(&customer, &format!("/service_request/{service_id}"), &[("remarks", "kitchen sink")]).await?;
    let dash = app.page(&customer, "/customer_dashboard").await?;
    assert_eq!(dash["flash"]["message"], "Service requested");
    let request = &dash["service_requests"][0];
    assert_eq!(request["status"], "requested");
    assert!(request["professional_id"].is_null());
    let request_id = request["id"].as_str().expect("request id").to_string();

    // 专业人员接单
    app.submit(&pro, "/login", &[("email", "x@example.com"), ("password", "Secret123")]).await?;
    let open = app.page(&pro, "/requests").await?;
    assert_eq!(open["service_requests"].as_array().map(Vec::len), Some(1));
    app.submit(&pro, &format!("/accept_request/{request_id}"), &[]).await?;
    let jobs = app.page(&pro, "/my_jobs").await?;
    assert_eq!(jobs["service_requests"][0]["status"], "accepted");

    // 已接单后客户不能取消
    app.submit(&customer, &format!("/cancel_request/{request_id}"), &[]).await?;
    let dash = app.page(&customer, "/customer_dashboard").await?;
    assert_eq!(dash["flash"]["kind"], "danger");

    // 管理员关闭两次：第二次为 AlreadyClosed
    app.submit(&admin, &format!("/close_request/{request_id}"), &[]).await?;
    let first = app.page(&admin, "/admin_dashboard").await?;
    assert_eq!(first["flash"]["message"], "Service request closed");
    let completed = first["service_requests"][0]["date_of_completion"].clone();
    assert!(!completed.is_null());
    app.submit(&admin, &format!("/close_request/{request_id}"), &[]).await?;
    let second = app.page(&admin, "/admin_dashboard").await?;
    assert_eq!(second["flash"]["message"], "Service request was already closed");
    assert_eq!(second["service_requests"][0]["status"], "closed");
    assert_eq!(second["service_requests"][0]["date_of_completion"], completed);

    // 评价：一次成功，重复被拒绝
    let review = [("service_request_id", request_id.as_str()), ("rating", "5"), ("comment", "Fixed quickly")];
    app.submit(&customer, &format!("/submit_review/{service_id}"), &review).await?;
    let dash = app.page(&customer, "/customer_dashboard").await?;
    assert_eq!(dash["flash"]["message"], "Review submitted");
    app.submit(&customer, &format!("/submit_review/{service_id}"), &review).await?;
    let dash = app.page(&customer, "/customer_dashboard").await?;
    assert_eq!(dash["flash"]["kind"], "danger");

    let reviews = app.page(&customer, &format!("/reviews/{service_id}")).await?;
    assert_eq!(reviews["reviews"].as_array().map(Vec::len), Some(1));
    assert!(reviews["flash"].is_null());

    // 仍有专业人员的服务不能删除
    app.submit(&admin, &format!("/service/{service_id}/delete"), &[]).await?;
    let dash = app.page(&admin, "/admin_dashboard").await?;
    assert_eq!(dash["flash"]["kind"], "danger");
    assert_eq!(dash["services"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn test_json_api_with_bearer_token() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = Client::new();

    let customer = app.browser()?;
    app.submit(&customer, "/register/customer", &[
        ("username", "jo"), ("email", "jo@example.com"), ("password", "Secret123"), ("confirm_password", "Secret123"),
    ]).await?;

    let login: Value = client
        .post(app.url("/api/login"))
        .json(&json!({"email": "jo@example.com", "password": "Secret123"}))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(login["role"], "customer");
    let token = login["token"].as_str().expect("token").to_string();

    let resp = client
        .post(app.url("/api/service_request"))
        .bearer_auth(&token)
        .json(&json!({"service_id": uuid::Uuid::new_v4()}))
        .send()
        .await?;
    assert_eq!(resp.status(), HttpStatusCode::NOT_FOUND);
    let body: Value = resp.json().await?;
    assert_eq!(body["error"], "not_found");

    let resp = client
        .post(app.url("/api/reviews"))
        .bearer_auth(&token)
        .json(&json!({
            "service_id": uuid::Uuid::new_v4(),
            "service_request_id": uuid::Uuid::new_v4(),
            "rating": 9,
            "comment": "too good"
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), HttpStatusCode::BAD_REQUEST);

    let list: Value = client.get(app.url("/api/service_requests")).bearer_auth(&token).send().await?.json().await?;
    assert_eq!(list, json!([]));
    Ok(())
}
