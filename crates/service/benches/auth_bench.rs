use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::auth::service::{AuthService, AuthConfig};
use service::auth::repository::mock::MockAuthRepository;
use service::auth::domain::{AccountInput, LoginInput, RegisterCustomerInput};

fn bench_login(c: &mut Criterion) {
    let repo = Arc::new(MockAuthRepository::default());
    let svc = AuthService::new(repo.clone(), AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 1 });

    // pre-create user outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    let account = AccountInput {
        username: "bench".into(),
        email: "bench@example.com".into(),
        phone_number: None,
        password: "Benchmark1".into(),
        confirm_password: "Benchmark1".into(),
    };
    let _ = rt.block_on(svc.register_customer(RegisterCustomerInput { account, address: None, pin_code: None }));

    c.bench_function("auth_login_verify", |b| {
        b.iter(|| {
            let _ = rt.block_on(svc.login(LoginInput { email: "bench@example.com".into(), password: "Benchmark1".into() })).unwrap();
        });
    });
}

fn bench_authenticate(c: &mut Criterion) {
    let repo = Arc::new(MockAuthRepository::default());
    let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 1 });
    let rt = tokio::runtime::Runtime::new().unwrap();
    let account = AccountInput {
        username: "tok".into(),
        email: "tok@example.com".into(),
        phone_number: None,
        password: "Benchmark1".into(),
        confirm_password: "Benchmark1".into(),
    };
    let user = rt.block_on(svc.register_customer(RegisterCustomerInput { account, address: None, pin_code: None })).unwrap();
    let token = svc.issue_token(&user).unwrap();

    c.bench_function("auth_token_authenticate", |b| {
        b.iter(|| rt.block_on(svc.authenticate(&token)).unwrap());
    });
}

criterion_group!(benches, bench_login, bench_authenticate);
criterion_main!(benches);
