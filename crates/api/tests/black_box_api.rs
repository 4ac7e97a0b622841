use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use facilityhub_api::app::{AppServices, build_app_with};
use facilityhub_auth::{JwtClaims, PrincipalId, RoleName};
use facilityhub_core::TenantId;
use facilityhub_infra::config::AppConfig;
use facilityhub_mail::OutboxTransport;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    outbox: Arc<OutboxTransport>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let config = AppConfig {
            jwt_secret: JWT_SECRET.to_string(),
            seed_modules: vec!["ZCS".to_string(), "HBR".to_string()],
            default_max_occupancy: 10,
            ..AppConfig::default()
        };
        let outbox = Arc::new(OutboxTransport::new());
        let services = Arc::new(AppServices::in_memory(&config, outbox.clone()));

        // Same router as prod, bound to an ephemeral port.
        let app = build_app_with(config.jwt_secret.clone(), services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            outbox,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(tenant_id: TenantId, roles: Vec<RoleName>) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: PrincipalId::new(),
        tenant_id,
        roles,
        issued_at: now,
        expires_at: now + ChronoDuration::minutes(10),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

#[tokio::test]
async fn health_is_public_and_whoami_requires_auth() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(srv.url("/whoami")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn tenant_context_is_derived_from_token() {
    let srv = TestServer::spawn().await;
    let tenant_id = TenantId::new();
    let token = mint_jwt(tenant_id, vec![RoleName::ADMIN]);

    let res = reqwest::Client::new()
        .get(srv.url("/whoami"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["tenant_id"].as_str().unwrap(), tenant_id.to_string());
    assert!(body["roles"].as_array().unwrap().iter().any(|r| r == "admin"));
}

#[tokio::test]
async fn role_lifecycle_with_module_validation() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(TenantId::new(), vec![RoleName::ADMIN]);
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/roles"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Security", "module_codes": ["ZCS", "XYZ"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["errors"].as_object().unwrap().len(), 1);
    assert!(body["errors"]["module_codes.1"].is_array());

    let res = client
        .post(srv.url("/roles"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Security", "module_codes": ["ZCS"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_u64().unwrap();

    let res = client
        .put(srv.url(&format!("/roles/{id}")))
        .bearer_auth(&token)
        .json(&json!({ "name": "Security", "description": "Front gate" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["description"], "Front gate");

    let res = client
        .delete(srv.url(&format!("/roles/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(srv.url(&format!("/roles/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(srv.url("/roles/not-a-number"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_admins_cannot_manage_roles() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(TenantId::new(), vec![RoleName::SECURITY]);

    let res = reqwest::Client::new()
        .post(srv.url("/roles"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Anything" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn tenant_isolation_for_roles() {
    let srv = TestServer::spawn().await;
    let token1 = mint_jwt(TenantId::new(), vec![RoleName::ADMIN]);
    let token2 = mint_jwt(TenantId::new(), vec![RoleName::ADMIN]);
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/roles"))
        .bearer_auth(&token1)
        .json(&json!({ "name": "Finance" }))
        .send()
        .await
        .unwrap();
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_u64().unwrap();

    let res = client
        .get(srv.url(&format!("/roles/{id}")))
        .bearer_auth(&token2)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Same name is free in another tenant.
    let res = client
        .post(srv.url("/roles"))
        .bearer_auth(&token2)
        .json(&json!({ "name": "Finance" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn modules_and_departments() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(TenantId::new(), vec![RoleName::ADMIN]);
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/modules"))
        .bearer_auth(&token)
        .json(&json!({ "code": "PRK", "name": "Parking" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let modules: serde_json::Value = client
        .get(srv.url("/modules"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(modules.as_array().unwrap().len(), 3);

    let res = client
        .post(srv.url("/departments"))
        .bearer_auth(&token)
        .json(&json!({ "name": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["errors"]["name"][0], "The name field is required.");

    let res = client
        .post(srv.url("/departments"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Operations" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn otp_send_then_verify() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(TenantId::new(), vec![RoleName::new("operator")]);
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/otp/send"))
        .bearer_auth(&token)
        .json(&json!({ "email": "guard@site.example", "type": "login" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);

    let sent = srv.outbox.last_to("guard@site.example").unwrap();
    assert_eq!(sent.mail.subject, "Your Verification Code");
    assert_eq!(sent.mail.context["typeLabel"], "Login");
    let code = sent.mail.context["code"].as_str().unwrap().to_string();

    let res = client
        .post(srv.url("/otp/verify"))
        .bearer_auth(&token)
        .json(&json!({ "email": "guard@site.example", "type": "login", "code": code }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Consumed.
    let res = client
        .post(srv.url("/otp/verify"))
        .bearer_auth(&token)
        .json(&json!({ "email": "guard@site.example", "type": "login", "code": code }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn occupancy_event_updates_count_and_streams() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(TenantId::new(), vec![RoleName::SECURITY]);
    let client = reqwest::Client::new();

    let mut stream = client
        .get(srv.url("/occupancy/stream"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(stream.status(), StatusCode::OK);

    let res = client
        .post(srv.url("/occupancy/events"))
        .bearer_auth(&token)
        .json(&json!({
            "id": 1,
            "type": "entry",
            "person_id": 42,
            "timestamp": 1700000000,
            "device_id": "D1"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let payload: serde_json::Value = res.json().await.unwrap();
    assert_eq!(payload["event"]["timestamp"], "2023-11-14T22:13:20+00:00");
    assert_eq!(payload["occupancy"], json!({ "current": 1, "max": 10 }));

    let mut received = String::new();
    let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(5);
    while !received.contains("entry-exit-event") {
        let chunk = tokio::time::timeout_at(deadline, stream.chunk())
            .await
            .expect("no SSE frame before deadline")
            .unwrap()
            .expect("stream ended");
        received.push_str(&String::from_utf8_lossy(&chunk));
    }
    assert!(received.contains("\"person_id\":42"));

    let snapshot: serde_json::Value = client
        .get(srv.url("/occupancy"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(snapshot["current"], 1);

    // Capacity is admin-only.
    let res = client
        .put(srv.url("/occupancy/capacity"))
        .bearer_auth(&token)
        .json(&json!({ "max": 50 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}
