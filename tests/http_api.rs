//! Router-level tests: JSON contracts, the auth middleware, and the
//! admin gate, driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use account_service::{
    api::{AppState, RouterBuilder},
    models::{NewUser, UserRole},
    service::{
        AuthService, JwtService, LoggingNotifier, Notifier, PasswordHasher, PasswordResetService,
        TwoFactorService, UserService,
    },
    store::{InMemoryUserStore, UserStore},
};

struct TestApp {
    router: Router,
    store: Arc<InMemoryUserStore>,
    jwt: Arc<JwtService>,
}

fn test_app() -> TestApp {
    let store = Arc::new(InMemoryUserStore::new());
    let store_dyn: Arc<dyn UserStore> = store.clone();
    let notifier: Arc<dyn Notifier> = Arc::new(LoggingNotifier);
    let hasher = PasswordHasher::new(4);
    let jwt = Arc::new(JwtService::new("http-test-secret".to_string()));

    let reset = PasswordResetService::new(
        store_dyn.clone(),
        hasher.clone(),
        notifier.clone(),
        chrono::Duration::minutes(30),
    );
    let two_factor = TwoFactorService::new(store_dyn.clone(), "Account Service".to_string());

    let state = AppState {
        auth_service: Arc::new(AuthService::new(
            store_dyn.clone(),
            hasher,
            jwt.clone(),
            notifier,
            reset,
            two_factor,
        )),
        user_service: Arc::new(UserService::new(store_dyn)),
        jwt_service: jwt.clone(),
    };

    TestApp {
        router: RouterBuilder::with_all_routes().build(state),
        store,
        jwt,
    }
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn bearer_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register_and_login(app: &TestApp, email: &str) -> String {
    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            json!({
                "email": email,
                "first_name": "J",
                "last_name": "D",
                "password": "P1!",
                "password_confirm": "P1!",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            json!({ "email": email, "password": "P1!" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_register_scenario_contract() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            json!({
                "email": "a@x.com",
                "first_name": "J",
                "last_name": "D",
                "password": "P1!",
                "password_confirm": "P1!",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Account successfully created.");
    assert_eq!(body["user"]["email"], "a@x.com");

    // Registering the same email again is a 400 with the contract message.
    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            json!({
                "email": "a@x.com",
                "first_name": "J",
                "last_name": "D",
                "password": "P1!",
                "password_confirm": "P1!",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "User already exists.");
}

#[tokio::test]
async fn test_login_wrong_password_is_401() {
    let app = test_app();
    register_and_login(&app, "a@x.com").await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            json!({ "email": "a@x.com", "password": "wrong" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid password.");
}

#[tokio::test]
async fn test_two_factor_routes_require_authentication() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::post("/auth/2fa/enable")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_two_factor_enable_over_http() {
    let app = test_app();
    let token = register_and_login(&app, "a@x.com").await;

    let response = app
        .router
        .clone()
        .oneshot(bearer_request("POST", "/auth/2fa/enable", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["qr_code_url"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
    assert!(!body["secret"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_user_listing_is_admin_gated() {
    let app = test_app();

    // Anonymous: 401 from the auth layer.
    let response = app
        .router
        .clone()
        .oneshot(Request::get("/users").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Standard user: still 401, from the admin guard.
    let token = register_and_login(&app, "user@x.com").await;
    let response = app
        .router
        .clone()
        .oneshot(bearer_request("GET", "/users", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Admin: 200 with the listing projection.
    let admin = app
        .store
        .create(NewUser {
            name: "Root Admin".to_string(),
            email: "admin@x.com".to_string(),
            password_hash: "$2b$10$hash".to_string(),
            profile_picture_url: None,
            role: UserRole::Admin,
        })
        .await
        .unwrap();
    let admin_token = app.jwt.sign(admin.id).unwrap();

    let response = app
        .router
        .clone()
        .oneshot(bearer_request("GET", "/users?page=1&limit=10", &admin_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let listing = body.as_array().unwrap();
    assert_eq!(listing.len(), 2);
    // Listing rows carry no password or secret fields.
    for row in listing {
        assert!(row.get("password_hash").is_none());
        assert!(row.get("two_factor_secret").is_none());
    }
}

#[tokio::test]
async fn test_me_and_search() {
    let app = test_app();
    let token = register_and_login(&app, "a@x.com").await;

    let response = app
        .router
        .clone()
        .oneshot(bearer_request("GET", "/users/me", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["role"], "user");

    let response = app
        .router
        .clone()
        .oneshot(bearer_request(
            "GET",
            "/users/search-users?name=j%20d",
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let hits = body_json(response).await;
    assert_eq!(hits.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_reset_request_always_generic_over_http() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/reset-password",
            json!({ "email": "ghost@x.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "If the email exists in our system, you will receive password reset instructions."
    );
}
