//! Session login and protected routes.

use actix_web::test::{self, TestRequest};
use ehs_dashboard_lib::config::SESSION_COOKIE;
use serde_json::{Value, json};

use super::test_helpers::*;

#[actix_rt::test]
async fn test_routes_require_session() {
    let env = create_test_env().await;
    let app = create_test_app(&env).await;

    for uri in ["/api/v1/jsa", "/api/v1/jsa/1/steps", "/api/v1/locations", "/api/v1/auth/me"] {
        let resp = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status().as_u16(), 401, "{} must require a session", uri);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "UNAUTHORIZED");
    }

    let req = TestRequest::delete().uri("/api/v1/jsa/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
}

#[actix_rt::test]
async fn test_health_is_public() {
    let env = create_test_env().await;
    let app = create_test_app(&env).await;

    for uri in ["/api/v1/health", "/api/v1/ready", "/api/v1/openapi.json"] {
        let resp = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status().as_u16(), 200, "{}", uri);
    }
}

#[actix_rt::test]
async fn test_wrong_password_rejected() {
    let env = create_test_env().await;
    let app = create_test_app(&env).await;

    let req = TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "username": TEST_USERNAME, "password": "guess" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
    assert!(resp.response().cookies().all(|c| c.name() != SESSION_COOKIE));
}

#[actix_rt::test]
async fn test_login_cookie_grants_access() {
    let env = create_test_env().await;
    let app = create_test_app(&env).await;

    let req = TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "username": TEST_USERNAME, "password": TEST_PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .expect("session cookie")
        .into_owned();
    assert_eq!(cookie.http_only(), Some(true));

    let req = TestRequest::get()
        .uri("/api/v1/auth/me")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], TEST_USERNAME);
    assert!(body["expiresAt"].is_string());

    let req = TestRequest::get().uri("/api/v1/jsa").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
}

#[actix_rt::test]
async fn test_bearer_token_accepted() {
    let env = create_test_env().await;
    let app = create_test_app(&env).await;

    let token = env.session_keys().issue(TEST_USERNAME).unwrap();
    let req = TestRequest::get()
        .uri("/api/v1/jsa")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
}

#[actix_rt::test]
async fn test_logout_clears_cookie() {
    let env = create_test_env().await;
    let app = create_test_app(&env).await;

    let req = TestRequest::post().uri("/api/v1/auth/logout").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let cleared = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .expect("cleared cookie");
    assert_eq!(cleared.value(), "");
}
