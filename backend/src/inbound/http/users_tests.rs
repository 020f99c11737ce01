//! HTTP coverage for registration and the session endpoints.

use super::*;
use crate::domain::UserId;
use crate::inbound::http::test_utils::{
    TestBlog, login_cookie, read_envelope, test_session_middleware,
};
use actix_web::http::{StatusCode, header};
use actix_web::App;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

fn register_request(body: Value) -> actix_http::Request {
    actix_test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(body)
        .to_request()
}

#[rstest]
#[actix_web::test]
async fn duplicate_email_registration_conflicts() {
    let blog = TestBlog::new();
    let app = actix_test::init_service(blog.app()).await;

    let res = actix_test::call_service(
        &app,
        register_request(json!({"email": "a@x.com", "username": "a", "password": "secret1"})),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let user: UserResponse = read_envelope(res).await;
    assert_eq!(user.email, "a@x.com");
    assert_eq!(user.username, "a");

    let res = actix_test::call_service(
        &app,
        register_request(json!({"email": "A@X.com", "username": "other", "password": "secret1"})),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["error"], json!("Email or username already exists"));
}

#[rstest]
#[case(json!({"email": "a@x.com", "username": "a"}), "Missing required fields")]
#[case(
    json!({"email": "a@x.com", "username": "a", "password": "12345"}),
    "Password must be at least 6 characters"
)]
#[case(
    json!({"email": "not-an-email", "username": "a", "password": "secret1"}),
    "email must be a valid address"
)]
#[actix_web::test]
async fn invalid_registrations_are_bad_requests(#[case] body: Value, #[case] message: &str) {
    let blog = TestBlog::new();
    let app = actix_test::init_service(blog.app()).await;

    let res = actix_test::call_service(&app, register_request(body)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["error"], json!(message));
    assert_eq!(body["success"], json!(false));
}

#[rstest]
#[actix_web::test]
async fn registration_response_never_leaks_the_password() {
    let blog = TestBlog::new();
    let app = actix_test::init_service(blog.app()).await;

    let res = actix_test::call_service(
        &app,
        register_request(json!({"email": "a@x.com", "username": "a", "password": "secret1"})),
    )
    .await;
    let body = actix_test::read_body(res).await;
    let text = std::str::from_utf8(&body).expect("utf8 body");
    assert!(!text.contains("secret1"));
    assert!(!text.contains("argon2"));
}

#[rstest]
#[actix_web::test]
async fn login_session_and_logout_round_trip() {
    let blog = TestBlog::new();
    blog.seed_user("ada").await;
    let app = actix_test::init_service(blog.app()).await;
    let cookie = login_cookie(&app, "ADA@example.com").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/auth/session")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok()),
        Some("no-store")
    );
    let me: UserResponse = read_envelope(res).await;
    assert_eq!(me.username, "ada");

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cleared = res
        .response()
        .cookies()
        .find(|c| c.name() == "session")
        .expect("removal cookie");
    assert!(cleared.value().is_empty());
}

#[rstest]
#[case("ada@example.com", "wrong-pass")]
#[case("nobody@example.com", "secret1")]
#[actix_web::test]
async fn bad_credentials_are_unauthorised(#[case] email: &str, #[case] password: &str) {
    let blog = TestBlog::new();
    blog.seed_user("ada").await;
    let app = actix_test::init_service(blog.app()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": email, "password": password}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.response().cookies().next().is_none());
}

#[rstest]
#[actix_web::test]
async fn anonymous_session_lookup_is_unauthorised() {
    let blog = TestBlog::new();
    let app = actix_test::init_service(blog.app()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/auth/session")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[get("/remember-unknown")]
async fn remember_unknown_user(session: SessionContext) -> ApiResult<HttpResponse> {
    session.persist_user(&UserId::random())?;
    Ok(HttpResponse::NoContent().finish())
}

#[rstest]
#[actix_web::test]
async fn session_for_a_missing_user_is_purged() {
    let blog = TestBlog::new();
    let app = actix_test::init_service(
        App::new()
            .wrap(test_session_middleware())
            .app_data(web::Data::new(blog.state.clone()))
            .service(remember_unknown_user)
            .service(web::scope("/api/v1").service(current_session)),
    )
    .await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/remember-unknown")
            .to_request(),
    )
    .await;
    let cookie = res
        .response()
        .cookies()
        .find(|c| c.name() == "session")
        .expect("session cookie")
        .into_owned();

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/auth/session")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let cleared = res
        .response()
        .cookies()
        .find(|c| c.name() == "session")
        .expect("removal cookie");
    assert!(cleared.value().is_empty());
}
