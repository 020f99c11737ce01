//! HTTP coverage for the article handlers, run against the in-memory store.

use super::*;
use crate::inbound::http::test_utils::{TestBlog, login_cookie, read_envelope};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn count(&self, needle: &str) -> usize {
        let bytes = self.0.lock().expect("log buffer").clone();
        String::from_utf8_lossy(&bytes).matches(needle).count()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn article_uri(id: impl std::fmt::Display) -> String {
    format!("/api/v1/articles/{id}")
}

#[rstest]
#[actix_web::test]
async fn create_derives_slug_and_rejects_normalised_duplicates() {
    let blog = TestBlog::new();
    blog.seed_user("a").await;
    let app = actix_test::init_service(blog.app()).await;
    let cookie = login_cookie(&app, "a@example.com").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/articles")
            .cookie(cookie.clone())
            .set_json(json!({
                "title": "Hello World!",
                "content": "Body",
                "excerpt": "Teaser"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: ArticleResponse = read_envelope(res).await;
    assert_eq!(created.slug, "hello-world");
    assert!(!created.published);
    assert!(created.published_at.is_none());
    assert_eq!(created.author.username.as_ref(), "a");

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/articles")
            .cookie(cookie)
            .set_json(json!({
                "title": "Hello, World",
                "content": "Other body",
                "excerpt": "Other teaser"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("An article with this title already exists"));
}

#[rstest]
#[actix_web::test]
async fn create_logs_the_new_article_once() {
    let blog = TestBlog::new();
    blog.seed_user("a").await;
    let app = actix_test::init_service(blog.app()).await;
    let cookie = login_cookie(&app, "a@example.com").await;

    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/articles")
            .cookie(cookie)
            .set_json(json!({
                "title": "Logged Once",
                "content": "Body",
                "excerpt": "Teaser"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(logs.count("article created"), 1);
}

#[rstest]
#[case(json!({"title": "T", "content": "C"}))]
#[case(json!({"title": "  ", "content": "C", "excerpt": "E"}))]
#[actix_web::test]
async fn create_requires_title_content_and_excerpt(#[case] body: Value) {
    let blog = TestBlog::new();
    blog.seed_user("a").await;
    let app = actix_test::init_service(blog.app()).await;
    let cookie = login_cookie(&app, "a@example.com").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/articles")
            .cookie(cookie)
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["error"], json!("Title, content, and excerpt are required"));
}

#[rstest]
#[actix_web::test]
async fn unknown_fields_and_malformed_json_are_bad_requests() {
    let blog = TestBlog::new();
    blog.seed_user("a").await;
    let app = actix_test::init_service(blog.app()).await;
    let cookie = login_cookie(&app, "a@example.com").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/articles")
            .cookie(cookie.clone())
            .set_json(json!({"title": "T", "content": "C", "excerpt": "E", "author": "x"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], json!("invalid_request"));

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/articles")
            .cookie(cookie)
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn anonymous_create_is_unauthorised() {
    let blog = TestBlog::new();
    let app = actix_test::init_service(blog.app()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/articles")
            .set_json(json!({"title": "T", "content": "C", "excerpt": "E"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["error"], json!("Unauthorized"));
}

#[rstest]
#[actix_web::test]
async fn only_the_author_may_update() {
    let blog = TestBlog::new();
    let a = blog.seed_user("a").await;
    blog.seed_user("b").await;
    let article = blog.seed_article(&a, "Draft title", false).await;
    let app = actix_test::init_service(blog.app()).await;
    let change = json!({"title": "Better title"});

    let b_cookie = login_cookie(&app, "b@example.com").await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&article_uri(article.id()))
            .cookie(b_cookie)
            .set_json(&change)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let a_cookie = login_cookie(&app, "a@example.com").await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&article_uri(article.id()))
            .cookie(a_cookie)
            .set_json(&change)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: ArticleResponse = read_envelope(res).await;
    assert_eq!(updated.slug, "better-title");
}

#[rstest]
#[actix_web::test]
async fn unpublishing_keeps_the_first_publish_time() {
    let blog = TestBlog::new();
    let a = blog.seed_user("a").await;
    let article = blog.seed_article(&a, "Lifecycle", false).await;
    let app = actix_test::init_service(blog.app()).await;
    let cookie = login_cookie(&app, "a@example.com").await;

    let mut stamps = Vec::new();
    for published in [true, false, true] {
        blog.clock.advance_minutes(5);
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&article_uri(article.id()))
                .cookie(cookie.clone())
                .set_json(json!({ "published": published }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: ArticleResponse = read_envelope(res).await;
        assert_eq!(body.published, published);
        stamps.push(body.published_at);
    }
    assert!(stamps[0].is_some());
    assert!(stamps.iter().all(|stamp| *stamp == stamps[0]));
}

#[rstest]
#[actix_web::test]
async fn get_by_id_serves_drafts_with_comment_count() {
    let blog = TestBlog::new();
    let a = blog.seed_user("a").await;
    let article = blog.seed_article(&a, "Hidden draft", false).await;
    let app = actix_test::init_service(blog.app()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&article_uri(article.id()))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: ArticleResponse = read_envelope(res).await;
    assert_eq!(body.content, "Body text");
    assert_eq!(body.comments_count, Some(0));
}

#[rstest]
#[case("not-a-uuid", StatusCode::BAD_REQUEST)]
#[case("3fa85f64-5717-4562-b3fc-2c963f66afa6", StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn unknown_or_malformed_ids_are_rejected(#[case] id: &str, #[case] status: StatusCode) {
    let blog = TestBlog::new();
    let app = actix_test::init_service(blog.app()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri(&article_uri(id)).to_request(),
    )
    .await;
    assert_eq!(res.status(), status);
}

#[rstest]
#[actix_web::test]
async fn listing_serves_published_summaries_with_pagination() {
    let blog = TestBlog::new();
    let a = blog.seed_user("a").await;
    for title in ["One", "Two", "Three"] {
        blog.clock.advance_minutes(1);
        blog.seed_article(&a, title, true).await;
    }
    blog.seed_article(&a, "Draft", false).await;
    let app = actix_test::init_service(blog.app()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/articles?page=1&limit=2")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let raw: Value = actix_test::read_body_json(res).await;
    assert!(raw["data"]["articles"][0].get("content").is_none());
    assert_eq!(
        raw["data"]["pagination"],
        json!({"page": 1, "limit": 2, "total": 3, "totalPages": 2})
    );
    let titles: Vec<&str> = raw["data"]["articles"]
        .as_array()
        .expect("articles array")
        .iter()
        .filter_map(|item| item["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Three", "Two"]);
}

#[rstest]
#[case("/api/v1/articles?limit=0")]
#[case("/api/v1/articles?page=0")]
#[case("/api/v1/articles?limit=101")]
#[case("/api/v1/articles?page=abc")]
#[actix_web::test]
async fn invalid_pagination_is_a_bad_request(#[case] uri: &str) {
    let blog = TestBlog::new();
    let app = actix_test::init_service(blog.app()).await;

    let res =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn slug_lookup_only_finds_published_articles() {
    let blog = TestBlog::new();
    let a = blog.seed_user("a").await;
    blog.seed_article(&a, "Out now", true).await;
    blog.seed_article(&a, "Not yet", false).await;
    let app = actix_test::init_service(blog.app()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/articles/slug/out-now")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: ArticleResponse = read_envelope(res).await;
    assert_eq!(body.title, "Out now");

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/articles/slug/not-yet")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn like_toggles_back_and_forth() {
    let blog = TestBlog::new();
    let a = blog.seed_user("a").await;
    blog.seed_user("b").await;
    let article = blog.seed_article(&a, "Likeable", true).await;
    let app = actix_test::init_service(blog.app()).await;
    let cookie = login_cookie(&app, "b@example.com").await;

    let mut seen = Vec::new();
    for _ in 0..2 {
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("{}/like", article_uri(article.id())))
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: LikeResponse = read_envelope(res).await;
        seen.push((body.liked, body.likes_count));
    }
    assert_eq!(seen, vec![(true, 1), (false, 0)]);
}

#[rstest]
#[actix_web::test]
async fn delete_cascades_and_reports_success() {
    let blog = TestBlog::new();
    let a = blog.seed_user("a").await;
    let article = blog.seed_article(&a, "Doomed", true).await;
    let app = actix_test::init_service(blog.app()).await;
    let cookie = login_cookie(&app, "a@example.com").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("{}/comments", article_uri(article.id())))
            .cookie(cookie.clone())
            .set_json(json!({"content": "bye"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&article_uri(article.id()))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: MessageResponse = read_envelope(res).await;
    assert_eq!(body.message, DELETED_MESSAGE);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("{}/comments", article_uri(article.id())))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
