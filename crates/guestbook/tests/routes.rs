use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use guestbook::{routes, AppState};
use guestbook_core::config::Config;
use guestbook_core::db::{DbConfig, SslMode};
use http_body_util::BodyExt;
use tower::ServiceExt;

// Port 1 on loopback is never bound, so every connection attempt is refused
// immediately and these tests run without a database.
fn unreachable_state() -> Arc<AppState> {
    Arc::new(AppState {
        config: Config {
            bind_addr: "127.0.0.1:0".into(),
            secret_key: "test".into(),
            debug: false,
            startup_wait: Duration::ZERO,
            db: DbConfig {
                host: "127.0.0.1".into(),
                port: 1,
                user: "postgres".into(),
                password: "postgres".into(),
                database: "guestbook".into(),
                ssl_mode: SslMode::Disabled,
                ssl_ca_path: PathBuf::from("/nonexistent"),
                connect_timeout: Duration::from_secs(1),
            },
        },
    })
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn get_degrades_to_empty_list_when_db_is_unreachable() {
    let app = routes::router(unreachable_state());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Could not load entries."));
    assert!(html.contains("No entries yet."));
}

#[tokio::test]
async fn post_with_empty_username_redirects_without_touching_storage() {
    let app = routes::router(unreachable_state());

    // "+" decodes to a space, which trims to empty.
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("username=+&phone=555&place=NYC"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/?notice=username_required"
    );
}

#[tokio::test]
async fn post_redirects_with_error_notice_when_insert_fails() {
    let app = routes::router(unreachable_state());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("username=alice&phone=555-1000&place=NYC"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/?notice=save_failed");
}

#[tokio::test]
async fn post_with_missing_fields_still_validates() {
    let app = routes::router(unreachable_state());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(""))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/?notice=username_required"
    );
}

#[tokio::test]
async fn load_failure_notice_takes_precedence_over_redirect_notice() {
    let app = routes::router(unreachable_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/?notice=saved")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Could not load entries."));
    assert!(!html.contains("Entry saved."));
}
