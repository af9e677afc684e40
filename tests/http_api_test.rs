use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use bytes::Bytes;
use futures::FutureExt;
use futures::future::{self, BoxFuture};
use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_DISPOSITION, CONTENT_TYPE,
};
use http::{HeaderValue, Method, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use referral_registry::config::DEFAULT_ALLOWED_ORIGIN;
use referral_registry::services::api;
use referral_registry::services::store::{StoreResult, UserStore};
use referral_registry::services::{
    MemoryStore, ReferralService, StoreError, UserFilter, UserRecord,
};

fn app_with_store(store: Arc<dyn UserStore>) -> Router {
    api::router(
        ReferralService::new(store),
        HeaderValue::from_static(DEFAULT_ALLOWED_ORIGIN),
    )
}

fn app() -> Router {
    app_with_store(Arc::new(MemoryStore::new()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, http::HeaderMap, Bytes) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Router should not fail");

    let (parts, body) = response.into_parts();
    let body = body
        .collect()
        .await
        .expect("Failed to collect response body")
        .to_bytes();
    (parts.status, parts.headers, body)
}

fn submit_json(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/submit")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[derive(Debug)]
struct UnavailableStore;

impl UserStore for UnavailableStore {
    fn find_one(&self, _filter: UserFilter) -> BoxFuture<'_, StoreResult<Option<UserRecord>>> {
        future::ready(Err(StoreError::Unavailable("down".to_string()))).boxed()
    }

    fn insert(&self, _record: UserRecord) -> BoxFuture<'_, StoreResult<()>> {
        future::ready(Err(StoreError::Unavailable("down".to_string()))).boxed()
    }

    fn find_one_and_increment(
        &self,
        _wallet_address: String,
    ) -> BoxFuture<'_, StoreResult<Option<UserRecord>>> {
        future::ready(Err(StoreError::Unavailable("down".to_string()))).boxed()
    }

    fn find_all(&self) -> BoxFuture<'_, StoreResult<Vec<UserRecord>>> {
        future::ready(Err(StoreError::Unavailable("down".to_string()))).boxed()
    }
}

#[tokio::test]
async fn test_submit_and_lookup() {
    let app = app();

    let (status, headers, body) = send(
        &app,
        submit_json(r#"{"twitterUsername":"alice","userAddress":"0xA"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"Registration successful");
    assert_eq!(
        headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        DEFAULT_ALLOWED_ORIGIN
    );

    let (status, _, body) = send(
        &app,
        submit_json(r#"{"twitterUsername":"bob","userAddress":"0xB","refereeAddress":"0xA"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body:?}");

    let (status, headers, body) = send(&app, get("/referrals/0xA")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        headers
            .get(CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("application/json")
    );
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, serde_json::json!({ "referralCount": 1 }));
}

#[tokio::test]
async fn test_submit_duplicate() {
    let app = app();
    send(
        &app,
        submit_json(r#"{"twitterUsername":"alice","userAddress":"0xA"}"#),
    )
    .await;

    let (status, _, body) = send(
        &app,
        submit_json(r#"{"twitterUsername":"carol","userAddress":"0xA"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(&body[..], b"User already exists with provided details");
}

#[tokio::test]
async fn test_submit_form_encoded() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/submit")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("twitterUsername=alice&userAddress=0xA&refereeAddress="))
        .unwrap();

    let (status, _, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = send(&app, get("/referrals/0xA")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], br#"{"referralCount":0}"#);
}

#[tokio::test]
async fn test_submit_without_wallet() {
    let app = app();
    let (status, _, body) = send(&app, submit_json(r#"{"twitterUsername":"alice"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(&body[..], b"userAddress is required");
}

#[tokio::test]
async fn test_submit_malformed_json() {
    let app = app();
    let (status, _, _) = send(&app, submit_json("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_referrals_not_found() {
    let app = app();
    let (status, _, body) = send(&app, get("/referrals/0xZ")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(&body[..], b"User not found");
}

#[tokio::test]
async fn test_export_empty() {
    let app = app();
    let (status, headers, body) = send(&app, get("/export-csv")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"No data available to export");
    assert!(headers.get(CONTENT_DISPOSITION).is_none());
}

#[tokio::test]
async fn test_export_csv() {
    let app = app();
    send(
        &app,
        submit_json(r#"{"twitterUsername":"alice","userAddress":"0xA"}"#),
    )
    .await;
    send(
        &app,
        submit_json(r#"{"twitterUsername":"bob","userAddress":"0xB","refereeAddress":"0xA"}"#),
    )
    .await;

    let (status, headers, body) = send(&app, get("/export-csv")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/csv");
    assert_eq!(
        headers.get(CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=users.csv"
    );
    assert_eq!(
        &body[..],
        b"Twitter Username,Solana Address,Referral Count\nalice,0xA,1\nbob,0xB,0"
    );
}

#[tokio::test]
async fn test_store_errors_map_to_500() {
    let app = app_with_store(Arc::new(UnavailableStore));

    let (status, _, body) = send(
        &app,
        submit_json(r#"{"twitterUsername":"alice","userAddress":"0xA"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(&body[..], b"Error during registration");

    let (status, _, body) = send(&app, get("/referrals/0xA")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(&body[..], b"Server error");

    let (status, _, body) = send(&app, get("/export-csv")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(&body[..], b"Error exporting CSV");
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/submit")
        .header("origin", DEFAULT_ALLOWED_ORIGIN)
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let (status, headers, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
    assert_eq!(
        headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        DEFAULT_ALLOWED_ORIGIN
    );
    let methods: Vec<String> = headers
        .get(ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap()
        .split(',')
        .map(|method| method.trim().to_string())
        .collect();
    assert_eq!(
        methods,
        vec!["GET", "HEAD", "PUT", "PATCH", "POST", "DELETE"]
    );
    assert_eq!(
        headers.get(ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
        "content-type"
    );

    // 预检不会产生任何注册
    let (status, _, body) = send(&app, get("/export-csv")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"No data available to export");
}

#[tokio::test]
async fn test_cors_advertises_only_configured_origin() {
    let app = app();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/referrals/0xA")
        .header("origin", "https://evil.example")
        .body(Body::empty())
        .unwrap();

    let (status, headers, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        DEFAULT_ALLOWED_ORIGIN
    );
}
