//! Router tests driving the handlers in-process

use std::io;
use std::sync::{Arc, Mutex};

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use tracing_subscriber::layer::SubscriberExt;

use crate::config::{Config, LogFormat};
use crate::logging;
use crate::scoring::{bundled_artifact_dir, ArtifactPaths, ScoringEngine};
use crate::{create_router, AppState};

fn app() -> Router {
    let engine = ScoringEngine::load(&ArtifactPaths::in_dir(bundled_artifact_dir())).unwrap();
    create_router(AppState {
        engine: Arc::new(engine),
        config: Config::from_lookup(|_| None),
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn post_form(app: Router, body: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn post_json(app: Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, text) = send(app, request).await;
    (status, serde_json::from_str(&text).unwrap())
}

/// Pull the bracketed probability list out of the result page
fn probabilities(html: &str) -> Vec<f64> {
    let start = html.find("<td id=\"probability\">[").unwrap() + "<td id=\"probability\">[".len();
    let end = start + html[start..].find(']').unwrap();
    html[start..end]
        .split(", ")
        .map(|p| p.parse().unwrap())
        .collect()
}

/// The predicted class cell of the result page
fn prediction(html: &str) -> &str {
    let start = html.find("<td id=\"prediction\">").unwrap() + "<td id=\"prediction\">".len();
    let end = start + html[start..].find('<').unwrap();
    &html[start..end]
}

/// Log sink shared between the subscriber and the test
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

const TRANSFER: &str =
    "type=TRANSFER&step=1&amount=9839.64&oldbalanceOrg=170136.0&newbalanceOrig=160296.36";

#[tokio::test]
async fn test_form_page() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, html) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<form action=\"/predict\" method=\"post\">"));
}

#[tokio::test]
async fn test_predict_transfer() {
    let (status, html) = post_form(app(), TRANSFER).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!html.contains("id=\"error\""));

    let prediction = html.contains("<td id=\"prediction\">0</td>")
        || html.contains("<td id=\"prediction\">1</td>");
    assert!(prediction);

    let probability = probabilities(&html);
    assert_eq!(probability.len(), 2);
    assert!((probability.iter().sum::<f64>() - 1.0).abs() < 1e-9);

    // Echoed input
    assert!(html.contains("<td>TRANSFER</td>"));
    assert!(html.contains("<td>160296.36</td>"));
    assert!(html.contains("<td>170136.0</td>"));
}

#[tokio::test]
async fn test_predict_is_deterministic() {
    let app = app();
    let (_, first) = post_form(app.clone(), TRANSFER).await;
    let (_, second) = post_form(app, TRANSFER).await;
    assert_eq!(prediction(&first), prediction(&second));
    assert_eq!(probabilities(&first), probabilities(&second));
}

#[tokio::test]
async fn test_unknown_type_renders_error() {
    let (status, html) = post_form(
        app(),
        "type=BOGUS&step=1&amount=100&oldbalanceOrg=100&newbalanceOrig=0",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("id=\"error\""));
    assert!(html.contains("unsupported transaction type &#x27;BOGUS&#x27;"));
    assert!(!html.contains("id=\"prediction\""));
    assert!(!html.contains("<td>BOGUS</td>"));
}

#[tokio::test]
async fn test_failed_prediction_is_logged() {
    let captured = Captured::default();
    let sink = captured.clone();
    let subscriber = tracing_subscriber::registry()
        .with(logging::fmt_layer(LogFormat::Json, move || sink.clone()));
    let _guard = tracing::subscriber::set_default(subscriber);

    let (status, _) = post_form(
        app(),
        "type=BOGUS&step=1&amount=100&oldbalanceOrg=100&newbalanceOrig=0",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let logged = captured.text();
    let failures: Vec<&str> = logged
        .lines()
        .filter(|line| line.contains("Prediction failed"))
        .collect();
    assert_eq!(failures.len(), 1, "{logged}");
    assert!(failures[0].contains("\"level\":\"ERROR\""));
    assert!(failures[0].contains("unsupported transaction type 'BOGUS'"));
}

#[tokio::test]
async fn test_missing_amount_renders_error() {
    let (status, html) = post_form(
        app(),
        "type=TRANSFER&step=1&oldbalanceOrg=100&newbalanceOrig=0",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("missing field &#x27;amount&#x27;"));
    assert!(!html.contains("id=\"probability\""));
}

#[tokio::test]
async fn test_non_numeric_fields_render_error() {
    let cases = [
        "type=TRANSFER&step=one&amount=1&oldbalanceOrg=1&newbalanceOrig=0",
        "type=TRANSFER&step=1&amount=abc&oldbalanceOrg=1&newbalanceOrig=0",
        "type=TRANSFER&step=1&amount=1&oldbalanceOrg=&newbalanceOrig=0",
        "type=TRANSFER&step=1&amount=1&oldbalanceOrg=1&newbalanceOrig=x1",
    ];
    let app = app();
    for body in cases {
        let (status, html) = post_form(app.clone(), body).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert!(html.contains("id=\"error\""), "{body}");
        assert!(!html.contains("id=\"prediction\""), "{body}");
    }
}

#[tokio::test]
async fn test_wrong_content_type_renders_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(TRANSFER))
        .unwrap();
    let (status, html) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("id=\"error\""));
}

#[tokio::test]
async fn test_json_predict() {
    let (status, body) = post_json(
        app(),
        r#"{"type":"TRANSFER","step":500,"amount":181.0,"oldbalanceOrg":181.0,"newbalanceOrig":0.0}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], 1);
    assert_eq!(body["probability"].as_array().unwrap().len(), 2);
    assert_eq!(body["input"]["type"], "TRANSFER");
}

#[tokio::test]
async fn test_json_unknown_type() {
    let (status, body) = post_json(
        app(),
        r#"{"type":"BOGUS","step":1,"amount":100,"oldbalanceOrg":100,"newbalanceOrig":0}"#,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], 422);
    assert_eq!(body["error"], "unsupported transaction type 'BOGUS'");
}

#[tokio::test]
async fn test_json_missing_field() {
    let (status, body) = post_json(
        app(),
        r#"{"type":"TRANSFER","step":1,"oldbalanceOrg":100,"newbalanceOrig":0}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("amount"));
}

#[tokio::test]
async fn test_health_reports_engine() {
    let app = app();
    post_form(app.clone(), TRANSFER).await;

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, text) = send(app, request).await;
    let body: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["engine"]["model_loaded"], true);
    assert_eq!(body["engine"]["trees"], 3);
    assert_eq!(body["engine"]["inference_count"], 1);
}

#[tokio::test]
async fn test_model_summary() {
    let request = Request::builder().uri("/api/v1/model").body(Body::empty()).unwrap();
    let (status, text) = send(app(), request).await;
    let body: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["classes"], 2);
    assert_eq!(body["categories"][3], "TRANSFER");
    assert_eq!(body["layout"]["feature_count"], 8);
    assert_eq!(body["layout"]["feature_names"][4], "step");
}
