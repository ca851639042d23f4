use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use microblog_app::models::SentimentLabel;
use microblog_app::services::{HttpPolarityScorer, PolarityScorer, SentimentService};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

// Stand-in for the remote polarity service: records request bodies and
// answers every call with a fixed status and raw body.
#[derive(Clone)]
struct StubService {
    status: StatusCode,
    reply: &'static str,
    received: Arc<Mutex<Vec<Value>>>,
}

async fn score(
    State(stub): State<StubService>,
    Json(body): Json<Value>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], &'static str) {
    stub.received.lock().unwrap().push(body);
    (stub.status, [(header::CONTENT_TYPE, "application/json")], stub.reply)
}

async fn spawn_stub(status: StatusCode, reply: &'static str) -> (String, Arc<Mutex<Vec<Value>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let stub = StubService {
        status,
        reply,
        received: received.clone(),
    };
    let app = Router::new().route("/score", post(score)).with_state(stub);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/score", addr), received)
}

fn service_for(url: &str) -> SentimentService {
    SentimentService::with_scorer(Arc::new(HttpPolarityScorer::new(url)))
}

#[tokio::test]
async fn test_sends_text_and_clamps_polarity() {
    let (url, received) = spawn_stub(StatusCode::OK, r#"{"polarity": 3.0}"#).await;
    let scorer = HttpPolarityScorer::new(&url);

    assert_eq!(scorer.polarity("x").await.unwrap(), 1.0);
    assert_eq!(*received.lock().unwrap(), vec![json!({ "text": "x" })]);
    assert_eq!(scorer.name(), "http");
}

#[tokio::test]
async fn test_remote_polarity_decides_label() {
    let (url, received) = spawn_stub(StatusCode::OK, r#"{"polarity": -0.9}"#).await;
    let service = service_for(&url);

    assert_eq!(service.scorer_name(), "http");
    // The lexicon alone would call this neutral
    assert_eq!(service.tag("hola").await, SentimentLabel::Negative);
    assert_eq!(received.lock().unwrap().len(), 1);

    // Blank text never reaches the remote service
    assert_eq!(service.tag("   ").await, SentimentLabel::Neutral);
    assert_eq!(received.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_body_falls_back_to_lexicon() {
    let (url, _) = spawn_stub(StatusCode::OK, "not json").await;

    assert!(HttpPolarityScorer::new(&url).polarity("x").await.is_err());
    let service = service_for(&url);
    assert_eq!(service.tag("Estoy muy triste").await, SentimentLabel::Negative);
    assert_eq!(service.tag("What a wonderful day").await, SentimentLabel::Positive);
}

#[tokio::test]
async fn test_error_status_falls_back_to_lexicon() {
    let (url, received) = spawn_stub(StatusCode::INTERNAL_SERVER_ERROR, r#"{"polarity": 0.9}"#).await;

    assert!(HttpPolarityScorer::new(&url).polarity("x").await.is_err());
    assert_eq!(service_for(&url).tag("Estoy muy triste").await, SentimentLabel::Negative);
    assert_eq!(received.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_non_finite_polarity_falls_back_to_lexicon() {
    let (url, _) = spawn_stub(StatusCode::OK, r#"{"polarity": 1e999}"#).await;

    assert!(HttpPolarityScorer::new(&url).polarity("x").await.is_err());
    assert_eq!(service_for(&url).tag("Estoy muy triste").await, SentimentLabel::Negative);
}

#[tokio::test]
async fn test_unreachable_service_falls_back_to_lexicon() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/score", listener.local_addr().unwrap());
    drop(listener);

    assert!(HttpPolarityScorer::new(&url).polarity("x").await.is_err());
    assert_eq!(service_for(&url).tag("El cielo es azul.").await, SentimentLabel::Neutral);
    assert_eq!(service_for(&url).tag("Estoy muy triste").await, SentimentLabel::Negative);
}
