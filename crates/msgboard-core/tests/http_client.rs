//! HttpClient against a real HTTP server running in-process.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use msgboard_core::{Board, BoardError, BoardEvent, BoardSink, Draft, HttpClient, MessageApi};
use serde_json::{json, Value};

#[derive(Clone, Default)]
struct Recorded {
    posts: Arc<Mutex<Vec<Value>>>,
    reactions: Arc<Mutex<Vec<(String, Value)>>>,
    limits: Arc<Mutex<Vec<Option<String>>>>,
}

async fn list_messages(
    State(rec): State<Recorded>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    rec.limits.lock().unwrap().push(params.get("limit").cloned());
    Json(json!({
        "status": "success",
        "messages": [
            {
                "id": "m1",
                "content": "hello",
                "author": "ana",
                "timestamp": "2024-01-05T14:07:33.000001",
                "repository": "local",
                "github_url": null,
                "reactions": {"heart": 2}
            },
            {"id": 2, "content": "numbered", "reactions": null, "repository": null}
        ]
    }))
}

async fn create_message(State(rec): State<Recorded>, Json(body): Json<Value>) -> Json<Value> {
    rec.posts.lock().unwrap().push(body);
    Json(json!({"status": "success", "messages": []}))
}

async fn add_reaction(
    State(rec): State<Recorded>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    rec.reactions.lock().unwrap().push((id, body));
    Json(json!({"status": "success", "data": {"count": 1}}))
}

async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn healthy_server() -> (HttpClient, Recorded) {
    let rec = Recorded::default();
    let app = Router::new()
        .route("/messages", get(list_messages).post(create_message))
        .route("/messages/:id/reactions", post(add_reaction))
        .with_state(rec.clone());
    let addr = spawn_server(app).await;
    let client = HttpClient::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap();
    (client, rec)
}

async fn failing_server(status: StatusCode, body: Value) -> HttpClient {
    let app = Router::new().fallback(move || {
        let body = body.clone();
        async move { (status, Json(body)) }
    });
    let addr = spawn_server(app).await;
    HttpClient::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap()
}

#[derive(Default)]
struct Recorder(Mutex<Vec<BoardEvent>>);

impl BoardSink for Recorder {
    fn emit(&self, event: BoardEvent) {
        self.0.lock().unwrap().push(event);
    }
}

#[tokio::test]
async fn test_fetch_decodes_messages() {
    let (client, rec) = healthy_server().await;

    let messages = client.fetch_messages(None).await.unwrap();

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].reaction_count("heart"), 2);
    assert_eq!(messages[1].id, "2");
    assert_eq!(messages[1].repository, "local");
    assert_eq!(messages[1].reaction_count("heart"), 0);
    assert_eq!(*rec.limits.lock().unwrap(), vec![None]);
}

#[tokio::test]
async fn test_fetch_sends_limit() {
    let (client, rec) = healthy_server().await;

    client.fetch_messages(Some(25)).await.unwrap();

    assert_eq!(*rec.limits.lock().unwrap(), vec![Some("25".to_string())]);
}

#[tokio::test]
async fn test_submit_defaults_reach_server() {
    let (client, rec) = healthy_server().await;
    let board = Board::new(Arc::new(client));
    let sink = Recorder::default();

    assert!(board.submit(&Draft::new("hi", "", ""), &sink).await);

    assert_eq!(
        *rec.posts.lock().unwrap(),
        vec![json!({"message": "hi", "author": "Anonymous", "repository": "local"})]
    );
}

#[tokio::test]
async fn test_reaction_body_and_path() {
    let (client, rec) = healthy_server().await;

    let ack = client.add_reaction("m1", "party").await.unwrap();

    assert_eq!(ack.count(), Some(1));

    assert_eq!(
        *rec.reactions.lock().unwrap(),
        vec![("m1".to_string(), json!({"reaction": "party", "action": "add"}))]
    );
}

#[tokio::test]
async fn test_reaction_without_ack_body_still_succeeds() {
    let client = failing_server(StatusCode::OK, json!({"status": "success"})).await;

    let ack = client.add_reaction("m1", "heart").await.unwrap();

    assert_eq!(ack.count(), None);
}

#[tokio::test]
async fn test_server_error_message_is_kept() {
    let client = failing_server(
        StatusCode::BAD_REQUEST,
        json!({"status": "error", "message": "Message cannot be empty"}),
    )
    .await;

    let post = Draft::new("x", "", "").prepare().unwrap();
    let err = client.post_message(&post).await.unwrap_err();

    match err {
        BoardError::Server { status, message } => {
            assert_eq!(status.as_u16(), 400);
            assert_eq!(message.as_deref(), Some("Message cannot be empty"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_non_ok_fetch_is_server_error() {
    let client = failing_server(StatusCode::INTERNAL_SERVER_ERROR, json!({})).await;

    let err = client.fetch_messages(None).await.unwrap_err();

    assert!(matches!(err, BoardError::Server { message: None, .. }));
}

#[tokio::test]
async fn test_unexpected_shape_is_malformed() {
    let client = failing_server(StatusCode::OK, json!({"status": "error"})).await;

    let err = client.fetch_messages(None).await.unwrap_err();

    assert!(matches!(err, BoardError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Bind then drop to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpClient::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
    let err = client.fetch_messages(None).await.unwrap_err();

    assert!(matches!(err, BoardError::Transport(_)));
}
