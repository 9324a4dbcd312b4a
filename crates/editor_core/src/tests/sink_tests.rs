use super::*;
use crate::error::TransportKind;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use shared::domain::{CurriculumItem, ItemId, ItemKind};
use std::sync::Arc;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

#[derive(Clone)]
struct ServerState {
    tx: Arc<Mutex<Option<oneshot::Sender<CurriculumSubmission>>>>,
    status: StatusCode,
    reply: Value,
}

async fn handle_submission(
    State(state): State<ServerState>,
    Json(payload): Json<CurriculumSubmission>,
) -> (StatusCode, Json<Value>) {
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(payload);
    }
    (state.status, Json(state.reply.clone()))
}

async fn spawn_lecture_server(
    status: StatusCode,
    reply: Value,
) -> (String, oneshot::Receiver<CurriculumSubmission>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, rx) = oneshot::channel();
    let state = ServerState {
        tx: Arc::new(Mutex::new(Some(tx))),
        status,
        reply,
    };
    let app = Router::new()
        .route("/api/lectures/curriculum", post(handle_submission))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}/api/lectures/curriculum"), rx)
}

fn sample_submission() -> CurriculumSubmission {
    CurriculumSubmission::new(
        vec![
            CurriculumItem {
                id: ItemId(1),
                title: "Matter".into(),
                kind: ItemKind::Chapter,
                order: 1,
                extra: Default::default(),
            },
            CurriculumItem {
                id: ItemId(3),
                title: "New Unit 3".into(),
                kind: ItemKind::Section,
                order: 2,
                extra: Default::default(),
            },
        ],
        Some("c0ffee".into()),
    )
}

#[tokio::test]
async fn http_sink_posts_submission_json() {
    let (url, rx) = spawn_lecture_server(
        StatusCode::OK,
        serde_json::json!({"success": true, "message": "lecture queued"}),
    )
    .await;
    let sink = HttpSink::new(&url, Duration::from_secs(5)).expect("sink");
    let submission = sample_submission();

    let receipt = sink.deliver(&submission).await.expect("deliver");
    assert_eq!(receipt.submission_id, submission.submission_id);
    assert_eq!(receipt.destination, url);
    assert_eq!(receipt.message.as_deref(), Some("lecture queued"));

    let received = rx.await.expect("server saw submission");
    assert_eq!(received, submission);
}

#[tokio::test]
async fn http_sink_maps_error_status_to_rejection() {
    let (url, _rx) = spawn_lecture_server(
        StatusCode::UNPROCESSABLE_ENTITY,
        serde_json::json!({"success": false, "message": "curriculum must not be empty"}),
    )
    .await;
    let sink = HttpSink::new(url, Duration::from_secs(5)).expect("sink");

    let err = sink
        .deliver(&sample_submission())
        .await
        .expect_err("rejected");
    match err {
        SinkError::Rejected {
            code,
            status,
            message,
        } => {
            assert_eq!(code, ErrorCode::Validation);
            assert_eq!(status, Some(422));
            assert_eq!(message, "curriculum must not be empty");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn http_sink_treats_unsuccessful_envelope_as_rejection() {
    let (url, _rx) = spawn_lecture_server(
        StatusCode::OK,
        serde_json::json!({"success": false, "message": "lecture already running"}),
    )
    .await;
    let sink = HttpSink::new(url, Duration::from_secs(5)).expect("sink");

    let err = sink
        .deliver(&sample_submission())
        .await
        .expect_err("rejected");
    assert!(err.to_string().contains("lecture already running"));
}

#[tokio::test]
async fn http_sink_reports_unreachable_server_as_transport() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");

    let sink = HttpSink::new(format!("http://{addr}/submit"), Duration::from_secs(2))
        .expect("sink");
    let err = sink
        .deliver(&sample_submission())
        .await
        .expect_err("unreachable");
    assert!(matches!(
        err,
        SinkError::Transport {
            kind: TransportKind::Connect,
            ..
        }
    ));
}

#[tokio::test]
async fn file_sink_writes_pretty_json_with_parents() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("handoff").join("curriculum.json");
    let sink = FileSink::new(&path);
    let submission = sample_submission();

    let receipt = sink.deliver(&submission).await.expect("deliver");
    assert_eq!(receipt.destination, path.display().to_string());

    let raw = std::fs::read_to_string(&path).expect("read back");
    assert!(raw.contains('\n'));
    let parsed: CurriculumSubmission = serde_json::from_str(&raw).expect("parse");
    assert_eq!(parsed, submission);
}

#[tokio::test]
async fn channel_sink_fails_when_receiver_is_gone() {
    let (sink, rx) = ChannelSink::new(1);
    drop(rx);

    let err = sink
        .deliver(&sample_submission())
        .await
        .expect_err("closed");
    assert!(matches!(err, SinkError::Closed));
}
