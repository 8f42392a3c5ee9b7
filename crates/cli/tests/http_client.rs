//! SonarClient against a local stand-in for the SonarQube web API.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use buildbreaker::SonarClient;
use buildbreaker_core::api::decode_task_response;
use buildbreaker_core::model::TaskStatus;
use buildbreaker_core::{
    BreakerConfig, BreakerError, Outcome, QualityGateBreaker, QualityGateService, TransportError,
};
use serde_json::{json, Value};

const TOKEN: &str = "squ_test";
// base64("squ_test:")
const EXPECTED_AUTH: &str = "Basic c3F1X3Rlc3Q6";

#[derive(Default)]
struct Server {
    task_calls: AtomicUsize,
    gate_status: &'static str,
}

async fn task(
    State(server): State<Arc<Server>>,
    headers: HeaderMap,
    Query(q): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some(EXPECTED_AUTH) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let n = server.task_calls.fetch_add(1, Ordering::SeqCst);
    let id = q.get("id").cloned().unwrap_or_default();
    let body = if n == 0 {
        json!({ "task": { "id": id, "status": "IN_PROGRESS" } })
    } else {
        json!({ "task": { "id": id, "status": "SUCCESS", "analysisId": "AN-1" } })
    };
    Ok(Json(body))
}

async fn project_status(
    State(server): State<Arc<Server>>,
    Query(q): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    if q.get("analysisId").map(String::as_str) != Some("AN-1") {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({
        "projectStatus": {
            "status": server.gate_status,
            "conditions": [
                { "status": "ERROR", "metricKey": "new_coverage", "comparator": "LT",
                  "errorThreshold": "80", "actualValue": "42.0" },
                { "status": "OK", "metricKey": "new_bugs", "comparator": "GT",
                  "errorThreshold": "0", "actualValue": "0" }
            ]
        }
    })))
}

async fn serve(prefix: &str, gate_status: &'static str) -> (String, Arc<Server>) {
    let server = Arc::new(Server {
        gate_status,
        ..Default::default()
    });
    let api = Router::new()
        .route("/api/ce/task", get(task))
        .route("/api/qualitygates/project_status", get(project_status))
        .with_state(server.clone());
    let app = if prefix.is_empty() {
        api
    } else {
        Router::new().nest(prefix, api)
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}{prefix}"), server)
}

fn client(url: &str, token: Option<&str>) -> SonarClient {
    SonarClient::new(url, token.map(Into::into), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn fetches_task_with_token() {
    let (url, server) = serve("", "OK").await;
    let c = client(&url, Some(TOKEN));

    let body = c.fetch_task("AVKJ").await.unwrap();
    let resp = decode_task_response(&body).unwrap();

    assert_eq!(resp.task.id, "AVKJ");
    assert_eq!(resp.task.status, TaskStatus::InProgress);
    assert_eq!(server.task_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rejected_credentials_surface_the_http_status() {
    let (url, _server) = serve("", "OK").await;
    let c = client(&url, Some("wrong"));

    match c.fetch_task("AVKJ").await.unwrap_err() {
        TransportError::Status { status, .. } => assert_eq!(status, 401),
        other => panic!("expected an HTTP status error, got {other:?}"),
    }
}

#[tokio::test]
async fn honours_a_context_path() {
    let (url, _server) = serve("/sonar", "OK").await;
    let c = client(&url, None);

    let body = c.fetch_project_status("AN-1").await.unwrap();
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["projectStatus"]["status"], "OK");
}

#[tokio::test]
async fn unreachable_server_is_a_request_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}"), None)
        .fetch_task("AVKJ")
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Request(_)));
}

fn write_report_task(dir: &std::path::Path, server_url: &str) {
    std::fs::write(
        dir.join("report-task.txt"),
        format!("projectKey=demo\nserverUrl={server_url}\nceTaskId=AVKJ\n"),
    )
    .unwrap();
}

async fn run_breaker(server_url: &str, dir: &std::path::Path) -> Result<Outcome, BreakerError> {
    let config = BreakerConfig {
        work_dir: dir.to_path_buf(),
        query_max_attempts: 3,
        query_interval_seconds: 0,
        ..Default::default()
    };
    let breaker = QualityGateBreaker::new(config);
    breaker
        .execute(|meta| {
            assert_eq!(breaker.config().resolve_server_url(meta)?, server_url);
            SonarClient::new(server_url, Some(TOKEN.into()), Duration::from_secs(5))
        })
        .await
}

#[tokio::test]
async fn end_to_end_warn_gate_passes() {
    let (url, server) = serve("", "WARN").await;
    let dir = tempfile::tempdir().unwrap();
    write_report_task(dir.path(), &url);

    let outcome = run_breaker(&url, dir.path()).await.unwrap();

    match outcome {
        Outcome::Passed(verdict) => assert_eq!(verdict.error_count, 1),
        other => panic!("expected a pass, got {other:?}"),
    }
    assert_eq!(server.task_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn end_to_end_error_gate_breaks_the_build() {
    let (url, _server) = serve("", "ERROR").await;
    let dir = tempfile::tempdir().unwrap();
    write_report_task(dir.path(), &url);

    let err = run_breaker(&url, dir.path()).await.unwrap_err();
    assert_eq!(err.to_string(), "Project does not pass the quality gate.");
}
