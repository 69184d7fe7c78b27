//! Local stand-in for an MLflow tracking server
//!
//! Binds an ephemeral port on 127.0.0.1, records every request body by
//! API path, and answers with canned JSON.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

const API_PREFIX: &str = "/api/2.0/mlflow";

#[derive(Debug, Clone, Copy)]
pub enum StubMode {
    /// Answer every call successfully
    Ok,
    /// Answer every call with a 500
    Fail,
    /// Never answer in a reasonable time
    Hang,
}

#[derive(Clone)]
struct StubState {
    mode: StubMode,
    requests: Arc<Mutex<Vec<(String, Value)>>>,
}

pub struct MlflowStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MlflowStub {
    pub async fn start(mode: StubMode) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub listener");
        let addr = listener.local_addr().expect("Stub listener has no address");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route(&format!("{}/*rest", API_PREFIX), post(handle))
            .with_state(StubState {
                mode,
                requests: requests.clone(),
            });

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    /// Bodies received on an API path such as `/runs/log-batch`, in order
    pub fn bodies(&self, path: &str) -> Vec<Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, body)| body.clone())
            .collect()
    }
}

async fn handle(State(state): State<StubState>, uri: Uri, Json(body): Json<Value>) -> Response {
    let path = uri.path().trim_start_matches(API_PREFIX).to_string();
    state.requests.lock().unwrap().push((path.clone(), body));

    match state.mode {
        StubMode::Ok => Json(canned(&path)).into_response(),
        StubMode::Fail => (StatusCode::INTERNAL_SERVER_ERROR, "mlflow unavailable").into_response(),
        StubMode::Hang => {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Json(json!({})).into_response()
        }
    }
}

fn canned(path: &str) -> Value {
    match path {
        "/runs/create" => json!({"run": {"info": {"run_id": "stub-run", "status": "RUNNING"}}}),
        "/runs/search" => json!({
            "runs": [{"info": {"run_id": "stub-run", "run_name": "job", "status": "RUNNING"}}]
        }),
        _ => json!({}),
    }
}
