//! Scripted HTTP server for exercising the client over real sockets.
//!
//! Every request is recorded; responses are looked up by method and path
//! and default to 404.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;

use timetable_client::TimetableApi;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: String,
}

#[derive(Clone)]
struct Canned {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
}

#[derive(Default)]
struct Script {
    responses: HashMap<(String, String), Canned>,
    requests: Vec<Recorded>,
}

#[derive(Clone)]
pub struct ScriptedApi {
    pub base_url: String,
    script: Arc<Mutex<Script>>,
}

impl ScriptedApi {
    /// Bind an ephemeral port and serve in the background.
    pub async fn start() -> Self {
        let script = Arc::new(Mutex::new(Script::default()));
        let app = Router::new().fallback(handle).with_state(Arc::clone(&script));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("scripted server");
        });

        Self {
            base_url: format!("http://{addr}"),
            script,
        }
    }

    pub fn client(&self) -> TimetableApi {
        TimetableApi::new(&self.base_url, Duration::from_secs(5)).expect("valid base url")
    }

    pub fn respond(&self, method: &str, path: &str, status: u16, body: serde_json::Value) {
        self.respond_raw(method, path, status, "application/json", body.to_string().into_bytes());
    }

    pub fn respond_raw(
        &self,
        method: &str,
        path: &str,
        status: u16,
        content_type: &'static str,
        body: Vec<u8>,
    ) {
        self.script.lock().unwrap().responses.insert(
            (method.to_string(), path.to_string()),
            Canned {
                status,
                content_type,
                body,
            },
        );
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.script.lock().unwrap().requests.clone()
    }
}

async fn handle(
    State(script): State<Arc<Mutex<Script>>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let mut script = script.lock().unwrap();
    script.requests.push(Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    match script
        .responses
        .get(&(method.to_string(), uri.path().to_string()))
        .cloned()
    {
        Some(canned) => (
            StatusCode::from_u16(canned.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            [(header::CONTENT_TYPE, canned.content_type)],
            canned.body,
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}
