// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process mock of the Multired backend for integration tests.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use multired_client::config::Config;
use multired_client::session::Session;
use multired_client::Client;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[allow(dead_code)]
pub const TEST_PASSWORD: &str = "secret";

/// A request the mock backend received.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Bytes,
}

#[allow(dead_code)]
impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Mutable backend state; tests edit it between calls.
#[allow(dead_code)]
pub struct MockState {
    pub requests: Mutex<Vec<Recorded>>,
    /// Served for `GET /conversations/{id}`; the id is rewritten to match.
    pub conversation: Mutex<Value>,
    pub conversations: Mutex<Vec<Value>>,
    pub accounts: Mutex<Vec<Value>>,
    pub publish_reply: Mutex<(StatusCode, Value)>,
    pub history_delay: Mutex<Duration>,
    pub publish_delay: Mutex<Duration>,
    /// Answer every authenticated route with 401.
    pub reject_sessions: Mutex<bool>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            conversation: Mutex::new(json!({ "id": 5, "title": "Demo", "messages": [] })),
            conversations: Mutex::new(vec![
                json!({ "id": 5, "title": "Demo", "updatedAt": "2026-01-02T10:00:00Z" }),
            ]),
            accounts: Mutex::new(vec![
                json!({ "id": 1, "provider": "tiktok", "providerId": "tt-1" }),
                json!({ "id": 2, "provider": "facebook", "providerId": "fb-1" }),
            ]),
            publish_reply: Mutex::new((StatusCode::OK, json!({ "message": "ok", "publishId": "p-1" }))),
            history_delay: Mutex::new(Duration::ZERO),
            publish_delay: Mutex::new(Duration::ZERO),
            reject_sessions: Mutex::new(false),
        }
    }
}

#[allow(dead_code)]
impl MockState {
    pub fn set_conversation(&self, conversation: Value) {
        *self.conversation.lock().unwrap() = conversation;
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of recorded requests with `method` and `path`.
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn last(&self, method: Method, path: &str) -> Option<Recorded> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| r.method == method && r.path == path)
            .cloned()
    }
}

/// Running mock backend.
#[allow(dead_code)]
pub struct MockBackend {
    pub api_url: String,
    pub state: Arc<MockState>,
}

#[allow(dead_code)]
impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = axum::Router::new()
            .fallback(handle)
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock backend failed");
        });

        Self {
            api_url: format!("http://{}/api", addr),
            state,
        }
    }

    /// Config pointing at this backend, with timings short enough for tests.
    pub fn config(&self) -> Config {
        let mut config = Config::with_api_url(self.api_url.clone());
        config.poll_interval = Duration::from_millis(50);
        config.success_notice = Duration::from_millis(150);
        config.error_notice = Duration::from_millis(200);
        config
    }

    /// Client with an in-memory session and no token.
    pub fn client(&self) -> Client {
        Client::new(self.config(), Session::in_memory())
    }

    /// Client already holding a valid token.
    pub fn logged_in_client(&self) -> Client {
        let client = self.client();
        client
            .session
            .set_token(&mint_token(3600, 7))
            .expect("Failed to store token");
        client
    }
}

#[derive(Serialize)]
struct TestClaims {
    id: u64,
    email: String,
    exp: i64,
}

/// Signed token for user `id` expiring `expires_in_secs` from now
/// (negative for an already expired token).
#[allow(dead_code)]
pub fn mint_token(expires_in_secs: i64, id: u64) -> String {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

    let claims = TestClaims {
        id,
        email: "ana@example.com".to_string(),
        exp: chrono::Utc::now().timestamp() + expires_in_secs,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"test_signing_key_32_bytes_long!!"),
    )
    .expect("Failed to create JWT")
}

/// Assistant message still generating media.
#[allow(dead_code)]
pub fn processing_message(id: u64) -> Value {
    json!({
        "id": id,
        "role": "assistant",
        "content": { "text": "Generando contenido...", "status": "processing_media" },
        "createdAt": "2026-01-02T10:00:00Z"
    })
}

/// Assistant message with a finished TikTok video.
#[allow(dead_code)]
pub fn completed_message(id: u64) -> Value {
    json!({
        "id": id,
        "role": "assistant",
        "content": {
            "text": "Tu video está listo",
            "status": "completed",
            "TikTok": {
                "media_info": {
                    "tipo": "video",
                    "descripcion": "Un gato bailando",
                    "ruta": "/uploads/videos/clip 1.mp4"
                }
            }
        }
    })
}

/// A completed message already published to TikTok.
#[allow(dead_code)]
pub fn published_message(id: u64) -> Value {
    let mut message = completed_message(id);
    message["content"]["TikTok"]["publicacion"] =
        json!({ "estado": "publicado", "publishId": "p-0", "fecha": "2026-01-02T11:00:00Z" });
    message
}

#[allow(dead_code)]
pub fn user_message(id: u64, text: &str) -> Value {
    json!({ "id": id, "role": "user", "content": text })
}

#[allow(dead_code)]
pub fn conversation(id: u64, messages: Vec<Value>) -> Value {
    json!({ "id": id, "title": "Demo", "messages": messages })
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix("/api")
        .unwrap_or(uri.path())
        .to_string();
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    state.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        authorization: authorization.clone(),
        body: body.clone(),
    });

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();

    // Public routes.
    match (method.as_str(), segments.as_slice()) {
        ("POST", ["auth", "login"]) => {
            let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
            return if request["password"] == TEST_PASSWORD {
                Json(json!({ "token": mint_token(3600, 7), "email": request["email"] }))
                    .into_response()
            } else {
                error(StatusCode::UNAUTHORIZED, "Credenciales inválidas")
            };
        }
        ("POST", ["auth", "register"]) => {
            return (
                StatusCode::CREATED,
                Json(json!({ "message": "Usuario registrado" })),
            )
                .into_response();
        }
        _ => {}
    }

    let bearer_ok = authorization.is_some_and(|a| a.starts_with("Bearer "));
    if !bearer_ok || *state.reject_sessions.lock().unwrap() {
        return error(StatusCode::UNAUTHORIZED, "Token inválido");
    }

    match (method.as_str(), segments.as_slice()) {
        ("GET", ["conversations"]) => {
            Json(Value::Array(state.conversations.lock().unwrap().clone())).into_response()
        }
        ("POST", ["conversations"]) => {
            Json(json!({ "id": 6, "title": "Nueva conversación" })).into_response()
        }
        ("GET", ["conversations", id]) => {
            let delay = *state.history_delay.lock().unwrap();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let Ok(id) = id.parse::<u64>() else {
                return error(StatusCode::NOT_FOUND, "Conversación no encontrada");
            };
            let mut conversation = state.conversation.lock().unwrap().clone();
            conversation["id"] = json!(id);
            Json(conversation).into_response()
        }
        ("DELETE", ["conversations", _]) => StatusCode::NO_CONTENT.into_response(),
        ("PATCH", ["conversations", id, "title"]) => {
            let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
            Json(json!({ "id": id.parse::<u64>().unwrap_or(0), "title": request["title"] }))
                .into_response()
        }
        ("POST", ["chatbot", "redes"]) => {
            Json(json!({ "response": "Generando tu contenido" })).into_response()
        }
        ("POST", ["posts", _, "publish-from-message"]) => {
            let delay = *state.publish_delay.lock().unwrap();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let (status, reply) = state.publish_reply.lock().unwrap().clone();
            (status, Json(reply)).into_response()
        }
        ("GET", ["social-accounts"]) => {
            Json(Value::Array(state.accounts.lock().unwrap().clone())).into_response()
        }
        ("DELETE", ["social-accounts", provider]) => {
            state
                .accounts
                .lock()
                .unwrap()
                .retain(|a| a["provider"] != *provider);
            Json(json!({ "message": "Cuenta desconectada" })).into_response()
        }
        ("POST", ["tiktok", "connect"]) => {
            Json(json!({ "url": "https://www.tiktok.com/v2/auth/authorize?state=abc" }))
                .into_response()
        }
        ("POST", ["auth", "connect", "facebook", "start"]) => {
            Json(json!({ "url": "https://www.facebook.com/dialog/oauth?state=abc" }))
                .into_response()
        }
        ("GET", ["posts", "facebook", "account"]) => {
            Json(json!({ "pageId": "123", "pageName": "Demo Page" })).into_response()
        }
        ("POST", ["posts", "facebook"])
        | ("POST", ["facebook", "photo"])
        | ("POST", ["instagram", "photo"])
        | ("POST", ["posts", "tiktok", "video"]) => {
            Json(json!({ "message": "Publicado", "id": "post-1" })).into_response()
        }
        _ => error(StatusCode::NOT_FOUND, "Not found"),
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message, "statusCode": status.as_u16() }))).into_response()
}
