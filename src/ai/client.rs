//! Gemini-style generation endpoint client.
//!
//! The core treats this as an opaque request/response boundary: one request
//! is one attempt, failures come back as [`RemoteError`] and the user
//! resends by hand. Requests run on a worker thread and deliver through a
//! one-shot channel so the UI thread never blocks.

use std::sync::mpsc;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};

use super::AiMode;
use crate::error::RemoteError;
use crate::image::SourceImage;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Model,
}

impl TurnRole {
    fn wire_name(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Model => "model",
        }
    }
}

/// One prior conversation turn, replayed for multi-turn context.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub text: String,
    pub image_png: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub prompt: String,
    pub mode: AiMode,
    pub history: Vec<ChatTurn>,
    /// PNG bytes of the current screenshot, attached in editing modes.
    pub current_screenshot: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub struct ChatReply {
    pub text: String,
    pub image: Option<SourceImage>,
}

/// Handle to one configured endpoint. Cheap to clone; each request builds
/// its own blocking HTTP client on the worker thread.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Perform one chat request, blocking the calling thread.
    pub fn chat(&self, request: &ChatRequest) -> Result<ChatReply, RemoteError> {
        if self.api_key.is_empty() {
            return Err(RemoteError::MissingApiKey);
        }

        let body = build_body(request);
        let url = format!(
            "{API_BASE}/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| RemoteError::Network(err.to_string()))?;

        let response = http
            .post(&url)
            .json(&body)
            .send()
            .map_err(|err| RemoteError::Network(err.to_string()))?;

        let status = response.status();
        let payload: Value = response
            .json()
            .map_err(|err| RemoteError::Network(err.to_string()))?;

        if !status.is_success() {
            let message = payload
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_else(|| format!("API error: {status}"));
            return Err(RemoteError::Api(message));
        }

        parse_reply(&payload)
    }

    /// Probe the endpoint with a bare model lookup.
    pub fn validate_api_key(api_key: &str) -> bool {
        let Ok(http) = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
        else {
            return false;
        };
        http.get(format!("{API_BASE}/gemini-2.0-flash?key={api_key}"))
            .send()
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

/// Run a request on a worker thread; the result arrives on the returned
/// channel. Dropping the receiver abandons the request.
pub fn dispatch(
    client: GeminiClient,
    request: ChatRequest,
) -> mpsc::Receiver<Result<ChatReply, RemoteError>> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let result = client.chat(&request);
        // The receiver may be gone if the session was cleared; fine.
        let _ = tx.send(result);
    });
    rx
}

fn turn_parts(text: &str, image_png: Option<&[u8]>) -> Vec<Value> {
    let mut parts = Vec::new();
    if let Some(png) = image_png {
        parts.push(json!({
            "inlineData": {
                "mimeType": "image/png",
                "data": BASE64.encode(png),
            }
        }));
    }
    if !text.is_empty() {
        parts.push(json!({ "text": text }));
    }
    parts
}

fn build_body(request: &ChatRequest) -> Value {
    let mut contents: Vec<Value> = request
        .history
        .iter()
        .map(|turn| {
            json!({
                "role": turn.role.wire_name(),
                "parts": turn_parts(&turn.text, turn.image_png.as_deref()),
            })
        })
        .collect();

    contents.push(json!({
        "role": "user",
        "parts": turn_parts(&request.prompt, request.current_screenshot.as_deref()),
    }));

    json!({
        "systemInstruction": { "parts": [{ "text": request.mode.system_prompt() }] },
        "contents": contents,
        "generationConfig": { "responseModalities": ["TEXT", "IMAGE"] },
    })
}

fn parse_reply(payload: &Value) -> Result<ChatReply, RemoteError> {
    let parts = payload
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut text = String::new();
    let mut image = None;

    for part in &parts {
        if let Some(t) = part.get("text").and_then(Value::as_str) {
            text.push_str(t);
        }
        let mime = part
            .pointer("/inlineData/mimeType")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if mime.starts_with("image/") {
            if let Some(data) = part.pointer("/inlineData/data").and_then(Value::as_str) {
                match BASE64.decode(data) {
                    Ok(bytes) => match SourceImage::from_bytes(&bytes, "generated") {
                        Ok(decoded) => image = Some(decoded),
                        Err(err) => log::warn!("undecodable image in response: {err}"),
                    },
                    Err(err) => log::warn!("bad base64 image payload: {err}"),
                }
            }
        }
    }

    if text.is_empty() && image.is_none() {
        return Err(RemoteError::EmptyResponse);
    }
    if text.is_empty() {
        text = "Here's what I generated:".to_owned();
    }
    Ok(ChatReply { text, image })
}
