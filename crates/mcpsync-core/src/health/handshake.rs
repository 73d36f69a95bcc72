//! JSON-RPC handshake state machine used by the health checker.
//!
//! ```text
//! AwaitInitResult --id=1 result--> AwaitPingResult --id=2--> Done(Healthy)
//!        |  id=1 error / stdout closed / deadline  |
//!        +----------------> Done(...) <------------+
//! ```
//!
//! The machine is pure: it consumes events and yields outbound messages.
//! Driving the child process is the checker's job.

use serde_json::{Value, json};

use super::{JSON_RPC_VERSION, PROTOCOL_VERSION, ServerInfo};

const INITIALIZE_ID: i64 = 1;
const PING_ID: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeOutcome {
    Healthy { server_info: Option<ServerInfo> },
    Unhealthy(String),
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeState {
    AwaitInitResult,
    AwaitPingResult { server_info: Option<ServerInfo> },
    Done(HandshakeOutcome),
}

impl HandshakeState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, HandshakeState::Done(_))
    }

    pub fn outcome(&self) -> Option<&HandshakeOutcome> {
        match self {
            HandshakeState::Done(outcome) => Some(outcome),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HandshakeEvent {
    Message(Value),
    StdoutClosed,
    DeadlineElapsed,
}

/// The single transition function. Terminal states absorb every event.
pub fn transition(state: HandshakeState, event: HandshakeEvent) -> (HandshakeState, Vec<Value>) {
    use HandshakeEvent::*;
    use HandshakeState::*;

    match (state, event) {
        (Done(outcome), _) => (Done(outcome), Vec::new()),
        (_, DeadlineElapsed) => (Done(HandshakeOutcome::TimedOut), Vec::new()),
        (_, StdoutClosed) => (
            Done(HandshakeOutcome::Unhealthy(
                "Process exited unexpectedly".to_string(),
            )),
            Vec::new(),
        ),
        (AwaitInitResult, Message(msg)) if has_id(&msg, INITIALIZE_ID) => {
            if let Some(error) = msg.get("error").filter(|e| !e.is_null()) {
                return (
                    Done(HandshakeOutcome::Unhealthy(format!(
                        "initialize failed: {}",
                        error_message(error)
                    ))),
                    Vec::new(),
                );
            }
            match msg.get("result").filter(|r| !r.is_null()) {
                Some(result) => {
                    let server_info = result
                        .get("serverInfo")
                        .and_then(|info| serde_json::from_value(info.clone()).ok());
                    (
                        AwaitPingResult { server_info },
                        vec![initialized_notification(), ping_request()],
                    )
                }
                None => (AwaitInitResult, Vec::new()),
            }
        }
        (AwaitPingResult { server_info }, Message(msg)) if has_id(&msg, PING_ID) => (
            Done(HandshakeOutcome::Healthy { server_info }),
            Vec::new(),
        ),
        (state, Message(_)) => (state, Vec::new()),
    }
}

fn has_id(msg: &Value, id: i64) -> bool {
    msg.get("id").and_then(Value::as_i64) == Some(id)
}

fn error_message(error: &Value) -> String {
    error
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string())
}

pub fn initialize_request(client_name: &str, client_version: &str) -> Value {
    json!({
        "jsonrpc": JSON_RPC_VERSION,
        "id": INITIALIZE_ID,
        "method": "initialize",
        "params": {
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": { "name": client_name, "version": client_version },
        },
    })
}

fn initialized_notification() -> Value {
    json!({ "jsonrpc": JSON_RPC_VERSION, "method": "notifications/initialized" })
}

fn ping_request() -> Value {
    json!({ "jsonrpc": JSON_RPC_VERSION, "id": PING_ID, "method": "ping" })
}

/// Newline-delimited JSON framing over a byte stream.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every message it completes.
    ///
    /// Complete lines that are not JSON are dropped. An unterminated tail is
    /// kept for the next chunk unless it already parses as a JSON object.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Value> {
        self.pending.extend_from_slice(chunk);
        let mut messages = Vec::new();

        while let Some(newline) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            match parse_line(&line) {
                Some(Ok(value)) => messages.push(value),
                Some(Err(err)) => tracing::debug!(error = %err, "discarding non-JSON line"),
                None => {}
            }
        }

        if let Some(Ok(value)) = parse_line(&self.pending)
            && value.is_object()
        {
            self.pending.clear();
            messages.push(value);
        }

        messages
    }
}

fn parse_line(line: &[u8]) -> Option<serde_json::Result<Value>> {
    let text = String::from_utf8_lossy(line);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(serde_json::from_str(trimmed))
}

/// Serialize a message as one protocol line.
pub fn encode_line(message: &Value) -> String {
    let mut line = message.to_string();
    line.push('\n');
    line
}
