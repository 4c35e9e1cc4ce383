//! Synchronous payload functions behind the HTTP handlers. Each takes and
//! returns strings so the router stays a thin serialization shell and the
//! logic is testable without a socket.

use std::fmt;

use serde::Serialize;

use crate::data::catalogue;
use crate::eval::{evaluate, EvalRequest};

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub engine: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataVersionResponse {
    pub status: &'static str,
    pub data_version: Option<String>,
}

#[derive(Debug)]
pub enum EvaluatePayloadError {
    Parse(serde_json::Error),
    EmptyQueries,
}

impl fmt::Display for EvaluatePayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::EmptyQueries => write!(f, "request carries no attribute queries"),
        }
    }
}

pub fn health_payload() -> String {
    let payload = HealthResponse {
        status: "ok",
        engine: "dogma",
    };
    serde_json::to_string_pretty(&payload).unwrap_or_else(|_| "{\"status\": \"ok\"}".to_string())
}

pub fn data_version_payload() -> String {
    let payload = DataVersionResponse {
        status: "ok",
        data_version: catalogue::global().data_version().map(String::from),
    };
    serde_json::to_string_pretty(&payload)
        .unwrap_or_else(|_| "{\"status\": \"ok\"}".to_string())
}

/// Parse and evaluate one fit request. CPU-bound; the router runs this on
/// the blocking pool.
pub fn evaluate_payload(body: &str) -> Result<String, EvaluatePayloadError> {
    let request: EvalRequest =
        serde_json::from_str(body).map_err(EvaluatePayloadError::Parse)?;
    if request.queries.is_empty() {
        return Err(EvaluatePayloadError::EmptyQueries);
    }
    let report = evaluate(&request);
    serde_json::to_string_pretty(&report).map_err(EvaluatePayloadError::Parse)
}
