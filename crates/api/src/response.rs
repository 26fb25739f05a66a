//! Shared response envelope for API handlers.
//!
//! Every response, success or failure, is `{ "success", "error", "data" }`.
//! Use [`Envelope::ok`] in handlers; failures are built by
//! [`AppError`](crate::error::AppError).

use serde::{Deserialize, Serialize};

/// Standard `{ "success": bool, "error": string, "data": T }` envelope.
///
/// `error` is empty on success; `data` is omitted on failure.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            error: String::new(),
            data: Some(data),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
            data: None,
        }
    }
}

/// Payload for operations that return nothing (serializes as `{}`).
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Empty {}
