//! Core value types shared across the translation engine.
//!
//! # Result shapes
//!
//! Several `eth_*` methods can yield either a success value *or* a JSON-RPC
//! error value from the same call (e.g. `eth_feeHistory` returning
//! `REQUEST_BEYOND_HEAD_BLOCK`). Those error values are normal results —
//! the enclosing transport serializes them — and are distinct from thrown
//! failures ([`crate::eth::EthError`]). [`MethodOutcome`] is the tagged sum
//! that keeps the two shapes apart.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// JSON-RPC error value carried as a *result*, not a thrown failure.
///
/// Standard error codes follow the JSON-RPC 2.0 convention:
///
/// - `-32601`: Method not found / unsupported
/// - `-32602`: Invalid params
/// - `-32603`: Internal error
/// - `-32000` to `-32099`: Server-defined errors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorValue {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcErrorValue {
    /// Creates an error value with the given code and message.
    #[must_use]
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), data: None }
    }

    /// The method is deliberately not implemented by this relay.
    #[must_use]
    pub fn unsupported_method() -> Self {
        Self::new(-32601, "Unsupported JSON-RPC method")
    }

    /// Unexpected condition with no client-addressable remedy.
    #[must_use]
    pub fn internal_error() -> Self {
        Self::new(-32603, "Unknown error invoking RPC")
    }

    /// The requested block is newer than the chain head.
    #[must_use]
    pub fn request_beyond_head_block(requested: u64, head: u64) -> Self {
        Self::new(-32000, format!("Request beyond head block: requested {requested}, head {head}"))
    }
}

impl std::fmt::Display for RpcErrorValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Outcome of one `eth_*` method invocation.
///
/// `Value` carries the JSON result; `ErrorValue` carries a JSON-RPC error
/// value returned as data. Thrown failures travel separately as
/// `Result::Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodOutcome {
    Value(serde_json::Value),
    ErrorValue(RpcErrorValue),
}

impl MethodOutcome {
    /// Wraps a JSON success value.
    #[must_use]
    pub fn value(value: serde_json::Value) -> Self {
        Self::Value(value)
    }

    /// Wraps a serializable success value.
    ///
    /// # Panics
    ///
    /// Panics if the value fails to serialize, which cannot occur for the
    /// relay's wire models (string/number/bool/array/object shapes only).
    #[must_use]
    pub fn from_serialize<T: Serialize>(value: &T) -> Self {
        Self::Value(serde_json::to_value(value).expect("wire model serialization cannot fail"))
    }

    /// Wraps a JSON-RPC error value returned as a normal result.
    #[must_use]
    pub fn error(error: RpcErrorValue) -> Self {
        Self::ErrorValue(error)
    }

    /// Returns the success value, if any.
    #[must_use]
    pub fn as_value(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::ErrorValue(_) => None,
        }
    }

    /// Returns the error value, if any.
    #[must_use]
    pub fn as_error(&self) -> Option<&RpcErrorValue> {
        match self {
            Self::Value(_) => None,
            Self::ErrorValue(e) => Some(e),
        }
    }
}

/// Opaque per-request correlation id, propagated through every downstream
/// call purely for log attribution.
#[derive(Clone, Debug)]
pub struct RequestId(Arc<str>);

impl RequestId {
    /// Creates a request id from a caller-supplied string.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random request id (UUID v4).
    #[must_use]
    pub fn generate() -> Self {
        Self(Arc::from(Uuid::new_v4().to_string()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
