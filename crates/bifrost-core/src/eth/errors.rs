use thiserror::Error;

use crate::{clients::PortError, types::RpcErrorValue};

/// Thrown handler failures, distinct from the error *values* some methods
/// return as normal results ([`crate::types::MethodOutcome::ErrorValue`]).
///
/// Read-only methods favor `null`/empty returns over throwing; these
/// variants cover the cases where the return shape cannot express the
/// failure.
#[derive(Debug, Error)]
pub enum EthError {
    /// Malformed or out-of-contract input; the transport maps this to
    /// invalid-params (-32602).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A backend call failed in a way no handler default can absorb.
    #[error("upstream failure: {0}")]
    Upstream(#[from] PortError),

    /// Unexpected internal condition (-32603).
    #[error("internal error: {0}")]
    Internal(String),
}

impl EthError {
    /// JSON-RPC error code for the transport edge.
    #[must_use]
    pub fn rpc_code(&self) -> i64 {
        match self {
            Self::InvalidParameter(_) => -32602,
            Self::Upstream(_) | Self::Internal(_) => -32603,
        }
    }

    /// Projects the failure into a serializable JSON-RPC error value.
    #[must_use]
    pub fn to_error_value(&self) -> RpcErrorValue {
        RpcErrorValue::new(self.rpc_code(), self.to_string())
    }
}
