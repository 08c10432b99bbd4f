use thiserror::Error;

/// Failures surfaced by the mirror and consensus ports.
///
/// `NotFound` and the invalid-id variants are part of normal operation and
/// are mapped to `null` / empty / cached-sentinel responses by the handlers;
/// the remaining variants indicate infrastructure trouble and propagate.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum PortError {
    /// The queried entity does not exist on the backend.
    #[error("not found")]
    NotFound,

    /// The consensus node rejected the account identifier.
    #[error("invalid account id: {0}")]
    InvalidAccountId(String),

    /// The consensus node rejected the contract identifier.
    #[error("invalid contract id: {0}")]
    InvalidContractId(String),

    /// Request exceeded the per-request deadline.
    #[error("request timeout")]
    Timeout,

    /// Failed to reach the backend. Carries a sanitized description only.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Non-success HTTP status from the mirror node.
    #[error("http status {0}: {1}")]
    Status(u16, String),

    /// Backend response could not be parsed into the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl PortError {
    /// Returns `true` for the not-found family that handlers map to
    /// `null`/`[]` rather than propagate.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Returns `true` when retrying on the same backend may help.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout | Self::Connection(_) => true,
            Self::Status(status, _) => (500..=599).contains(status) || *status == 429,
            _ => false,
        }
    }
}
