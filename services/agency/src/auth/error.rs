use crate::store::StoreError;
use thiserror::Error;

/// Terminal failure of the access-control pipeline for one request.
///
/// `Unauthenticated` and `Forbidden` are surfaced to callers as generic
/// denials. `StoreUnavailable` is a server-side failure and is never treated
/// as an allow.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("unauthenticated: {0}")]
    Unauthenticated(&'static str),
    #[error("forbidden: {0}")]
    Forbidden(&'static str),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl AccessError {
    pub fn outcome(&self) -> &'static str {
        match self {
            AccessError::Unauthenticated(_) => "unauthenticated",
            AccessError::Forbidden(_) => "forbidden",
            AccessError::StoreUnavailable(_) => "unavailable",
        }
    }
}

impl From<StoreError> for AccessError {
    fn from(err: StoreError) -> Self {
        AccessError::StoreUnavailable(err.to_string())
    }
}
