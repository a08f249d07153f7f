use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("unknown role: {0}")]
    UnknownRole(String),
    #[error("invalid permission key: {0}")]
    InvalidPermission(String),
    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

pub type AuthzResult<T> = Result<T, AuthzError>;
