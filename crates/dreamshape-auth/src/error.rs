use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid sign-up code")]
    InvalidInviteCode,

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("session expired")]
    TokenExpired,

    #[error("auth request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected auth response: {0}")]
    UnexpectedResponse(String),
}
