use jiff::Timestamp;
use reqwest::Response;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::client::AuthClient;
use crate::error::AuthError;
use crate::session::{Session, TokenResponse};

/// Result of a sign-up attempt.
#[derive(Debug)]
pub enum SignUpOutcome {
    /// Account created and signed in immediately.
    SignedIn(Session),
    /// Account created; the user must follow the emailed confirmation link
    /// before signing in.
    ConfirmationSent,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Sign-up is gated by a shared static code, checked before any request.
/// Case is ignored. An unset code keeps sign-up closed.
pub fn check_invite_code(provided: &str, expected: &str) -> Result<(), AuthError> {
    let expected = expected.trim();
    if !expected.is_empty() && provided.trim().eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(AuthError::InvalidInviteCode)
    }
}

/// Pull the human-readable message out of an auth error body.
pub fn error_message(body: &serde_json::Value) -> Option<String> {
    ["error_description", "msg", "message", "error"]
        .iter()
        .find_map(|k| body.get(*k).and_then(|v| v.as_str()))
        .map(str::to_string)
}

async fn read_json(resp: Response) -> Result<serde_json::Value, AuthError> {
    let status = resp.status();
    let body: serde_json::Value = resp.json().await.unwrap_or(serde_json::Value::Null);
    if status.is_success() {
        return Ok(body);
    }
    Err(AuthError::AuthFailed(
        error_message(&body).unwrap_or_else(|| status.to_string()),
    ))
}

fn parse_session(body: serde_json::Value) -> Result<Session, AuthError> {
    let token: TokenResponse = serde_json::from_value(body)
        .map_err(|e| AuthError::UnexpectedResponse(e.to_string()))?;
    Ok(token.into_session(Timestamp::now()))
}

/// Create an account. The display name and role tag travel as user metadata.
pub async fn sign_up(
    client: &AuthClient,
    request: &SignUpRequest,
    invite_code: &str,
    expected_code: &str,
) -> Result<SignUpOutcome, AuthError> {
    check_invite_code(invite_code, expected_code)?;
    info!(email = %request.email, "signing up");

    let name = if request.name.trim().is_empty() {
        "User"
    } else {
        request.name.trim()
    };
    let resp = client
        .http
        .post(client.url("signup"))
        .header("apikey", &client.api_key)
        .json(&json!({
            "email": request.email,
            "password": request.password,
            "data": { "name": name, "role": "member" },
        }))
        .send()
        .await?;

    let body = read_json(resp).await?;
    if body.get("access_token").is_some() {
        Ok(SignUpOutcome::SignedIn(parse_session(body)?))
    } else {
        Ok(SignUpOutcome::ConfirmationSent)
    }
}

/// Password sign-in.
pub async fn sign_in(
    client: &AuthClient,
    email: &str,
    password: &str,
) -> Result<Session, AuthError> {
    info!(email = email, "signing in");

    let resp = client
        .http
        .post(client.url("token"))
        .query(&[("grant_type", "password")])
        .header("apikey", &client.api_key)
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;

    parse_session(read_json(resp).await?)
}

/// Exchange a refresh token for a new session.
pub async fn refresh(client: &AuthClient, refresh_token: &str) -> Result<Session, AuthError> {
    let resp = client
        .http
        .post(client.url("token"))
        .query(&[("grant_type", "refresh_token")])
        .header("apikey", &client.api_key)
        .json(&json!({ "refresh_token": refresh_token }))
        .send()
        .await?;

    match read_json(resp).await {
        Ok(body) => parse_session(body),
        Err(AuthError::AuthFailed(_)) => Err(AuthError::TokenExpired),
        Err(e) => Err(e),
    }
}

/// Revoke the session server-side.
pub async fn sign_out(client: &AuthClient, session: &Session) -> Result<(), AuthError> {
    info!(user_id = %session.user_id(), "signing out");

    let resp = client
        .http
        .post(client.url("logout"))
        .header("apikey", &client.api_key)
        .bearer_auth(&session.access_token)
        .send()
        .await?;

    if resp.status().is_success() {
        Ok(())
    } else {
        Err(AuthError::AuthFailed(resp.status().to_string()))
    }
}
