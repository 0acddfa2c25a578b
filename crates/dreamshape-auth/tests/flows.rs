use dreamshape_auth::client::AuthClient;
use dreamshape_auth::error::AuthError;
use dreamshape_auth::flows::{self, SignUpRequest};
use serde_json::json;

#[test]
fn invite_code_must_match() {
    assert!(flows::check_invite_code("LETMEIN", "LETMEIN").is_ok());
    assert!(flows::check_invite_code(" LETMEIN\n", "LETMEIN").is_ok());
    assert!(flows::check_invite_code("letmein", "LETMEIN").is_ok());
    assert!(matches!(
        flows::check_invite_code("LETMEOUT", "LETMEIN"),
        Err(AuthError::InvalidInviteCode)
    ));
}

#[test]
fn unset_invite_code_keeps_sign_up_closed() {
    for provided in ["", "  ", "anything"] {
        assert!(matches!(
            flows::check_invite_code(provided, ""),
            Err(AuthError::InvalidInviteCode)
        ));
    }
    assert!(flows::check_invite_code("", "   ").is_err());
}

#[tokio::test]
async fn wrong_invite_code_never_reaches_the_network() {
    // Unroutable address: any request would fail with an HTTP error instead.
    let client = AuthClient::build("http://127.0.0.1:9", "anon");
    let request = SignUpRequest {
        email: "a@example.com".to_string(),
        password: "hunter22".to_string(),
        name: "A".to_string(),
    };

    let err = flows::sign_up(&client, &request, "nope", "LETMEIN")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::InvalidInviteCode));
}

#[test]
fn error_message_prefers_description() {
    let body = json!({ "error": "invalid_grant", "error_description": "Invalid login credentials" });
    assert_eq!(
        flows::error_message(&body).as_deref(),
        Some("Invalid login credentials")
    );
    assert_eq!(flows::error_message(&json!({ "msg": "Signups not allowed" })).as_deref(), Some("Signups not allowed"));
    assert_eq!(flows::error_message(&json!({})), None);
}
