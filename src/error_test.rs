use super::*;

fn status(status: u16, detail: Option<&str>) -> ApiError {
    ApiError::Status { status, detail: detail.map(str::to_owned) }
}

#[test]
fn login_401_with_detail_is_invalid_credentials() {
    let err = AuthError::from_api(&status(401, Some("Invalid credentials")), LOGIN_FAILED);
    assert_eq!(err, AuthError::InvalidCredentials("Invalid credentials".to_owned()));
    assert_eq!(err.user_message(), "Invalid credentials");
}

#[test]
fn login_401_without_detail_uses_fallback() {
    let err = AuthError::from_api(&status(401, None), LOGIN_FAILED);
    assert_eq!(err.user_message(), LOGIN_FAILED);
}

#[test]
fn registration_400_is_validation() {
    let err = AuthError::from_api(&status(400, Some("Username already taken")), REGISTRATION_FAILED);
    assert_eq!(err, AuthError::Validation("Username already taken".to_owned()));
}

#[test]
fn transport_failure_is_network_with_fallback_message() {
    let err = AuthError::from_api(&ApiError::Network("connection refused".to_owned()), LOGIN_FAILED);
    assert_eq!(err, AuthError::Network(LOGIN_FAILED.to_owned()));
}

#[test]
fn server_fault_is_network_with_detail() {
    let err = AuthError::from_api(&status(503, Some("Maintenance")), LOGIN_FAILED);
    assert_eq!(err, AuthError::Network("Maintenance".to_owned()));
}

#[test]
fn identity_lookup_401_is_expired_token() {
    assert_eq!(AuthError::from_identity_lookup(&status(401, None)), AuthError::ExpiredOrInvalidToken);
}

#[test]
fn identity_lookup_transport_failure_is_network() {
    let err = AuthError::from_identity_lookup(&ApiError::Network("timed out".to_owned()));
    assert!(matches!(err, AuthError::Network(msg) if msg.contains("timed out")));
}

#[test]
fn authorization_denied_names_role() {
    let err = AuthError::AuthorizationDenied { required: Role::Admin };
    assert_eq!(err.to_string(), "ADMIN access required");
}

#[test]
fn sign_in_required_reads_as_a_prompt() {
    assert_eq!(AuthError::SignInRequired.user_message(), "Please sign in to continue.");
}
