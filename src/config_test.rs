use super::*;

/// # Safety
/// Tests must run with `--test-threads=1` to avoid env races.
unsafe fn clear_client_env() {
    unsafe {
        std::env::remove_var("BANKDESK_API_URL");
        std::env::remove_var("BANKDESK_SESSION_FILE");
        std::env::remove_var("BANKDESK_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("BANKDESK_CONNECT_TIMEOUT_SECS");
    }
}

// =============================================================================
// normalize_api_url
// =============================================================================

#[test]
fn normalize_api_url_defaults_when_absent() {
    assert_eq!(normalize_api_url(None).unwrap(), DEFAULT_API_URL);
    assert_eq!(normalize_api_url(Some("   ")).unwrap(), DEFAULT_API_URL);
}

#[test]
fn normalize_api_url_trims_trailing_slashes() {
    assert_eq!(normalize_api_url(Some("https://bank.test/api/v1//")).unwrap(), "https://bank.test/api/v1");
}

#[test]
fn normalize_api_url_rejects_non_http() {
    let err = normalize_api_url(Some("ftp://bank.test")).unwrap_err();
    assert!(err.to_string().contains("ftp://bank.test"));
}

// =============================================================================
// default_session_file
// =============================================================================

#[test]
fn default_session_file_under_home() {
    let path = default_session_file(Some(PathBuf::from("/home/alice")));
    assert_eq!(path, PathBuf::from("/home/alice/.bankdesk/session.json"));
}

#[test]
fn default_session_file_without_home_is_relative() {
    assert_eq!(default_session_file(None), PathBuf::from(FALLBACK_SESSION_FILE));
}

// =============================================================================
// ClientConfig::from_env
// =============================================================================

#[test]
fn from_env_applies_defaults_and_overrides() {
    unsafe {
        clear_client_env();
        std::env::set_var("BANKDESK_API_URL", "http://127.0.0.1:9000/api/v1/");
        std::env::set_var("BANKDESK_SESSION_FILE", "/tmp/bankdesk-test/session.json");
        std::env::set_var("BANKDESK_REQUEST_TIMEOUT_SECS", "5");
        std::env::set_var("BANKDESK_CONNECT_TIMEOUT_SECS", "not-a-number");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.api_url, "http://127.0.0.1:9000/api/v1");
    assert_eq!(cfg.session_file, PathBuf::from("/tmp/bankdesk-test/session.json"));
    assert_eq!(cfg.timeouts, HttpTimeouts { request_secs: 5, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS });

    unsafe { clear_client_env() };
}

#[test]
fn env_parse_u64_falls_back_on_garbage() {
    let key = "__TEST_BANKDESK_U64_7731__";
    unsafe { std::env::set_var(key, "abc") };
    assert_eq!(env_parse_u64(key, 11), 11);
    unsafe { std::env::set_var(key, "42") };
    assert_eq!(env_parse_u64(key, 11), 42);
    unsafe { std::env::remove_var(key) };
}
