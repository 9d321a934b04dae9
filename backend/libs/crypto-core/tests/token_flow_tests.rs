/// Integration tests for crypto-core
///
/// Covers the paths the dashboard service relies on:
/// - phone login: stored hash → verified password → bearer token
/// - dashboard sessions signed with a separate secret
/// - legacy SHA-256 digests still accepted
use chrono::{Duration, Utc};
use crypto_core::hash::sha256_hex;
use crypto_core::password::is_legacy_digest;
use crypto_core::{hash_password, verify_password, JwtKeys, PHONE_TOKEN_EXPIRY_SECONDS};
use uuid::Uuid;

const PHONE_SECRET: &[u8] = b"integration-phone-secret";
const SESSION_SECRET: &[u8] = b"integration-session-secret";

#[test]
fn test_phone_login_flow() {
    let stored = hash_password("hunter2").expect("hashing should succeed");
    assert!(!is_legacy_digest(&stored));
    assert!(verify_password("hunter2", &stored));
    assert!(!verify_password("hunter3", &stored));

    let keys = JwtKeys::from_secret(PHONE_SECRET).expect("keys");
    let phone_id = Uuid::new_v4();
    let issued_at = Utc::now();
    let issued = keys
        .issue_phone_token(phone_id, "+15551234567", issued_at)
        .expect("token");

    assert_eq!(
        issued.expires_at.timestamp(),
        issued_at.timestamp() + PHONE_TOKEN_EXPIRY_SECONDS
    );

    let claims = keys.validate_phone_token(&issued.token).expect("valid token");
    assert_eq!(claims.phone_id().expect("uuid subject"), phone_id);
    assert_eq!(claims.phone_number, "+15551234567");
}

#[test]
fn test_legacy_digest_still_verifies() {
    let legacy = sha256_hex(b"old-password");
    assert!(is_legacy_digest(&legacy));
    assert!(verify_password("old-password", &legacy));
    assert!(!verify_password("new-password", &legacy));
}

#[test]
fn test_session_and_phone_secrets_do_not_mix() {
    let phone_keys = JwtKeys::from_secret(PHONE_SECRET).expect("keys");
    let session_keys = JwtKeys::from_secret(SESSION_SECRET).expect("keys");
    let user_id = Uuid::new_v4();

    let session = session_keys
        .issue_session_token(user_id, "admin", Duration::hours(24), Utc::now())
        .expect("session token");

    let claims = session_keys
        .validate_session_token(&session.token)
        .expect("valid session");
    assert_eq!(claims.user_id().expect("uuid subject"), user_id);
    assert_eq!(claims.username, "admin");

    assert!(phone_keys.validate_session_token(&session.token).is_err());
    assert!(phone_keys.validate_phone_token(&session.token).is_err());
}

#[test]
fn test_expired_session_is_rejected() {
    let keys = JwtKeys::from_secret(SESSION_SECRET).expect("keys");
    let issued = keys
        .issue_session_token(
            Uuid::new_v4(),
            "admin",
            Duration::hours(1),
            Utc::now() - Duration::hours(2),
        )
        .expect("session token");

    assert!(keys.validate_session_token(&issued.token).is_err());
}
