/// Integration tests for the authentication primitives
///
/// These exercise the full credential flow (hash -> verify -> token ->
/// validate) the way the API layer composes it. No database required.

use chrono::Duration;
use taskflow_shared::auth::jwt::{create_token, validate_token, Claims, JwtError};
use taskflow_shared::auth::password::{hash_password, verify_password};
use uuid::Uuid;

const SECRET: &str = "integration-test-secret-32-bytes-ok!";

#[tokio::test]
async fn test_full_credential_flow() {
    let user_id = Uuid::new_v4();
    let password = "Secret1A";

    // Registration: hash the password
    let hash = hash_password(password).unwrap();
    assert!(hash.starts_with("$argon2id$"));

    // Login: verify and issue a token
    assert!(verify_password(password, &hash).unwrap());
    assert!(!verify_password("wrong-password", &hash).unwrap());

    let claims = Claims::new(user_id);
    let token = create_token(&claims, SECRET).unwrap();

    // Authenticated request: validate and recover the identity
    let validated = validate_token(&token, SECRET).unwrap();
    assert_eq!(validated.sub, user_id);
    assert!(!validated.is_expired());
}

#[tokio::test]
async fn test_two_users_get_distinct_identities() {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let alice_token = create_token(&Claims::new(alice), SECRET).unwrap();
    let bob_token = create_token(&Claims::new(bob), SECRET).unwrap();

    assert_ne!(alice_token, bob_token);
    assert_eq!(validate_token(&alice_token, SECRET).unwrap().sub, alice);
    assert_eq!(validate_token(&bob_token, SECRET).unwrap().sub, bob);
}

#[tokio::test]
async fn test_expired_token_fails_validation() {
    let claims = Claims::with_expiration(Uuid::new_v4(), Duration::hours(-2));
    let token = create_token(&claims, SECRET).unwrap();

    let result = validate_token(&token, SECRET);
    assert!(matches!(result, Err(JwtError::Expired)));
}

#[tokio::test]
async fn test_recently_expired_token_fails_validation() {
    // Expiry takes effect immediately, not after a grace window.
    let claims = Claims::with_expiration(Uuid::new_v4(), Duration::seconds(-30));
    let token = create_token(&claims, SECRET).unwrap();

    let result = validate_token(&token, SECRET);
    assert!(matches!(result, Err(JwtError::Expired)));
}

#[tokio::test]
async fn test_token_bound_to_signing_key() {
    let token = create_token(&Claims::new(Uuid::new_v4()), SECRET).unwrap();

    let result = validate_token(&token, "a-different-secret-also-32-bytes!!!!");
    assert!(result.is_err());
    assert!(!matches!(result, Err(JwtError::Expired)));
}

#[tokio::test]
async fn test_same_password_hashes_differently_but_both_verify() {
    let password = "Secret1A";

    let hash_a = hash_password(password).unwrap();
    let hash_b = hash_password(password).unwrap();

    // Unique salt per hash
    assert_ne!(hash_a, hash_b);
    assert!(verify_password(password, &hash_a).unwrap());
    assert!(verify_password(password, &hash_b).unwrap());
}
