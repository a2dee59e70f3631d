//! Auth session lifecycle against the mock backend: login, identity
//! derivation, profile refresh, logout, failure paths.

use clover_market_client::error::{ApiError, StoreError};
use clover_market_client::models::{Credentials, Registration};
use clover_market_client::storage::keys;
use clover_market_integration_tests::{TEST_PASSWORD, TestContext};

fn credentials(email: &str, password: &str) -> Credentials {
    Credentials {
        email: email.to_owned(),
        password: password.to_owned(),
    }
}

#[tokio::test]
async fn test_login_derives_identity_from_token() {
    let mut ctx = TestContext::new().await;

    ctx.stores
        .auth
        .login(&credentials("alice@example.com", TEST_PASSWORD))
        .await
        .expect("login should succeed");

    assert!(ctx.stores.auth.is_authenticated());
    assert_eq!(ctx.stores.auth.user_name(), "alice");
    assert_eq!(ctx.stores.auth.user_email(), "alice@example.com");
    assert!(ctx.storage.get(keys::TOKEN).is_some());
}

#[tokio::test]
async fn test_login_rejection_leaves_session_closed() {
    let mut ctx = TestContext::new().await;

    let err = ctx
        .stores
        .auth
        .login(&credentials("alice@example.com", "wrong"))
        .await
        .expect_err("wrong password should be rejected");

    match err {
        StoreError::Api(ApiError::Status { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!ctx.stores.auth.is_authenticated());
    assert_eq!(ctx.storage.get(keys::TOKEN), None);
}

#[tokio::test]
async fn test_register_opens_session() {
    let mut ctx = TestContext::new().await;

    ctx.stores
        .auth
        .register(&Registration {
            name: Some("Bob".to_owned()),
            email: "bob@example.com".to_owned(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await
        .expect("registration should succeed");

    assert!(ctx.stores.auth.is_authenticated());
    assert_eq!(ctx.stores.auth.user_email(), "bob@example.com");
}

#[tokio::test]
async fn test_fetch_user_confirms_session() {
    let mut ctx = TestContext::new().await;
    ctx.stores
        .auth
        .login(&credentials("alice@example.com", TEST_PASSWORD))
        .await
        .expect("login should succeed");

    ctx.stores.auth.fetch_user().await;

    assert!(ctx.stores.auth.is_authenticated());
    assert_eq!(ctx.stores.auth.user_email(), "alice@example.com");
}

#[tokio::test]
async fn test_fetch_user_without_token_logs_out() {
    let mut ctx = TestContext::new().await;

    // No login: the backend rejects /auth/me and the store gives up the
    // session rather than keeping a phantom one
    ctx.stores.auth.fetch_user().await;

    assert!(!ctx.stores.auth.is_authenticated());
    assert_eq!(ctx.stores.auth.user_name(), "Guest");
}

#[tokio::test]
async fn test_logout_clears_session_and_storage() {
    let mut ctx = TestContext::new().await;
    ctx.stores
        .auth
        .login(&credentials("alice@example.com", TEST_PASSWORD))
        .await
        .expect("login should succeed");

    ctx.stores.auth.logout();

    assert!(!ctx.stores.auth.is_authenticated());
    assert_eq!(ctx.storage.get(keys::TOKEN), None);
    assert_eq!(ctx.stores.auth.token(), None);
}
