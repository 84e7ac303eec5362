//! Session tests against a migrated SQLite database.

mod common;

use dcim_api::errors::AppError;
use dcim_api::services::{AuthService, Authenticator};
use dcim_api::Config;

use common::{persistence, seeded_database, PASSWORD, REQUESTER_ID};

fn config() -> Config {
    Config::with_secret("test-secret-key-for-testing-only-32chars")
}

#[tokio::test]
async fn test_login_issues_token_for_current_session() {
    let db = seeded_database().await;
    let auth = Authenticator::new(persistence(&db), config());

    let response = auth
        .login(REQUESTER_ID.to_string(), PASSWORD.to_string())
        .await
        .unwrap();

    assert_eq!(response.token_type, "Bearer");
    assert_eq!(response.user.user_id, REQUESTER_ID);
    let user = auth.authenticate(&response.access_token).await.unwrap();
    assert_eq!(user.user_id, REQUESTER_ID);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_user_look_the_same() {
    let db = seeded_database().await;
    let auth = Authenticator::new(persistence(&db), config());

    let wrong_password = auth
        .login(REQUESTER_ID.to_string(), "not-the-password".to_string())
        .await;
    let unknown_user = auth
        .login("nobody".to_string(), PASSWORD.to_string())
        .await;

    assert!(matches!(wrong_password, Err(AppError::InvalidCredentials)));
    assert!(matches!(unknown_user, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_new_login_revokes_previous_token() {
    let db = seeded_database().await;
    let auth = Authenticator::new(persistence(&db), config());

    let first = auth
        .login(REQUESTER_ID.to_string(), PASSWORD.to_string())
        .await
        .unwrap();
    let second = auth
        .login(REQUESTER_ID.to_string(), PASSWORD.to_string())
        .await
        .unwrap();

    assert_ne!(first.access_token, second.access_token);
    assert!(matches!(
        auth.authenticate(&first.access_token).await,
        Err(AppError::Unauthorized)
    ));
    assert!(auth.authenticate(&second.access_token).await.is_ok());
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let db = seeded_database().await;
    let auth = Authenticator::new(persistence(&db), config());
    let session = auth
        .login(REQUESTER_ID.to_string(), PASSWORD.to_string())
        .await
        .unwrap();

    auth.logout(REQUESTER_ID).await.unwrap();

    assert!(matches!(
        auth.authenticate(&session.access_token).await,
        Err(AppError::Unauthorized)
    ));
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let db = seeded_database().await;
    let issuer = Authenticator::new(
        persistence(&db),
        Config::with_secret("another-secret-key-that-is-32-chars!"),
    );
    let auth = Authenticator::new(persistence(&db), config());
    let session = issuer
        .login(REQUESTER_ID.to_string(), PASSWORD.to_string())
        .await
        .unwrap();

    assert!(auth.authenticate(&session.access_token).await.is_err());
}
