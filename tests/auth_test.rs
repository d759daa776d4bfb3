mod common;

use common::{create_test_platform, platform_at, test_data_dir};
use quizdeck::error::Error;
use quizdeck::models::Role;
use quizdeck::names;

#[tokio::test]
async fn test_register_then_login_roundtrip() {
    let platform = create_test_platform().await;

    // Fresh registration succeeds as a regular user.
    let ana = platform
        .auth
        .register("Ana", "ana@example.com", "senha123")
        .await
        .unwrap();
    assert_eq!(ana.name, "Ana");
    assert_eq!(ana.role, Role::Regular);

    // Same email again is rejected.
    let err = platform
        .auth
        .register("Ana Clone", "ana@example.com", "outra")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateEmail(ref e) if e == "ana@example.com"));

    // Wrong password is rejected.
    let err = platform
        .auth
        .login("ana@example.com", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidCredentials));

    // Correct credentials return the full record.
    let logged_in = platform
        .auth
        .login("ana@example.com", "senha123")
        .await
        .unwrap();
    assert_eq!(logged_in.id, ana.id);
    assert_eq!(logged_in.name, "Ana");
}

#[tokio::test]
async fn test_register_does_not_log_in() {
    let platform = create_test_platform().await;

    platform
        .auth
        .register("Ana", "ana@example.com", "senha123")
        .await
        .unwrap();

    assert!(platform.auth.current_user().await.unwrap().is_none());
}

#[tokio::test]
async fn test_login_persists_session_across_reopen() {
    let dir = test_data_dir();
    let platform = platform_at(dir.clone()).await;

    platform
        .auth
        .register("Ana", "ana@example.com", "senha123")
        .await
        .unwrap();
    platform
        .auth
        .login("ana@example.com", "senha123")
        .await
        .unwrap();
    drop(platform);

    let platform = platform_at(dir).await;
    let current = platform.auth.current_user().await.unwrap().unwrap();
    assert_eq!(current.email, "ana@example.com");
}

#[tokio::test]
async fn test_logout_clears_current_user() {
    let platform = create_test_platform().await;

    platform
        .auth
        .register("Ana", "ana@example.com", "senha123")
        .await
        .unwrap();
    platform
        .auth
        .login("ana@example.com", "senha123")
        .await
        .unwrap();
    assert!(platform.auth.current_user().await.unwrap().is_some());

    platform.auth.logout().await.unwrap();
    assert!(platform.auth.current_user().await.unwrap().is_none());
}

#[tokio::test]
async fn test_seeded_admin_can_log_in() {
    let platform = create_test_platform().await;

    let admin = platform
        .auth
        .login(names::ADMIN_EMAIL, names::ADMIN_PASSWORD)
        .await
        .unwrap();

    assert_eq!(admin.role, Role::Admin);
    assert_eq!(admin.name, names::ADMIN_NAME);
}

#[tokio::test]
async fn test_email_matching_is_case_sensitive() {
    let platform = create_test_platform().await;

    platform
        .auth
        .register("Ana", "ana@example.com", "senha123")
        .await
        .unwrap();

    // Differently-cased addresses count as distinct accounts.
    platform
        .auth
        .register("Other Ana", "Ana@example.com", "senha123")
        .await
        .unwrap();

    let err = platform
        .auth
        .login("ANA@EXAMPLE.COM", "senha123")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidCredentials));
}

#[tokio::test]
async fn test_register_rejects_empty_fields() {
    let platform = create_test_platform().await;

    let err = platform
        .auth
        .register("", "ana@example.com", "senha123")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let err = platform
        .auth
        .register("Ana", "  ", "senha123")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let err = platform
        .auth
        .register("Ana", "ana@example.com", "")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    // A password of nothing but whitespace is no password either.
    let err = platform
        .auth
        .register("Ana", "ana@example.com", "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}
