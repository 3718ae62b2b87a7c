use payloads::{ClientError, Role, requests};
use reqwest::StatusCode;

use test_helpers::{
    alice_credentials, alice_login_credentials, assert_status_code, spawn_app,
};

#[tokio::test]
async fn login_refused() -> anyhow::Result<()> {
    let app = spawn_app().await;

    // test a login with an unknown user
    let body = requests::LoginCredentials {
        email: "nadie@example.com".into(),
        password: "random".into(),
    };
    let result = app.client.login(&body).await;

    match result {
        Err(ClientError::SessionExpired(message)) => {
            assert_eq!(message, "Invalid email or password");
        }
        other => panic!("Expected a 401, got {other:?}"),
    }
    assert!(!app.client.is_authenticated());

    Ok(())
}

#[tokio::test]
async fn wrong_password_refused() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_alice_user().await?;
    app.client.logout().await?;

    let mut body = alice_login_credentials();
    body.password = "not-her-password".into();
    assert_status_code(app.client.login(&body).await, StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn register_persists_session() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let session = app.client.register(&alice_credentials()).await?;
    assert_eq!(session.user.nombre, "Alicia");
    assert_eq!(session.user.rol, Role::User);

    // the stored session is the one the backend issued
    assert!(app.client.is_authenticated());
    assert_eq!(app.client.session.user_id(), Some(session.user.id));
    let me = app.client.current_user().await?;
    assert_eq!(me, session.user);

    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_alice_user().await?;

    let other = app.new_client();
    let mut body = alice_credentials();
    body.email = body.email.to_uppercase();
    assert_status_code(other.register(&body).await, StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn short_password_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let mut body = alice_credentials();
    body.password = "abc".into();
    assert_status_code(app.client.register(&body).await, StatusCode::BAD_REQUEST);

    body.password = "long enough".into();
    body.email = "not-an-email".into();
    assert_status_code(app.client.register(&body).await, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn logout_revokes_token() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_alice_user().await?;
    let session = app.client.session.current().unwrap();

    app.client.logout().await?;
    assert!(!app.client.is_authenticated());

    // a client still holding the old token is rejected
    let stale = app.new_client();
    stale.session.set(&session)?;
    assert_status_code(stale.current_user().await, StatusCode::UNAUTHORIZED);
    // and its session is dropped
    assert!(!stale.is_authenticated());

    Ok(())
}

#[tokio::test]
async fn anonymous_requests_are_unauthorized() -> anyhow::Result<()> {
    let app = spawn_app().await;

    assert_status_code(app.client.current_user().await, StatusCode::UNAUTHORIZED);

    Ok(())
}
