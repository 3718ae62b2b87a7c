//! Status classification against a stub server, for statuses and bodies the
//! real backend never produces.

use std::time::Duration;

use payloads::{
    APIClient, ClientError, Reply, Role, Session, SessionContext, UserId,
    api_client, responses,
};
use reqwest::StatusCode;
use test_helpers::{StubResponse, spawn_stub_server};

async fn stub_client(response: StubResponse) -> anyhow::Result<APIClient> {
    let address = spawn_stub_server(response).await?;
    Ok(APIClient::new(address, SessionContext::in_memory()))
}

#[tokio::test]
async fn server_message_is_used_when_present() -> anyhow::Result<()> {
    for status in [400, 401, 403, 404, 500] {
        let client = stub_client(StubResponse::new(
            status,
            r#"{"success": false, "message": "Mensaje del servidor"}"#,
        ))
        .await?;
        let error = client.current_user().await.unwrap_err();
        assert_eq!(error.status().map(|s| s.as_u16()), Some(status));
        assert_eq!(error.to_string(), "Mensaje del servidor");
    }

    Ok(())
}

#[tokio::test]
async fn fallback_message_without_body() -> anyhow::Result<()> {
    for status in [400, 401, 403, 404, 500] {
        let client = stub_client(StubResponse::new(status, "")).await?;
        let error = client.current_user().await.unwrap_err();
        let status = StatusCode::from_u16(status)?;
        assert_eq!(error.to_string(), api_client::fallback_message(status));
    }

    Ok(())
}

#[tokio::test]
async fn unmapped_status_keeps_its_code() -> anyhow::Result<()> {
    let client = stub_client(StubResponse::new(418, "short and stout")).await?;

    match client.current_user().await {
        Err(ClientError::APIError(code, message)) => {
            assert_eq!(code, StatusCode::IM_A_TEAPOT);
            assert_eq!(message, "short and stout");
        }
        other => panic!("Expected APIError, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn conflict_is_data() -> anyhow::Result<()> {
    let id = "7d9f0a52-8a8e-4c67-9d1e-2f1c4c7e9d10".to_string();
    let client = stub_client(StubResponse::new(
        409,
        format!(r#"{{"message": "Ya existe", "data": {{"id": "{id}"}}}}"#),
    ))
    .await?;

    let reply = client
        .create_entry(
            &UserId(id.parse()?),
            &payloads::DiaryEntry::new(jiff::civil::date(2024, 6, 10), "x"),
        )
        .await?;
    match reply {
        Reply::Conflict(conflict) => {
            assert_eq!(conflict.message, "Ya existe");
            assert_eq!(conflict.existing_id.map(|id| id.to_string()), Some(id));
        }
        Reply::Ok(entry) => panic!("Expected a conflict, got {entry:?}"),
    }

    // call sites without a reconciliation path see an error
    assert!(matches!(
        client.current_user().await,
        Err(ClientError::UnexpectedConflict(_))
    ));

    Ok(())
}

#[tokio::test]
async fn unauthorized_clears_the_session() -> anyhow::Result<()> {
    let session = Session {
        token: "expired-token".into(),
        user: responses::User {
            id: UserId(uuid::Uuid::new_v4()),
            nombre: "Alicia".into(),
            email: "alicia@example.com".into(),
            rol: Role::User,
        },
    };
    let client = stub_client(StubResponse::new(401, "")).await?;
    client.session.set(&session)?;
    assert!(client.is_authenticated());

    let result = client.current_user().await;
    assert!(matches!(result, Err(ClientError::SessionExpired(_))));
    assert!(!client.is_authenticated());

    Ok(())
}

#[tokio::test]
async fn undecodable_success_is_a_decode_error() -> anyhow::Result<()> {
    let client = stub_client(StubResponse::new(200, "<html>oops</html>")).await?;

    assert!(matches!(
        client.current_user().await,
        Err(ClientError::Decode(_))
    ));

    Ok(())
}

#[tokio::test]
async fn slow_server_times_out() -> anyhow::Result<()> {
    let address = spawn_stub_server(
        StubResponse::new(200, "{}").delayed(Duration::from_secs(2)),
    )
    .await?;
    let client = APIClient {
        inner_client: reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()?,
        ..APIClient::new(address, SessionContext::in_memory())
    };

    assert!(matches!(
        client.current_user().await,
        Err(ClientError::Timeout(_))
    ));

    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() -> anyhow::Result<()> {
    // bind then drop to get a port nobody is listening on
    let port = std::net::TcpListener::bind("127.0.0.1:0")?.local_addr()?.port();
    let client = APIClient::new(
        format!("http://127.0.0.1:{port}"),
        SessionContext::in_memory(),
    );

    assert!(matches!(
        client.current_user().await,
        Err(ClientError::Network(_))
    ));

    Ok(())
}
