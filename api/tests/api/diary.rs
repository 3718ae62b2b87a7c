use jiff::civil::date;
use payloads::requests::{DiaryFilters, PageRequest};
use payloads::{ClientError, Reply};
use reqwest::StatusCode;

use test_helpers::{assert_status_code, diary_entry, spawn_app};

#[tokio::test]
async fn create_entry_returns_new_record() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let alice = app.create_alice_user().await?;

    let entry = diary_entry(date(2024, 6, 10), "Hoy fue lindo", "Feliz");
    let created = app.client.create_entry(&alice, &entry).await?.into_result()?;
    assert_eq!(created.fecha, date(2024, 6, 10));
    assert_eq!(created.entry, entry);
    assert_eq!(created.user_id, alice);

    let found = app.client.entry_by_date(&alice, date(2024, 6, 10)).await?;
    assert_eq!(found, Some(created));
    assert_eq!(app.client.entry_by_date(&alice, date(2024, 6, 11)).await?, None);

    Ok(())
}

#[tokio::test]
async fn duplicate_date_is_a_conflict_not_an_error() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let alice = app.create_alice_user().await?;

    let first = app
        .client
        .create_entry(&alice, &diary_entry(date(2024, 6, 10), "uno", "Feliz"))
        .await?
        .into_result()?;
    let second = app
        .client
        .create_entry(&alice, &diary_entry(date(2024, 6, 10), "dos", "Feliz"))
        .await?;

    match second {
        Reply::Conflict(conflict) => {
            assert_eq!(conflict.existing_id, Some(first.id.0));
            assert!(conflict.message.contains("2024-06-10"));
        }
        Reply::Ok(entry) => panic!("Expected a conflict, got {entry:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn update_entry_replaces_content() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let alice = app.create_alice_user().await?;
    let created = app
        .client
        .create_entry(&alice, &diary_entry(date(2024, 6, 10), "uno", "Feliz"))
        .await?
        .into_result()?;

    let mut details = created.entry.clone();
    details.contenido = "Hoy fue lindo".into();
    details.tags = vec!["parque".into()];
    let updated = app.client.update_entry(&alice, &created.id, &details).await?;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.contenido, "Hoy fue lindo");
    assert_eq!(updated.created_at, created.created_at);

    Ok(())
}

#[tokio::test]
async fn list_entries_by_month() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let alice = app.create_alice_user().await?;
    for fecha in [date(2024, 5, 31), date(2024, 6, 1), date(2024, 6, 15)] {
        app.client
            .create_entry(&alice, &diary_entry(fecha, "día", "Tranquila"))
            .await?
            .into_result()?;
    }

    let page = app
        .client
        .list_entries(
            &alice,
            &DiaryFilters::month_of(date(2024, 6, 20)),
            &PageRequest::new(1, 31),
        )
        .await?;
    let dates: Vec<_> = page.items.iter().map(|entry| entry.fecha).collect();
    assert_eq!(dates, vec![date(2024, 6, 15), date(2024, 6, 1)]);

    let bad_month = DiaryFilters {
        month: Some(13),
        year: Some(2024),
    };
    assert_status_code(
        app.client
            .list_entries(&alice, &bad_month, &PageRequest::default())
            .await,
        StatusCode::BAD_REQUEST,
    );

    Ok(())
}

#[tokio::test]
async fn delete_entry_frees_the_date() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let alice = app.create_alice_user().await?;
    let entry = diary_entry(date(2024, 6, 10), "uno", "Feliz");
    let created = app.client.create_entry(&alice, &entry).await?.into_result()?;

    app.client.delete_entry(&alice, &created.id).await?;
    let again = app.client.create_entry(&alice, &entry).await?;
    assert!(!again.is_conflict());

    Ok(())
}

#[tokio::test]
async fn another_users_diary_is_forbidden() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let alice = app.create_alice_user().await?;
    app.client
        .create_entry(&alice, &diary_entry(date(2024, 6, 10), "uno", "Feliz"))
        .await?
        .into_result()?;

    let bob = app.new_client();
    bob.register(&test_helpers::bob_credentials()).await?;
    let result = bob
        .list_entries(&alice, &DiaryFilters::default(), &PageRequest::default())
        .await;
    match result {
        Err(ClientError::Forbidden(message)) => {
            assert_eq!(message, "You can only access your own records");
        }
        other => panic!("Expected a 403, got {other:?}"),
    }
    // a 403 leaves the session alone
    assert!(bob.is_authenticated());

    Ok(())
}
