use jiff::civil::date;
use payloads::requests::{EventFilters, PageRequest};
use payloads::{CalendarEvent, DEFAULT_EVENT_COLOR, Importance};
use reqwest::StatusCode;

use test_helpers::{assert_status_code, spawn_app};

#[tokio::test]
async fn create_then_list_event() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_alice_user().await?;

    let event = CalendarEvent::new("Cita", date(2024, 6, 10), "diferente");
    let created = app.client.create_event(&event).await?;
    assert_eq!(created.event.color, DEFAULT_EVENT_COLOR);
    assert_eq!(created.event.nivel_importancia, Importance::Media);

    let page = app
        .client
        .list_events(&EventFilters::default(), &PageRequest::default())
        .await?;
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].event.titulo, "Cita");
    assert_eq!(page.pagination.total, 1);

    Ok(())
}

#[tokio::test]
async fn events_filter_by_date_range_and_type() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_alice_user().await?;
    for (titulo, fecha, tipo) in [
        ("Vacuna", date(2024, 6, 3), "medica"),
        ("Taller", date(2024, 6, 15), "taller"),
        ("Pediatra", date(2024, 6, 28), "medica"),
        ("Paseo", date(2024, 7, 2), "diferente"),
    ] {
        app.client
            .create_event(&CalendarEvent::new(titulo, fecha, tipo))
            .await?;
    }

    let june = EventFilters {
        fecha_inicio: Some(date(2024, 6, 1)),
        fecha_fin: Some(date(2024, 6, 30)),
        tipo_evento: None,
    };
    let page = app.client.list_events(&june, &PageRequest::default()).await?;
    let titles: Vec<_> = page.items.iter().map(|e| e.event.titulo.as_str()).collect();
    assert_eq!(titles, vec!["Vacuna", "Taller", "Pediatra"]);

    let medical = EventFilters {
        tipo_evento: Some("medica".into()),
        ..june
    };
    let page = app.client.list_events(&medical, &PageRequest::default()).await?;
    assert_eq!(page.pagination.total, 2);

    Ok(())
}

#[tokio::test]
async fn update_and_delete_event() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_alice_user().await?;
    let created = app
        .client
        .create_event(&CalendarEvent::new("Cita", date(2024, 6, 10), "medica"))
        .await?;

    let mut details = created.event.clone();
    details.nivel_importancia = Importance::Alta;
    details.recordatorio_activo = true;
    details.hora_inicio = Some(jiff::civil::time(9, 30, 0, 0));
    let updated = app.client.update_event(&created.id, &details).await?;
    assert_eq!(updated.event, details);
    assert_eq!(app.client.get_event(&created.id).await?, updated);

    app.client.delete_event(&created.id).await?;
    assert_status_code(
        app.client.get_event(&created.id).await,
        StatusCode::NOT_FOUND,
    );

    Ok(())
}

#[tokio::test]
async fn events_are_private() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_alice_user().await?;
    let created = app
        .client
        .create_event(&CalendarEvent::new("Cita", date(2024, 6, 10), "medica"))
        .await?;

    let bob = app.new_client();
    bob.register(&test_helpers::bob_credentials()).await?;
    let page = bob
        .list_events(&EventFilters::default(), &PageRequest::default())
        .await?;
    assert!(page.items.is_empty());
    assert_status_code(bob.get_event(&created.id).await, StatusCode::NOT_FOUND);
    assert_status_code(bob.delete_event(&created.id).await, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn events_require_a_session() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let result = app
        .client
        .list_events(&EventFilters::default(), &PageRequest::default())
        .await;
    assert_status_code(result, StatusCode::UNAUTHORIZED);

    Ok(())
}
