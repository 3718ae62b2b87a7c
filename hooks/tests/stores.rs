use std::sync::Arc;

use hooks::list::{Books, CalendarEvents};
use hooks::{
    AuthStore, BookStore, CalendarStore, Config, DiaryStore, HookError,
    MomsWeekStore, build_client, resource,
};
use jiff::civil::{date, time};
use payloads::requests::{BookFiltersPatch, DiaryFilters, PageRequest, Patch};
use payloads::{APIClient, CalendarEvent, SessionContext};

use test_helpers::{alice_login_credentials, diary_entry, spawn_app};

#[tokio::test]
async fn configured_client_reaches_the_backend() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let client = build_client(&Config::new(app.address()))?;
    client.health_check().await?;
    Ok(())
}

#[tokio::test]
async fn diary_save_twice_keeps_one_entry() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let alice = app.create_alice_user().await?;
    let store = DiaryStore::new(Arc::new(app.client.clone()));
    let fecha = date(2024, 6, 10);

    store.show_month(2024, 6).await?;
    store.save_entry(diary_entry(fecha, "Primera", "Feliz")).await?;
    let saved = store
        .save_entry(diary_entry(fecha, "Segunda", "Tranquila"))
        .await?;
    assert_eq!(saved.contenido, "Segunda");

    let page = app
        .client
        .list_entries(&alice, &DiaryFilters::month_of(fecha), &PageRequest::default())
        .await?;
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, saved.id);

    let shown = store.entry_for(fecha).expect("entry loaded after save");
    assert_eq!(shown.contenido, "Segunda");
    assert_eq!(shown.emocion.as_deref(), Some("Tranquila"));
    Ok(())
}

#[tokio::test]
async fn calendar_month_view_lists_events_by_day() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_alice_user().await?;
    let store = CalendarStore::new(CalendarEvents(Arc::new(app.client.clone())));

    let mut morning = CalendarEvent::new("Pediatra", date(2024, 6, 10), "cita_medica");
    morning.hora_inicio = Some(time(9, 0, 0, 0));
    let mut afternoon = CalendarEvent::new("Vacuna", date(2024, 6, 10), "cita_medica");
    afternoon.hora_inicio = Some(time(16, 30, 0, 0));
    let other_month = CalendarEvent::new("Cumpleaños", date(2024, 7, 2), "celebracion");
    for event in [&afternoon, &morning, &other_month] {
        store.create(event).await?;
    }

    store.show_month(2024, 6).await?;
    let state = store.state();
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.filters.fecha_inicio, Some(date(2024, 6, 1)));
    assert_eq!(state.filters.fecha_fin, Some(date(2024, 6, 30)));

    let titles: Vec<_> = store
        .events_on(date(2024, 6, 10))
        .into_iter()
        .map(|event| event.event.titulo)
        .collect();
    assert_eq!(titles, vec!["Pediatra", "Vacuna"]);
    assert!(store.events_on(date(2024, 6, 11)).is_empty());

    store.clear_date_range().await?;
    let state = store.state();
    assert_eq!(state.filters.fecha_inicio, None);
    assert_eq!(state.filters.fecha_fin, None);
    assert_eq!(state.items.len(), 3);
    Ok(())
}

#[tokio::test]
async fn book_filters_narrow_the_list() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_admin_user().await?;
    app.create_test_book("Cuentos para dormir", "infantil").await?;
    app.create_test_book("Crianza respetuosa", "crianza").await?;
    app.create_test_book("Juegos y cuentos", "infantil").await?;

    let store = BookStore::new(Books(Arc::new(app.new_client())));
    store.load().await?;
    assert_eq!(store.state().pagination.total, 3);

    store
        .set_filters(BookFiltersPatch {
            categoria: Patch::Set("infantil".into()),
            ..Default::default()
        })
        .await?;
    assert_eq!(store.state().pagination.total, 2);

    store
        .set_filters(BookFiltersPatch {
            search: Patch::Set("juegos".into()),
            ..Default::default()
        })
        .await?;
    let state = store.state();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].book.titulo, "Juegos y cuentos");

    store
        .set_filters(BookFiltersPatch {
            search: Patch::Set("cuentos".into()),
            categoria: Patch::Clear,
        })
        .await?;
    let state = store.state();
    assert_eq!(state.filters.categoria, None);
    assert_eq!(state.pagination.total, 2);

    store.reset_filters().await?;
    assert_eq!(store.state().items.len(), 3);
    Ok(())
}

#[tokio::test]
async fn anonymous_book_writes_are_reported() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let store = BookStore::new(Books(Arc::new(app.new_client())));

    let result = store
        .create(&test_helpers::book_details("Sin permiso", "crianza"))
        .await;
    assert!(matches!(result, Err(HookError::Client(_))));
    assert!(store.state().error.is_some());
    Ok(())
}

#[tokio::test]
async fn moms_week_follows_the_backend_clock() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_alice_user().await?;
    let store = MomsWeekStore::new(Arc::new(app.client.clone()));

    store.show_current_week().await?;
    let week = store.state().week.expect("week loaded");
    assert_eq!(week.semana_inicio, date(2024, 12, 30));
    assert_eq!(week.semana_fin, date(2025, 1, 5));

    store.step(1).await?;
    let week = store.state().week.expect("week loaded");
    assert_eq!(week.semana_inicio, date(2025, 1, 6));
    Ok(())
}

#[tokio::test]
async fn restore_signs_out_a_revoked_session() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_alice_user().await?;

    // Another device logs out with the same token.
    let session = app.client.session.current().expect("signed in");
    let other = APIClient::new(app.address(), SessionContext::in_memory());
    other.session.set(&session)?;
    other.logout().await?;

    let auth = AuthStore::new(Arc::new(app.client.clone()));
    assert!(auth.user().is_some());
    assert_eq!(auth.restore().await?, None);
    assert!(!auth.is_authenticated());
    assert!(auth.user().is_none());

    let user = auth.login(&alice_login_credentials()).await?;
    assert_eq!(auth.restore().await?, Some(user));
    assert!(auth.is_authenticated());

    auth.logout().await?;
    assert!(!app.client.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn expired_session_from_another_store_signs_out() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_alice_user().await?;
    let auth = AuthStore::new(Arc::new(app.client.clone()));
    let diary = DiaryStore::new(Arc::new(app.client.clone()));
    assert!(auth.user().is_some());

    let session = app.client.session.current().expect("signed in");
    let other = APIClient::new(app.address(), SessionContext::in_memory());
    other.session.set(&session)?;
    other.logout().await?;

    let error = diary
        .show_month(2024, 6)
        .await
        .expect_err("token was revoked");
    assert!(error.is_session_expired());
    assert!(auth.note_error(&error));
    assert!(auth.user().is_none());
    assert!(!auth.is_authenticated());

    let unrelated = HookError::NotAuthenticated;
    assert!(!auth.note_error(&unrelated));
    Ok(())
}

#[tokio::test]
async fn failed_login_is_recorded() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let auth = AuthStore::new(Arc::new(app.new_client()));
    assert!(auth.login(&alice_login_credentials()).await.is_err());
    let state = auth.state();
    assert_eq!(state.error.as_deref(), Some("Invalid email or password"));
    assert!(!state.loading);
    assert!(state.user.is_none());
    Ok(())
}

#[tokio::test]
async fn admin_stats_resource_refetches() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_admin_user().await?;
    app.login_admin().await?;
    let stats = resource::admin_stats(Arc::new(app.client.clone()));

    stats.refetch().await?;
    assert_eq!(stats.data().map(|s| s.total_libros), Some(0));

    app.create_test_book("Cuentos", "infantil").await?;
    stats.refetch().await?;
    assert_eq!(stats.data().map(|s| s.total_libros), Some(1));
    assert_eq!(stats.data().map(|s| s.total_usuarios), Some(1));
    Ok(())
}
