use payloads::requests::{BookFilters, DirectoryFilters, PageRequest};
use reqwest::StatusCode;

use test_helpers::{
    admin_login_credentials, assert_status_code, book_details,
    directory_details, spawn_app,
};

#[tokio::test]
async fn books_are_public_and_filterable() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_admin_user().await?;
    app.create_test_book("Crianza con apego", "crianza").await?;
    app.create_test_book("Cuentos para dormir", "infantil").await?;
    app.create_test_book("Juegos en casa", "infantil").await?;

    // no session needed to browse
    let page = app
        .client
        .list_books(&BookFilters::default(), &PageRequest::default())
        .await?;
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.pagination.total, 3);
    // sorted by title
    assert_eq!(page.items[0].book.titulo, "Crianza con apego");

    let filters = BookFilters {
        categoria: Some("infantil".into()),
        search: Some("dormir".into()),
    };
    let page = app.client.list_books(&filters, &PageRequest::default()).await?;
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].book.titulo, "Cuentos para dormir");

    let categories = app.client.book_categories().await?;
    assert_eq!(categories, vec!["crianza", "infantil"]);

    let book = app.client.get_book(&page.items[0].id).await?;
    assert_eq!(book, page.items[0]);

    Ok(())
}

#[tokio::test]
async fn book_pages_report_totals() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_admin_user().await?;
    for i in 0..5 {
        app.create_test_book(&format!("Libro {i}"), "crianza").await?;
    }

    let page = app
        .client
        .list_books(&BookFilters::default(), &PageRequest::new(3, 2))
        .await?;
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.pagination.page, 3);
    assert_eq!(page.pagination.total, 5);
    assert_eq!(page.pagination.total_pages, 3);
    assert!(!page.pagination.has_next());

    Ok(())
}

#[tokio::test]
async fn pages_far_past_the_end_are_empty() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_admin_user().await?;
    app.create_test_book("Crianza con apego", "crianza").await?;
    app.create_test_book("Cuentos para dormir", "infantil").await?;

    for number in [u32::MAX, 42_949_674] {
        let page = app
            .client
            .list_books(&BookFilters::default(), &PageRequest::new(number, 100))
            .await?;
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total, 2);
    }

    // the server stays up
    app.client.health_check().await?;
    Ok(())
}

#[tokio::test]
async fn blank_filters_match_everything() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_admin_user().await?;
    app.create_test_book("Crianza con apego", "crianza").await?;
    app.create_test_book("Cuentos para dormir", "infantil").await?;

    let filters = BookFilters {
        search: Some(String::new()),
        categoria: Some("  ".into()),
    };
    let page = app.client.list_books(&filters, &PageRequest::default()).await?;
    assert_eq!(page.pagination.total, 2);
    Ok(())
}

#[tokio::test]
async fn only_admins_manage_books() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_admin_user().await?;
    app.create_alice_user().await?;

    let details = book_details("Crianza con apego", "crianza");
    assert_status_code(app.client.create_book(&details).await, StatusCode::FORBIDDEN);

    app.login_admin().await?;
    let book = app.client.create_book(&details).await?;

    let mut updated = details.clone();
    updated.titulo = "Crianza respetuosa".into();
    let book = app.client.update_book(&book.id, &updated).await?;
    assert_eq!(book.book.titulo, "Crianza respetuosa");

    app.client.delete_book(&book.id).await?;
    assert_status_code(app.client.get_book(&book.id).await, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn invalid_book_is_a_bad_request() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_admin_user().await?;
    app.client.login(&admin_login_credentials()).await?;

    let result = app.client.create_book(&book_details("  ", "crianza")).await;
    match result {
        Err(payloads::ClientError::InvalidRequest(message)) => {
            assert_eq!(message, "titulo is required");
        }
        other => panic!("Expected a 400, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn directory_crud() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_admin_user().await?;
    app.client.login(&admin_login_credentials()).await?;

    let centro = app
        .client
        .create_directory(&directory_details("Centro de Salud", "salud"))
        .await?;
    app.client
        .create_directory(&directory_details("Línea de Apoyo", "apoyo"))
        .await?;

    let filters = DirectoryFilters {
        categoria: Some("salud".into()),
        ..Default::default()
    };
    let page = app
        .client
        .list_directories(&filters, &PageRequest::default())
        .await?;
    assert_eq!(page.items, vec![centro.clone()]);
    assert_eq!(
        app.client.directory_categories().await?,
        vec!["apoyo", "salud"]
    );

    let mut details = centro.directory.clone();
    details.telefono = Some("555-0199".into());
    let updated = app.client.update_directory(&centro.id, &details).await?;
    assert_eq!(updated.directory.telefono.as_deref(), Some("555-0199"));

    app.client.delete_directory(&centro.id).await?;
    assert_status_code(
        app.client.get_directory(&centro.id).await,
        StatusCode::NOT_FOUND,
    );

    Ok(())
}
