use reqwest::StatusCode;

use test_helpers::mock::DevDataset;
use test_helpers::{assert_status_code, spawn_app};

#[tokio::test]
async fn stats_count_every_resource() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let dataset = DevDataset::create(&app).await?;

    app.login_admin().await?;
    let stats = app.client.admin_stats().await?;
    assert_eq!(stats.total_usuarios, 2);
    assert_eq!(stats.total_libros, dataset.books.len() as u64);
    assert_eq!(stats.total_directorios, dataset.directories.len() as u64);
    assert_eq!(stats.total_eventos, dataset.events.len() as u64);
    assert_eq!(stats.total_entradas_diario, dataset.entries.len() as u64);
    assert_eq!(stats.total_resumenes_semanales, 1);

    Ok(())
}

#[tokio::test]
async fn stats_are_admin_only() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.create_alice_user().await?;

    assert_status_code(app.client.admin_stats().await, StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn fafore_sections_are_ordered() -> anyhow::Result<()> {
    let app = spawn_app().await;
    DevDataset::create(&app).await?;

    let anonymous = app.new_client();
    let sections = anonymous.fafore_sections().await?;
    let orden: Vec<_> = sections.iter().map(|s| s.orden).collect();
    assert_eq!(orden, vec![1, 2, 3]);
    assert_eq!(sections[0].titulo, "¿Qué es FAFORE?");

    Ok(())
}
