mod admin;
mod auth;
mod calendar;
mod client;
mod diary;
mod library;
mod moms_week;

use test_helpers::spawn_app;

#[tokio::test]
async fn health_check() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.client.health_check().await?;

    Ok(())
}
