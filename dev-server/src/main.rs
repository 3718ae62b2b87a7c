//! Development server for Conectando Corazones client development
//!
//! This binary creates a persistent API server seeded with a realistic
//! dataset: an administrator, a curated library and directory, the FAFORE
//! sections, and a mother with a week of diary entries. The mocked clock is
//! set to real time before seeding and then kept in sync with it.
//!
//! Usage: cargo run -p dev-server

use anyhow::Result;
use jiff::Timestamp;
use std::time::Duration;
use test_helpers::mock::DevDataset;
use tokio::time::interval;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize logging
    let subscriber = api::telemetry::get_subscriber(
        "info".into(),
        api::telemetry::LogFormat::from_env(),
    );
    api::telemetry::init_subscriber(subscriber)?;

    info!("🚀 Starting Conectando Corazones development server");

    let app = test_helpers::spawn_app().await;
    app.time_source.set(Timestamp::now());

    info!("✅ API server running on http://127.0.0.1:{}", app.port);

    info!("📊 Setting up development data...");
    let dataset = DevDataset::create(&app).await?;

    info!("🕐 Starting real-time synchronization...");
    start_time_sync_task(&app);

    info!("🎯 Development server ready!");
    info!("   API: http://127.0.0.1:{}/api", app.port);
    info!("   Clients: BACKEND_URL=http://127.0.0.1:{}", app.port);
    info!("");
    dataset.print_summary();
    info!("");
    info!("👋 Press Ctrl+C to shutdown");

    // Keep server running until Ctrl+C
    tokio::signal::ctrl_c().await?;
    info!("🛑 Shutting down development server");
    Ok(())
}

/// Keeps the mocked time source following real time so "today" and
/// "this week" move forward while the server runs.
fn start_time_sync_task(app: &test_helpers::TestApp) {
    let time_source = app.time_source.clone();

    tokio::spawn(async move {
        let mut interval = interval(Duration::from_secs(1));
        loop {
            interval.tick().await;
            let real_now = Timestamp::now();
            time_source.set(real_now);

            // Log occasionally to show sync is working (every 30 seconds)
            if real_now.as_second() % 30 == 0 {
                tracing::debug!("🕐 Synced mock time to real time: {}", real_now);
            }
        }
    });
}
