use api::{
    Config, build,
    store::Store,
    telemetry::{LogFormat, get_subscriber, init_subscriber},
    time::TimeSource,
};

/// Conectando Corazones API Server
///
/// Environment variables can be set directly or loaded from a .env file in the project root.
///
/// Required environment variables:
/// - IP_ADDRESS: Server bind address (127.0.0.1 for local, 0.0.0.0 for public)
/// - PORT: Server port
///
/// Optional environment variables:
/// - ALLOWED_ORIGINS: CORS origins ("*" for any origin in development, or comma-separated list for production)
/// - TIMEZONE: IANA zone used for "today" and "this week" (defaults to UTC)
/// - LOG_FORMAT: "pretty" (default) or "compact"
/// - RUST_LOG: tracing filter, overrides the default "info"
///
/// Example .env file:
/// IP_ADDRESS=127.0.0.1
/// PORT=8000
/// ALLOWED_ORIGINS=*
/// TIMEZONE=America/Mexico_City
///
/// The repository is in-memory; use the dev-server crate for a seeded
/// instance.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if available
    // This will silently ignore if the file doesn't exist
    let _ = dotenvy::dotenv();

    let subscriber = get_subscriber("info".into(), LogFormat::from_env());
    init_subscriber(subscriber)?;

    let mut config = Config::from_env()?;

    #[cfg(not(feature = "mock-time"))]
    let time_source = TimeSource::new();
    #[cfg(feature = "mock-time")]
    let time_source = TimeSource::new(jiff::Timestamp::now());

    let server = build(&mut config, time_source, Store::default()).await?;
    tracing::info!("listening on {}:{}", config.ip, config.port);
    server.await?;
    Ok(())
}
