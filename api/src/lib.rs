pub mod password;
pub mod routes;
pub mod store;
pub mod telemetry;
pub mod time;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use jiff::tz::TimeZone;
use std::net::TcpListener;

use crate::store::Store;
use crate::time::TimeSource;

/// Build the server, but not await it.
///
/// Returns the port that the server has bound to by modifying the config.
pub async fn build(
    config: &mut Config,
    time_source: TimeSource,
    store: Store,
) -> std::io::Result<Server> {
    let store = web::Data::new(store);
    let time_source = web::Data::new(time_source);

    // OS assigns the port if binding to 0
    let listener = TcpListener::bind(format!("{}:{}", config.ip, config.port))?;
    config.port = listener.local_addr()?.port();
    let app_config = web::Data::new(config.clone());
    let server = HttpServer::new(move || {
        let allowed_origins = &app_config.allowed_origins;
        let cors = if allowed_origins.iter().any(|origin| origin == "*") {
            // Allow any origin (for development)
            Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
        } else {
            let mut cors = Cors::default().allow_any_method().allow_any_header();
            for origin in allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            cors
        };

        App::new()
            .wrap(cors)
            .service(routes::api_services())
            .app_data(store.clone())
            .app_data(time_source.clone())
            .app_data(app_config.clone())
            .app_data(routes::json_config())
            .app_data(routes::query_config())
    })
    .listen(listener)?
    .run();
    Ok(server)
}

#[derive(Debug, Clone)]
pub struct Config {
    /// set to "0.0.0.0" for public access, "127.0.0.1" for local dev
    pub ip: String,
    /// set to 0 to get an os-assigned port
    pub port: u16,
    /// List of allowed CORS origins. Use "*" to allow any origin (development only)
    pub allowed_origins: Vec<String>,
    /// Zone deciding what "today" and "this week" mean for the moms-week
    /// endpoints.
    pub timezone: TimeZone,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        use std::env::var;

        let allowed_origins = var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string()) // Default to allow any origin for development
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let timezone = match var("TIMEZONE") {
            Ok(name) => TimeZone::get(&name)
                .with_context(|| format!("Unknown TIMEZONE '{name}'"))?,
            Err(_) => TimeZone::UTC,
        };

        Ok(Config {
            ip: var("IP_ADDRESS").context("IP_ADDRESS must be set")?,
            port: var("PORT")
                .context("PORT must be set")?
                .parse()
                .context("PORT must be a port number")?,
            allowed_origins,
            timezone,
        })
    }
}
