use actix_web::rt::task::JoinHandle;
use anyhow::Context;
use tracing::Subscriber;
use tracing::subscriber::set_global_default;
use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt};

/// How events are rendered on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human oriented output for local development.
    #[default]
    Pretty,
    /// One line per event.
    Compact,
}

impl LogFormat {
    /// Read `LOG_FORMAT` ("pretty" or "compact"), defaulting to pretty.
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT").as_deref() {
            Ok("compact") => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

/// Build a subscriber filtered by `RUST_LOG`, falling back to `env_filter`.
pub fn get_subscriber(
    env_filter: String,
    format: LogFormat,
) -> impl Subscriber + Sync + Send {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(env_filter));
    let stderr = match format {
        LogFormat::Pretty => fmt::Layer::new()
            .with_writer(std::io::stderr)
            .pretty()
            .with_span_events(fmt::format::FmtSpan::CLOSE)
            .boxed(),
        LogFormat::Compact => fmt::Layer::new()
            .with_writer(std::io::stderr)
            .compact()
            .boxed(),
    };
    Registry::default().with(env_filter).with(stderr)
}

/// Register a subscriber as global default to process span data, and route
/// `log` records into it.
///
/// It should only be called once!
pub fn init_subscriber(
    subscriber: impl Subscriber + Sync + Send,
) -> anyhow::Result<()> {
    LogTracer::init().context("Failed to set logger")?;
    set_global_default(subscriber).context("Failed to set subscriber")?;
    Ok(())
}

pub fn spawn_blocking_with_tracing<F, R>(f: F) -> JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let current_span = tracing::Span::current();
    actix_web::rt::task::spawn_blocking(move || current_span.in_scope(f))
}
