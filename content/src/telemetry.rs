//! Tracing setup shared by the content tools and tests.

use anyhow::Context;
use tracing::Subscriber;
use tracing::subscriber::set_global_default;
use tracing_log::LogTracer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

/// Log an error if it exists using the alternate selector, which emits the
/// error chain.
pub fn log_error(e: impl Into<anyhow::Error>) {
    let e: anyhow::Error = e.into();
    tracing::error!("{e:#}");
}

/// Build a subscriber writing compact lines to `sink`.
///
/// `RUST_LOG` takes precedence over `env_filter` when set.
pub fn get_subscriber<Sink>(
    env_filter: String,
    sink: Sink,
) -> impl Subscriber + Sync + Send
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(env_filter));
    let layer = fmt::Layer::new()
        .with_writer(sink)
        .with_target(false)
        .compact();
    Registry::default().with(env_filter).with(layer)
}

/// Register a subscriber as global default and route `log` records into it.
///
/// Fails if a global subscriber or logger is already installed.
pub fn init_subscriber(
    subscriber: impl Subscriber + Sync + Send,
) -> anyhow::Result<()> {
    LogTracer::init().context("Failed to set logger")?;
    set_global_default(subscriber).context("Failed to set subscriber")?;
    Ok(())
}
