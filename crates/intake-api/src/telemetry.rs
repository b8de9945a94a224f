use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_telemetry() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intake=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().compact())
        .try_init()?;

    Ok(())
}
