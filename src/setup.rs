use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub fn setup() -> color_eyre::Result<()> {
    // Panic and error report handler
    color_eyre::install()?;

    // Load .env before the filter reads RUST_LOG
    dotenv::dotenv().ok(); // Error if file does not exist: ignore

    // Logging, `log` records from the libraries are forwarded as well
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}
