use tracing_subscriber::prelude::*;
use wordmole::WordmoleServerBuilder;

fn setup_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wordmole=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_file(false)
                .with_target(false),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging();

    let addr = std::env::var("WORDMOLE_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let server = WordmoleServerBuilder::new().bind(&addr).build().await?;
    tracing::info!(%addr, "wordmole server listening");

    server.run().await?;
    Ok(())
}
