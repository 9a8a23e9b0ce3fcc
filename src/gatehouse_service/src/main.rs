use color_eyre::eyre::Result;
use gatehouse_adapters::Settings;
use gatehouse_service::build_service;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let settings = Settings::load()?;
    let shutdown = CancellationToken::new();
    let service = build_service(&settings, shutdown.clone()).await?;

    let listener = TcpListener::bind(&settings.server.address).await?;
    let allowed_origins = Some(settings.server.allowed_origins.clone());

    tokio::select! {
        result = service.run_standalone(listener, allowed_origins) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
            shutdown.cancel();
        }
    }

    Ok(())
}

pub fn init_tracing() -> Result<()> {
    let fmt_layer = fmt::layer().compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}
