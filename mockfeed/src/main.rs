use clap::Parser;
use mockfeed::{Application, Config, config::VALIDATION_OK, telemetry};
use tokio::signal;

/// Resolves on the first of Ctrl+C or, on unix, SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                tracing::warn!("SIGTERM handler unavailable, listening for Ctrl+C only: {e}");
                wait_for_ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = wait_for_ctrl_c() => {}
            _ = sigterm.recv() => tracing::info!("SIGTERM received, stopping mockfeed"),
        }
    }

    #[cfg(not(unix))]
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    match signal::ctrl_c().await {
        Ok(()) => tracing::info!("Ctrl+C received, stopping mockfeed"),
        // Without a handler the only way out is SIGTERM or a kill
        Err(e) => {
            tracing::warn!("Ctrl+C handler unavailable: {e}");
            std::future::pending::<()>().await;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = mockfeed::config::Args::parse();

    // Invalid configuration aborts here, before anything is loaded
    let config = Config::load(&args)?;

    if args.validate {
        println!("{VALIDATION_OK}");
        return Ok(());
    }

    telemetry::init_telemetry(config.enable_otel_export)?;

    tracing::debug!("{:?}", args);

    Application::new(config).await?.serve(shutdown_signal()).await
}
