//! mgmtgw server - gNMI/gNOI management gateway.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mgmtgw_server::{create_transport, Args};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mgmtgw_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        gnmi_version = mgmtgw_proto::GNMI_VERSION,
        "starting mgmtgw server"
    );

    // Parse command-line arguments
    let args = Args::parse();
    let config = args.into_config();

    tracing::info!(
        listen_address = %config.listen_address,
        tls = config.has_tls(),
        client_auth = %config.auth,
        password_strategy = ?config.password_strategy,
        "configuration loaded"
    );
    if !config.has_tls() && config.auth.is_enabled(mgmtgw_server::AuthScheme::ClientCert) {
        tracing::warn!("serving plaintext; client certificate authentication cannot apply");
    }

    // Create transport
    let transport = create_transport(&config)?;

    // Set up graceful shutdown
    let (shutdown_tx, shutdown_rx) = tokio::sync::broadcast::channel(1);

    // Spawn shutdown signal handler
    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl+c");
            return;
        }
        tracing::info!("received shutdown signal");
        let _ = shutdown_tx_clone.send(());
    });

    // Run the transport
    match transport.run_until_shutdown(shutdown_rx).await {
        Ok(()) => {
            tracing::info!("server shutdown complete");
        }
        Err(e) => {
            tracing::error!(error = %e, "server error");
            return Err(e.into());
        }
    }

    Ok(())
}
