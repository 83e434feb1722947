// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use anyhow::Context;
use gateway::client::RpcClient;
use gateway::config::GatewayConfig;
use gateway::routes::create_router;
use gateway::session::SessionManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting up the GraphQL gateway...");

    let config = GatewayConfig::from_env()?;
    let client = RpcClient::new(&config.backend_url, config.rpc_timeout)?;
    tracing::info!("Forwarding task calls to {}", config.backend_url);

    let state = gateway::app_state(client, SessionManager::new(config.cookie_secure));
    let app = create_router(state, &config.allowed_origins);

    tracing::info!("The gateway listens on http://{}", config.addr);
    tracing::info!("GraphiQL available at http://{}/playground", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Gateway error")?;

    tracing::info!("Gateway stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {:?}", e);
    }
}
