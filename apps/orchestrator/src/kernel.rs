// [apps/orchestrator/src/kernel.rs]
//! Composition root: builds the orchestrator core, starts its background
//! services, and serves the HTTP surface over it.

use std::net::{IpAddr, SocketAddr};

use tracing::{error, info};

use crate::bootstrap::discover_models;
use crate::config::OrchestratorConfig;
use crate::orchestrator::Orchestrator;
use crate::routes::create_router;
use crate::state::AppState;

pub struct OrchestratorKernel {
    pub config: OrchestratorConfig,
    pub state: AppState,
}

impl OrchestratorKernel {
    /// Discovers models and wires every C1-C8 collaborator into the
    /// orchestrator core, but does not yet start background tasks or bind
    /// a socket (§4.8 "On startup").
    pub fn ignite(config: OrchestratorConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let models = discover_models(&config);
        let orchestrator = Orchestrator::new(config.clone(), models)?;
        Ok(Self { config, state: AppState::new(orchestrator) })
    }

    /// Starts the degradation/power/queue/cache daemons, binds the HTTP
    /// listener, and serves until the process is signalled to stop.
    pub async fn launch(self) {
        self.state.orchestrator.start();

        let router = create_router(self.state.clone());
        let bind_address = SocketAddr::new(IpAddr::from([0, 0, 0, 0]), self.config.bind_port);

        info!(target: "kernel", %bind_address, "orchestrator listening");

        let listener = match tokio::net::TcpListener::bind(bind_address).await {
            Ok(listener) => listener,
            Err(e) => {
                error!(target: "kernel", error = %e, "failed to bind network port");
                std::process::exit(1);
            }
        };

        let shutdown_state = self.state.clone();
        let serve = axum::serve(listener, router).with_graceful_shutdown(async move {
            wait_for_shutdown_signal().await;
            info!(target: "kernel", "shutdown signal received, draining");
            shutdown_state.orchestrator.shutdown(std::time::Duration::from_secs(15)).await;
        });

        if let Err(e) = serve.await {
            error!(target: "kernel", error = %e, "server loop exited with an error");
        }
    }
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
