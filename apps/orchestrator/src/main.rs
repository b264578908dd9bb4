// [apps/orchestrator/src/main.rs]
//! Binary entry point: loads `.env`, initializes tracing, builds the
//! orchestrator kernel from the process environment, and serves.

use aegis_orchestrator::prelude::*;
use dotenvy::dotenv;
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    aegis_shared_telemetry::init_tracing("aegis_orchestrator");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_stack_size(4 * 1024 * 1024)
        .build()?;

    runtime.block_on(async {
        info!(target: "main", "orchestrator ignition starting");

        let config = OrchestratorConfig::from_env();
        let kernel = match OrchestratorKernel::ignite(config) {
            Ok(kernel) => kernel,
            Err(e) => {
                error!(target: "main", error = %e, "ignition failed");
                std::process::exit(1);
            }
        };

        kernel.launch().await;
        Ok(())
    })
}
