//! env0 variable importer - Main Entry Point
//!
//! Reads `env0.auto.tfvars.json` (and `env0.env-vars.json` when present),
//! resolves env0 references through the API and writes the resolved values
//! to `env1.auto.tfvars.json`. Any fatal error exits non-zero without
//! writing the output file.

use importer_application::ImportVariables;
use importer_infrastructure::{Env0Client, FileVariablesStore, Settings};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    // RUST_LOG wins over TF_LOG
    let level = settings.log_filter();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "info,env0_importer={level},importer_application={level},importer_infrastructure={level}"
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting env0 variable import v{}", env!("CARGO_PKG_VERSION"));
    debug!(?settings, "loaded settings");

    if !settings.has_credentials() {
        warn!(
            "ENV0_API_KEY and ENV0_API_SECRET, or TF_TOKEN_backend_api_env0_com, are not set; \
             API calls will be unauthenticated"
        );
    }

    let api = Env0Client::new(&settings)?;
    let store = FileVariablesStore::new(&settings.working_dir);
    let mut import = ImportVariables::new(api, store, settings.environment_id.clone());

    match import.execute().await {
        Ok(report) => {
            info!(
                imported = report.outputs.len(),
                skipped = report.skipped.len(),
                output = %import.store().output_path().display(),
                "import complete"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "import failed");
            Err(e.into())
        }
    }
}
