//! Notehub host firmware deploy action entry point.

mod app;
mod inputs;
mod outputs;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use notehub_deploy_api::Client;
use tracing_subscriber::EnvFilter;

use crate::inputs::Inputs;
use crate::outputs::Outputs;

fn main() -> anyhow::Result<ExitCode> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let inputs = Inputs::parse();
    let outputs = Outputs::from_env();

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(async {
        let client = Client::new().context("failed to build HTTP client")?;
        app::run(&client, inputs.into(), &outputs).await
    });

    match result {
        Ok(outcome) => {
            tracing::info!(
                filename = %outcome.uploaded_filename,
                dfu_triggered = outcome.dfu_triggered(),
                "firmware deployment completed successfully"
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "firmware deployment failed");
            println!("{}", app::failure_annotation(&err));
            Ok(ExitCode::FAILURE)
        }
    }
}
