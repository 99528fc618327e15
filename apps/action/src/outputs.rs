//! Reporting back to the GitHub Actions runner.
//!
//! Outputs are appended as `name=value` lines to the file named by
//! `GITHUB_OUTPUT`. Failures are surfaced as an `::error::` workflow command.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

const OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// Sink for step outputs.
#[derive(Debug, Clone)]
pub struct Outputs {
    path: Option<PathBuf>,
}

impl Outputs {
    /// Uses `GITHUB_OUTPUT` when set. Outside a runner, outputs are only
    /// logged.
    pub fn from_env() -> Self {
        Self {
            path: std::env::var_os(OUTPUT_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }

    #[cfg(test)]
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn set(&self, name: &str, value: &str) -> std::io::Result<()> {
        tracing::info!(%name, %value, "step output");

        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{name}={value}")
    }
}

/// Formats a workflow error annotation.
///
/// `%`, CR and LF are escaped so multi-line errors stay a single command.
pub fn error_command(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{escaped}")
}
