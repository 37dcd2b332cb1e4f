//! End-to-end invoicing workflow tests library.
//!
//! Provides test infrastructure for driving the `invoicing` command surface
//! against a file-backed store in a throwaway directory. Each test gets its
//! own data and output directories, so tests can run in parallel.
//!
//! ## Usage
//!
//! ```bash
//! cargo test -p workflow-tests
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use invoicing::cli::Cli;
use invoicing::config::InvoicingConfig;
use invoicing::services::FileStore;
use invoicing::startup::Application;
use service_core::config::Config;
use service_core::error::AppError;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,invoicing=debug,workflow_tests=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Context for workflow tests: an application over a temporary data
/// directory plus the directory it writes documents and backups to.
pub struct WorkflowTestContext {
    root: TempDir,
    pub config: InvoicingConfig,
    pub app: Application<FileStore>,
}

impl WorkflowTestContext {
    /// Create a fresh, empty application.
    pub fn new() -> Result<Self> {
        init_tracing();

        let root = TempDir::new().context("Failed to create test directory")?;
        let config = InvoicingConfig {
            common: Config::default(),
            data_dir: root.path().join("data"),
            output_dir: root.path().join("out"),
        };
        let app = Application::build(&config).context("Failed to build application")?;

        Ok(Self { root, config, app })
    }

    /// Run one command line (without the program name) and return its output.
    pub fn run(&mut self, args: &[&str]) -> Result<String, AppError> {
        let cli = Cli::try_parse_from(std::iter::once("invoicing").chain(args.iter().copied()))
            .map_err(|e| AppError::BadRequest(anyhow::Error::new(e)))?;

        tracing::debug!(?args, "Running command");
        let mut out = Vec::new();
        self.app.run(cli.command, &mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Like [`run`](Self::run), but fails the test on error.
    pub fn run_ok(&mut self, args: &[&str]) -> String {
        match self.run(args) {
            Ok(output) => output,
            Err(e) => panic!("Command {:?} failed: {}", args, e),
        }
    }

    /// Rebuild the application from what is on disk.
    pub fn reopen(&mut self) -> Result<()> {
        self.app = Application::build(&self.config).context("Failed to reopen application")?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.config.output_dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_directories_live_under_root() {
        let ctx = WorkflowTestContext::new().unwrap();
        assert!(ctx.config.data_dir.starts_with(ctx.root()));
        assert!(ctx.output_path("x.pdf").starts_with(ctx.root()));
        assert!(ctx.config.data_dir.exists());
    }
}
