//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization and engine
//! construction to reduce duplication across command handlers.

use std::sync::Arc;

use tracing::info;

use minemap::catalog::HttpLayerCatalog;
use minemap::config::{ConfigFile, DEFAULT_LOG_FILE_NAME};
use minemap::geometry::HttpGeometryFetcher;
use minemap::http::AsyncReqwestClient;
use minemap::logging::{init_logging, LoggingGuard};
use minemap::reconcile::{LayerCallbacks, Reconciler};
use minemap::surface::MemorySurface;

use crate::error::CliError;

/// Reconciler wired to the REST API and an in-memory surface.
pub type Engine = Reconciler<HttpGeometryFetcher<AsyncReqwestClient>, MemorySurface>;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner with optional debug logging.
    ///
    /// Log events go to the configured log file. They are mirrored to
    /// stdout only when stdout is not a terminal, so interactive output
    /// stays readable.
    pub fn with_debug(debug_mode: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let log_path = &config.logging.file;
        let log_dir = log_path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| ".".into());
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| DEFAULT_LOG_FILE_NAME.to_string());

        let stdout_enabled = !atty::is(atty::Stream::Stdout);

        let logging_guard = init_logging(&log_dir, &log_file, stdout_enabled, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("minemap v{}", minemap::VERSION);
        info!(api = %self.config.api.base_url, "minemap CLI: {} command", command);
    }

    /// Build a multi-threaded tokio runtime for the async engine.
    pub fn runtime(&self) -> Result<tokio::runtime::Runtime, CliError> {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)
    }

    fn http_client(&self) -> Result<AsyncReqwestClient, CliError> {
        Ok(AsyncReqwestClient::with_timeout(self.config.api.timeout)?)
    }

    /// Create the paginated layer catalog client.
    pub fn catalog(&self) -> Result<HttpLayerCatalog<AsyncReqwestClient>, CliError> {
        Ok(HttpLayerCatalog::new(
            self.http_client()?,
            self.config.api.base_url.clone(),
        ))
    }

    /// Create the reconciler with the configured fetch policy.
    pub fn engine(&self, callbacks: LayerCallbacks) -> Result<Arc<Engine>, CliError> {
        let fetcher = HttpGeometryFetcher::new(self.http_client()?, self.config.api.base_url.clone());
        let engine = Reconciler::new(fetcher, MemorySurface::new())
            .with_config(self.config.reconciler_config())
            .with_callbacks(callbacks);
        info!(
            fetch_timeout_secs = self.config.reconciler.fetch_timeout,
            fetch_retries = self.config.reconciler.fetch_retries,
            "Reconciler created"
        );
        Ok(Arc::new(engine))
    }
}
