//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use minemap::catalog::CatalogError;
use minemap::config::ConfigFileError;
use minemap::http::HttpError;
use minemap::layer::LayerId;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to build the async runtime
    Runtime(std::io::Error),
    /// Failed to create the HTTP client
    HttpClient(HttpError),
    /// Failed to list layers from the API
    Catalog(CatalogError),
    /// One or more visible layers could not be mounted
    LayersFailed(Vec<LayerId>),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Catalog(CatalogError::Http(_)) => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. The geoportal API is not running");
                eprintln!("  2. api.base_url points to the wrong host:");
                eprintln!("       minemap config get api.base_url");
                eprintln!("       minemap config set api.base_url http://<host>:5000/api/geospatial");
            }
            CliError::LayersFailed(_) => {
                eprintln!();
                eprintln!("Run with --debug and check the log file for per-layer details:");
                eprintln!("  minemap config get logging.file");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::HttpClient(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::Catalog(e) => write!(f, "Failed to list layers: {}", e),
            CliError::LayersFailed(ids) => {
                let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
                write!(
                    f,
                    "{} layer(s) failed to load: {}",
                    ids.len(),
                    ids.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Runtime(e) => Some(e),
            CliError::HttpClient(e) => Some(e),
            CliError::Catalog(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<CatalogError> for CliError {
    fn from(e: CatalogError) -> Self {
        CliError::Catalog(e)
    }
}

impl From<HttpError> for CliError {
    fn from(e: HttpError) -> Self {
        CliError::HttpClient(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_failed_display() {
        let err = CliError::LayersFailed(vec![LayerId::new(3), LayerId::new(7)]);
        assert_eq!(err.to_string(), "2 layer(s) failed to load: 3, 7");
    }

    #[test]
    fn test_catalog_error_conversion_keeps_source() {
        let err: CliError = CatalogError::Api("boom".to_string()).into();
        assert!(matches!(err, CliError::Catalog(_)));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "Failed to list layers: API error: boom");
    }
}
