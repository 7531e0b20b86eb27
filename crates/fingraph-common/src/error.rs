//! Error types and utilities for FinGraph.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for FinGraph operations.
pub type Result<T> = std::result::Result<T, FinGraphError>;

/// Boxed error source carried by the wrapping variants.
type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for FinGraph operations.
#[derive(Error, Debug)]
pub enum FinGraphError {
    /// A date range whose start falls after its end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },

    /// Nothing to aggregate in the requested range.
    #[error("No data: {message}")]
    NoData {
        /// What was empty.
        message: String,
    },

    /// The budget data source failed to answer a query.
    #[error("Data source error: {message}")]
    DataSource {
        /// Context for the failed query.
        message: String,
        /// Underlying failure.
        #[source]
        source: Option<BoxedSource>,
    },

    /// Chart drawing or image encoding errors.
    #[error("Graph error: {message}")]
    Graph {
        /// What failed to render.
        message: String,
        /// Underlying failure.
        #[source]
        source: Option<BoxedSource>,
    },

    /// Writing an exported artifact failed.
    #[error("Export to {} failed: {message}", .path.display())]
    Export {
        /// Destination path.
        path: PathBuf,
        /// What failed.
        message: String,
        /// Underlying failure.
        #[source]
        source: Option<BoxedSource>,
    },

    /// Configuration related errors.
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong with the configuration.
        message: String,
        /// Underlying failure.
        #[source]
        source: Option<BoxedSource>,
    },

    /// Validation errors for user input or data.
    #[error("Validation error: {message}")]
    Validation {
        /// Validation failure.
        message: String,
        /// Offending field, if known.
        field: Option<String>,
    },

    /// I/O related errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV writing errors.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl FinGraphError {
    /// Create an invalid range error.
    pub const fn invalid_range(start: NaiveDate, end: NaiveDate) -> Self {
        Self::InvalidRange { start, end }
    }

    /// Create a no-data error.
    pub fn no_data(msg: impl Into<String>) -> Self {
        Self::NoData {
            message: msg.into(),
        }
    }

    /// Create a new data source error.
    pub fn data_source(msg: impl Into<String>) -> Self {
        Self::DataSource {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new data source error with source.
    pub fn data_source_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::DataSource {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new graph error.
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source.
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new export error with source.
    pub fn export_with_source(
        path: impl Into<PathBuf>,
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Export {
            path: path.into(),
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source.
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name.
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Whether this error is the empty-range signal rather than a real failure.
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }
}

/// Convert from serde_yaml::Error to FinGraphError.
impl From<serde_yaml::Error> for FinGraphError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::config_with_source("YAML parsing error", err)
    }
}

/// Convert from toml::de::Error to FinGraphError.
impl From<toml::de::Error> for FinGraphError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("TOML parsing error", err)
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to FinGraphError.
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for FinGraphError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Graph rendering failed", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_error_creation() {
        let range_error = FinGraphError::invalid_range(ymd(2024, 3, 1), ymd(2024, 1, 1));
        assert_eq!(
            range_error.to_string(),
            "Invalid date range: start 2024-03-01 is after end 2024-01-01"
        );

        let no_data = FinGraphError::no_data("no expenses");
        assert!(no_data.is_no_data());
        assert_eq!(no_data.to_string(), "No data: no expenses");

        let source_error = FinGraphError::data_source("query failed");
        assert!(!source_error.is_no_data());
        assert!(source_error.to_string().contains("Data source error"));

        let validation_error = FinGraphError::validation_field("must be positive", "dpi");
        assert!(validation_error.to_string().contains("Validation error"));
        assert!(validation_error.to_string().contains("must be positive"));
    }

    #[test]
    fn test_error_with_source() {
        let wrapped = FinGraphError::data_source_with_source(
            "total_income failed",
            io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"),
        );
        assert!(wrapped.source().is_some());

        let export = FinGraphError::export_with_source(
            "/tmp/out/chart.png",
            "write failed",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(
            export.to_string(),
            "Export to /tmp/out/chart.png failed: write failed"
        );
        assert!(export.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: FinGraphError = io_error.into();

        assert!(error.to_string().contains("I/O error"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_serde_error_conversion() {
        let serde_error = serde_json::from_str::<serde_json::Value>(r#"{"invalid": json}"#)
            .unwrap_err();
        let error: FinGraphError = serde_error.into();

        assert!(error.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<Vec<u32>>("not: [a, list").unwrap_err();
        let error: FinGraphError = yaml_error.into();

        assert!(matches!(error, FinGraphError::Config { .. }));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_error_chain_preservation() {
        let root = io::Error::new(io::ErrorKind::NotFound, "Root cause");
        let middle = FinGraphError::config_with_source("Middle layer", root);
        let top = FinGraphError::data_source_with_source("Top layer", middle);

        let mut current: &dyn std::error::Error = &top;
        let mut depth = 0;
        while let Some(source) = current.source() {
            current = source;
            depth += 1;
        }

        assert_eq!(depth, 2);
    }
}
