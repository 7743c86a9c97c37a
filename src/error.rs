//! Error types for the CfD dashboard
//!
//! Covers every failure mode of the pipeline and its outer surfaces:
//! - Validation errors (negative capacity, unknown allocation round, bad constants)
//! - Render errors (chart or dashboard serialization, HTML template, CSV export)
//!
//! Missing strike prices are NOT errors: they travel through the pipeline as
//! `None` and are excluded from price-oriented aggregations.

use std::fmt;

/// Top-level error type for the CfD dashboard
///
/// Supports automatic conversion from specific error types via From trait
#[derive(Debug)]
pub enum CfdError {
    /// Malformed input record or economic constant
    Validation(ValidationError),

    /// Failed to produce chart, dashboard or CSV output
    Render(RenderError),
}

impl fmt::Display for CfdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CfdError::Validation(e) => write!(f, "Validation error: {}", e),
            CfdError::Render(e) => write!(f, "Render error: {}", e),
        }
    }
}

impl std::error::Error for CfdError {}

impl From<ValidationError> for CfdError {
    fn from(err: ValidationError) -> Self {
        CfdError::Validation(err)
    }
}

impl From<RenderError> for CfdError {
    fn from(err: RenderError) -> Self {
        CfdError::Render(err)
    }
}

/// Input validation errors
///
/// Any of these rejects the whole dataset: the pipeline never silently skips a
/// record, so the rendered charts always cover every row that was supplied.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Installed capacity below zero
    ///
    /// Example: `capacity_mw = -12.0` for "Seagreen Phase 1"
    NegativeCapacity { project: String, capacity_mw: f64 },

    /// Allocation round outside AR1..AR6
    ///
    /// Example: "AR7"
    UnknownRound(String),

    /// Currency outside GBP, USD, EUR
    UnknownCurrency(String),

    /// Price year outside 2012, 2025
    UnknownPriceYear(String),

    /// Capacity factor outside [0, 1]
    InvalidCapacityFactor(f64),

    /// CPI index not strictly positive (or not finite)
    ///
    /// A zero base index would make the inflation ratio undefined.
    InvalidCpi { label: String, index: f64 },

    /// Exchange rate not strictly positive (or not finite)
    InvalidFxRate { currency: String, rate: f64 },

    /// Exchange rate requested for a currency the constants do not carry
    MissingFxRate(String),

    /// Failed to parse a decimal field
    ///
    /// Example: "114,3x"
    InvalidDecimal(String),

    /// Required CSV column is missing
    MissingColumn(String),

    /// CSV format error (malformed row, wrong column count)
    CsvFormat(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NegativeCapacity {
                project,
                capacity_mw,
            } => {
                write!(
                    f,
                    "Negative capacity for '{}': {} MW (expected >= 0)",
                    project, capacity_mw
                )
            }
            ValidationError::UnknownRound(round) => {
                write!(
                    f,
                    "Unknown allocation round: '{}' (expected AR1, AR2, AR3, AR4, AR5 or AR6)",
                    round
                )
            }
            ValidationError::UnknownCurrency(currency) => {
                write!(
                    f,
                    "Unknown currency: '{}' (expected GBP, USD or EUR)",
                    currency
                )
            }
            ValidationError::UnknownPriceYear(year) => {
                write!(f, "Unknown price year: '{}' (expected 2012 or 2025)", year)
            }
            ValidationError::InvalidCapacityFactor(value) => {
                write!(
                    f,
                    "Invalid capacity factor: {} (expected a value between 0 and 1)",
                    value
                )
            }
            ValidationError::InvalidCpi { label, index } => {
                write!(f, "Invalid CPI index for {}: {} (expected > 0)", label, index)
            }
            ValidationError::InvalidFxRate { currency, rate } => {
                write!(
                    f,
                    "Invalid exchange rate for {}: {} (expected > 0)",
                    currency, rate
                )
            }
            ValidationError::MissingFxRate(currency) => {
                write!(f, "No exchange rate configured for {}", currency)
            }
            ValidationError::InvalidDecimal(val) => {
                write!(f, "Invalid decimal format: '{}'", val)
            }
            ValidationError::MissingColumn(col) => {
                write!(f, "Missing required column: '{}'", col)
            }
            ValidationError::CsvFormat(msg) => {
                write!(f, "CSV format error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Output rendering errors
#[derive(Debug, Clone)]
pub enum RenderError {
    /// serde_json failed to serialize a chart or dashboard document
    Json(String),

    /// Writing the enriched table as CSV failed
    CsvExport(String),

    /// askama failed to render the HTML page
    Template(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Json(msg) => write!(f, "JSON serialization failed: {}", msg),
            RenderError::CsvExport(msg) => write!(f, "CSV export failed: {}", msg),
            RenderError::Template(msg) => write!(f, "HTML template failed: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::Json(err.to_string())
    }
}

impl From<csv::Error> for RenderError {
    fn from(err: csv::Error) -> Self {
        RenderError::CsvExport(err.to_string())
    }
}

impl From<askama::Error> for RenderError {
    fn from(err: askama::Error) -> Self {
        RenderError::Template(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_conversion() {
        let err = ValidationError::UnknownRound("AR7".to_string());
        let cfd_err: CfdError = err.into();

        match cfd_err {
            CfdError::Validation(ValidationError::UnknownRound(val)) => {
                assert_eq!(val, "AR7");
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_render_error_conversion() {
        let err = RenderError::CsvExport("disk full".to_string());
        let cfd_err: CfdError = err.into();

        match cfd_err {
            CfdError::Render(RenderError::CsvExport(msg)) => assert_eq!(msg, "disk full"),
            _ => panic!("Expected Render error"),
        }
    }

    #[test]
    fn test_negative_capacity_formatting() {
        let err = ValidationError::NegativeCapacity {
            project: "Seagreen Phase 1".to_string(),
            capacity_mw: -12.0,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Seagreen Phase 1"));
        assert!(msg.contains("-12"));
    }

    #[test]
    fn test_error_display_formatting() {
        let err = ValidationError::MissingColumn("capacity_mw".to_string());
        let msg = format!("{}", CfdError::from(err));
        assert!(msg.starts_with("Validation error"));
        assert!(msg.contains("capacity_mw"));
    }

    #[test]
    fn test_template_error_conversion() {
        let err: RenderError = askama::Error::Fmt.into();
        assert!(matches!(err, RenderError::Template(_)));

        let msg = CfdError::from(err).to_string();
        assert!(msg.starts_with("Render error: HTML template failed"));
    }
}
