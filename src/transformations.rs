//! Scalar transformations used by the metrics pipeline
//!
//! Every function here is pure and order-independent. Nothing is rounded:
//! rounding happens only when a chart or table is formatted.
//!
//! # Transformations
//!
//! 1. **Annual production**: `448 MW × 0.422 × 8760` → `1_656_130.56 MWh`
//! 2. **Unit scaling**: `MWh` → `TWh`, currency → millions
//! 3. **CPI normalization**: `£114.39 (2012)` → `£162.21 (May 2025)` and back
//! 4. **Currency conversion**: GBP × fixed rate
//! 5. **Field parsing**: decimals and "absent" tokens (`""`, `"N.A."`)
//!
//! # Example
//!
//! ```rust
//! use uk_cfd_dashboard::transformations::*;
//!
//! let mwh = annual_production_mwh(448.0, 0.422);
//! assert!((mwh_to_twh(mwh) - 1.656).abs() < 1e-3);
//!
//! assert_eq!(parse_optional_decimal("N.A.").unwrap(), None);
//! assert_eq!(parse_optional_decimal("57.50").unwrap(), Some(57.5));
//! ```

use crate::error::ValidationError;
use crate::types::{EconomicConstants, HOURS_PER_YEAR};

const MWH_PER_TWH: f64 = 1_000_000.0;
const ONE_MILLION: f64 = 1_000_000.0;

// ============================================================================
// Transformation 1: Annual Production
// ============================================================================

/// Estimated annual production in MWh
///
/// # Examples
///
/// ```
/// # use uk_cfd_dashboard::transformations::annual_production_mwh;
/// let mwh = annual_production_mwh(448.0, 0.422);
/// assert!((mwh - 1_656_130.56).abs() < 1e-6);
/// assert_eq!(annual_production_mwh(0.0, 0.422), 0.0);
/// ```
pub fn annual_production_mwh(capacity_mw: f64, capacity_factor: f64) -> f64 {
    capacity_mw * capacity_factor * HOURS_PER_YEAR
}

// ============================================================================
// Transformation 2: Unit Scaling
// ============================================================================

/// Convert MWh to TWh
pub fn mwh_to_twh(mwh: f64) -> f64 {
    mwh / MWH_PER_TWH
}

/// Scale a monetary amount to millions
///
/// # Examples
///
/// ```
/// # use uk_cfd_dashboard::transformations::to_millions;
/// assert_eq!(to_millions(268_500_000.0), 268.5);
/// ```
pub fn to_millions(value: f64) -> f64 {
    value / ONE_MILLION
}

// ============================================================================
// Transformation 3: CPI Normalization
// ============================================================================

/// Move a 2012-price value to the target CPI month
///
/// # Examples
///
/// ```
/// # use std::collections::BTreeMap;
/// # use chrono::NaiveDate;
/// # use uk_cfd_dashboard::types::{CpiReading, EconomicConstants};
/// # use uk_cfd_dashboard::transformations::inflate_to_target;
/// let constants = EconomicConstants {
///     cpi_base: CpiReading { month: NaiveDate::from_ymd_opt(2012, 12, 1).unwrap(), index: 97.6 },
///     cpi_target: CpiReading { month: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(), index: 138.4 },
///     capacity_factor: 0.422,
///     fx_rates: BTreeMap::new(),
/// };
/// assert!((inflate_to_target(114.39, &constants) - 162.21).abs() < 0.01);
/// ```
pub fn inflate_to_target(price_2012: f64, constants: &EconomicConstants) -> f64 {
    price_2012 * constants.cpi_ratio()
}

/// Inverse of [`inflate_to_target`]
pub fn deflate_to_base(price_target: f64, constants: &EconomicConstants) -> f64 {
    price_target / constants.cpi_ratio()
}

// ============================================================================
// Transformation 4: Currency Conversion
// ============================================================================

/// Convert a GBP amount with a GBP-relative rate (1 GBP = `rate` units)
pub fn convert_currency(amount_gbp: f64, rate: f64) -> f64 {
    amount_gbp * rate
}

// ============================================================================
// Transformation 5: Field Parsing
// ============================================================================

/// Parse a decimal field
///
/// # Examples
///
/// ```
/// # use uk_cfd_dashboard::transformations::parse_decimal;
/// assert_eq!(parse_decimal("177.41").unwrap(), 177.41);
/// assert_eq!(parse_decimal(" 448 ").unwrap(), 448.0);
/// assert!(parse_decimal("").is_err());
/// assert!(parse_decimal("abc").is_err());
/// assert!(parse_decimal("NaN").is_err());
/// ```
pub fn parse_decimal(value: &str) -> Result<f64, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidDecimal(value.to_string()));
    }

    let parsed = trimmed
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidDecimal(value.to_string()))?;

    if !parsed.is_finite() {
        return Err(ValidationError::InvalidDecimal(value.to_string()));
    }

    Ok(parsed)
}

/// True for the tokens that mean "no value"
fn is_absent_token(value: &str) -> bool {
    let upper = value.trim().to_uppercase();
    upper.is_empty() || upper == "N.A." || upper == "N.A" || upper == "NA" || upper == "NONE"
}

/// Parse an optional decimal field
///
/// Empty cells and "N.A."/"None" map to `None`, never to `0.0`.
///
/// # Examples
///
/// ```
/// # use uk_cfd_dashboard::transformations::parse_optional_decimal;
/// assert_eq!(parse_optional_decimal("").unwrap(), None);
/// assert_eq!(parse_optional_decimal("None").unwrap(), None);
/// assert_eq!(parse_optional_decimal("0").unwrap(), Some(0.0));
/// assert!(parse_optional_decimal("1x").is_err());
/// ```
pub fn parse_optional_decimal(value: &str) -> Result<Option<f64>, ValidationError> {
    if is_absent_token(value) {
        return Ok(None);
    }
    parse_decimal(value).map(Some)
}

/// Parse an optional text field, trimming whitespace
pub fn parse_optional_text(value: &str) -> Option<String> {
    if is_absent_token(value) {
        None
    } else {
        Some(value.trim().to_string())
    }
}

/// Parse an optional count (turbine numbers)
pub fn parse_optional_count(value: &str) -> Result<Option<u32>, ValidationError> {
    if is_absent_token(value) {
        return Ok(None);
    }
    value
        .trim()
        .parse::<u32>()
        .map(Some)
        .map_err(|_| ValidationError::InvalidDecimal(value.to_string()))
}

/// Arithmetic mean, `None` for an empty input
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
