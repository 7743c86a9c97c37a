//! CSV reading and writing for the CfD dataset
//!
//! # Input format
//!
//! - **Delimiter:** Comma (`,`), fields with commas are double-quoted
//! - **Header Row:** Always present
//! - **Missing values:** empty cell or `N.A.`
//!
//! | column | required | content |
//! |---|---|---|
//! | `allocation_round` | yes | AR1..AR6 |
//! | `project_name` | yes | free text |
//! | `strike_price_2012_gbp` | yes | £/MWh in 2012 prices, may be empty |
//! | `capacity_mw` | yes | MW, >= 0 |
//! | `delivery_year` | no | e.g. `2018/19` |
//! | `number_of_turbines` | no | integer |
//!
//! # Example
//!
//! ```rust
//! use uk_cfd_dashboard::csv_parser::parse_projects_csv;
//!
//! let csv = "allocation_round,project_name,strike_price_2012_gbp,capacity_mw
//! AR1,Neart Na Gaoithe,114.39,448
//! AR5,No offshore wind bids submitted,,0";
//!
//! let projects = parse_projects_csv(csv).unwrap();
//! assert_eq!(projects.len(), 2);
//! assert_eq!(projects[1].strike_price_2012_gbp, None);
//! ```

use std::collections::BTreeSet;
use std::io::Write;

use csv::{ReaderBuilder, WriterBuilder};

use crate::csv_utils::{get_field, get_optional_field, require_columns};
use crate::error::{RenderError, ValidationError};
use crate::pipeline::validate_record;
use crate::transformations::{
    parse_decimal, parse_optional_count, parse_optional_decimal, parse_optional_text,
};
use crate::types::{Currency, EnrichedRecord, ProjectRecord};

const REQUIRED_COLUMNS: [&str; 4] = [
    "allocation_round",
    "project_name",
    "strike_price_2012_gbp",
    "capacity_mw",
];

/// Parse project records from CSV
///
/// Blank input or a header-only file yields an empty list. Any invalid row
/// rejects the whole file; the error names the 1-based data row.
///
/// # Errors
///
/// * `ValidationError::MissingColumn` - required header absent
/// * `ValidationError::UnknownRound` / `InvalidDecimal` / `NegativeCapacity` - bad row
/// * `ValidationError::CsvFormat` - malformed CSV
pub fn parse_projects_csv(csv_content: &str) -> Result<Vec<ProjectRecord>, ValidationError> {
    if csv_content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(csv_content.as_bytes());

    // Cloned: reader.records() needs the reader mutably
    let headers = reader
        .headers()
        .map_err(|e| ValidationError::CsvFormat(format!("Failed to read CSV headers: {}", e)))?
        .clone();

    require_columns(&headers, &REQUIRED_COLUMNS)?;

    let mut projects = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let row = idx + 1;
        let record = result
            .map_err(|e| ValidationError::CsvFormat(format!("row {}: {}", row, e)))?;

        let project = parse_project_row(&record, &headers)?;
        validate_record(&project)?;
        projects.push(project);
    }

    Ok(projects)
}

fn parse_project_row(
    record: &csv::StringRecord,
    headers: &csv::StringRecord,
) -> Result<ProjectRecord, ValidationError> {
    let allocation_round = get_field(record, headers, "allocation_round")?.parse()?;
    let project_name = get_field(record, headers, "project_name")?.to_string();
    let strike_price_2012_gbp =
        parse_optional_decimal(get_field(record, headers, "strike_price_2012_gbp")?)?;
    let capacity_mw = parse_decimal(get_field(record, headers, "capacity_mw")?)?;

    let delivery_year =
        get_optional_field(record, headers, "delivery_year").and_then(parse_optional_text);
    let number_of_turbines = match get_optional_field(record, headers, "number_of_turbines") {
        Some(value) => parse_optional_count(value)?,
        None => None,
    };

    Ok(ProjectRecord {
        allocation_round,
        project_name,
        strike_price_2012_gbp,
        capacity_mw,
        delivery_year,
        number_of_turbines,
    })
}

// ============================================================================
// Export
// ============================================================================

fn format_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Column headers of the exported table for the given currencies
pub fn metrics_csv_header(currencies: &[Currency]) -> Vec<String> {
    let mut header: Vec<String> = [
        "allocation_round",
        "project_name",
        "strike_price_2012_gbp",
        "capacity_mw",
        "delivery_year",
        "number_of_turbines",
        "annual_production_mwh",
        "annual_production_twh",
        "normalized_strike_price_gbp_2025",
        "annual_revenue_gbp_2012",
        "annual_revenue_gbp_2025",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    for currency in currencies {
        let code = currency.code().to_lowercase();
        header.push(format!("strike_price_2012_{}", code));
        header.push(format!("strike_price_2025_{}", code));
        header.push(format!("revenue_2025_{}", code));
        header.push(format!("revenue_2025_{}_millions", code));
    }

    header
}

/// Write the enriched table as CSV
///
/// Absent values become empty cells, never `0`. Currency columns cover every
/// currency present in any row, in `Currency` order.
pub fn write_metrics_csv<W: Write>(
    records: &[EnrichedRecord],
    writer: W,
) -> Result<(), RenderError> {
    let currencies: Vec<Currency> = records
        .iter()
        .flat_map(|r| r.metrics.by_currency.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut out = WriterBuilder::new().has_headers(false).from_writer(writer);
    out.write_record(metrics_csv_header(&currencies))?;

    for row in records {
        let p = &row.project;
        let m = &row.metrics;

        let mut fields = vec![
            p.allocation_round.label().to_string(),
            p.project_name.clone(),
            format_value(p.strike_price_2012_gbp),
            p.capacity_mw.to_string(),
            p.delivery_year.clone().unwrap_or_default(),
            p.number_of_turbines.map(|n| n.to_string()).unwrap_or_default(),
            m.annual_production_mwh.to_string(),
            m.annual_production_twh.to_string(),
            format_value(m.normalized_strike_price_gbp_2025),
            format_value(m.annual_revenue_gbp_2012),
            format_value(m.annual_revenue_gbp_2025),
        ];

        for currency in &currencies {
            let cm = m.currency(*currency).cloned().unwrap_or_default();
            fields.push(format_value(cm.strike_price_2012));
            fields.push(format_value(cm.strike_price_2025));
            fields.push(format_value(cm.revenue_2025));
            fields.push(format_value(cm.revenue_2025_millions));
        }

        out.write_record(&fields)?;
    }

    out.flush()
        .map_err(|e| RenderError::CsvExport(e.to_string()))?;
    Ok(())
}
