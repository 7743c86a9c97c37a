//! Shared CSV helpers for the dataset reader

use crate::error::ValidationError;

/// Get a field value by column name from a CSV record
///
/// # Example
///
/// ```rust
/// use csv::StringRecord;
/// use uk_cfd_dashboard::csv_utils::get_field;
///
/// let headers = StringRecord::from(vec!["allocation_round", "project_name"]);
/// let record = StringRecord::from(vec!["AR1", "Neart Na Gaoithe"]);
///
/// assert_eq!(get_field(&record, &headers, "project_name").unwrap(), "Neart Na Gaoithe");
/// ```
pub fn get_field<'a>(
    record: &'a csv::StringRecord,
    headers: &csv::StringRecord,
    field_name: &str,
) -> Result<&'a str, ValidationError> {
    let idx = headers
        .iter()
        .position(|h| h == field_name)
        .ok_or_else(|| ValidationError::MissingColumn(field_name.to_string()))?;

    record
        .get(idx)
        .ok_or_else(|| ValidationError::MissingColumn(field_name.to_string()))
}

/// Get an optional column: `Ok(None)` when the header is absent
///
/// Lets older dataset files omit columns that only ever hold empty values.
pub fn get_optional_field<'a>(
    record: &'a csv::StringRecord,
    headers: &csv::StringRecord,
    field_name: &str,
) -> Option<&'a str> {
    headers
        .iter()
        .position(|h| h == field_name)
        .and_then(|idx| record.get(idx))
}

/// Check a header row contains every required column
pub fn require_columns(
    headers: &csv::StringRecord,
    required: &[&str],
) -> Result<(), ValidationError> {
    for col in required {
        if !headers.iter().any(|h| h == *col) {
            return Err(ValidationError::MissingColumn(col.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_field_success() {
        let headers = csv::StringRecord::from(vec!["col1", "col2", "col3"]);
        let record = csv::StringRecord::from(vec!["a", "b", "c"]);

        assert_eq!(get_field(&record, &headers, "col1").unwrap(), "a");
        assert_eq!(get_field(&record, &headers, "col3").unwrap(), "c");
    }

    #[test]
    fn test_get_field_missing_column() {
        let headers = csv::StringRecord::from(vec!["col1", "col2"]);
        let record = csv::StringRecord::from(vec!["a", "b"]);

        assert_eq!(
            get_field(&record, &headers, "col3"),
            Err(ValidationError::MissingColumn("col3".to_string()))
        );
    }

    #[test]
    fn test_get_field_empty_value() {
        let headers = csv::StringRecord::from(vec!["col1"]);
        let record = csv::StringRecord::from(vec![""]);

        // Empty string is valid - callers decide what it means
        assert_eq!(get_field(&record, &headers, "col1").unwrap(), "");
    }

    #[test]
    fn test_get_optional_field() {
        let headers = csv::StringRecord::from(vec!["col1"]);
        let record = csv::StringRecord::from(vec!["x"]);

        assert_eq!(get_optional_field(&record, &headers, "col1"), Some("x"));
        assert_eq!(get_optional_field(&record, &headers, "col2"), None);
    }

    #[test]
    fn test_require_columns() {
        let headers = csv::StringRecord::from(vec!["a", "b"]);
        assert!(require_columns(&headers, &["a", "b"]).is_ok());
        assert_eq!(
            require_columns(&headers, &["a", "c"]),
            Err(ValidationError::MissingColumn("c".to_string()))
        );
    }
}
