//! # Domain Records
//!
//! Strict internal records, one per resource. Every response DTO from
//! [`shared::dto`] is mapped into one of these before a store, the metrics
//! engine or a view sees it.
//!
//! Mapping rules:
//! - money is unsigned; the sign lives in the record kind
//! - dates are calendar dates taken from the first ten characters of the
//!   backend's ISO string
//! - list responses skip rows that cannot be mapped (logged at `warn`)
//!   instead of failing the whole list

pub mod conta;
pub mod lancamento;
pub mod meta;
pub mod summary;

pub use conta::{Conta, TipoConta};
pub use lancamento::{Lancamento, TipoLancamento};
pub use meta::{Meta, StatusMeta};
pub use summary::{CategorySlice, EvolutionPoint, MonthlyEvolution, Summary};

use crate::core::error::{AppError, Result};
use chrono::NaiveDate;

/// Parse a backend date (`2025-01-24`, `2025-01-24T10:00:00`, ...).
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| AppError::Parse(format!("invalid date '{}': {}", raw, e)))
}

/// Map every wire row, dropping the ones that fail.
pub(crate) fn map_rows<W, R>(resource: &'static str, rows: Vec<W>) -> Vec<R>
where
    R: TryFrom<W, Error = AppError>,
{
    let total = rows.len();
    let mapped: Vec<R> = rows
        .into_iter()
        .filter_map(|row| match R::try_from(row) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(resource = resource, error = %e, "Skipping malformed row");
                None
            }
        })
        .collect();
    if mapped.len() < total {
        tracing::warn!(
            resource = resource,
            skipped = total - mapped.len(),
            total = total,
            "Some rows could not be mapped"
        );
    }
    mapped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_accepts_datetimes() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 24).unwrap();
        assert_eq!(parse_date("2025-01-24").unwrap(), expected);
        assert_eq!(parse_date("2025-01-24T13:45:00.123Z").unwrap(), expected);
        assert!(parse_date("24/01/2025").is_err());
        assert!(parse_date("").is_err());
    }
}
