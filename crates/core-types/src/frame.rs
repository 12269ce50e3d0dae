//! Column access over the polars `DataFrame` handed in by the data-access layer.
//!
//! Loaders produce whatever dtypes they naturally have: the CSV loader only string
//! columns, the database loader typed ones. Every column is read back through its
//! text form, so both look the same to the table constructors.

use crate::error::CoreError;
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::{DataFrame, DataType, Series};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Finds a column by name, ignoring ASCII case and surrounding whitespace, so
/// `Ticker` and `ticker` refer to the same column. Column order carries no meaning.
pub fn find_column<'a>(frame: &'a DataFrame, name: &str) -> Option<&'a Series> {
    frame
        .get_columns()
        .iter()
        .find(|s| s.name().trim().eq_ignore_ascii_case(name.trim()))
}

/// Looks up a column that the named table cannot do without.
pub fn require_column<'a>(frame: &'a DataFrame, table: &str, name: &str) -> Result<&'a Series, CoreError> {
    find_column(frame, name).ok_or_else(|| CoreError::MissingColumn {
        table: table.to_string(),
        column: name.to_string(),
    })
}

/// One trimmed text value per row. Nulls, blank strings and float NaN are `None`.
pub fn text_values(table: &str, series: &Series) -> Result<Vec<Option<String>>, CoreError> {
    let unreadable = |e: polars::error::PolarsError| CoreError::UnreadableColumn {
        table: table.to_string(),
        column: series.name().to_string(),
        reason: e.to_string(),
    };
    let is_float = series.dtype().is_float();
    let text = series.cast(&DataType::String).map_err(unreadable)?;
    let values = text.str().map_err(unreadable)?;

    Ok(values
        .into_iter()
        .map(|value| {
            value
                .map(str::trim)
                .filter(|s| !s.is_empty() && !(is_float && s.eq_ignore_ascii_case("nan")))
                .map(str::to_string)
        })
        .collect())
}

pub fn parse_decimal(s: &str) -> Result<Decimal, String> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|_| format!("'{s}' is not a number"))
}

pub fn parse_i64(s: &str) -> Result<i64, String> {
    if let Ok(i) = s.parse::<i64>() {
        return Ok(i);
    }
    // Exports frequently write integer columns as "1200.0".
    let d = parse_decimal(s)?;
    if !d.fract().is_zero() {
        return Err(format!("{d} is not a whole number"));
    }
    d.to_i64().ok_or_else(|| format!("{d} does not fit in an integer"))
}

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .map_err(|_| format!("'{s}' is not a YYYY-MM-DD date"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, df};
    use rust_decimal_macros::dec;

    #[test]
    fn column_lookup_ignores_case_and_order() {
        let frame = df!("close" => &["10.5"], "Ticker" => &["AAA"]).unwrap();

        assert_eq!(find_column(&frame, "ticker").unwrap().name(), "Ticker");
        assert_eq!(find_column(&frame, "CLOSE").unwrap().name(), "close");
        assert!(find_column(&frame, "date").is_none());
    }

    #[test]
    fn missing_required_column_names_table_and_column() {
        let err = require_column(&DataFrame::default(), "price", "close").unwrap_err();
        assert_eq!(
            err,
            CoreError::MissingColumn {
                table: "price".to_string(),
                column: "close".to_string()
            }
        );
    }

    #[test]
    fn typed_columns_read_back_as_text() {
        let ints = Series::new("volume", &[Some(1200i64), None]);
        let floats = Series::new("close", &[10.5f64, f64::NAN]);
        let dates = Series::new("date", &[NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()]);
        let padded = Series::new("ticker", &[" AAA ", "  "]);

        assert_eq!(text_values("t", &ints).unwrap(), vec![Some("1200".to_string()), None]);
        assert_eq!(text_values("t", &floats).unwrap(), vec![Some("10.5".to_string()), None]);
        assert_eq!(text_values("t", &dates).unwrap(), vec![Some("2024-01-05".to_string())]);
        assert_eq!(text_values("t", &padded).unwrap(), vec![Some("AAA".to_string()), None]);
    }

    #[test]
    fn text_parses_to_typed_values() {
        assert_eq!(parse_decimal("101.25").unwrap(), dec!(101.25));
        assert_eq!(parse_decimal("1e2").unwrap(), dec!(100));
        assert_eq!(parse_i64("1200.0").unwrap(), 1200);
        assert!(parse_i64("12.5").is_err());
        assert_eq!(parse_date("2024-01-05 00:00:00").unwrap(), NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert!(parse_decimal("abc").is_err());
        assert!(parse_date("05/01/2024").is_err());
    }
}
