use crate::error::CoreError;
use crate::frame::{find_column, parse_date, parse_decimal, parse_i64, require_column, text_values};
use chrono::NaiveDate;
use polars::prelude::DataFrame;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const PRICE_TABLE: &str = "price";
const SECTOR_TABLE: &str = "sector";

/// One daily bar for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub close: Option<Decimal>,
    pub volume: Option<i64>,
    /// Label grouping dates into months, e.g. "2024-01". Taken as supplied, never derived.
    pub month: String,
}

impl PriceRow {
    /// Convenience constructor for a row that only carries what the analytics read.
    pub fn new(ticker: impl Into<String>, date: NaiveDate, close: Decimal, month: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            date,
            open: None,
            high: None,
            low: None,
            close: Some(close),
            volume: None,
            month: month.into(),
        }
    }
}

/// The long-format price table: many tickers, many dates, rows in no particular order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    pub rows: Vec<PriceRow>,
}

impl PriceTable {
    pub fn new(rows: Vec<PriceRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Reads a `DataFrame` into typed rows.
    ///
    /// `ticker`, `date`, `close` and `month` must be present; `open`, `high`, `low` and
    /// `volume` are optional and read as null when absent.
    pub fn from_frame(frame: &DataFrame) -> Result<Self, CoreError> {
        let ticker = required(frame, PRICE_TABLE, "ticker")?;
        let date = required(frame, PRICE_TABLE, "date")?;
        let close = required(frame, PRICE_TABLE, "close")?;
        let month = required(frame, PRICE_TABLE, "month")?;
        let open = optional(frame, PRICE_TABLE, "open")?;
        let high = optional(frame, PRICE_TABLE, "high")?;
        let low = optional(frame, PRICE_TABLE, "low")?;
        let volume = optional(frame, PRICE_TABLE, "volume")?;

        let mut rows = Vec::with_capacity(frame.height());
        for row in 0..frame.height() {
            rows.push(PriceRow {
                ticker: required_text(PRICE_TABLE, "ticker", &ticker, row)?,
                date: required_date(PRICE_TABLE, "date", &date, row)?,
                open: optional_decimal(PRICE_TABLE, "open", open.as_deref(), row)?,
                high: optional_decimal(PRICE_TABLE, "high", high.as_deref(), row)?,
                low: optional_decimal(PRICE_TABLE, "low", low.as_deref(), row)?,
                close: optional_decimal(PRICE_TABLE, "close", Some(&close), row)?,
                volume: optional_i64(PRICE_TABLE, "volume", volume.as_deref(), row)?,
                month: required_text(PRICE_TABLE, "month", &month, row)?,
            });
        }

        Ok(Self { rows })
    }
}

/// Ticker to company/sector mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorRow {
    pub ticker: String,
    pub company: Option<String>,
    /// `None` when the source has no sector for this ticker.
    pub sector: Option<String>,
    pub symbol: Option<String>,
}

impl SectorRow {
    pub fn new(ticker: impl Into<String>, sector: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            company: None,
            sector: Some(sector.into()),
            symbol: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorTable {
    pub rows: Vec<SectorRow>,
}

impl SectorTable {
    pub fn new(rows: Vec<SectorRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Reads a `DataFrame` into typed rows. `ticker` and `sector` are required.
    pub fn from_frame(frame: &DataFrame) -> Result<Self, CoreError> {
        let ticker = required(frame, SECTOR_TABLE, "ticker")?;
        let sector = required(frame, SECTOR_TABLE, "sector")?;
        let company = optional(frame, SECTOR_TABLE, "company")?;
        let symbol = optional(frame, SECTOR_TABLE, "symbol")?;

        let rows = (0..frame.height())
            .map(|row| {
                Ok(SectorRow {
                    ticker: required_text(SECTOR_TABLE, "ticker", &ticker, row)?,
                    company: company.as_ref().and_then(|c| c[row].clone()),
                    sector: sector[row].clone(),
                    symbol: symbol.as_ref().and_then(|c| c[row].clone()),
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        Ok(Self { rows })
    }
}

type TextColumn = Vec<Option<String>>;

fn required(frame: &DataFrame, table: &str, name: &str) -> Result<TextColumn, CoreError> {
    text_values(table, require_column(frame, table, name)?)
}

fn optional(frame: &DataFrame, table: &str, name: &str) -> Result<Option<TextColumn>, CoreError> {
    find_column(frame, name).map(|series| text_values(table, series)).transpose()
}

fn invalid(table: &str, column: &str, row: usize, reason: String) -> CoreError {
    CoreError::InvalidCell {
        table: table.to_string(),
        column: column.to_string(),
        row,
        reason,
    }
}

fn required_text(table: &str, column: &str, values: &[Option<String>], row: usize) -> Result<String, CoreError> {
    values[row]
        .clone()
        .ok_or_else(|| invalid(table, column, row, "value is null".to_string()))
}

fn required_date(table: &str, column: &str, values: &[Option<String>], row: usize) -> Result<NaiveDate, CoreError> {
    let text = required_text(table, column, values, row)?;
    parse_date(&text).map_err(|reason| invalid(table, column, row, reason))
}

fn optional_decimal(
    table: &str,
    column: &str,
    values: Option<&[Option<String>]>,
    row: usize,
) -> Result<Option<Decimal>, CoreError> {
    match values.and_then(|v| v[row].as_deref()) {
        Some(text) => parse_decimal(text)
            .map(Some)
            .map_err(|reason| invalid(table, column, row, reason)),
        None => Ok(None),
    }
}

fn optional_i64(
    table: &str,
    column: &str,
    values: Option<&[Option<String>]>,
    row: usize,
) -> Result<Option<i64>, CoreError> {
    match values.and_then(|v| v[row].as_deref()) {
        Some(text) => parse_i64(text)
            .map(Some)
            .map_err(|reason| invalid(table, column, row, reason)),
        None => Ok(None),
    }
}
