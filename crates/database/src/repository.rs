use crate::DbError;
use chrono::NaiveDate;
use polars::prelude::{DataFrame, NamedFrom, Series};
use rust_decimal::Decimal;
use sqlx::mysql::{MySql, MySqlPool, MySqlRow};
use sqlx::Row;

const STOCK_DATA_QUERY: &str = "SELECT ticker AS Ticker, close, date, high, low, month, open, volume FROM stock_data";
const SECTOR_DATA_QUERY: &str = "SELECT Company, Ticker, Sector, Symbol FROM sector_data";

/// How a result column is decoded into a polars column.
#[derive(Debug, Clone, Copy)]
enum ColumnKind {
    Text,
    /// Carried as text so that no digit of the stored DECIMAL is lost.
    Decimal,
    Date,
    Int,
}

const STOCK_COLUMNS: [(&str, ColumnKind); 8] = [
    ("Ticker", ColumnKind::Text),
    ("close", ColumnKind::Decimal),
    ("date", ColumnKind::Date),
    ("high", ColumnKind::Decimal),
    ("low", ColumnKind::Decimal),
    ("month", ColumnKind::Text),
    ("open", ColumnKind::Decimal),
    ("volume", ColumnKind::Int),
];

const SECTOR_COLUMNS: [(&str, ColumnKind); 4] = [
    ("Company", ColumnKind::Text),
    ("Ticker", ColumnKind::Text),
    ("Sector", ColumnKind::Text),
    ("Symbol", ColumnKind::Text),
];

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: MySqlPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Fetches the whole daily price table.
    pub async fn get_stock_data(&self) -> Result<DataFrame, DbError> {
        let rows = sqlx::query(STOCK_DATA_QUERY).fetch_all(&self.pool).await?;
        let frame = rows_to_frame(&rows, &STOCK_COLUMNS)?;
        tracing::info!(rows = frame.height(), "Fetched stock_data");
        Ok(frame)
    }

    /// Fetches the whole ticker → sector mapping.
    pub async fn get_sector_data(&self) -> Result<DataFrame, DbError> {
        let rows = sqlx::query(SECTOR_DATA_QUERY).fetch_all(&self.pool).await?;
        let frame = rows_to_frame(&rows, &SECTOR_COLUMNS)?;
        tracing::info!(rows = frame.height(), "Fetched sector_data");
        Ok(frame)
    }
}

fn rows_to_frame(rows: &[MySqlRow], columns: &[(&str, ColumnKind)]) -> Result<DataFrame, DbError> {
    let series = columns
        .iter()
        .map(|(name, kind)| column(rows, name, *kind))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(DataFrame::new(series)?)
}

fn column(rows: &[MySqlRow], name: &str, kind: ColumnKind) -> Result<Series, sqlx::Error> {
    let series = match kind {
        ColumnKind::Text => Series::new(name, values::<String>(rows, name)?),
        ColumnKind::Decimal => {
            let text: Vec<Option<String>> = values::<Decimal>(rows, name)?
                .into_iter()
                .map(|d| d.map(|d| d.to_string()))
                .collect();
            Series::new(name, text)
        }
        ColumnKind::Date => Series::new(name, values::<NaiveDate>(rows, name)?),
        ColumnKind::Int => Series::new(name, values::<i64>(rows, name)?),
    };
    Ok(series)
}

fn values<T>(rows: &[MySqlRow], name: &str) -> Result<Vec<Option<T>>, sqlx::Error>
where
    T: for<'r> sqlx::Decode<'r, MySql> + sqlx::Type<MySql>,
{
    rows.iter().map(|row| row.try_get::<Option<T>, _>(name)).collect()
}
