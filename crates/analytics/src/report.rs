use chrono::NaiveDate;
use core_types::ReturnSign;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One bar of the "most volatile stocks" chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityEntry {
    pub ticker: String,
    /// Sample standard deviation of daily returns.
    pub volatility: f64,
    pub volatility_pct: f64,
    /// Number of daily returns the deviation was computed from.
    pub observations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub date: NaiveDate,
    /// `None` on the ticker's first row; treated as zero for compounding.
    pub daily_return: Option<f64>,
    pub cumulative_return: f64,
    pub cumulative_return_pct: f64,
}

/// The full compounding curve of one top performer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeReturnSeries {
    pub ticker: String,
    /// The last point's cumulative return, the value the series was ranked by.
    pub final_return_pct: f64,
    pub points: Vec<CumulativePoint>,
}

/// Simple first-to-last return of a ticker over the whole table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerTotalReturn {
    pub ticker: String,
    pub start_price: Option<Decimal>,
    pub end_price: Option<Decimal>,
    /// `None` when the ticker has no usable start price.
    pub total_return: Option<f64>,
}

/// One bar of the "average total return by sector" chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorReturn {
    pub sector: String,
    pub average_return: f64,
    pub average_return_pct: f64,
    /// Number of tickers averaged.
    pub tickers: usize,
    /// Zero is positive here.
    pub sign: ReturnSign,
}

/// Square, symmetric matrix of pairwise-complete Pearson correlations of closes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub tickers: Vec<String>,
    /// `values[i][j]` correlates `tickers[i]` with `tickers[j]`. `None` when the pair
    /// shares fewer than two dates or one side does not vary.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    pub fn index_of(&self, ticker: &str) -> Option<usize> {
        self.tickers.iter().position(|t| t == ticker)
    }

    /// Correlation between two tickers, or `None` if either is unknown or the cell is undefined.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        self.values[i][j]
    }
}

/// Start-to-end return of one ticker within one month label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReturn {
    pub ticker: String,
    pub month: String,
    pub start_price: Option<Decimal>,
    pub end_price: Option<Decimal>,
    pub monthly_return: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMover {
    pub ticker: String,
    pub start_price: Decimal,
    pub end_price: Decimal,
    pub monthly_return: f64,
    pub return_pct: f64,
    /// Zero is negative here.
    pub sign: ReturnSign,
}

/// Top gainers followed by top losers for one month, sorted descending.
///
/// When a month has fewer tickers than both sides together, a ticker can appear as
/// both a gainer and a loser and is then listed twice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMovers {
    pub month: String,
    pub entries: Vec<MonthlyMover>,
}

impl MonthlyMovers {
    pub fn empty(month: impl Into<String>) -> Self {
        Self {
            month: month.into(),
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct tickers in presentation order.
    pub fn tickers(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.ticker.as_str()) {
                seen.push(entry.ticker.as_str());
            }
        }
        seen
    }
}

/// Every selector-free view computed from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub volatility: Vec<VolatilityEntry>,
    pub cumulative_returns: Vec<CumulativeReturnSeries>,
    pub sector_returns: Vec<SectorReturn>,
    pub correlation: CorrelationMatrix,
    /// Month labels a caller may pass to the monthly movers view.
    pub months: Vec<String>,
}
