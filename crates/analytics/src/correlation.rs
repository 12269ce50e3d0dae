use crate::prepare::PreparedPrices;
use crate::report::CorrelationMatrix;
use crate::stats::pearson;
use chrono::NaiveDate;
use rust_decimal::prelude::*;
use std::collections::BTreeMap;

/// Closes pivoted wide: one row per date, one column per ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosePivot {
    pub dates: Vec<NaiveDate>,
    pub tickers: Vec<String>,
    /// `columns[t][d]` is the close of `tickers[t]` on `dates[d]`.
    pub columns: Vec<Vec<Option<f64>>>,
}

/// Pivots the closes by date and ticker.
///
/// Duplicate (ticker, date) rows are averaged. Tickers without a single non-null close
/// have nothing to correlate and get no column.
pub fn pivot_closes(prices: &PreparedPrices) -> ClosePivot {
    let mut cells: BTreeMap<(usize, NaiveDate), (f64, usize)> = BTreeMap::new();
    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut tickers: Vec<String> = Vec::new();

    for (ticker, rows) in prices.groups() {
        let column = tickers.len();
        let mut has_close = false;
        for row in rows {
            let Some(close) = row.close().and_then(|c| c.to_f64()) else {
                continue;
            };
            has_close = true;
            dates.push(row.price.date);
            let cell = cells.entry((column, row.price.date)).or_insert((0.0, 0));
            cell.0 += close;
            cell.1 += 1;
        }
        if has_close {
            tickers.push(ticker.to_string());
        }
    }

    dates.sort_unstable();
    dates.dedup();

    let columns = (0..tickers.len())
        .map(|column| {
            dates
                .iter()
                .map(|date| cells.get(&(column, *date)).map(|(sum, n)| sum / *n as f64))
                .collect()
        })
        .collect();

    ClosePivot { dates, tickers, columns }
}

/// Pairwise-complete Pearson correlation of closing prices across tickers.
///
/// Each pair only uses the dates on which both tickers have a close. The diagonal is
/// exactly 1 and `values[i][j] == values[j][i]`.
pub fn correlation_matrix(prices: &PreparedPrices) -> CorrelationMatrix {
    let pivot = pivot_closes(prices);
    let n = pivot.tickers.len();
    let mut values = vec![vec![None; n]; n];

    for i in 0..n {
        values[i][i] = Some(1.0);
        for j in (i + 1)..n {
            let (xs, ys): (Vec<f64>, Vec<f64>) = pivot.columns[i]
                .iter()
                .zip(&pivot.columns[j])
                .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                .unzip();

            let value = pearson(&xs, &ys);
            if value.is_none() {
                tracing::debug!(
                    a = %pivot.tickers[i],
                    b = %pivot.tickers[j],
                    overlap = xs.len(),
                    "Correlation undefined for pair"
                );
            }
            values[i][j] = value;
            values[j][i] = value;
        }
    }

    tracing::debug!(tickers = n, dates = pivot.dates.len(), "Built correlation matrix");
    CorrelationMatrix {
        tickers: pivot.tickers,
        values,
    }
}
