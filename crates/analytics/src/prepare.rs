use core_types::{PriceRow, PriceTable};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use std::ops::Range;

/// A price row after preparation, carrying its daily return.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRow {
    pub price: PriceRow,
    /// `close[i] / close[i-1] - 1` within the ticker. `None` on the ticker's first row,
    /// when either close is null, or when the previous close is zero.
    pub daily_return: Option<f64>,
}

impl PreparedRow {
    pub fn ticker(&self) -> &str {
        &self.price.ticker
    }

    pub fn close(&self) -> Option<Decimal> {
        self.price.close
    }
}

#[derive(Debug, Clone, PartialEq)]
struct TickerGroup {
    ticker: String,
    range: Range<usize>,
}

/// The price table sorted by (ticker, date) with daily returns attached, plus the
/// ticker → rows grouping map every transform reuses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedPrices {
    rows: Vec<PreparedRow>,
    groups: Vec<TickerGroup>,
}

impl PreparedPrices {
    /// All rows, ordered by ticker ascending then date ascending.
    pub fn rows(&self) -> &[PreparedRow] {
        &self.rows
    }

    /// Per-ticker slices in ticker order. Each slice is in date order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[PreparedRow])> + '_ {
        self.groups
            .iter()
            .map(|g| (g.ticker.as_str(), &self.rows[g.range.clone()]))
    }

    pub fn group(&self, ticker: &str) -> Option<&[PreparedRow]> {
        self.groups
            .binary_search_by(|g| g.ticker.as_str().cmp(ticker))
            .ok()
            .map(|idx| &self.rows[self.groups[idx].range.clone()])
    }

    pub fn ticker_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Sorts a copy of the price table by (ticker, date) and computes per-ticker daily
/// returns. The input is left untouched.
///
/// The sort is stable, so duplicate (ticker, date) rows keep their input order.
pub fn prepare(table: &PriceTable) -> PreparedPrices {
    let mut sorted: Vec<PriceRow> = table.rows.clone();
    sorted.sort_by(|a, b| a.ticker.cmp(&b.ticker).then(a.date.cmp(&b.date)));

    let mut rows: Vec<PreparedRow> = Vec::with_capacity(sorted.len());
    let mut groups: Vec<TickerGroup> = Vec::new();

    for price in sorted {
        let starts_group = groups.last().is_none_or(|g| g.ticker != price.ticker);
        if starts_group {
            groups.push(TickerGroup {
                ticker: price.ticker.clone(),
                range: rows.len()..rows.len(),
            });
        }

        // A group's first row never looks back across the ticker boundary.
        let daily_return = if starts_group {
            None
        } else {
            rows.last().and_then(|prev| pct_change(prev.price.close, price.close))
        };

        rows.push(PreparedRow { price, daily_return });
        if let Some(group) = groups.last_mut() {
            group.range.end = rows.len();
        }
    }

    tracing::debug!(rows = rows.len(), tickers = groups.len(), "Prepared price table");
    PreparedPrices { rows, groups }
}

fn pct_change(previous: Option<Decimal>, current: Option<Decimal>) -> Option<f64> {
    let ratio = current?.checked_div(previous?)?;
    ratio.checked_sub(Decimal::ONE)?.to_f64()
}
