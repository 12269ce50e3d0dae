use crate::prepare::{PreparedPrices, PreparedRow};
use crate::report::{SectorReturn, TickerTotalReturn};
use crate::stats::mean;
use core_types::{ReturnSign, SectorTable};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use std::collections::{BTreeMap, HashMap};

/// First and last non-null close of a date-ordered run of rows.
pub(crate) fn first_last_close<'a>(rows: impl IntoIterator<Item = &'a PreparedRow>) -> (Option<Decimal>, Option<Decimal>) {
    rows.into_iter()
        .filter_map(PreparedRow::close)
        .fold((None, None), |(first, _), close| (first.or(Some(close)), Some(close)))
}

/// `(end - start) / start`, undefined without a non-zero start.
pub(crate) fn simple_return(start: Option<Decimal>, end: Option<Decimal>) -> Option<f64> {
    let (start, end) = (start?, end?);
    end.checked_sub(start)?.checked_div(start)?.to_f64()
}

/// Start-to-end return of every ticker over the whole table, in ticker order.
pub fn total_returns(prices: &PreparedPrices) -> Vec<TickerTotalReturn> {
    prices
        .groups()
        .map(|(ticker, rows)| {
            let (start_price, end_price) = first_last_close(rows);
            TickerTotalReturn {
                ticker: ticker.to_string(),
                start_price,
                end_price,
                total_return: simple_return(start_price, end_price),
            }
        })
        .collect()
}

/// Keeps the first sector row seen for each ticker.
fn sector_lookup(sectors: &SectorTable) -> HashMap<&str, Option<&str>> {
    let mut lookup = HashMap::new();
    for row in &sectors.rows {
        lookup
            .entry(row.ticker.as_str())
            .or_insert_with(|| row.sector.as_deref());
    }
    lookup
}

/// Averages ticker total returns per sector, highest average first.
///
/// Tickers without a resolvable sector, or without a defined total return, are left
/// out; a sector left with no tickers does not appear at all.
pub fn aggregate_sector_returns(prices: &PreparedPrices, sectors: &SectorTable) -> Vec<SectorReturn> {
    let lookup = sector_lookup(sectors);

    // --- 1. Join ticker returns to their sector ---
    let mut by_sector: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    let mut unresolved = 0usize;
    for total in total_returns(prices) {
        let Some(sector) = lookup.get(total.ticker.as_str()).copied().flatten() else {
            unresolved += 1;
            continue;
        };
        let Some(total_return) = total.total_return else {
            tracing::warn!(ticker = %total.ticker, "Ticker has no usable start price; excluded from sector average");
            continue;
        };
        by_sector.entry(sector).or_default().push(total_return);
    }
    if unresolved > 0 {
        tracing::info!(unresolved, "Tickers without a sector were dropped from the sector view");
    }

    // --- 2. Average, rank and tag ---
    let mut averages: Vec<SectorReturn> = by_sector
        .into_iter()
        .filter_map(|(sector, returns)| {
            let average_return = mean(&returns)?;
            let average_return_pct = average_return * 100.0;
            Some(SectorReturn {
                sector: sector.to_string(),
                average_return,
                average_return_pct,
                tickers: returns.len(),
                sign: ReturnSign::non_negative_is_positive(average_return_pct),
            })
        })
        .collect();

    averages.sort_by(|a, b| b.average_return.total_cmp(&a.average_return));
    averages
}
