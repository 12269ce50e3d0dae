use crate::prepare::{PreparedPrices, PreparedRow};
use crate::report::{MonthlyMover, MonthlyMovers, MonthlyReturn};
use crate::sector::{first_last_close, simple_return};
use core_types::ReturnSign;
use std::collections::{BTreeMap, BTreeSet};

/// The sorted, distinct month labels present in the table.
pub fn available_months(prices: &PreparedPrices) -> Vec<String> {
    prices
        .rows()
        .iter()
        .map(|r| r.price.month.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Start-to-end return of every (ticker, month) group, ordered by ticker then month.
pub fn monthly_returns(prices: &PreparedPrices) -> Vec<MonthlyReturn> {
    let mut out = Vec::new();
    for (ticker, rows) in prices.groups() {
        let mut by_month: BTreeMap<&str, Vec<&PreparedRow>> = BTreeMap::new();
        for row in rows {
            by_month.entry(row.price.month.as_str()).or_default().push(row);
        }

        for (month, month_rows) in by_month {
            let (start_price, end_price) = first_last_close(month_rows);
            out.push(MonthlyReturn {
                ticker: ticker.to_string(),
                month: month.to_string(),
                start_price,
                end_price,
                monthly_return: simple_return(start_price, end_price),
            });
        }
    }
    out
}

/// Top `per_side` gainers and losers of `month`, merged and sorted descending.
///
/// An unknown month label yields an empty result, never an error. Groups without a
/// defined monthly return are not ranked. The two sides are not de-duplicated: with
/// fewer than `2 * per_side` tickers the same ticker can be listed as both.
pub fn select_movers(prices: &PreparedPrices, month: &str, per_side: usize) -> MonthlyMovers {
    if !prices.rows().iter().any(|r| r.price.month == month) {
        tracing::info!(month, "Requested month is not present in the price table");
        return MonthlyMovers::empty(month);
    }

    let mut ranked: Vec<MonthlyMover> = monthly_returns(prices)
        .into_iter()
        .filter(|m| m.month == month)
        .filter_map(|m| {
            let (Some(start_price), Some(end_price), Some(monthly_return)) =
                (m.start_price, m.end_price, m.monthly_return)
            else {
                tracing::debug!(ticker = %m.ticker, month, "No defined monthly return");
                return None;
            };
            let return_pct = monthly_return * 100.0;
            Some(MonthlyMover {
                ticker: m.ticker,
                start_price,
                end_price,
                monthly_return,
                return_pct,
                sign: ReturnSign::strictly_positive(return_pct),
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.monthly_return.total_cmp(&a.monthly_return));

    let gainers = ranked.iter().take(per_side);
    let losers = ranked.iter().skip(ranked.len().saturating_sub(per_side));
    let mut entries: Vec<MonthlyMover> = gainers.chain(losers).cloned().collect();
    entries.sort_by(|a, b| b.monthly_return.total_cmp(&a.monthly_return));

    MonthlyMovers {
        month: month.to_string(),
        entries,
    }
}
