use crate::prepare::PreparedPrices;
use crate::report::VolatilityEntry;
use crate::stats::sample_std;

/// Ranks tickers by the sample standard deviation of their daily returns and keeps
/// the `top_n` most volatile, highest first.
///
/// Tickers with fewer than two daily returns have no deviation and are left out.
/// Equal volatilities keep ticker order.
pub fn rank_volatility(prices: &PreparedPrices, top_n: usize) -> Vec<VolatilityEntry> {
    let mut ranked: Vec<VolatilityEntry> = prices
        .groups()
        .filter_map(|(ticker, rows)| {
            let returns: Vec<f64> = rows.iter().filter_map(|r| r.daily_return).collect();
            match sample_std(&returns) {
                Some(volatility) => Some(VolatilityEntry {
                    ticker: ticker.to_string(),
                    volatility,
                    volatility_pct: volatility * 100.0,
                    observations: returns.len(),
                }),
                None => {
                    tracing::debug!(ticker, observations = returns.len(), "Skipping ticker without a defined volatility");
                    None
                }
            }
        })
        .collect();

    // `sort_by` is stable, which is what keeps ties in ticker order.
    ranked.sort_by(|a, b| b.volatility.total_cmp(&a.volatility));
    ranked.truncate(top_n);
    ranked
}
