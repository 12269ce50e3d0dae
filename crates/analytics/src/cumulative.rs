use crate::prepare::{PreparedPrices, PreparedRow};
use crate::report::{CumulativePoint, CumulativeReturnSeries};

/// Builds the compounding return curve of every ticker, then returns the complete
/// curves of the `top_n` tickers with the highest final cumulative return.
///
/// A null daily return compounds as zero, so a ticker's first point is always 0%.
/// Ties on the final value keep ticker order.
pub fn track_cumulative_returns(prices: &PreparedPrices, top_n: usize) -> Vec<CumulativeReturnSeries> {
    let mut curves: Vec<CumulativeReturnSeries> = prices
        .groups()
        .map(|(ticker, rows)| {
            let points = compound(rows);
            CumulativeReturnSeries {
                ticker: ticker.to_string(),
                final_return_pct: points.last().map_or(0.0, |p| p.cumulative_return_pct),
                points,
            }
        })
        .collect();

    curves.sort_by(|a, b| b.final_return_pct.total_cmp(&a.final_return_pct));
    curves.truncate(top_n);

    tracing::debug!(
        selected = ?curves.iter().map(|c| c.ticker.as_str()).collect::<Vec<_>>(),
        "Selected top cumulative performers"
    );
    curves
}

/// Running product of `1 + daily_return` over one ticker's date-ordered rows.
pub fn compound(rows: &[PreparedRow]) -> Vec<CumulativePoint> {
    let mut growth = 1.0_f64;
    rows.iter()
        .map(|row| {
            growth *= 1.0 + row.daily_return.unwrap_or(0.0);
            let cumulative_return = growth - 1.0;
            CumulativePoint {
                date: row.price.date,
                daily_return: row.daily_return,
                cumulative_return,
                cumulative_return_pct: cumulative_return * 100.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prepare::prepare;
    use chrono::NaiveDate;
    use core_types::{PriceRow, PriceTable};
    use rust_decimal::Decimal;

    fn series(ticker: &str, closes: &[i64]) -> Vec<PriceRow> {
        closes
            .iter()
            .enumerate()
            .map(|(i, c)| {
                PriceRow::new(
                    ticker,
                    NaiveDate::from_ymd_opt(2024, 3, 1 + i as u32).unwrap(),
                    Decimal::from(*c),
                    "2024-03",
                )
            })
            .collect()
    }

    #[test]
    fn final_point_matches_simple_start_to_end_return() {
        let prepared = prepare(&PriceTable::new(series("AAA", &[100, 120, 90, 135])));
        let points = compound(prepared.group("AAA").unwrap());

        assert_eq!(points.len(), 4);
        assert_eq!(points[0].cumulative_return, 0.0);
        assert_eq!(points[0].daily_return, None);
        assert!((points[3].cumulative_return - 0.35).abs() < 1e-12);
    }

    #[test]
    fn returns_whole_curves_of_top_performers() {
        let mut rows = series("UP", &[10, 11, 12, 20]);
        rows.extend(series("DOWN", &[10, 9, 8, 7]));
        rows.extend(series("FLAT", &[10, 10, 10, 10]));

        let top = track_cumulative_returns(&prepare(&PriceTable::new(rows)), 2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].ticker, "UP");
        assert_eq!(top[1].ticker, "FLAT");
        assert_eq!(top[0].points.len(), 4);
        assert!((top[0].final_return_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn single_row_ticker_contributes_one_flat_point() {
        let mut rows = series("SOLO", &[42]);
        rows.extend(series("MORE", &[10, 5]));

        let curves = track_cumulative_returns(&prepare(&PriceTable::new(rows)), 5);
        let solo = curves.iter().find(|c| c.ticker == "SOLO").unwrap();

        assert_eq!(solo.points.len(), 1);
        assert_eq!(solo.points[0].daily_return, None);
        assert_eq!(solo.final_return_pct, 0.0);
        // SOLO at 0% outranks MORE at -50%.
        assert_eq!(curves[0].ticker, "SOLO");
    }
}
