use analytics::{AnalyticsEngine, prepare};
use chrono::{Duration, NaiveDate};
use core_types::{PriceRow, PriceTable, ReturnSign, SectorRow, SectorTable};
use polars::prelude::{NamedFrom, df};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

fn day(n: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(n)
}

fn month_label(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// A deterministic random walk per ticker, emitted in a scrambled order.
fn market(tickers: usize, days: i64) -> PriceTable {
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    let mut rows = Vec::new();
    for t in 0..tickers {
        let mut price = 100.0_f64;
        for d in 0..days {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
            let shock = ((state >> 33) as f64 / (1u64 << 31) as f64 - 0.5) * 0.04 * (1.0 + t as f64 / 4.0);
            price *= 1.0 + shock;
            let date = day(d);
            rows.push(PriceRow::new(
                format!("T{t:02}"),
                date,
                Decimal::from_f64(price).unwrap().round_dp(4),
                month_label(date),
            ));
        }
    }
    // Reverse so nothing downstream can rely on input order.
    rows.reverse();
    PriceTable::new(rows)
}

fn close_bars(ticker: &str, closes: &[Decimal]) -> Vec<PriceRow> {
    closes
        .iter()
        .enumerate()
        .map(|(i, c)| PriceRow::new(ticker, day(i as i64), *c, month_label(day(i as i64))))
        .collect()
}

#[test]
fn first_daily_return_of_every_ticker_is_null() {
    let prepared = prepare(&market(6, 40));
    for (_, rows) in prepared.groups() {
        assert_eq!(rows[0].daily_return, None);
        assert!(rows[1..].iter().all(|r| r.daily_return.is_some()));
    }
}

#[test]
fn final_cumulative_return_equals_start_to_end_ratio() {
    let table = market(8, 60);
    let engine = AnalyticsEngine::new();
    let prepared = engine.prepare(&table);

    for series in engine.cumulative_returns(&prepared) {
        let rows = prepared.group(&series.ticker).unwrap();
        let first = rows.first().unwrap().close().unwrap().to_f64().unwrap();
        let last = rows.last().unwrap().close().unwrap().to_f64().unwrap();
        let expected_pct = (last / first - 1.0) * 100.0;

        assert_eq!(series.points.len(), rows.len());
        assert!((series.final_return_pct - expected_pct).abs() < 1e-8);
    }
}

#[test]
fn cumulative_view_returns_five_curves_ranked_by_final_value() {
    let engine = AnalyticsEngine::new();
    let curves = engine.cumulative_returns(&engine.prepare(&market(9, 30)));

    assert_eq!(curves.len(), 5);
    assert!(curves.windows(2).all(|w| w[0].final_return_pct >= w[1].final_return_pct));
    for curve in &curves {
        assert!(curve.points.windows(2).all(|w| w[0].date < w[1].date));
    }
}

#[test]
fn correlation_matrix_is_symmetric_with_unit_diagonal() {
    let engine = AnalyticsEngine::new();
    let matrix = engine.correlation(&engine.prepare(&market(7, 25)));

    assert_eq!(matrix.len(), 7);
    for i in 0..matrix.len() {
        assert_eq!(matrix.values[i][i], Some(1.0));
        for j in 0..matrix.len() {
            assert_eq!(matrix.values[i][j], matrix.values[j][i]);
            if let Some(value) = matrix.values[i][j] {
                assert!((-1.0..=1.0).contains(&value));
            }
        }
    }
}

#[test]
fn volatility_is_capped_at_ten_and_sorted_descending() {
    let engine = AnalyticsEngine::new();
    let ranked = engine.volatility(&engine.prepare(&market(15, 30)));

    assert_eq!(ranked.len(), 10);
    assert!(ranked.windows(2).all(|w| w[0].volatility_pct >= w[1].volatility_pct));
}

#[test]
fn monthly_movers_with_four_tickers() {
    let mut rows = Vec::new();
    for (ticker, end) in [("A", dec!(110)), ("B", dec!(105)), ("C", dec!(97)), ("D", dec!(92))] {
        rows.push(PriceRow::new(ticker, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(), end, "2024-01"));
        rows.push(PriceRow::new(ticker, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), dec!(100), "2024-01"));
    }

    let engine = AnalyticsEngine::new();
    let movers = engine.monthly_movers(&engine.prepare(&PriceTable::new(rows)), "2024-01");

    assert_eq!(movers.tickers(), vec!["A", "B", "C", "D"]);
    // Every ticker is both a top-5 gainer and a top-5 loser and is listed twice.
    assert_eq!(movers.entries.len(), 8);
    assert!(movers.entries.windows(2).all(|w| w[0].return_pct >= w[1].return_pct));

    let sign_of = |ticker: &str| movers.entries.iter().find(|m| m.ticker == ticker).unwrap().sign;
    assert_eq!(sign_of("A"), ReturnSign::Positive);
    assert_eq!(sign_of("B"), ReturnSign::Positive);
    assert_eq!(sign_of("C"), ReturnSign::Negative);
    assert_eq!(sign_of("D"), ReturnSign::Negative);
    assert!((movers.entries[0].return_pct - 10.0).abs() < 1e-9);
}

#[test]
fn sector_returns_average_per_sector() {
    let mut rows = close_bars("X", &[dec!(100), dec!(105), dec!(120)]);
    rows.extend(close_bars("Y", &[dec!(50), dec!(55)]));
    rows.extend(close_bars("Z", &[dec!(40), dec!(38), dec!(36)]));
    let sectors = SectorTable::new(vec![
        SectorRow::new("Z", "Energy"),
        SectorRow::new("X", "Tech"),
        SectorRow::new("Y", "Tech"),
    ]);

    let engine = AnalyticsEngine::new();
    let view = engine.sector_returns(&engine.prepare(&PriceTable::new(rows)), &sectors);

    assert_eq!(view.len(), 2);
    assert_eq!(view[0].sector, "Tech");
    assert!((view[0].average_return_pct - 15.0).abs() < 1e-9);
    assert_eq!(view[0].sign, ReturnSign::Positive);
    assert_eq!(view[1].sector, "Energy");
    assert!((view[1].average_return_pct + 10.0).abs() < 1e-9);
    assert_eq!(view[1].sign, ReturnSign::Negative);
}

#[test]
fn unknown_month_selection_is_empty() {
    let engine = AnalyticsEngine::new();
    let prepared = engine.prepare(&market(3, 10));
    let movers = engine.monthly_movers(&prepared, "2031-07");

    assert!(movers.is_empty());
    assert_eq!(engine.available_months(&prepared), vec!["2024-01"]);
}

#[test]
fn single_row_ticker_never_breaks_the_pipeline() {
    let mut rows = close_bars("LONE", &[dec!(12)]);
    rows.extend(close_bars("BUSY", &[dec!(10), dec!(11), dec!(9), dec!(12)]));
    let sectors = SectorTable::new(vec![SectorRow::new("LONE", "Tech"), SectorRow::new("BUSY", "Tech")]);

    let dashboard = AnalyticsEngine::new().dashboard(&PriceTable::new(rows), &sectors);

    assert!(dashboard.volatility.iter().all(|v| v.ticker != "LONE"));
    let lone = dashboard
        .cumulative_returns
        .iter()
        .find(|c| c.ticker == "LONE")
        .unwrap();
    assert_eq!(lone.points.len(), 1);
    assert_eq!(lone.points[0].daily_return, None);
    assert_eq!(dashboard.correlation.get("LONE", "BUSY"), None);
    assert_eq!(dashboard.correlation.get("LONE", "LONE"), Some(1.0));
    assert_eq!(dashboard.sector_returns[0].tickers, 2);
}

#[test]
fn dashboard_reads_frames_with_shuffled_columns() {
    let prices = df!(
        "volume" => &[10i64, 12, 9],
        "month" => &["2024-02", "2024-01", "2024-01"],
        "close" => &["12", "10", "11"],
        "date" => &["2024-02-01", "2024-01-30", "2024-01-31"],
        "Ticker" => &["AAA", "AAA", "AAA"]
    )
    .unwrap();
    let sectors = df!(
        "Symbol" => &["AAA.NS"],
        "Sector" => &["Tech"],
        "Ticker" => &["AAA"]
    )
    .unwrap();

    let dashboard = AnalyticsEngine::new().dashboard_from_frames(&prices, &sectors).unwrap();

    assert_eq!(dashboard.months, vec!["2024-01", "2024-02"]);
    assert!((dashboard.sector_returns[0].average_return_pct - 20.0).abs() < 1e-9);
    assert_eq!(dashboard.volatility.len(), 1);
}
