//! Text rendering of the analytics reports as terminal tables.
//!
//! Every function returns the chart title followed by its table, ready to print.
//! Numbers are rounded to two decimals and undefined values are shown as `n/a`.

use analytics::{CorrelationMatrix, CumulativeReturnSeries, MonthlyMovers, SectorReturn, VolatilityEntry};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, Table};
use core_types::ReturnSign;
use rust_decimal::Decimal;

const NOT_AVAILABLE: &str = "n/a";

fn new_table(header: Vec<String>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

fn titled(title: &str, table: &Table) -> String {
    format!("{title}\n{table}")
}

fn number(value: f64) -> Cell {
    Cell::new(format!("{value:.2}")).set_alignment(CellAlignment::Right)
}

fn optional(value: Option<f64>) -> Cell {
    match value {
        Some(v) => number(v),
        None => Cell::new(NOT_AVAILABLE).set_alignment(CellAlignment::Right),
    }
}

fn price(value: Decimal) -> Cell {
    Cell::new(value.round_dp(2).to_string()).set_alignment(CellAlignment::Right)
}

fn signed(value: f64, sign: ReturnSign) -> Cell {
    let color = match sign {
        ReturnSign::Positive => Color::Green,
        ReturnSign::Negative => Color::Red,
    };
    number(value).fg(color)
}

pub fn volatility_title(top_n: usize) -> String {
    format!("Top {top_n} Most Volatile Stocks (Standard Deviation of Daily Returns)")
}

pub fn cumulative_title(top_n: usize) -> String {
    format!("Cumulative Return Over Time for Top {top_n} Performing Stocks")
}

pub const SECTOR_TITLE: &str = "Average Total Return by Sector";
pub const CORRELATION_TITLE: &str = "Stock Price Correlation Heatmap";

pub fn movers_title(per_side: usize, month: &str) -> String {
    format!("Top {per_side} Gainers & Losers — {month}")
}

pub fn volatility(entries: &[VolatilityEntry], top_n: usize) -> String {
    let mut table = new_table(vec!["Ticker".into(), "Volatility (%)".into(), "Observations".into()]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.ticker),
            number(entry.volatility_pct),
            Cell::new(entry.observations).set_alignment(CellAlignment::Right),
        ]);
    }
    titled(&volatility_title(top_n), &table)
}

/// One table per ticker. `tail` keeps only the last N points of each curve.
pub fn cumulative(series: &[CumulativeReturnSeries], top_n: usize, tail: Option<usize>) -> String {
    let mut out = cumulative_title(top_n);
    for curve in series {
        let skip = tail.map_or(0, |n| curve.points.len().saturating_sub(n));
        let mut table = new_table(vec!["Date".into(), "Daily Return (%)".into(), "Cumulative Return (%)".into()]);
        for point in &curve.points[skip..] {
            table.add_row(vec![
                Cell::new(point.date),
                optional(point.daily_return.map(|r| r * 100.0)),
                number(point.cumulative_return_pct),
            ]);
        }
        out.push_str(&format!("\n\n{} (final {:.2}%)\n{table}", curve.ticker, curve.final_return_pct));
    }
    out
}

pub fn sectors(returns: &[SectorReturn]) -> String {
    let mut table = new_table(vec![
        "Sector".into(),
        "Tickers".into(),
        "Average Total Return (%)".into(),
        "Category".into(),
    ]);
    for sector in returns {
        table.add_row(vec![
            Cell::new(&sector.sector),
            Cell::new(sector.tickers).set_alignment(CellAlignment::Right),
            signed(sector.average_return_pct, sector.sign),
            Cell::new(sector.sign.color()),
        ]);
    }
    titled(SECTOR_TITLE, &table)
}

pub fn correlation(matrix: &CorrelationMatrix) -> String {
    let mut header = vec![String::new()];
    header.extend(matrix.tickers.iter().cloned());
    let mut table = new_table(header);
    for (ticker, row) in matrix.tickers.iter().zip(&matrix.values) {
        let mut cells = vec![Cell::new(ticker)];
        cells.extend(row.iter().map(|v| optional(*v)));
        table.add_row(cells);
    }
    titled(CORRELATION_TITLE, &table)
}

pub fn movers(movers: &MonthlyMovers, per_side: usize) -> String {
    let title = movers_title(per_side, &movers.month);
    if movers.is_empty() {
        return format!("{title}\nno data");
    }

    let mut table = new_table(vec![
        "Ticker".into(),
        "Start Price".into(),
        "End Price".into(),
        "Monthly Return (%)".into(),
    ]);
    for mover in &movers.entries {
        table.add_row(vec![
            Cell::new(&mover.ticker),
            price(mover.start_price),
            price(mover.end_price),
            signed(mover.return_pct, mover.sign),
        ]);
    }
    titled(&title, &table)
}

pub fn months(months: &[String]) -> String {
    if months.is_empty() {
        return "no data".to_string();
    }
    months.join("\n")
}
