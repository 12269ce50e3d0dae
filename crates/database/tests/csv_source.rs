use core_types::{PriceTable, SectorTable, find_column};
use database::{DbError, load_frame};
use rust_decimal_macros::dec;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name)
}

#[test]
fn loads_price_export_with_nulls() {
    let frame = load_frame(fixture("stock_data.csv")).unwrap();

    assert_eq!(frame.height(), 4);
    assert_eq!(frame.width(), 8);
    // Lookup ignores case, so `Ticker` is reachable as `ticker`.
    let tickers = find_column(&frame, "ticker").unwrap().str().unwrap();
    assert_eq!(tickers.get(2), Some("TCS"));
    let closes = find_column(&frame, "close").unwrap().str().unwrap();
    assert_eq!(closes.get(3), None);

    let prices = PriceTable::from_frame(&frame).unwrap();
    assert_eq!(prices.rows[0].close, Some(dec!(1500.5)));
    assert_eq!(prices.rows[2].volume, None);
    assert_eq!(prices.rows[3].close, None);
    assert_eq!(prices.rows[1].month, "2023-10");
}

#[test]
fn loads_sector_export() {
    let frame = load_frame(fixture("sector_data.csv")).unwrap();
    let sectors = SectorTable::from_frame(&frame).unwrap();

    assert_eq!(sectors.rows.len(), 3);
    assert_eq!(sectors.rows[1].company.as_deref(), Some("Tata Consultancy Services"));
    assert_eq!(sectors.rows[2].sector, None);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_frame(fixture("does_not_exist.csv")).unwrap_err();
    assert!(matches!(err, DbError::Io { .. }));
}

#[test]
fn ragged_rows_are_rejected() {
    let err = load_frame(fixture("ragged.csv")).unwrap_err();
    assert!(matches!(err, DbError::Csv(_)));
}
