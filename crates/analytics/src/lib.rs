//! # Stock Insights Analytics Engine
//!
//! This crate turns a long-format daily price table (and a ticker → sector mapping)
//! into the five views of the stock dashboard: volatility ranking, cumulative return
//! curves, sector returns, the close-price correlation matrix and monthly gainers/losers.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of databases,
//!   files or charts. It depends only on `core-types` (Layer 0).
//! - **Prepare Once:** Every view starts from `PreparedPrices`, the table sorted by
//!   (ticker, date) with per-ticker daily returns and a ticker → rows grouping map.
//! - **No Magic Numbers:** Anything that can be undefined for lack of data is an
//!   `Option` in the reports; no view ever emits NaN.
//! - **Explicit Selectors:** The month shown by the gainers/losers view is a plain
//!   argument. The engine keeps no notion of a "current" selection.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: stateless facade over the views, configured by `RankingLimits`.
//! - `PreparedPrices` / `prepare`: the shared preparation step.
//! - The report types in `report` (`VolatilityEntry`, `CumulativeReturnSeries`, ...).
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

pub mod correlation;
pub mod cumulative;
pub mod engine;
pub mod error;
pub mod monthly;
pub mod prepare;
pub mod report;
pub mod sector;
pub mod volatility;

mod stats;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{AnalyticsEngine, RankingLimits};
pub use error::AnalyticsError;
pub use prepare::{PreparedPrices, PreparedRow, prepare};
pub use report::{
    CorrelationMatrix, CumulativePoint, CumulativeReturnSeries, Dashboard, MonthlyMover, MonthlyMovers,
    MonthlyReturn, SectorReturn, TickerTotalReturn, VolatilityEntry,
};
