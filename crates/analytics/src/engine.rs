use crate::correlation::correlation_matrix;
use crate::cumulative::track_cumulative_returns;
use crate::error::AnalyticsError;
use crate::monthly::{available_months, select_movers};
use crate::prepare::{PreparedPrices, prepare};
use crate::report::{
    CorrelationMatrix, CumulativeReturnSeries, Dashboard, MonthlyMovers, SectorReturn, VolatilityEntry,
};
use crate::sector::aggregate_sector_returns;
use crate::volatility::rank_volatility;
use core_types::{PriceTable, SectorTable};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// How many rows each ranked view keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingLimits {
    pub volatility_top_n: usize,
    pub cumulative_top_n: usize,
    /// Gainers kept, and separately losers kept, for a month.
    pub movers_per_side: usize,
}

impl Default for RankingLimits {
    fn default() -> Self {
        Self {
            volatility_top_n: 10,
            cumulative_top_n: 5,
            movers_per_side: 5,
        }
    }
}

impl RankingLimits {
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        let checks = [
            ("volatility_top_n", self.volatility_top_n),
            ("cumulative_top_n", self.cumulative_top_n),
            ("movers_per_side", self.movers_per_side),
        ];
        match checks.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(AnalyticsError::InvalidLimits(name.to_string())),
            None => Ok(()),
        }
    }
}

/// A stateless calculator turning a price/sector snapshot into chart-ready views.
///
/// Every method is a pure function of its arguments. Callers that need several views
/// should `prepare` once and pass the result to each view, or use `dashboard`.
#[derive(Debug, Default, Clone)]
pub struct AnalyticsEngine {
    limits: RankingLimits,
}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: RankingLimits) -> Result<Self, AnalyticsError> {
        limits.validate()?;
        Ok(Self { limits })
    }

    pub fn limits(&self) -> RankingLimits {
        self.limits
    }

    /// Reads loader frames into the typed tables, failing on a missing column.
    pub fn load_tables(&self, prices: &DataFrame, sectors: &DataFrame) -> Result<(PriceTable, SectorTable), AnalyticsError> {
        let prices = PriceTable::from_frame(prices)?;
        let sectors = SectorTable::from_frame(sectors)?;
        tracing::info!(price_rows = prices.len(), sector_rows = sectors.len(), "Loaded input tables");
        Ok((prices, sectors))
    }

    /// The shared first step: sort by (ticker, date) and attach daily returns.
    pub fn prepare(&self, prices: &PriceTable) -> PreparedPrices {
        prepare(prices)
    }

    pub fn volatility(&self, prices: &PreparedPrices) -> Vec<VolatilityEntry> {
        rank_volatility(prices, self.limits.volatility_top_n)
    }

    pub fn cumulative_returns(&self, prices: &PreparedPrices) -> Vec<CumulativeReturnSeries> {
        track_cumulative_returns(prices, self.limits.cumulative_top_n)
    }

    pub fn sector_returns(&self, prices: &PreparedPrices, sectors: &SectorTable) -> Vec<SectorReturn> {
        aggregate_sector_returns(prices, sectors)
    }

    pub fn correlation(&self, prices: &PreparedPrices) -> CorrelationMatrix {
        correlation_matrix(prices)
    }

    pub fn available_months(&self, prices: &PreparedPrices) -> Vec<String> {
        available_months(prices)
    }

    /// Gainers and losers for a caller-selected month label.
    pub fn monthly_movers(&self, prices: &PreparedPrices, month: &str) -> MonthlyMovers {
        select_movers(prices, month, self.limits.movers_per_side)
    }

    /// Runs every view that needs no selector over one snapshot.
    pub fn dashboard(&self, prices: &PriceTable, sectors: &SectorTable) -> Dashboard {
        let prepared = self.prepare(prices);
        let dashboard = Dashboard {
            volatility: self.volatility(&prepared),
            cumulative_returns: self.cumulative_returns(&prepared),
            sector_returns: self.sector_returns(&prepared, sectors),
            correlation: self.correlation(&prepared),
            months: self.available_months(&prepared),
        };
        tracing::info!(
            tickers = prepared.ticker_count(),
            sectors = dashboard.sector_returns.len(),
            months = dashboard.months.len(),
            "Dashboard computed"
        );
        dashboard
    }

    /// `load_tables` followed by `dashboard`.
    pub fn dashboard_from_frames(&self, prices: &DataFrame, sectors: &DataFrame) -> Result<Dashboard, AnalyticsError> {
        let (prices, sectors) = self.load_tables(prices, sectors)?;
        Ok(self.dashboard(&prices, &sectors))
    }
}
