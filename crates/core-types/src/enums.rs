use serde::{Deserialize, Serialize};

/// Presentation category for a return figure. Renderers map it to a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnSign {
    Positive,
    Negative,
}

impl ReturnSign {
    /// Zero counts as positive. Used for sector averages.
    pub fn non_negative_is_positive(value: f64) -> Self {
        if value >= 0.0 {
            ReturnSign::Positive
        } else {
            ReturnSign::Negative
        }
    }

    /// Zero counts as negative. Used for monthly gainers and losers.
    pub fn strictly_positive(value: f64) -> Self {
        if value > 0.0 {
            ReturnSign::Positive
        } else {
            ReturnSign::Negative
        }
    }

    /// The colour name the dashboard has always used for this category.
    pub fn color(&self) -> &'static str {
        match self {
            ReturnSign::Positive => "green",
            ReturnSign::Negative => "red",
        }
    }
}
