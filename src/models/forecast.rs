use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::RteError;
use crate::frequency::Frequency;

// ---------------------------------------------------------------------------
// ForecastType: realised, corrected, or forecast at varying lead times
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForecastType {
    #[serde(rename = "REALISED")]
    Realised,
    #[serde(rename = "CORRECTED")]
    Corrected,
    #[serde(rename = "ID")]
    Intraday,
    #[serde(rename = "D-1")]
    DayAhead,
    #[serde(rename = "D-2")]
    TwoDaysAhead,
}

impl ForecastType {
    pub const ALL: [ForecastType; 5] = [
        ForecastType::Realised,
        ForecastType::Corrected,
        ForecastType::Intraday,
        ForecastType::DayAhead,
        ForecastType::TwoDaysAhead,
    ];

    /// Value sent in the `type` query parameter and echoed back in responses.
    pub fn wire_value(&self) -> &'static str {
        match self {
            ForecastType::Realised => "REALISED",
            ForecastType::Corrected => "CORRECTED",
            ForecastType::Intraday => "ID",
            ForecastType::DayAhead => "D-1",
            ForecastType::TwoDaysAhead => "D-2",
        }
    }

    /// Granularity forced by the provider, overriding whatever the caller asked for.
    pub fn frequency_override(&self) -> Option<Frequency> {
        match self {
            ForecastType::TwoDaysAhead => {
                Some(Frequency::from_secs(config::TWO_DAYS_AHEAD_FREQUENCY_SECS))
            }
            _ => None,
        }
    }

    /// Frequency actually used for a request of this type.
    pub fn effective_frequency(&self, requested: Frequency) -> Frequency {
        self.frequency_override().unwrap_or(requested)
    }
}

impl fmt::Display for ForecastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_value())
    }
}

impl FromStr for ForecastType {
    type Err = RteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ForecastType::ALL
            .into_iter()
            .find(|t| t.wire_value() == s)
            .ok_or_else(|| RteError::validation(format!("Unknown prevision type: {}", s)))
    }
}
