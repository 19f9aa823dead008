use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ApiService: RTE API surface a credential/token applies to
// ---------------------------------------------------------------------------

/// Each RTE API surface is subscribed to separately and issues its own
/// client credentials, so tokens are cached per service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiService {
    WholesaleMarket,
    ShortTermConsumption,
}

impl ApiService {
    /// Every service the client knows about.
    pub const ALL: [ApiService; 2] = [ApiService::WholesaleMarket, ApiService::ShortTermConsumption];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiService::WholesaleMarket => "wholesale_market",
            ApiService::ShortTermConsumption => "short_term_consumption",
        }
    }
}

impl fmt::Display for ApiService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
