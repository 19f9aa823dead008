use serde::{Deserialize, Serialize};

use super::series::RawObservation;

// ---------------------------------------------------------------------------
// ShortTermResponse: payload of the short-term consumption endpoint
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShortTermResponse {
    #[serde(default)]
    pub short_term: Vec<PrevisionBlock>,
}

// ---------------------------------------------------------------------------
// PrevisionBlock: one forecast type's values over the requested period
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrevisionBlock {
    /// Wire value of the forecast type, e.g. `"REALISED"` or `"D-1"`.
    #[serde(rename = "type")]
    pub prevision_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub values: Vec<RawObservation>,
}
