use std::time::Duration;

use chrono_tz::Tz;

pub const RTE_BASE_URL: &str = "https://digital.iservices.rte-france.com/";
pub const TOKEN_URL: &str = "https://digital.iservices.rte-france.com/token/oauth/";

/// Path of the short-term consumption endpoint, relative to the base URL.
pub const SHORT_TERM_PATH: &str = "open_api/consumption/v1/short_term";

/// Timezone every returned series is presented in.
pub const DISPLAY_TZ: Tz = chrono_tz::CET;

/// A cached token is only reused while it stays valid beyond this margin.
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 5 * 60;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default grid step, in seconds (15 minutes).
pub const DEFAULT_FREQUENCY_SECS: i64 = 15 * 60;

/// The two-days-ahead forecast is only published at 30-minute granularity.
pub const TWO_DAYS_AHEAD_FREQUENCY_SECS: i64 = 30 * 60;

/// Longest window the short-term endpoint accepts in a single call.
pub const MAX_SHORT_TERM_SPAN_DAYS: i64 = 186;

/// Join a base URL and a relative path, tolerating a missing trailing slash.
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    if base_url.ends_with('/') {
        format!("{}{}", base_url, path)
    } else {
        format!("{}/{}", base_url, path)
    }
}
