//! Short-term consumption queries (`open_api/consumption/v1/short_term`).

use chrono::{DateTime, FixedOffset, SecondsFormat, TimeDelta};
use chrono_tz::Tz;

use crate::config;
use crate::connection::Connection;
use crate::error::{Result, RteError};
use crate::frequency::Frequency;
use crate::models::{ApiService, CanonicalSeries, ForecastType, ShortTermResponse};
use crate::reconcile::reconcile;
use crate::transport::HttpRequest;
use crate::window::{RequestWindow, WindowBound};

// ---------------------------------------------------------------------------
// ConsumptionQuery
// ---------------------------------------------------------------------------

/// Query interface for French national load, realised or forecast.
pub struct ConsumptionQuery<'a> {
    conn: &'a Connection,
}

impl<'a> ConsumptionQuery<'a> {
    /// Create a new `ConsumptionQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Fetch one forecast type over `[start, end)` as a fixed-frequency series.
    ///
    /// Both bounds must carry a timezone offset; a naive bound fails with
    /// [`RteError::Validation`] before any request is made. The provider only
    /// publishes whole days, so the window is widened to whole grid buckets
    /// and the response is reindexed onto that grid, with gaps where values
    /// are missing.
    ///
    /// `frequency` is ignored for [`ForecastType::TwoDaysAhead`], which is
    /// always fetched at 30 minutes.
    ///
    /// Returns an empty series when the provider has no data for the window.
    pub fn short_term(
        &self,
        start: impl Into<WindowBound>,
        end: impl Into<WindowBound>,
        forecast: ForecastType,
        frequency: Frequency,
    ) -> Result<CanonicalSeries> {
        let window = RequestWindow::new(start, end, frequency)?;
        self.short_term_window(&window, forecast)
    }

    /// Same as [`short_term`](Self::short_term) for an already validated window.
    pub fn short_term_window(
        &self,
        window: &RequestWindow,
        forecast: ForecastType,
    ) -> Result<CanonicalSeries> {
        let aligned = effective_window(window, forecast)?;
        let request = build_request(self.conn, &aligned, forecast);

        let body: ShortTermResponse = self
            .conn
            .get_json(request, ApiService::ShortTermConsumption)?;

        series_from_response(body, &aligned, forecast, self.conn.display_tz())
    }
}

/// Window actually requested: frequency override applied, bounds floored/ceiled,
/// and span checked against the provider limit.
pub fn effective_window(window: &RequestWindow, forecast: ForecastType) -> Result<RequestWindow> {
    let frequency = forecast.effective_frequency(window.frequency);
    let aligned = window.with_frequency(frequency).aligned()?;

    let span = aligned.end - aligned.start;
    if span > TimeDelta::days(config::MAX_SHORT_TERM_SPAN_DAYS) {
        return Err(RteError::validation(format!(
            "Requested period of {} days exceeds the {}-day limit",
            span.num_days(),
            config::MAX_SHORT_TERM_SPAN_DAYS
        )));
    }
    Ok(aligned)
}

fn build_request(conn: &Connection, aligned: &RequestWindow, forecast: ForecastType) -> HttpRequest {
    HttpRequest::get(conn.url(config::SHORT_TERM_PATH))
        .query_param("type", forecast.wire_value())
        .query_param("start_date", iso(&aligned.start))
        .query_param("end_date", iso(&aligned.end))
}

/// ISO 8601 with explicit offset, e.g. `2020-01-01T00:00:00+01:00`.
pub fn iso(dt: &DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Validate a decoded response and reconcile it onto the window's grid.
///
/// Every block must echo `forecast`. Empty blocks are skipped; the first
/// non-empty block wins. Later non-empty blocks are still reconciled so their
/// integrity errors surface, then discarded with a warning.
pub fn series_from_response(
    body: ShortTermResponse,
    window: &RequestWindow,
    forecast: ForecastType,
    display_tz: Tz,
) -> Result<CanonicalSeries> {
    let name = forecast.wire_value();
    if body.short_term.is_empty() {
        return Ok(CanonicalSeries::empty(name, window.frequency));
    }

    let mut result: Option<CanonicalSeries> = None;
    for block in &body.short_term {
        let returned: ForecastType = block.prevision_type.parse()?;
        if returned != forecast {
            return Err(RteError::validation(format!(
                "Wrong prevision type returned : {} instead of {}",
                returned, forecast
            )));
        }
        if block.values.is_empty() {
            continue;
        }

        let series = reconcile(
            &block.values,
            &window.start,
            &window.end,
            window.frequency,
            display_tz,
            name,
        )?;
        if result.is_none() {
            result = Some(series);
        } else {
            // TODO: confirm with RTE whether several blocks of one type can cover disjoint periods.
            tracing::warn!(
                prevision_type = name,
                values = block.values.len(),
                "ignoring additional prevision block"
            );
        }
    }

    Ok(result.unwrap_or_else(|| CanonicalSeries::empty(name, window.frequency)))
}
