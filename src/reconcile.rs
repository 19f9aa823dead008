//! Reindexing of raw provider observations onto a canonical time grid.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;

use crate::error::{Result, RteError};
use crate::frequency::Frequency;
use crate::models::{CanonicalSeries, RawObservation};

/// Grid construction failures, reported as the cause of a reindexing error.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("grid end {end} precedes start {start}")]
    Inverted {
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },

    #[error("grid instant after {0} is out of range")]
    OutOfRange(DateTime<Utc>),
}

/// Half-open `[floor(start), ceil(end))` grid at `frequency`, as UTC instants.
pub fn canonical_grid(
    start: &DateTime<FixedOffset>,
    end: &DateTime<FixedOffset>,
    frequency: Frequency,
) -> Result<Vec<DateTime<Utc>>> {
    let first = frequency.floor(start)?;
    let stop = frequency.ceil(end)?;
    build_grid(first, stop, frequency)
        .map_err(|e| RteError::validation_with(format!("Reindexing failed: {}", e), e))
}

fn build_grid(
    first: DateTime<FixedOffset>,
    stop: DateTime<FixedOffset>,
    frequency: Frequency,
) -> std::result::Result<Vec<DateTime<Utc>>, GridError> {
    if stop < first {
        return Err(GridError::Inverted {
            start: first,
            end: stop,
        });
    }

    let stop = stop.with_timezone(&Utc);
    let step = frequency.as_delta();
    let mut grid = Vec::new();
    let mut current = first.with_timezone(&Utc);
    while current < stop {
        grid.push(current);
        current = current
            .checked_add_signed(step)
            .ok_or(GridError::OutOfRange(current))?;
    }
    Ok(grid)
}

/// Reindex `raw` onto the canonical grid of `[start, end)` and present it in `display_tz`.
///
/// Grid instants without an observation become explicit gaps; observations
/// falling outside the grid are dropped. An empty `raw` yields an empty series
/// rather than a grid full of gaps.
///
/// # Errors
///
/// * [`RteError::DataIntegrity`] if two observations share a timestamp.
/// * [`RteError::Validation`] if a timestamp cannot be parsed or the grid
///   cannot be built.
pub fn reconcile(
    raw: &[RawObservation],
    start: &DateTime<FixedOffset>,
    end: &DateTime<FixedOffset>,
    frequency: Frequency,
    display_tz: Tz,
    name: &str,
) -> Result<CanonicalSeries> {
    if raw.is_empty() {
        return Ok(CanonicalSeries::empty(name, frequency));
    }

    let mut lookup: BTreeMap<DateTime<Utc>, f64> = BTreeMap::new();
    for obs in raw {
        let ts = DateTime::parse_from_rfc3339(&obs.start_date)
            .map_err(|e| {
                RteError::validation_with(
                    format!("Invalid observation timestamp '{}'", obs.start_date),
                    e,
                )
            })?
            .with_timezone(&Utc);
        if lookup.insert(ts, obs.value).is_some() {
            return Err(RteError::DataIntegrity(format!(
                "Index has duplicate keys: {}",
                obs.start_date
            )));
        }
    }

    let grid = canonical_grid(start, end, frequency)?;
    let points: Vec<(DateTime<Tz>, Option<f64>)> = grid
        .iter()
        .map(|ts| (ts.with_timezone(&display_tz), lookup.get(ts).copied()))
        .collect();

    let matched = points.iter().filter(|(_, v)| v.is_some()).count();
    tracing::debug!(
        grid = points.len(),
        gaps = points.len() - matched,
        dropped = lookup.len() - matched,
        "reconciled observations"
    );

    Ok(CanonicalSeries::new(name, frequency, points))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn grid_is_half_open() {
        let grid = canonical_grid(
            &ts("2020-01-01T00:00:00+01:00"),
            &ts("2020-01-01T01:00:00+01:00"),
            Frequency::default(),
        )
        .unwrap();
        assert_eq!(grid.len(), 4);
        assert_eq!(grid[0], ts("2020-01-01T00:00:00+01:00"));
        assert_eq!(grid[3], ts("2020-01-01T00:45:00+01:00"));
    }

    #[test]
    fn inverted_grid_is_a_reindexing_failure() {
        let err = canonical_grid(
            &ts("2020-01-02T00:00:00+01:00"),
            &ts("2020-01-01T00:00:00+01:00"),
            Frequency::default(),
        )
        .unwrap_err();
        match err {
            RteError::Validation { message, source } => {
                assert!(message.starts_with("Reindexing failed"));
                assert!(source.is_some());
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
