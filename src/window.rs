//! Request windows and the bounds they are built from.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};

use crate::error::{Result, RteError};
use crate::frequency::Frequency;

/// One end of a requested window, as supplied by the caller.
///
/// Only [`WindowBound::Aware`] bounds can be turned into a [`RequestWindow`];
/// the naive variant exists so that a missing offset is reported as a
/// [`RteError::Validation`] instead of being silently interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowBound {
    Aware(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

impl WindowBound {
    /// The timezone-aware instant, or a validation error naming `which` bound is naive.
    pub fn require_aware(&self, which: &str) -> Result<DateTime<FixedOffset>> {
        match self {
            WindowBound::Aware(dt) => Ok(*dt),
            WindowBound::Naive(naive) => Err(RteError::validation(format!(
                "{} timestamp {} must be timezone-aware",
                which, naive
            ))),
        }
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for WindowBound {
    fn from(dt: DateTime<Tz>) -> Self {
        WindowBound::Aware(dt.fixed_offset())
    }
}

impl From<NaiveDateTime> for WindowBound {
    fn from(naive: NaiveDateTime) -> Self {
        WindowBound::Naive(naive)
    }
}

impl From<NaiveDate> for WindowBound {
    fn from(date: NaiveDate) -> Self {
        WindowBound::Naive(date.and_time(chrono::NaiveTime::MIN))
    }
}

/// Accepts RFC 3339 timestamps, or naive `YYYY-MM-DD[THH:MM:SS]` strings.
impl FromStr for WindowBound {
    type Err = RteError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(WindowBound::Aware(dt));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(WindowBound::Naive(naive));
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(WindowBound::from)
            .map_err(|e| RteError::validation_with(format!("Invalid timestamp '{}'", s), e))
    }
}

/// A timezone-aware `[start, end)` window sampled at a fixed frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub frequency: Frequency,
}

impl RequestWindow {
    /// Validate and build a window.
    ///
    /// Fails with [`RteError::Validation`] if either bound lacks an offset or
    /// if `end` is not after `start`.
    pub fn new(
        start: impl Into<WindowBound>,
        end: impl Into<WindowBound>,
        frequency: Frequency,
    ) -> Result<Self> {
        let start = start.into().require_aware("start")?;
        let end = end.into().require_aware("end")?;
        if end <= start {
            return Err(RteError::validation(format!(
                "end ({}) must be after start ({})",
                end, start
            )));
        }
        Ok(Self {
            start,
            end,
            frequency,
        })
    }

    /// Same window with another frequency.
    pub fn with_frequency(self, frequency: Frequency) -> Self {
        Self { frequency, ..self }
    }

    pub fn floored_start(&self) -> Result<DateTime<FixedOffset>> {
        self.frequency.floor(&self.start)
    }

    pub fn ceiled_end(&self) -> Result<DateTime<FixedOffset>> {
        self.frequency.ceil(&self.end)
    }

    /// Window widened outward to whole grid buckets.
    pub fn aligned(&self) -> Result<Self> {
        Ok(Self {
            start: self.floored_start()?,
            end: self.ceiled_end()?,
            frequency: self.frequency,
        })
    }

    /// Number of grid instants in `[floor(start), ceil(end))`.
    pub fn bucket_count(&self) -> Result<usize> {
        let aligned = self.aligned()?;
        let span = (aligned.end - aligned.start).num_seconds();
        Ok((span / self.frequency.as_secs()) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aware_and_naive_strings() {
        assert!(matches!(
            "2020-01-01T00:00:00+01:00".parse::<WindowBound>().unwrap(),
            WindowBound::Aware(_)
        ));
        assert!(matches!(
            "2020-01-01T00:00:00".parse::<WindowBound>().unwrap(),
            WindowBound::Naive(_)
        ));
        assert!(matches!(
            "2020-01-01".parse::<WindowBound>().unwrap(),
            WindowBound::Naive(_)
        ));
        assert!("yesterday".parse::<WindowBound>().is_err());
    }

    #[test]
    fn rejects_naive_bounds() {
        let start: WindowBound = "2020-01-01T00:00:00".parse().unwrap();
        let end: WindowBound = "2020-01-02T00:00:00+01:00".parse().unwrap();
        let err = RequestWindow::new(start, end, Frequency::default()).unwrap_err();
        assert!(matches!(err, RteError::Validation { .. }));
        assert!(err.to_string().contains("timezone-aware"));
    }

    #[test]
    fn rejects_inverted_window() {
        let start: WindowBound = "2020-01-02T00:00:00+01:00".parse().unwrap();
        let end: WindowBound = "2020-01-01T00:00:00+01:00".parse().unwrap();
        assert!(RequestWindow::new(start, end, Frequency::default()).is_err());
    }

    #[test]
    fn bucket_count_covers_partial_buckets() {
        let start: WindowBound = "2020-01-01T00:07:00+01:00".parse().unwrap();
        let end: WindowBound = "2020-01-01T01:01:00+01:00".parse().unwrap();
        let window = RequestWindow::new(start, end, Frequency::default()).unwrap();
        // 00:00 .. 01:15
        assert_eq!(window.bucket_count().unwrap(), 5);
    }
}
