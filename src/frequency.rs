//! Fixed-size grid step and the floor/ceil arithmetic used to align windows.
//!
//! Alignment happens on the local wall clock of the instant's own offset, so a
//! `+01:00` midnight stays a midnight. For whole-hour offsets this is the same
//! grid as the UTC one.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, TimeDelta};

use crate::config;
use crate::error::{Result, RteError};

/// A strictly positive, whole-second step between consecutive grid instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Frequency {
    secs: i64,
}

impl Frequency {
    /// Build a frequency from a duration.
    ///
    /// Fails with [`RteError::Validation`] unless the duration is positive and a
    /// whole number of seconds.
    pub fn new(step: TimeDelta) -> Result<Self> {
        if step <= TimeDelta::zero() || step.subsec_nanos() != 0 {
            return Err(RteError::validation(format!(
                "Frequency must be a positive whole number of seconds, got {}",
                step
            )));
        }
        Ok(Self {
            secs: step.num_seconds(),
        })
    }

    pub fn minutes(minutes: u32) -> Result<Self> {
        Self::new(TimeDelta::minutes(i64::from(minutes)))
    }

    pub(crate) fn from_secs(secs: i64) -> Self {
        debug_assert!(secs > 0);
        Self { secs }
    }

    pub fn as_secs(&self) -> i64 {
        self.secs
    }

    pub fn as_delta(&self) -> TimeDelta {
        TimeDelta::seconds(self.secs)
    }

    /// Largest grid instant that is `<= dt`.
    pub fn floor(&self, dt: &DateTime<FixedOffset>) -> Result<DateTime<FixedOffset>> {
        let wall = dt.naive_local().and_utc().timestamp();
        let behind = TimeDelta::seconds(wall.rem_euclid(self.secs))
            + TimeDelta::nanoseconds(i64::from(dt.timestamp_subsec_nanos()));
        dt.checked_sub_signed(behind)
            .ok_or_else(|| RteError::validation(format!("Cannot floor {} to {}", dt, self)))
    }

    /// Smallest grid instant that is `>= dt`.
    pub fn ceil(&self, dt: &DateTime<FixedOffset>) -> Result<DateTime<FixedOffset>> {
        let floored = self.floor(dt)?;
        if floored == *dt {
            return Ok(floored);
        }
        floored
            .checked_add_signed(self.as_delta())
            .ok_or_else(|| RteError::validation(format!("Cannot ceil {} to {}", dt, self)))
    }

    /// Whether `dt` sits exactly on the grid.
    pub fn is_aligned(&self, dt: &DateTime<FixedOffset>) -> bool {
        matches!(self.floor(dt), Ok(floored) if floored == *dt)
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Self::from_secs(config::DEFAULT_FREQUENCY_SECS)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const DAY: i64 = 86_400;
        const HOUR: i64 = 3_600;
        const MINUTE: i64 = 60;
        if self.secs % DAY == 0 {
            write!(f, "{}D", self.secs / DAY)
        } else if self.secs % HOUR == 0 {
            write!(f, "{}h", self.secs / HOUR)
        } else if self.secs % MINUTE == 0 {
            write!(f, "{}min", self.secs / MINUTE)
        } else {
            write!(f, "{}s", self.secs)
        }
    }
}

/// Parses pandas-style offset aliases: `"15min"`, `"30T"`, `"1h"`, `"h"`, `"45s"`, `"1D"`.
impl FromStr for Frequency {
    type Err = RteError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(s.len());
        let (digits, unit) = s.split_at(split);

        let count: i64 = if digits.is_empty() {
            1
        } else {
            digits
                .parse()
                .map_err(|e| RteError::validation_with(format!("Invalid frequency '{}'", s), e))?
        };

        let unit_secs = match unit {
            "s" | "S" | "sec" => 1,
            "min" | "T" | "m" => 60,
            "h" | "H" => 3_600,
            "d" | "D" => 86_400,
            _ => {
                return Err(RteError::validation(format!(
                    "Invalid frequency '{}': unknown unit '{}'",
                    s, unit
                )))
            }
        };

        let secs = count
            .checked_mul(unit_secs)
            .ok_or_else(|| RteError::validation(format!("Invalid frequency '{}': overflow", s)))?;
        if secs <= 0 {
            return Err(RteError::validation(format!(
                "Invalid frequency '{}': must be positive",
                s
            )));
        }
        if TimeDelta::try_seconds(secs).is_none() {
            return Err(RteError::validation(format!(
                "Invalid frequency '{}': step out of range",
                s
            )));
        }
        Ok(Self { secs })
    }
}
