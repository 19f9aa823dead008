use std::fmt;

use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::frequency::Frequency;

// ---------------------------------------------------------------------------
// RawObservation: one data point as returned by the provider
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<String>,
}

impl RawObservation {
    pub fn new(start_date: impl Into<String>, value: f64) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: None,
            value,
            updated_date: None,
        }
    }
}

// ---------------------------------------------------------------------------
// CanonicalSeries: fixed-frequency, gap-explicit series
// ---------------------------------------------------------------------------

/// Ordered `(instant, value-or-gap)` points on a fixed grid.
///
/// A gap is `None`. An empty series means the provider returned nothing at all,
/// which is distinct from a series whose every point is a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalSeries {
    name: String,
    frequency: Frequency,
    points: Vec<(DateTime<Tz>, Option<f64>)>,
}

impl CanonicalSeries {
    pub fn new(
        name: impl Into<String>,
        frequency: Frequency,
        points: Vec<(DateTime<Tz>, Option<f64>)>,
    ) -> Self {
        Self {
            name: name.into(),
            frequency,
            points,
        }
    }

    /// The canonical "provider returned nothing" result.
    pub fn empty(name: impl Into<String>, frequency: Frequency) -> Self {
        Self::new(name, frequency, Vec::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(DateTime<Tz>, Option<f64>)> {
        self.points.iter()
    }

    pub fn points(&self) -> &[(DateTime<Tz>, Option<f64>)] {
        &self.points
    }

    pub fn first(&self) -> Option<&(DateTime<Tz>, Option<f64>)> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&(DateTime<Tz>, Option<f64>)> {
        self.points.last()
    }

    /// Value at `instant`: `None` if off-grid, `Some(None)` for a gap.
    pub fn get<Z: TimeZone>(&self, instant: &DateTime<Z>) -> Option<Option<f64>> {
        self.points
            .binary_search_by(|(ts, _)| ts.timestamp().cmp(&instant.timestamp()))
            .ok()
            .map(|idx| self.points[idx].1)
    }

    pub fn gap_count(&self) -> usize {
        self.points.iter().filter(|(_, v)| v.is_none()).count()
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|(_, v)| *v).collect()
    }

    pub fn into_points(self) -> Vec<(DateTime<Tz>, Option<f64>)> {
        self.points
    }
}

impl<'a> IntoIterator for &'a CanonicalSeries {
    type Item = &'a (DateTime<Tz>, Option<f64>);
    type IntoIter = std::slice::Iter<'a, (DateTime<Tz>, Option<f64>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Rendered like a pandas series: head and tail rows, then a summary line.
impl fmt::Display for CanonicalSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const EDGE: usize = 5;
        fn row(f: &mut fmt::Formatter<'_>, point: &(DateTime<Tz>, Option<f64>)) -> fmt::Result {
            let ts = point.0.format("%Y-%m-%d %H:%M:%S%:z");
            match point.1 {
                Some(v) => writeln!(f, "{}    {}", ts, v),
                None => writeln!(f, "{}    NaN", ts),
            }
        }

        writeln!(f, "date")?;
        if self.points.len() <= 2 * EDGE {
            for p in &self.points {
                row(f, p)?;
            }
        } else {
            for p in &self.points[..EDGE] {
                row(f, p)?;
            }
            writeln!(f, "...")?;
            for p in &self.points[self.points.len() - EDGE..] {
                row(f, p)?;
            }
        }
        write!(
            f,
            "Freq: {}, Name: {}, Length: {}",
            self.frequency,
            self.name,
            self.points.len()
        )
    }
}
