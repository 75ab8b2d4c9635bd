//! Screentime accumulation over half-open time intervals.
//!
//! An [`IntervalAccumulator`] collects `[start, end)` spans (in seconds) and
//! reports their total duration under one of two addition methods:
//!
//! - [`AdditionMethod::Union`] - overlapping or touching spans collapse, so
//!   the duration is the measure of the union
//! - [`AdditionMethod::Normal`] - every span counts in full, overlaps are
//!   counted twice
//!
//! Merging is deferred: spans are appended in O(1) and compacted on the first
//! read after a mutation. The compacted form is cached in a `OnceCell`, so the
//! accumulator is not `Sync`.
//!
//! # Example
//!
//! ```
//! use metareader::{AdditionMethod, IntervalAccumulator};
//!
//! let mut union = IntervalAccumulator::new(AdditionMethod::Union);
//! union.add_interval(0.0, 10.0);
//! union.add_interval(5.0, 15.0);
//! assert_eq!(union.total(), 15.0);
//!
//! let mut normal = IntervalAccumulator::new(AdditionMethod::Normal);
//! normal.add_interval(0.0, 10.0);
//! normal.add_interval(5.0, 15.0);
//! assert_eq!(normal.total(), 20.0);
//! ```

use std::cell::OnceCell;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{MetareaderError, Result};

/// How durations are added together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdditionMethod {
    /// Measure of the union of all spans.
    #[default]
    Union,
    /// Plain sum of span lengths.
    Normal,
}

impl AdditionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdditionMethod::Union => "union",
            AdditionMethod::Normal => "normal",
        }
    }
}

impl FromStr for AdditionMethod {
    type Err = MetareaderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "union" => Ok(AdditionMethod::Union),
            "normal" => Ok(AdditionMethod::Normal),
            other => Err(MetareaderError::invalid("addition_method", other)),
        }
    }
}

impl fmt::Display for AdditionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A half-open time span `[start, end)` in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Length of the span. Inverted spans have length zero.
    pub fn length(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Length of the part of this span inside `[start, end)`.
    ///
    /// `None` leaves that side unbounded.
    pub fn clipped_length(&self, start: Option<f64>, end: Option<f64>) -> f64 {
        let from = match start {
            Some(s) if s > self.start => s,
            _ => self.start,
        };
        let to = match end {
            Some(e) if e < self.end => e,
            _ => self.end,
        };
        if from < to {
            to - from
        } else {
            0.0
        }
    }
}

/// Sort spans by start and sweep them into a minimal set of disjoint spans.
///
/// Spans touching at an endpoint (`next.start == current.end`) are merged.
/// Inverted spans are dropped.
pub fn merge_intervals(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.retain(|i| i.end >= i.start);
    intervals.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some(current) if interval.start <= current.end => {
                if interval.end > current.end {
                    current.end = interval.end;
                }
            }
            _ => merged.push(interval),
        }
    }
    merged
}

type Groups = BTreeMap<Option<String>, Vec<Interval>>;

/// Accumulates screentime spans, optionally split into groups.
///
/// Each group key (e.g. a detection ID) is merged independently; spans added
/// without a key form a group of their own. The total is the sum over groups.
#[derive(Debug, Clone)]
pub struct IntervalAccumulator {
    method: AdditionMethod,
    groups: Groups,
    compacted: OnceCell<Groups>,
}

impl Default for IntervalAccumulator {
    fn default() -> Self {
        Self::new(AdditionMethod::default())
    }
}

impl IntervalAccumulator {
    pub fn new(method: AdditionMethod) -> Self {
        Self {
            method,
            groups: BTreeMap::new(),
            compacted: OnceCell::new(),
        }
    }

    pub fn method(&self) -> AdditionMethod {
        self.method
    }

    /// True when no span has been added.
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }

    /// Add an ungrouped span.
    pub fn add_interval(&mut self, start: f64, end: f64) {
        self.push(None, Interval::new(start, end));
    }

    /// Add a span under `group`. Unseen groups are created.
    pub fn add_grouped(&mut self, start: f64, end: f64, group: impl Into<String>) {
        self.push(Some(group.into()), Interval::new(start, end));
    }

    /// Merge every span of `other` (with its group) into this accumulator.
    ///
    /// Both accumulators must use the same addition method.
    pub fn merge(&mut self, other: &IntervalAccumulator) -> Result<()> {
        if other.method != self.method {
            return Err(MetareaderError::AdditionMethodMismatch {
                this: self.method.to_string(),
                other: other.method.to_string(),
            });
        }
        for (group, intervals) in &other.groups {
            self.groups
                .entry(group.clone())
                .or_default()
                .extend(intervals.iter().copied());
        }
        self.compacted.take();
        Ok(())
    }

    /// Total duration in seconds.
    pub fn total(&self) -> f64 {
        self.compacted()
            .values()
            .flatten()
            .map(Interval::length)
            .sum()
    }

    /// Duration clipped to `[start, end)`. `None` leaves a side unbounded.
    pub fn duration_between(&self, start: Option<f64>, end: Option<f64>) -> f64 {
        self.compacted()
            .values()
            .flatten()
            .map(|interval| interval.clipped_length(start, end))
            .sum()
    }

    /// Compacted spans of all groups, in group order.
    pub fn intervals(&self) -> impl Iterator<Item = &Interval> {
        self.compacted().values().flatten()
    }

    fn push(&mut self, group: Option<String>, interval: Interval) {
        self.groups.entry(group).or_default().push(interval);
        self.compacted.take();
    }

    fn compacted(&self) -> &Groups {
        self.compacted.get_or_init(|| match self.method {
            AdditionMethod::Union => self
                .groups
                .iter()
                .map(|(group, intervals)| (group.clone(), merge_intervals(intervals.clone())))
                .collect(),
            AdditionMethod::Normal => self.groups.clone(),
        })
    }
}

impl PartialEq for IntervalAccumulator {
    fn eq(&self, other: &Self) -> bool {
        self.total() == other.total()
    }
}

impl PartialOrd for IntervalAccumulator {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.total().partial_cmp(&other.total())
    }
}

impl fmt::Display for IntervalAccumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.total())
    }
}
