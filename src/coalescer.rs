//! Interval coalescing for journal activity records
//!
//! Journal intervals are grouped by activity, sorted by start time and
//! walked once. Consecutive intervals are merged into a span while the
//! merge rule holds; every span contributes its inclusive day count to the
//! activity's total.
//!
//! # Merge rules
//!
//! - [`MergeRule::Adjacent`] (default) extends a span only when an interval
//!   ends on the same calendar day the next one starts. An interval that
//!   starts strictly before the previous one ends is *not* merged and its
//!   days are counted again.
//! - [`MergeRule::Overlapping`] also merges intervals whose start date falls
//!   on or before the span's latest end date, so overlapping days count once.
//!
//! # Examples
//!
//! ```
//! use fieldroll::coalescer::{coalesce, MergeRule};
//! use fieldroll::types::{ActivityId, JournalRecord};
//! use chrono::NaiveDate;
//!
//! let at = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap().and_hms_opt(8, 0, 0).unwrap();
//! let record = |start, end| JournalRecord {
//!     activity_id: ActivityId::new("A-1"),
//!     start_time: at(start),
//!     end_time: at(end),
//!     geounit_code: "NSA".to_string(),
//! };
//!
//! let activities = coalesce(vec![record(1, 5), record(5, 10)], MergeRule::Adjacent);
//! assert_eq!(activities[0].value, 10);
//! ```

use crate::types::{ActivityId, CoalescedActivity, JournalRecord};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Rule deciding whether the next interval extends the current span
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeRule {
    /// Merge only when the current interval's end date equals the next
    /// interval's start date
    #[default]
    Adjacent,
    /// Merge whenever the next interval starts on or before the span's end date
    Overlapping,
}

impl fmt::Display for MergeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Adjacent => write!(f, "adjacent"),
            Self::Overlapping => write!(f, "overlapping"),
        }
    }
}

impl std::str::FromStr for MergeRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "adjacent" => Ok(Self::Adjacent),
            "overlapping" => Ok(Self::Overlapping),
            _ => Err(format!("Invalid merge rule: {s}")),
        }
    }
}

/// A maximal run of merged intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Span {
    /// Days covered, both boundary dates inclusive
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Walks intervals sorted by start time and yields merged spans
///
/// State is the scan cursor: the index of the first interval not yet
/// assigned to a span. Each step opens a span at the cursor, extends it
/// while the merge rule holds, and moves the cursor past the last merged
/// interval. The walk ends when the cursor is exhausted.
pub struct SpanScanner<'a> {
    records: &'a [JournalRecord],
    cursor: usize,
    rule: MergeRule,
}

impl<'a> SpanScanner<'a> {
    /// `records` must already be sorted by start time
    pub fn new(records: &'a [JournalRecord], rule: MergeRule) -> Self {
        Self {
            records,
            cursor: 0,
            rule,
        }
    }

    fn extends(&self, span_end: NaiveDate, next: &JournalRecord) -> bool {
        let next_start = next.start_time.date();
        match self.rule {
            MergeRule::Adjacent => span_end == next_start,
            MergeRule::Overlapping => next_start <= span_end,
        }
    }
}

impl Iterator for SpanScanner<'_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        let first = self.records.get(self.cursor)?;
        let start = first.start_time.date();
        let mut end = first.end_time.date();
        let mut last = self.cursor;

        while let Some(next) = self.records.get(last + 1) {
            if !self.extends(end, next) {
                break;
            }
            last += 1;
            let next_end = next.end_time.date();
            end = match self.rule {
                // The span closes on the last merged interval's own end date
                MergeRule::Adjacent => next_end,
                MergeRule::Overlapping => end.max(next_end),
            };
        }

        self.cursor = last + 1;
        Some(Span { start, end })
    }
}

/// Total inclusive days over the merged spans of sorted intervals
pub fn count_days(sorted: &[JournalRecord], rule: MergeRule) -> i64 {
    SpanScanner::new(sorted, rule).map(|span| span.days()).sum()
}

/// Coalesce one activity's intervals
///
/// Sorts by start time (stable, so ties keep input order) and returns
/// `None` for an empty group.
pub fn coalesce_group(
    mut records: Vec<JournalRecord>,
    rule: MergeRule,
) -> Option<CoalescedActivity> {
    records.sort_by_key(|r| r.start_time);

    let first = records.first()?;
    let last = records.last()?;
    let value = count_days(&records, rule);

    Some(CoalescedActivity {
        geounit_code: first.geounit_code.clone(),
        activity_id: first.activity_id.clone(),
        value,
        oa_start: first.start_time,
        oa_end: last.end_time,
    })
}

/// Coalesce journal records into one row per activity, ordered by activity id
pub fn coalesce(
    records: impl IntoIterator<Item = JournalRecord>,
    rule: MergeRule,
) -> Vec<CoalescedActivity> {
    let mut groups: BTreeMap<ActivityId, Vec<JournalRecord>> = BTreeMap::new();
    let mut count = 0usize;

    for record in records {
        count += 1;
        groups
            .entry(record.activity_id.clone())
            .or_default()
            .push(record);
    }

    let activities: Vec<_> = groups
        .into_values()
        .filter_map(|group| coalesce_group(group, rule))
        .collect();

    debug!(
        "Coalesced {} journal records into {} activities ({} rule)",
        count,
        activities.len(),
        rule
    );

    activities
}
