//! Call statistics over correlated records

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::types::CorrelatedRecord;

/// Duration buckets as (label, inclusive upper bound in seconds)
const DURATION_BUCKETS: &[(&str, Option<i64>)] = &[
    ("0s", Some(0)),
    ("1-30s", Some(30)),
    ("31-60s", Some(60)),
    ("1-3m", Some(180)),
    ("3-10m", Some(600)),
    (">10m", None),
];

/// Number of calls on one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Number of calls whose duration falls in a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DurationBucket {
    pub label: &'static str,
    pub count: usize,
}

/// Aggregate statistics for a set of calls
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallStats {
    pub total_calls: usize,
    pub transferred_calls: usize,
    /// Calls with any billed time
    pub answered_calls: usize,
    pub total_billsec: i64,
    pub average_billsec: f64,
    /// Calls per day, oldest first
    pub by_day: Vec<DayCount>,
    pub by_duration: Vec<DurationBucket>,
}

impl CallStats {
    /// Compute statistics from correlated records
    pub fn from_records(records: &[CorrelatedRecord]) -> Self {
        let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        let mut buckets = vec![0usize; DURATION_BUCKETS.len()];
        let mut transferred_calls = 0;
        let mut answered_calls = 0;
        let mut total_billsec = 0;

        for record in records {
            *days.entry(record.start_stamp.date()).or_default() += 1;
            buckets[bucket_index(record.duration)] += 1;

            if record.is_transferred() {
                transferred_calls += 1;
            }
            if record.billsec > 0 {
                answered_calls += 1;
            }
            total_billsec += record.billsec.max(0);
        }

        let average_billsec = if records.is_empty() {
            0.0
        } else {
            total_billsec as f64 / records.len() as f64
        };

        Self {
            total_calls: records.len(),
            transferred_calls,
            answered_calls,
            total_billsec,
            average_billsec,
            by_day: days
                .into_iter()
                .map(|(date, count)| DayCount { date, count })
                .collect(),
            by_duration: DURATION_BUCKETS
                .iter()
                .zip(buckets)
                .map(|(&(label, _), count)| DurationBucket { label, count })
                .collect(),
        }
    }
}

fn bucket_index(duration: i64) -> usize {
    DURATION_BUCKETS
        .iter()
        .position(|(_, upper)| upper.map_or(true, |max| duration <= max))
        .unwrap_or(DURATION_BUCKETS.len() - 1)
}
