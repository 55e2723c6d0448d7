use std::collections::HashMap;

use chrono::NaiveDate;
use itertools::Itertools;

use crate::api::{AggregateFilter, FetchError, LapisClient};
use crate::config::{ReportConfig, RESTRICTED_TERMS};
use crate::months::{trailing_months, MonthWindow};

/// One month of submission counts for a pathogen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyPoint {
    pub label: String,
    pub total: u64,
    pub bulk: u64,
}

impl MonthlyPoint {
    /// Submissions not routed through the bulk ingest account. Signed: an
    /// inconsistent upstream snapshot can make this negative.
    pub fn direct(&self) -> i64 {
        self.total as i64 - self.bulk as i64
    }

    pub fn is_consistent(&self) -> bool {
        self.bulk <= self.total
    }
}

/// All-time counts feeding the dual-ring donut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DonutCounts {
    pub total: u64,
    pub bulk: u64,
    pub restricted: u64,
}

impl DonutCounts {
    pub fn direct(&self) -> i64 {
        self.total as i64 - self.bulk as i64
    }

    pub fn open(&self) -> i64 {
        self.total as i64 - self.restricted as i64
    }

    /// Outer ring: the total split by submitter type, [bulk, direct].
    pub fn outer_ring(&self) -> [u64; 2] {
        [self.bulk, clamp_non_negative(self.direct())]
    }

    /// Inner ring: the total split by data-use terms, [open, restricted].
    pub fn inner_ring(&self) -> [u64; 2] {
        [clamp_non_negative(self.open()), self.restricted]
    }

    pub fn is_consistent(&self) -> bool {
        self.bulk <= self.total && self.restricted <= self.total
    }
}

/// Clamp a derived count for rendering. Negative values only arise from
/// inconsistent upstream snapshots; callers warn before clamping.
pub fn clamp_non_negative(count: i64) -> u64 {
    count.max(0) as u64
}

fn count_or_zero(
    client: &LapisClient,
    pathogen: &str,
    month: Option<&str>,
    filter: &AggregateFilter,
) -> u64 {
    match client.aggregated_count(pathogen, filter) {
        Ok(count) => count,
        Err(err) => {
            match month {
                Some(label) => {
                    println!("Error fetching data for {} in {}: {}", pathogen, label, err)
                }
                None => println!("Error fetching data for {}: {}", pathogen, err),
            }
            0
        }
    }
}

fn monthly_point(
    client: &LapisClient,
    pathogen: &str,
    window: &MonthWindow,
    config: &ReportConfig,
) -> MonthlyPoint {
    let label = window.label();
    let range = AggregateFilter::released_between(window.first_day, window.last_day);
    let total = count_or_zero(client, pathogen, Some(label.as_str()), &range);
    let bulk_filter = AggregateFilter {
        submitter: Some(config.bulk_submitter.clone()),
        ..range
    };
    let bulk = count_or_zero(client, pathogen, Some(label.as_str()), &bulk_filter);
    MonthlyPoint { label, total, bulk }
}

/// Total and bulk-submitter counts for each trailing calendar month, oldest
/// first. A failed request counts as zero after a printed notice.
pub fn fetch_monthly_series(
    client: &LapisClient,
    pathogen: &str,
    today: NaiveDate,
    config: &ReportConfig,
) -> Vec<MonthlyPoint> {
    println!("Inside monthly counts for {}", pathogen);
    trailing_months(today, config.trailing_months)
        .iter()
        .map(|window| monthly_point(client, pathogen, window, config))
        .collect()
}

/// The three all-time aggregates behind the donut chart.
pub fn fetch_donut_counts(
    client: &LapisClient,
    pathogen: &str,
    config: &ReportConfig,
) -> DonutCounts {
    println!("Inside counts for {}", pathogen);
    let total = count_or_zero(client, pathogen, None, &AggregateFilter::default());
    let bulk_filter = AggregateFilter {
        submitter: Some(config.bulk_submitter.clone()),
        ..Default::default()
    };
    let bulk = count_or_zero(client, pathogen, None, &bulk_filter);
    let restricted_filter = AggregateFilter {
        data_use_terms: Some(RESTRICTED_TERMS.to_string()),
        ..Default::default()
    };
    let restricted = count_or_zero(client, pathogen, None, &restricted_filter);
    DonutCounts {
        total,
        bulk,
        restricted,
    }
}

/// Print a notice for every month where the bulk count exceeds the total.
pub fn warn_inconsistent_months(pathogen: &str, series: &[MonthlyPoint]) {
    for point in series.iter().filter(|point| !point.is_consistent()) {
        println!(
            "Warning: {} {}: bulk count {} exceeds total {}, clamping direct to 0",
            pathogen, point.label, point.bulk, point.total
        );
    }
}

/// Same check for the all-time donut triple.
pub fn warn_inconsistent_donut(pathogen: &str, counts: &DonutCounts) {
    if !counts.is_consistent() {
        println!(
            "Warning: {}: subset counts (bulk {}, restricted {}) exceed total {}, clamping",
            pathogen, counts.bulk, counts.restricted, counts.total
        );
    }
}

/// Tally how many records name each country, most frequent first.
pub fn country_counts(values: Vec<String>) -> Vec<(String, u64)> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for country in values {
        *counts.entry(country).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .collect()
}

/// Fetch country values and tally them; the map for a pathogen is skipped by
/// the caller when this fails.
pub fn fetch_country_counts(
    client: &LapisClient,
    pathogen: &str,
    field: &str,
) -> Result<Vec<(String, u64)>, FetchError> {
    let values = client.field_values(pathogen, field)?;
    Ok(country_counts(values))
}
