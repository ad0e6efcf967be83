//! # Daily Report Module
//!
//! Summarizes one day of click-log rows for the administrator: how many plans
//! were shown, across how many countries, and which country and plan were the
//! most popular.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use std::collections::{HashMap, HashSet};

use crate::catalog::normalize_name;
use crate::click_log::{ClickRecord, TIMESTAMP_FORMAT};
use crate::localization::t_args;

/// Summary of one day's clicks
#[derive(Debug, Clone, PartialEq)]
pub struct ClickSummary {
    pub date: NaiveDate,
    pub total_clicks: usize,
    pub unique_countries: usize,
    /// Most clicked country and its click count
    pub top_country: Option<(String, usize)>,
    /// Most clicked plan and its click count
    pub top_plan: Option<(String, usize)>,
}

/// The calendar date "now" falls on in the reporting timezone
pub fn report_date(now: DateTime<Utc>, utc_offset_hours: i32) -> NaiveDate {
    (now + Duration::hours(i64::from(utc_offset_hours))).date_naive()
}

/// Calendar date of a UTC click timestamp in the reporting timezone
fn local_click_date(timestamp: &str, utc_offset_hours: i32) -> Option<NaiveDate> {
    let utc = NaiveDateTime::parse_from_str(timestamp.trim(), TIMESTAMP_FORMAT).ok()?;
    Some((utc + Duration::hours(i64::from(utc_offset_hours))).date())
}

/// Summarize the clicks logged on `date` in the reporting timezone
///
/// Timestamps are stored in UTC and shifted by `utc_offset_hours` before
/// their date is compared. A timestamp in another format counts when it starts
/// with the `YYYY-MM-DD` form of the date. Ties for the top country or plan go
/// to whichever was clicked first.
pub fn summarize(records: &[ClickRecord], date: NaiveDate, utc_offset_hours: i32) -> ClickSummary {
    let prefix = date.format("%Y-%m-%d").to_string();
    let todays: Vec<&ClickRecord> = records
        .iter()
        .filter(|record| match local_click_date(&record.timestamp, utc_offset_hours) {
            Some(local) => local == date,
            None => record.timestamp.trim().starts_with(&prefix),
        })
        .collect();

    let countries: Vec<String> = todays
        .iter()
        .map(|record| normalize_name(&record.country))
        .collect();
    let plans: Vec<String> = todays
        .iter()
        .map(|record| record.plan_name.trim().to_string())
        .collect();

    let unique_countries = countries
        .iter()
        .filter(|country| !country.is_empty())
        .collect::<HashSet<_>>()
        .len();

    ClickSummary {
        date,
        total_clicks: todays.len(),
        unique_countries,
        top_country: most_common(&countries),
        top_plan: most_common(&plans),
    }
}

/// Most frequent non-empty value; ties keep the first seen
fn most_common(values: &[String]) -> Option<(String, usize)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for value in values.iter().filter(|value| !value.is_empty()) {
        let count = counts.entry(value.as_str()).or_insert(0);
        if *count == 0 {
            order.push(value.as_str());
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for value in order {
        let count = counts[value];
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }

    best.map(|(value, count)| (value.to_string(), count))
}

/// Render the admin message for a summary
pub fn format_summary(summary: &ClickSummary) -> String {
    let date = summary.date.format("%Y-%m-%d").to_string();
    let total = summary.total_clicks.to_string();
    let unique = summary.unique_countries.to_string();

    let mut lines = vec![
        t_args("report-title", &[("date", date.as_str())]),
        t_args("report-separator", &[]),
        t_args("report-total-clicks", &[("count", total.as_str())]),
        t_args("report-unique-countries", &[("count", unique.as_str())]),
    ];

    if let Some((country, count)) = &summary.top_country {
        let count = count.to_string();
        lines.push(t_args(
            "report-top-country",
            &[("country", country.as_str()), ("count", count.as_str())],
        ));
    }
    if let Some((plan, _)) = &summary.top_plan {
        lines.push(t_args("report-top-plan", &[("plan", plan.as_str())]));
    }
    lines.push(t_args("report-date-range", &[("date", date.as_str())]));

    lines.join("\n")
}
