//! Chart series for the weekly report page.

use crate::models::WeeklyReport;
use crate::summary::round2;
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;

/// One bar of a horizontal bar chart. `share` is relative to the longest
/// bar in the same chart, in `0.0..=1.0`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub share: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeeklyCharts {
    pub week_label: String,
    pub start_date: String,
    pub end_date: String,
    /// Hours per category.
    pub categories: Vec<Bar>,
    /// Hours per day.
    pub days: Vec<Bar>,
    /// Hours per client.
    pub client_hours: Vec<Bar>,
    /// Activity count per top client.
    pub client_activities: Vec<Bar>,
}

pub fn build_weekly_charts(report: &WeeklyReport) -> WeeklyCharts {
    build_weekly_charts_at(Local::now().date_naive(), report)
}

pub fn build_weekly_charts_at(today: NaiveDate, report: &WeeklyReport) -> WeeklyCharts {
    let reported_start = report.week_start.as_deref().and_then(parse_date);
    let reported_end = report.week_end.as_deref().and_then(parse_date);
    let start = reported_start.unwrap_or_else(|| week_start(today));
    let end = reported_end
        .filter(|end| *end >= start)
        .unwrap_or(start + Duration::days(6));

    let categories = bars(
        report
            .category_breakdown
            .iter()
            .map(|(name, minutes)| (name.clone(), minutes_to_hours(*minutes))),
    );
    let client_hours = bars(
        report
            .client_duration
            .iter()
            .map(|(client, minutes)| (client.clone(), minutes_to_hours(*minutes))),
    );
    let client_activities = bars(
        report
            .summary
            .top_clients
            .iter()
            .map(|(client, count)| (client.clone(), *count as f64)),
    );

    WeeklyCharts {
        week_label: week_label(start),
        start_date: date_key(start),
        end_date: date_key(end),
        categories,
        days: day_bars(start, &report.daily_breakdown),
        client_hours,
        client_activities,
    }
}

/// Seven zero-filled days when the breakdown is keyed by date, otherwise
/// the breakdown as the server ordered it.
fn day_bars(start: NaiveDate, breakdown: &[(String, f64)]) -> Vec<Bar> {
    let dated: Option<Vec<(NaiveDate, f64)>> = breakdown
        .iter()
        .map(|(day, minutes)| parse_date(day).map(|date| (date, *minutes)))
        .collect();

    match dated {
        Some(dated) if !dated.is_empty() => bars((0..7).map(|offset| {
            let date = start + Duration::days(offset);
            let minutes: f64 = dated
                .iter()
                .filter(|(day, _)| *day == date)
                .map(|(_, minutes)| minutes)
                .sum();
            (date.format("%a %m-%d").to_string(), minutes_to_hours(minutes))
        })),
        _ => bars(
            breakdown
                .iter()
                .map(|(day, minutes)| (day.clone(), minutes_to_hours(*minutes))),
        ),
    }
}

fn bars(points: impl Iterator<Item = (String, f64)>) -> Vec<Bar> {
    let points: Vec<(String, f64)> = points
        .map(|(label, value)| (label, if value.is_finite() { value.max(0.0) } else { 0.0 }))
        .collect();
    let max = points.iter().map(|(_, value)| *value).fold(0.0, f64::max);

    points
        .into_iter()
        .map(|(label, value)| Bar {
            share: if max > 0.0 { value / max } else { 0.0 },
            label,
            value,
        })
        .collect()
}

fn minutes_to_hours(minutes: f64) -> f64 {
    round2(minutes / 60.0)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

pub fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
