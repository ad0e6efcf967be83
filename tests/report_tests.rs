use chrono::NaiveDate;
use esim_plans_bot::click_log::ClickRecord;
use esim_plans_bot::report::{format_summary, summarize};

fn click(timestamp: &str, country: &str, plan: &str) -> ClickRecord {
    ClickRecord {
        timestamp: timestamp.to_string(),
        user_id: "42".to_string(),
        country: country.to_string(),
        plan_name: plan.to_string(),
        ..Default::default()
    }
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

#[test]
fn test_summarize_counts_only_the_day() {
    let records = vec![
        click("2026-10-17 23:59:59", "Japan", "Japan 1GB"),
        click("2026-10-18 08:00:00", "Japan", "Japan 1GB"),
        click("2026-10-18 09:00:00", "Thailand", "Thai 5GB"),
        click("2026-10-18 10:00:00", "japan", "Japan 3GB"),
        click("2026-10-18 11:00:00", "Thailand", "Thai 5GB"),
        click("2026-10-18 12:00:00", "Japan", "Japan 1GB"),
        click("2026-10-19 00:00:01", "France", "France 5GB"),
    ];

    let summary = summarize(&records, day(), 0);

    assert_eq!(summary.total_clicks, 5);
    assert_eq!(summary.unique_countries, 2);
    assert_eq!(summary.top_country, Some(("Japan".to_string(), 3)));
    assert_eq!(summary.top_plan, Some(("Japan 1GB".to_string(), 2)));
}

#[test]
fn test_summarize_shifts_utc_clicks_into_report_timezone() {
    // Stored in UTC; only the middle two fall on 2026-10-18 at UTC+6
    let records = vec![
        click("2026-10-17 17:59:59", "Japan", "Japan 1GB"),
        click("2026-10-17 20:00:00", "Thailand", "Thai 5GB"),
        click("2026-10-18 12:00:00", "Thailand", "Thai 5GB"),
        click("2026-10-18 18:30:00", "Japan", "Japan 1GB"),
    ];

    let summary = summarize(&records, day(), 6);

    assert_eq!(summary.total_clicks, 2);
    assert_eq!(summary.unique_countries, 1);
    assert_eq!(summary.top_country, Some(("Thailand".to_string(), 2)));
}

#[test]
fn test_summarize_falls_back_to_date_prefix() {
    let records = vec![
        click("2026-10-18T09:00:00Z", "Japan", "Japan 1GB"),
        click("2026-10-17T23:00:00Z", "Japan", "Japan 1GB"),
    ];

    assert_eq!(summarize(&records, day(), 6).total_clicks, 1);
}

#[test]
fn test_format_summary() {
    let records = vec![
        click("2026-10-18 08:00:00", "Japan", "Japan 1GB"),
        click("2026-10-18 09:00:00", "Japan", "Japan 3GB"),
    ];

    let message = format_summary(&summarize(&records, day(), 0));

    assert_eq!(
        message,
        "📊 Daily Summary (2026-10-18):\n\
         ----------------------------\n\
         🔢 Total Clicks: 2\n\
         🌍 Unique Countries: 1\n\
         🔝 Top Country: Japan (2 clicks)\n\
         💳 Top Plan: Japan 1GB\n\
         🕒 Date Range: 2026-10-18"
    );
}

#[test]
fn test_format_summary_without_clicks() {
    let message = format_summary(&summarize(&[], day(), 0));

    assert!(message.contains("Total Clicks: 0"));
    assert!(message.contains("Unique Countries: 0"));
    assert!(!message.contains("Top Country"));
    assert!(!message.contains("Top Plan"));
    assert!(message.ends_with("Date Range: 2026-10-18"));
}
