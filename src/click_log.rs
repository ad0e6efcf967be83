//! # Click Log Module
//!
//! Every plan shown to a user is logged as a click row in the spreadsheet.
//! Logging is best effort: failures are logged and counted by a circuit
//! breaker, never surfaced to the user and never allowed to hold up a reply.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::catalog::Plan;
use crate::circuit_breaker::CircuitBreaker;
use crate::config::RecoveryConfig;
use crate::sheets::ClickSink;

/// Format of the timestamp column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A click-log row to append
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEntry {
    pub timestamp: String,
    pub user_id: i64,
    pub country: String,
    pub plan_name: String,
    pub price: String,
    pub purchase_link: String,
}

impl ClickEntry {
    pub fn for_plan(user_id: i64, plan: &Plan, at: DateTime<Utc>) -> Self {
        Self {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            user_id,
            country: plan.country.clone(),
            plan_name: plan.plan_name.clone(),
            price: plan.price.clone(),
            purchase_link: plan.purchase_link.clone(),
        }
    }

    /// Cells in column order: timestamp, user id, country, plan, price, link
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.timestamp.clone(),
            self.user_id.to_string(),
            self.country.clone(),
            self.plan_name.clone(),
            self.price.clone(),
            self.purchase_link.clone(),
        ]
    }
}

/// A click-log row read back from the spreadsheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClickRecord {
    #[serde(rename = "Timestamp", default)]
    pub timestamp: String,
    #[serde(rename = "User ID", alias = "User", default)]
    pub user_id: String,
    #[serde(rename = "Country", default)]
    pub country: String,
    #[serde(rename = "Plan", default)]
    pub plan_name: String,
    #[serde(rename = "Price", default)]
    pub price: String,
    #[serde(rename = "Link", default)]
    pub purchase_link: String,
}

/// Best-effort click logger
pub struct ClickLogger {
    sink: Arc<dyn ClickSink>,
    breaker: CircuitBreaker,
}

impl ClickLogger {
    pub fn new(sink: Arc<dyn ClickSink>, recovery: RecoveryConfig) -> Self {
        Self {
            sink,
            breaker: CircuitBreaker::new(recovery),
        }
    }

    /// Append an entry, swallowing any failure. Returns whether it was written.
    pub async fn record(&self, entry: &ClickEntry) -> bool {
        if self.breaker.is_open() {
            debug!(user_id = entry.user_id, plan = %entry.plan_name, "Click log breaker open, dropping entry");
            return false;
        }

        match self.sink.append_click(entry).await {
            Ok(()) => {
                self.breaker.record_success();
                true
            }
            Err(e) => {
                self.breaker.record_failure();
                warn!(
                    user_id = entry.user_id,
                    plan = %entry.plan_name,
                    failures = self.breaker.failure_count(),
                    error = %e,
                    "Click logging failed"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_entry_for_plan() {
        let plan = Plan {
            country: "Japan".to_string(),
            plan_name: "Japan 5GB".to_string(),
            price: "$8".to_string(),
            purchase_link: "https://example.com/jp".to_string(),
            ..Default::default()
        };
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 5, 7).unwrap();

        let entry = ClickEntry::for_plan(42, &plan, at);

        assert_eq!(
            entry.to_row(),
            vec![
                "2026-03-01 09:05:07",
                "42",
                "Japan",
                "Japan 5GB",
                "$8",
                "https://example.com/jp"
            ]
        );
    }
}
