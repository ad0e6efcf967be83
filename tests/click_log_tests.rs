use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use esim_plans_bot::catalog::Plan;
use esim_plans_bot::click_log::{ClickEntry, ClickLogger};
use esim_plans_bot::config::RecoveryConfig;
use esim_plans_bot::sheets::ClickSink;

#[derive(Default)]
struct RecordingSink {
    fail: AtomicBool,
    attempts: AtomicUsize,
    rows: Mutex<Vec<Vec<String>>>,
}

#[async_trait]
impl ClickSink for RecordingSink {
    async fn append_click(&self, entry: &ClickEntry) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("sheet unavailable");
        }
        self.rows.lock().unwrap().push(entry.to_row());
        Ok(())
    }
}

fn entry() -> ClickEntry {
    let plan = Plan {
        country: "Japan".to_string(),
        plan_name: "Japan 1GB".to_string(),
        price: "$8".to_string(),
        purchase_link: "https://example.com/jp".to_string(),
        ..Default::default()
    };
    ClickEntry::for_plan(7, &plan, Utc::now())
}

fn recovery(threshold: u32) -> RecoveryConfig {
    RecoveryConfig {
        circuit_breaker_threshold: threshold,
        circuit_breaker_reset_secs: 600,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_successful_append() {
    let sink = Arc::new(RecordingSink::default());
    let logger = ClickLogger::new(sink.clone(), recovery(3));

    assert!(logger.record(&entry()).await);

    let rows = sink.rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], "7");
    assert_eq!(rows[0][2], "Japan");
}

#[tokio::test]
async fn test_failures_are_swallowed_and_open_breaker() {
    let sink = Arc::new(RecordingSink::default());
    sink.fail.store(true, Ordering::SeqCst);
    let logger = ClickLogger::new(sink.clone(), recovery(2));

    assert!(!logger.record(&entry()).await);
    assert!(!logger.record(&entry()).await);
    // Breaker is open now; the sink is not called again
    assert!(!logger.record(&entry()).await);

    assert_eq!(sink.attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_success_resets_failure_count() {
    let sink = Arc::new(RecordingSink::default());
    let logger = ClickLogger::new(sink.clone(), recovery(2));

    sink.fail.store(true, Ordering::SeqCst);
    assert!(!logger.record(&entry()).await);

    sink.fail.store(false, Ordering::SeqCst);
    assert!(logger.record(&entry()).await);

    sink.fail.store(true, Ordering::SeqCst);
    assert!(!logger.record(&entry()).await);
    assert!(!logger.record(&entry()).await);

    assert_eq!(sink.attempts.load(Ordering::SeqCst), 4);
}
