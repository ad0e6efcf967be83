//! Sends the daily click summary to the administrator chat.
//!
//! Meant to be run once a day by an external scheduler.

use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use std::env;
use teloxide::prelude::*;

use esim_plans_bot::config::{admin_chat_id_from_env, report_utc_offset_from_env, SheetsConfig};
use esim_plans_bot::localization::init_localization;
use esim_plans_bot::report::{format_summary, report_date, summarize};
use esim_plans_bot::retry::with_retry;
use esim_plans_bot::sheets::{ClickSource, SheetsClient};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    init_localization()?;

    let bot_token = env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;
    let admin_chat_id = admin_chat_id_from_env()?.context("ADMIN_CHAT_ID must be set")?;
    let utc_offset_hours = report_utc_offset_from_env()?;

    let sheets = SheetsClient::new(SheetsConfig::from_env()?)?;
    let recovery = sheets.config().recovery.clone();
    let source: &SheetsClient = &sheets;
    let records = with_retry(&recovery, "click log fetch", move || source.fetch_clicks()).await?;

    let date = report_date(Utc::now(), utc_offset_hours);
    let summary = summarize(&records, date, utc_offset_hours);
    info!(
        "Summarized {} clicks for {} ({} rows read)",
        summary.total_clicks,
        date,
        records.len()
    );

    let message = format_summary(&summary);
    Bot::new(bot_token)
        .send_message(ChatId(admin_chat_id), message.clone())
        .await
        .context("Failed to send daily report")?;

    info!("Daily report sent to {}", admin_chat_id);
    println!("{message}");

    Ok(())
}
