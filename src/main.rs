use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use esim_plans_bot::bot::{self, AppState};
use esim_plans_bot::catalog::CatalogHandle;
use esim_plans_bot::click_log::ClickLogger;
use esim_plans_bot::config::BotConfig;
use esim_plans_bot::localization::init_localization;
use esim_plans_bot::retry::with_retry;
use esim_plans_bot::sheets::{CatalogSource, SheetsClient};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    init_tracing();

    info!("Starting eSIM plans Telegram bot");

    init_localization()?;
    let config = BotConfig::from_env()?;

    let sheets = Arc::new(SheetsClient::new(config.sheets.clone())?);

    // The catalog is loaded once here; afterwards only /reload refreshes it
    let source: &SheetsClient = &sheets;
    let catalog = with_retry(&config.sheets.recovery, "catalog load", move || source.fetch_catalog()).await?;
    info!(plans = catalog.len(), "Catalog ready");

    let click_logger = Arc::new(ClickLogger::new(sheets.clone(), config.sheets.recovery.clone()));

    let bot = Bot::new(config.bot_token.clone());
    let state = Arc::new(AppState {
        catalog: CatalogHandle::new(catalog),
        source: sheets,
        click_logger,
        config,
    });

    info!("Bot initialized, starting dispatcher");

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(bot::message_handler))
        .branch(Update::filter_callback_query().endpoint(bot::callback_handler));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
