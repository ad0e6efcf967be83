//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error, info, warn};

// Import localization
use crate::localization::{t_args_lang, t_lang};

use crate::callback_data::CallbackData;
use crate::catalog::Plan;
use crate::click_log::ClickEntry;
use crate::errors::LookupError;
use crate::query::{answer, AnswerLimits};
use crate::resolver::continents_available;

// Import UI builder functions
use super::sender::ChatSender;
use super::ui_builder::{create_continent_keyboard, create_more_keyboard, create_plan_keyboard, format_plan_card};
use super::AppState;

/// Send one card per plan, logging each as a click, then a "More" button
/// when another page exists
pub async fn send_plans<S: ChatSender + ?Sized>(
    sender: &S,
    chat_id: ChatId,
    plans: &[&Plan],
    next: Option<&CallbackData>,
    state: &AppState,
    language_code: Option<&str>,
) -> Result<()> {
    for plan in plans {
        let entry = ClickEntry::for_plan(chat_id.0, plan, Utc::now());
        let logger = Arc::clone(&state.click_logger);
        tokio::spawn(async move {
            logger.record(&entry).await;
        });

        let card = format_plan_card(plan, language_code);
        sender
            .send_text(chat_id, card, create_plan_keyboard(plan, language_code))
            .await?;
    }

    if let Some(keyboard) = next.and_then(|next| create_more_keyboard(next, language_code)) {
        sender
            .send_text(chat_id, t_lang("more-plans-available", language_code), Some(keyboard))
            .await?;
    }

    Ok(())
}

/// Localized reply for a lookup that produced no plans
pub fn lookup_error_message(err: &LookupError, language_code: Option<&str>) -> String {
    match err {
        LookupError::UnparseableFilter { .. } => t_lang("invalid-filter", language_code),
        LookupError::MissingCountry => t_lang("cheapest-usage", language_code),
        LookupError::NotFound { query } | LookupError::UnparseableRowValue { value: query } => {
            t_args_lang("no-plans-found", &[("query", query.as_str())], language_code)
        }
    }
}

/// Command name without arguments or a `@BotName` suffix
fn command_name(text: &str) -> Option<&str> {
    let first = text.split_whitespace().next()?;
    let command = first.strip_prefix('/')?;
    Some(command.split('@').next().unwrap_or(command))
}

async fn send_continent_menu(
    bot: &Bot,
    chat_id: ChatId,
    state: &AppState,
    language_code: Option<&str>,
) -> Result<()> {
    let snapshot = state.catalog.snapshot();
    let continents = continents_available(&snapshot);

    if continents.is_empty() {
        warn!(user_id = %chat_id, "Continent menu requested but the catalog is empty");
        bot.send_message(chat_id, t_lang("catalog-empty", language_code)).await?;
        return Ok(());
    }

    bot.send_message(chat_id, t_lang("choose-continent", language_code))
        .reply_markup(create_continent_keyboard(&continents))
        .await?;
    Ok(())
}

async fn handle_reload(bot: &Bot, chat_id: ChatId, state: &AppState, language_code: Option<&str>) -> Result<()> {
    if !state.config.is_admin(chat_id.0) {
        warn!(user_id = %chat_id, "Non-admin attempted catalog reload");
        bot.send_message(chat_id, t_lang("admin-only", language_code)).await?;
        return Ok(());
    }

    match state.source.fetch_catalog().await {
        Ok(catalog) => {
            let count = catalog.len().to_string();
            let previous = state.catalog.replace(catalog);
            info!(user_id = %chat_id, previous_plans = previous.len(), plans = %count, "Catalog reloaded");
            bot.send_message(
                chat_id,
                t_args_lang("reload-done", &[("count", count.as_str())], language_code),
            )
            .await?;
        }
        Err(e) => {
            error!(user_id = %chat_id, error = %e, "Catalog reload failed");
            let error = e.to_string();
            bot.send_message(
                chat_id,
                t_args_lang("reload-failed", &[("error", error.as_str())], language_code),
            )
            .await?;
        }
    }
    Ok(())
}

async fn handle_query(
    bot: &Bot,
    chat_id: ChatId,
    text: &str,
    state: &AppState,
    language_code: Option<&str>,
) -> Result<()> {
    let snapshot = state.catalog.snapshot();
    let limits = AnswerLimits {
        page_size: state.config.direct_page_size,
        cheapest_limit: state.config.cheapest_limit,
    };

    match answer(&snapshot, text, limits) {
        Ok(result) => {
            info!(user_id = %chat_id, shown = result.plans.len(), total = result.total, "Answering plan query");
            send_plans(bot, chat_id, &result.plans, result.next.as_ref(), state, language_code).await
        }
        Err(e) => {
            debug!(user_id = %chat_id, error = %e, "Query produced no plans");
            bot.send_message(chat_id, lookup_error_message(&e, language_code))
                .await?;
            Ok(())
        }
    }
}

async fn handle_text_message(
    bot: &Bot,
    msg: &Message,
    text: &str,
    state: &AppState,
    language_code: Option<&str>,
) -> Result<()> {
    debug!(user_id = %msg.chat.id, message_length = text.len(), "Received text message from user");

    match command_name(text) {
        Some("start") | Some("menu") => send_continent_menu(bot, msg.chat.id, state, language_code).await,
        Some("help") => {
            bot.send_message(msg.chat.id, t_lang("help-text", language_code))
                .await?;
            Ok(())
        }
        Some("reload") => handle_reload(bot, msg.chat.id, state, language_code).await,
        Some(other) => {
            debug!(user_id = %msg.chat.id, command = other, "Unknown command");
            bot.send_message(msg.chat.id, t_lang("unsupported-message", language_code))
                .await?;
            Ok(())
        }
        None => handle_query(bot, msg.chat.id, text, state, language_code).await,
    }
}

async fn handle_unsupported_message(bot: &Bot, msg: &Message, language_code: Option<&str>) -> Result<()> {
    debug!(user_id = %msg.chat.id, "Received unsupported message type from user");
    bot.send_message(msg.chat.id, t_lang("unsupported-message", language_code))
        .await?;
    Ok(())
}

pub async fn message_handler(bot: Bot, msg: Message, state: Arc<AppState>) -> Result<()> {
    // Extract user's language code from Telegram
    let language_code = msg
        .from
        .as_ref()
        .and_then(|user| user.language_code.as_ref())
        .map(|s| s.as_str());

    match msg.text() {
        Some(text) => handle_text_message(&bot, &msg, text, &state, language_code).await?,
        None => handle_unsupported_message(&bot, &msg, language_code).await?,
    }

    Ok(())
}
