//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, MessageId};
use tracing::{debug, error, warn};

// Import localization
use crate::localization::{t_args_lang, t_lang};

use crate::callback_data::CallbackData;
use crate::resolver::{apply_comparison_filter, countries_in_continent, paginate, plans_for_country};

// Import UI builder functions
use super::message_handler::send_plans;
use super::sender::ChatSender;
use super::ui_builder::create_country_keyboard;
use super::AppState;

/// Handle callback queries from inline keyboards
pub async fn callback_handler(bot: Bot, q: CallbackQuery, state: Arc<AppState>) -> Result<()> {
    process_callback(&bot, &q, &state).await
}

/// Act on a pressed button, then answer the query whether or not acting on it
/// succeeded
pub async fn process_callback<S: ChatSender + ?Sized>(
    sender: &S,
    q: &CallbackQuery,
    state: &AppState,
) -> Result<()> {
    debug!(user_id = %q.from.id, data = ?q.data, "Received callback query from user");

    let language_code = q.from.language_code.as_deref();
    let data = q.data.as_deref().and_then(CallbackData::parse);

    let result = match (data, &q.message) {
        (Some(data), Some(msg)) => {
            dispatch_callback(sender, msg.chat().id, msg.id(), data, state, language_code).await
        }
        _ => {
            // Ignore stale or unknown buttons
            debug!(user_id = %q.from.id, "Ignoring callback without usable data or message");
            Ok(())
        }
    };

    if let Err(e) = &result {
        warn!(user_id = %q.from.id, error = %e, "Callback query handling failed");
    }

    // Answer the callback query to remove the loading state
    let answered = sender.answer_callback(q.id.clone()).await;
    result.and(answered)
}

async fn dispatch_callback<S: ChatSender + ?Sized>(
    sender: &S,
    chat_id: ChatId,
    message_id: MessageId,
    data: CallbackData,
    state: &AppState,
    language_code: Option<&str>,
) -> Result<()> {
    let snapshot = state.catalog.snapshot();
    let per_page = state.config.menu_page_size;

    match data {
        CallbackData::Continent(continent) => {
            let countries = countries_in_continent(&snapshot, &continent);
            if countries.is_empty() {
                let text = t_args_lang("no-countries", &[("continent", continent.as_str())], language_code);
                return sender.send_text(chat_id, text, None).await;
            }

            let text = t_args_lang(
                "countries-in-continent",
                &[("continent", continent.as_str())],
                language_code,
            );
            if let Err(e) = sender
                .edit_text(chat_id, message_id, text, create_country_keyboard(&countries))
                .await
            {
                error!(chat_id = %chat_id, error = %e, "Failed to edit message into country menu");
            }
            Ok(())
        }
        CallbackData::CountryPage { country, offset } => {
            let matched = plans_for_country(&snapshot, &country);
            let page = paginate(&matched, offset, per_page);

            if page.plans.is_empty() {
                let text = if page.total == 0 {
                    t_args_lang("no-plans-found", &[("query", country.as_str())], language_code)
                } else {
                    t_lang("no-plans-page", language_code)
                };
                return sender.send_text(chat_id, text, None).await;
            }

            let next = page
                .next_offset
                .map(|offset| CallbackData::CountryPage { country, offset });
            send_plans(sender, chat_id, &page.plans, next.as_ref(), state, language_code).await
        }
        CallbackData::FilterPage { filter, offset } => {
            let matched = apply_comparison_filter(&snapshot, &filter);
            let page = paginate(&matched, offset, per_page);

            if page.plans.is_empty() {
                let query = filter.to_string();
                let text = if page.total == 0 {
                    t_args_lang("no-plans-found", &[("query", query.as_str())], language_code)
                } else {
                    t_lang("no-plans-page", language_code)
                };
                return sender.send_text(chat_id, text, None).await;
            }

            let next = page
                .next_offset
                .map(|offset| CallbackData::FilterPage { filter, offset });
            send_plans(sender, chat_id, &page.plans, next.as_ref(), state, language_code).await
        }
    }
}
