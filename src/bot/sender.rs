//! Outgoing Telegram calls used by the handlers, behind a trait so the
//! handlers can run against a recording sender in tests.

use anyhow::Result;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{CallbackQueryId, InlineKeyboardMarkup, MessageId};

#[async_trait]
pub trait ChatSender: Send + Sync {
    /// Send a text message, optionally with an inline keyboard
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<()>;

    /// Replace the text and keyboard of a message the bot sent earlier
    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<()>;

    /// Stop the loading indicator on a pressed button
    async fn answer_callback(&self, query_id: CallbackQueryId) -> Result<()>;
}

#[async_trait]
impl ChatSender for Bot {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<()> {
        let request = self.send_message(chat_id, text);
        match keyboard {
            Some(keyboard) => request.reply_markup(keyboard).await?,
            None => request.await?,
        };
        Ok(())
    }

    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<()> {
        self.edit_message_text(chat_id, message_id, text)
            .reply_markup(keyboard)
            .await?;
        Ok(())
    }

    async fn answer_callback(&self, query_id: CallbackQueryId) -> Result<()> {
        self.answer_callback_query(query_id).await?;
        Ok(())
    }
}
