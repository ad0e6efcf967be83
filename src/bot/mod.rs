//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `message_handler`: Handles commands and free-text queries
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `ui_builder`: Creates keyboards and formats plan cards
//! - `sender`: The outgoing Telegram calls the handlers make

pub mod callback_handler;
pub mod message_handler;
pub mod sender;
pub mod ui_builder;

use std::sync::Arc;

use crate::catalog::CatalogHandle;
use crate::click_log::ClickLogger;
use crate::config::BotConfig;
use crate::sheets::CatalogSource;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;
pub use sender::ChatSender;

/// State shared by every handler
pub struct AppState {
    pub catalog: CatalogHandle,
    /// Where `/reload` fetches a fresh catalog from
    pub source: Arc<dyn CatalogSource>,
    pub click_logger: Arc<ClickLogger>,
    pub config: BotConfig,
}
