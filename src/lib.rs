//! # eSIM Plans Telegram Bot
//!
//! A Telegram bot that lets users browse and filter a spreadsheet catalog of
//! prepaid eSIM data plans, plus a daily click-activity report.

pub mod aliases;
pub mod bot;
pub mod callback_data;
pub mod catalog;
pub mod circuit_breaker;
pub mod click_log;
pub mod config;
pub mod errors;
pub mod filter;
pub mod localization;
pub mod query;
pub mod report;
pub mod resolver;
pub mod retry;
pub mod sheets;
