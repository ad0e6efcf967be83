//! # Configuration Module
//!
//! Runtime configuration for the bot and the report job: Telegram and
//! spreadsheet settings read from the environment, page sizes, and the
//! recovery settings used for catalog loading and click logging.

use anyhow::{bail, Context, Result};
use std::env;

// Constants for bot configuration
pub const DEFAULT_CATALOG_WORKSHEET: &str = "Bot-data";
pub const DEFAULT_CLICK_LOG_WORKSHEET: &str = "Click-Logs";
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";
pub const DEFAULT_REPORT_UTC_OFFSET_HOURS: i32 = 6;
pub const DIRECT_REPLY_PAGE_SIZE: usize = 5;
pub const MENU_PAGE_SIZE: usize = 10;
pub const CHEAPEST_LIMIT: usize = 5;

/// Recovery configuration for calls to the spreadsheet
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Base delay between retries in milliseconds
    pub base_retry_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_retry_delay_ms: u64,
    /// Timeout for a single HTTP request in seconds
    pub request_timeout_secs: u64,
    /// Circuit breaker failure threshold
    pub circuit_breaker_threshold: u32,
    /// Circuit breaker reset timeout in seconds
    pub circuit_breaker_reset_secs: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_retry_delay_ms: 1000, // 1 second
            max_retry_delay_ms: 10000, // 10 seconds
            request_timeout_secs: 30,
            circuit_breaker_threshold: 5,
            circuit_breaker_reset_secs: 60, // 1 minute
        }
    }
}

/// How requests to the Sheets API are authorized
#[derive(Clone, PartialEq)]
pub enum SheetsAuth {
    /// OAuth bearer token; required for appending click logs
    BearerToken(String),
    /// API key; read-only access to shared sheets
    ApiKey(String),
}

// Keep credentials out of logs.
impl std::fmt::Debug for SheetsAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetsAuth::BearerToken(_) => write!(f, "BearerToken(***)"),
            SheetsAuth::ApiKey(_) => write!(f, "ApiKey(***)"),
        }
    }
}

/// Spreadsheet location and credentials
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub api_base: String,
    pub spreadsheet_id: String,
    pub catalog_worksheet: String,
    pub click_log_worksheet: String,
    pub auth: SheetsAuth,
    pub recovery: RecoveryConfig,
}

impl SheetsConfig {
    /// Read from `SPREADSHEET_ID`, `GOOGLE_ACCESS_TOKEN` / `GOOGLE_API_KEY`,
    /// `CATALOG_WORKSHEET`, `CLICK_LOG_WORKSHEET` and `SHEETS_API_BASE`
    pub fn from_env() -> Result<Self> {
        let spreadsheet_id = env::var("SPREADSHEET_ID").context("SPREADSHEET_ID must be set")?;

        let auth = match (env::var("GOOGLE_ACCESS_TOKEN"), env::var("GOOGLE_API_KEY")) {
            (Ok(token), _) if !token.trim().is_empty() => SheetsAuth::BearerToken(token),
            (_, Ok(key)) if !key.trim().is_empty() => SheetsAuth::ApiKey(key),
            _ => bail!("GOOGLE_ACCESS_TOKEN or GOOGLE_API_KEY must be set"),
        };

        Ok(Self {
            api_base: env_or("SHEETS_API_BASE", DEFAULT_SHEETS_API_BASE),
            spreadsheet_id,
            catalog_worksheet: env_or("CATALOG_WORKSHEET", DEFAULT_CATALOG_WORKSHEET),
            click_log_worksheet: env_or("CLICK_LOG_WORKSHEET", DEFAULT_CLICK_LOG_WORKSHEET),
            auth,
            recovery: RecoveryConfig::default(),
        })
    }
}

/// Configuration for the bot process
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub bot_token: String,
    /// Chat allowed to run admin commands and receive reports
    pub admin_chat_id: Option<i64>,
    pub direct_page_size: usize,
    pub menu_page_size: usize,
    pub cheapest_limit: usize,
    pub sheets: SheetsConfig,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;

        Ok(Self {
            bot_token,
            admin_chat_id: admin_chat_id_from_env()?,
            direct_page_size: DIRECT_REPLY_PAGE_SIZE,
            menu_page_size: MENU_PAGE_SIZE,
            cheapest_limit: CHEAPEST_LIMIT,
            sheets: SheetsConfig::from_env()?,
        })
    }

    pub fn is_admin(&self, chat_id: i64) -> bool {
        self.admin_chat_id == Some(chat_id)
    }
}

/// Read `ADMIN_CHAT_ID`; absent means no admin
pub fn admin_chat_id_from_env() -> Result<Option<i64>> {
    match env::var("ADMIN_CHAT_ID") {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("ADMIN_CHAT_ID is not a valid chat id: {raw}")),
        Err(_) => Ok(None),
    }
}

/// Read `REPORT_UTC_OFFSET_HOURS`, defaulting to UTC+6
pub fn report_utc_offset_from_env() -> Result<i32> {
    match env::var("REPORT_UTC_OFFSET_HOURS") {
        Ok(raw) => {
            let hours: i32 = raw
                .trim()
                .parse()
                .with_context(|| format!("REPORT_UTC_OFFSET_HOURS is not a number: {raw}"))?;
            if !(-12..=14).contains(&hours) {
                bail!("REPORT_UTC_OFFSET_HOURS out of range: {hours}");
            }
            Ok(hours)
        }
        Err(_) => Ok(DEFAULT_REPORT_UTC_OFFSET_HOURS),
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_defaults_reasonable() {
        let recovery = RecoveryConfig::default();

        assert!(recovery.max_retries <= 10);
        assert!(recovery.base_retry_delay_ms >= 100);
        assert!(recovery.base_retry_delay_ms <= recovery.max_retry_delay_ms);
        assert!(recovery.request_timeout_secs > 0);
        assert!(recovery.circuit_breaker_threshold > 0);
    }

    #[test]
    fn test_auth_debug_hides_secret() {
        let auth = SheetsAuth::BearerToken("ya29.secret".to_string());
        assert!(!format!("{auth:?}").contains("secret"));
    }

    #[test]
    fn test_page_sizes() {
        assert_eq!(DIRECT_REPLY_PAGE_SIZE, 5);
        assert_eq!(MENU_PAGE_SIZE, 10);
        assert!(CHEAPEST_LIMIT <= MENU_PAGE_SIZE);
    }
}
