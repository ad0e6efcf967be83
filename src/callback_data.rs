//! # Callback Data Module
//!
//! Inline-button payloads. Browsing and pagination state travels entirely in
//! these tokens so the bot keeps nothing per user in memory:
//!
//! - `continent:<Continent>` lists the countries of a continent
//! - `country:<offset>:<Country>` shows a country's plans from an offset
//! - `filter:<offset>:<field><op><threshold>` shows filtered plans from an offset

use std::fmt;

use crate::filter::{parse_filter, ComparisonFilter};

/// Telegram rejects callback data longer than this many bytes
pub const MAX_CALLBACK_DATA_LEN: usize = 64;

const CONTINENT_PREFIX: &str = "continent";
const COUNTRY_PREFIX: &str = "country";
const FILTER_PREFIX: &str = "filter";

#[derive(Debug, Clone, PartialEq)]
pub enum CallbackData {
    Continent(String),
    CountryPage { country: String, offset: usize },
    FilterPage { filter: ComparisonFilter, offset: usize },
}

impl CallbackData {
    /// Decode a payload. Unknown or malformed payloads yield `None`.
    pub fn parse(data: &str) -> Option<Self> {
        let (kind, rest) = data.split_once(':')?;

        match kind {
            CONTINENT_PREFIX if !rest.is_empty() => Some(CallbackData::Continent(rest.to_string())),
            COUNTRY_PREFIX => {
                let (offset, country) = rest.split_once(':')?;
                if country.is_empty() {
                    return None;
                }
                Some(CallbackData::CountryPage {
                    country: country.to_string(),
                    offset: offset.parse().ok()?,
                })
            }
            FILTER_PREFIX => {
                let (offset, filter) = rest.split_once(':')?;
                Some(CallbackData::FilterPage {
                    filter: parse_filter(filter)?.ok()?,
                    offset: offset.parse().ok()?,
                })
            }
            _ => None,
        }
    }

    /// Encode for an inline button, or `None` if the payload would exceed
    /// Telegram's size limit
    pub fn encode(&self) -> Option<String> {
        let encoded = self.to_string();
        (encoded.len() <= MAX_CALLBACK_DATA_LEN).then_some(encoded)
    }
}

impl fmt::Display for CallbackData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackData::Continent(continent) => write!(f, "{CONTINENT_PREFIX}:{continent}"),
            CallbackData::CountryPage { country, offset } => {
                write!(f, "{COUNTRY_PREFIX}:{offset}:{country}")
            }
            CallbackData::FilterPage { filter, offset } => {
                write!(f, "{FILTER_PREFIX}:{offset}:{filter}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_with_separator_in_name() {
        let data = CallbackData::parse("country:10:Bosnia: Herzegovina").unwrap();
        assert_eq!(
            data,
            CallbackData::CountryPage {
                country: "Bosnia: Herzegovina".to_string(),
                offset: 10
            }
        );
    }

    #[test]
    fn test_oversized_payload_is_not_encoded() {
        let data = CallbackData::CountryPage {
            country: "X".repeat(80),
            offset: 0,
        };
        assert!(data.encode().is_none());
    }
}
