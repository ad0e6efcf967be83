//! Informal country names users type, mapped to the canonical catalog names.

use lazy_static::lazy_static;
use std::collections::HashMap;

/// Lowercase alias → canonical country name
const COUNTRY_ALIASES: &[(&str, &str)] = &[
    ("usa", "United States Of America"),
    ("us", "United States Of America"),
    ("u.s.", "United States Of America"),
    ("u.s.a.", "United States Of America"),
    ("america", "United States Of America"),
    ("united states", "United States Of America"),
    ("uk", "United Kingdom"),
    ("u.k.", "United Kingdom"),
    ("britain", "United Kingdom"),
    ("great britain", "United Kingdom"),
    ("england", "United Kingdom"),
    ("uae", "United Arab Emirates"),
    ("emirates", "United Arab Emirates"),
    ("dubai", "United Arab Emirates"),
    ("korea", "South Korea"),
    ("holland", "Netherlands"),
    ("the netherlands", "Netherlands"),
    ("czechia", "Czech Republic"),
    ("ksa", "Saudi Arabia"),
    ("prc", "China"),
];

lazy_static! {
    static ref ALIAS_TABLE: HashMap<&'static str, &'static str> =
        COUNTRY_ALIASES.iter().copied().collect();
}

/// Look up an alias. The key must already be trimmed and lowercased.
pub fn lookup_alias(key: &str) -> Option<&'static str> {
    ALIAS_TABLE.get(key).copied()
}
