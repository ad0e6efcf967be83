//! # Comparison Filter Module
//!
//! Parsing of `field operator value` queries such as `price < 10`,
//! `data > 5GB` or `validity > 7 days`, and the numeric extraction applied to
//! the free-text catalog fields they compare against.
//!
//! ## Features
//!
//! - Case-insensitive filter syntax with optional whitespace around the operator
//! - Unit suffix stripping driven by an explicit table ([`UNIT_SUFFIXES`])
//! - Opportunistic numeric extraction from free-text cells like "5GB" or "$12.50"

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;
use std::fmt;

use crate::catalog::Plan;
use crate::errors::LookupError;

/// Unit suffixes a user may append to a filter threshold
///
/// Only units that leave the number unchanged belong here; "500mb" is not
/// "500" of anything the catalog compares against.
pub const UNIT_SUFFIXES: &[&str] = &["gb", "days", "day", "usd"];

/// Currency symbols stripped from prices and thresholds
pub const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥'];

const FILTER_PATTERN: &str = r"(?i)^\s*(price|data|validity)\s*([<>])\s*(.+?)\s*$";

lazy_static! {
    static ref FILTER_REGEX: Regex =
        Regex::new(FILTER_PATTERN).expect("Filter pattern should be valid");
}

/// Catalog field a comparison filter applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Price,
    Data,
    Validity,
}

impl FilterField {
    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "price" => Some(FilterField::Price),
            "data" => Some(FilterField::Data),
            "validity" => Some(FilterField::Validity),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterField::Price => "price",
            FilterField::Data => "data",
            FilterField::Validity => "validity",
        }
    }

    /// The free-text value of this field on a plan row
    pub fn value_of<'a>(&self, plan: &'a Plan) -> &'a str {
        match self {
            FilterField::Price => &plan.price,
            FilterField::Data => &plan.data_allowance,
            FilterField::Validity => &plan.validity,
        }
    }
}

/// Strict comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    LessThan,
    GreaterThan,
}

impl Comparison {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "<" => Some(Comparison::LessThan),
            ">" => Some(Comparison::GreaterThan),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::LessThan => "<",
            Comparison::GreaterThan => ">",
        }
    }

    pub fn holds(&self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::LessThan => value < threshold,
            Comparison::GreaterThan => value > threshold,
        }
    }
}

/// A parsed `field operator value` filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonFilter {
    pub field: FilterField,
    pub comparison: Comparison,
    pub threshold: f64,
}

impl ComparisonFilter {
    /// Whether a plan row passes this filter. Rows whose field has no
    /// readable number never pass.
    pub fn matches(&self, plan: &Plan) -> bool {
        let raw = self.field.value_of(plan);
        match numeric_value(raw) {
            Ok(value) => self.comparison.holds(value, self.threshold),
            Err(e) => {
                trace!("Excluding row '{}' from {} filter: {}", plan.plan_name, self.field.as_str(), e);
                false
            }
        }
    }
}

/// Compact form (`price<10`), which [`parse_filter`] reads back.
impl fmt::Display for ComparisonFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.field.as_str(),
            self.comparison.as_str(),
            self.threshold
        )
    }
}

/// Parse a comparison filter from user text
///
/// # Returns
///
/// - `None` when the text is not in `field operator value` form; the caller
///   should treat it as a country lookup instead
/// - `Some(Err(LookupError::UnparseableFilter))` when the form matches but the
///   threshold is not a number
/// - `Some(Ok(filter))` otherwise
///
/// # Examples
///
/// ```rust
/// use esim_plans_bot::filter::{parse_filter, Comparison, FilterField};
///
/// let filter = parse_filter("Data > 5GB").unwrap().unwrap();
/// assert_eq!(filter.field, FilterField::Data);
/// assert_eq!(filter.comparison, Comparison::GreaterThan);
/// assert_eq!(filter.threshold, 5.0);
///
/// assert!(parse_filter("japan").is_none());
/// assert!(parse_filter("price < cheap").unwrap().is_err());
/// ```
pub fn parse_filter(text: &str) -> Option<Result<ComparisonFilter, LookupError>> {
    let captures = FILTER_REGEX.captures(text)?;

    let field = FilterField::parse(&captures[1])?;
    let comparison = Comparison::parse(&captures[2])?;
    let raw_threshold = &captures[3];

    let stripped = strip_unit_suffixes(raw_threshold);
    let threshold = match stripped.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            debug!("Filter threshold '{}' is not a number", raw_threshold);
            return Some(Err(LookupError::UnparseableFilter {
                input: text.trim().to_string(),
            }));
        }
    };

    debug!(
        "Parsed filter: field={}, operator={}, threshold={}",
        field.as_str(),
        comparison.as_str(),
        threshold
    );

    Some(Ok(ComparisonFilter {
        field,
        comparison,
        threshold,
    }))
}

/// Remove recognized unit suffixes and currency symbols from a threshold
///
/// Matching is case-insensitive; the result is lowercased and trimmed.
///
/// # Examples
///
/// ```rust
/// use esim_plans_bot::filter::strip_unit_suffixes;
///
/// assert_eq!(strip_unit_suffixes("5GB"), "5");
/// assert_eq!(strip_unit_suffixes(" 7 Days "), "7");
/// assert_eq!(strip_unit_suffixes("$10"), "10");
/// ```
pub fn strip_unit_suffixes(value: &str) -> String {
    let mut result = value.trim().to_lowercase();

    loop {
        let before = result.len();
        for suffix in UNIT_SUFFIXES {
            if let Some(stripped) = result.strip_suffix(suffix) {
                result = stripped.trim_end().to_string();
            }
        }
        if result.len() == before {
            break;
        }
    }

    result
        .trim_matches(|c: char| c.is_whitespace() || CURRENCY_SYMBOLS.contains(&c))
        .to_string()
}

/// Extract a number from a free-text catalog cell
///
/// Every character that is not a digit or a decimal point is dropped before
/// parsing, so "5GB", "$12.50" and "30 days" all yield numbers while "N/A" and
/// "Unlimited" do not.
pub fn numeric_value(raw: &str) -> Result<f64, LookupError> {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    digits
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| LookupError::UnparseableRowValue {
            value: raw.to_string(),
        })
}

/// Parse a price cell by stripping currency symbols
///
/// Unlike [`numeric_value`], anything besides the currency symbol and
/// surrounding whitespace makes the price unparseable.
pub fn parse_price(raw: &str) -> Result<f64, LookupError> {
    raw.trim_matches(|c: char| c.is_whitespace() || CURRENCY_SYMBOLS.contains(&c))
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| LookupError::UnparseableRowValue {
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_unit_suffixes() {
        assert_eq!(strip_unit_suffixes("10"), "10");
        assert_eq!(strip_unit_suffixes("5gb"), "5");
        assert_eq!(strip_unit_suffixes("5 GB"), "5");
        assert_eq!(strip_unit_suffixes("7 days"), "7");
        assert_eq!(strip_unit_suffixes("1 day"), "1");
        assert_eq!(strip_unit_suffixes("12 USD"), "12");
        assert_eq!(strip_unit_suffixes("€9.99"), "9.99");
    }

    #[test]
    fn test_strip_keeps_unknown_units() {
        assert_eq!(strip_unit_suffixes("500mb"), "500mb");
        assert_eq!(strip_unit_suffixes("cheap"), "cheap");
    }

    #[test]
    fn test_parse_filter_variants() {
        let filter = parse_filter("price < 10").unwrap().unwrap();
        assert_eq!(filter.field, FilterField::Price);
        assert_eq!(filter.comparison, Comparison::LessThan);
        assert_eq!(filter.threshold, 10.0);

        let filter = parse_filter("validity>7 days").unwrap().unwrap();
        assert_eq!(filter.field, FilterField::Validity);
        assert_eq!(filter.threshold, 7.0);

        let filter = parse_filter("PRICE < $4.5").unwrap().unwrap();
        assert_eq!(filter.threshold, 4.5);
    }

    #[test]
    fn test_parse_filter_falls_through() {
        assert!(parse_filter("Japan").is_none());
        assert!(parse_filter("price = 10").is_none());
        assert!(parse_filter("speed > 10").is_none());
        assert!(parse_filter("price <").is_none());
    }

    #[test]
    fn test_parse_filter_bad_threshold() {
        let result = parse_filter("data > lots").unwrap();
        assert_eq!(
            result,
            Err(LookupError::UnparseableFilter {
                input: "data > lots".to_string()
            })
        );
    }

    #[test]
    fn test_numeric_value() {
        assert_eq!(numeric_value("5GB").unwrap(), 5.0);
        assert_eq!(numeric_value("$12.50").unwrap(), 12.5);
        assert_eq!(numeric_value("30 days").unwrap(), 30.0);
        assert!(numeric_value("N/A").is_err());
        assert!(numeric_value("Unlimited").is_err());
        assert!(numeric_value("").is_err());
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("$8").unwrap(), 8.0);
        assert_eq!(parse_price(" 12.99 ").unwrap(), 12.99);
        assert!(parse_price("N/A").is_err());
        assert!(parse_price("$12 promo").is_err());
    }

    #[test]
    fn test_filter_display_round_trips() {
        let filter = parse_filter("data > 5gb").unwrap().unwrap();
        assert_eq!(filter.to_string(), "data>5");
        assert_eq!(parse_filter(&filter.to_string()).unwrap().unwrap(), filter);
    }

    #[test]
    fn test_filter_matches_rows() {
        let filter = parse_filter("price < 10").unwrap().unwrap();
        let cheap = Plan {
            price: "$8".to_string(),
            ..Default::default()
        };
        let pricey = Plan {
            price: "$12".to_string(),
            ..Default::default()
        };
        let unknown = Plan {
            price: "N/A".to_string(),
            ..Default::default()
        };
        assert!(filter.matches(&cheap));
        assert!(!filter.matches(&pricey));
        assert!(!filter.matches(&unknown));
    }
}
