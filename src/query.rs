//! Query intent detection and answering for free-text messages.

use log::debug;

use crate::callback_data::CallbackData;
use crate::catalog::{Catalog, Plan};
use crate::errors::LookupError;
use crate::filter::{parse_filter, ComparisonFilter};
use crate::resolver::{apply_comparison_filter, cheapest, paginate, plans_for_country, resolve_country};

const CHEAPEST_KEYWORD: &str = "cheapest";

/// What a free-text message asks for
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// `cheapest <country>`
    Cheapest(String),
    /// `price < 10`, `data > 5GB`, `validity > 7 days`
    Filter(ComparisonFilter),
    /// Anything else is taken as a country name
    Country(String),
}

/// Classify a message into a query
///
/// Filter syntax with an unreadable threshold is reported as
/// [`LookupError::UnparseableFilter`] rather than falling back to a country
/// lookup.
pub fn classify(text: &str) -> Result<Query, LookupError> {
    let trimmed = text.trim();
    let lowered = trimmed.to_lowercase();

    if let Some(rest) = lowered.strip_prefix(CHEAPEST_KEYWORD) {
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            return Ok(Query::Cheapest(rest.trim().to_string()));
        }
    }

    if let Some(parsed) = parse_filter(trimmed) {
        return parsed.map(Query::Filter);
    }

    Ok(Query::Country(trimmed.to_string()))
}

/// Page sizes used when answering a query
#[derive(Debug, Clone, Copy)]
pub struct AnswerLimits {
    /// Plans shown in the first reply to a message
    pub page_size: usize,
    /// Maximum plans listed by a `cheapest` query
    pub cheapest_limit: usize,
}

impl Default for AnswerLimits {
    fn default() -> Self {
        Self {
            page_size: 5,
            cheapest_limit: 5,
        }
    }
}

/// The first page of an answered query
#[derive(Debug, Clone, PartialEq)]
pub struct Answer<'a> {
    pub plans: Vec<&'a Plan>,
    /// Token for the "More" button when more rows remain
    pub next: Option<CallbackData>,
    pub total: usize,
}

/// Classify and resolve a message against the catalog
pub fn answer<'a>(catalog: &'a Catalog, text: &str, limits: AnswerLimits) -> Result<Answer<'a>, LookupError> {
    let query = classify(text)?;
    debug!("Classified '{}' as {:?}", text, query);

    match query {
        Query::Cheapest(country) => {
            if country.is_empty() {
                return Err(LookupError::MissingCountry);
            }
            let resolved = resolve_country(catalog, &country).ok_or_else(|| not_found(&country))?;
            let plans = cheapest(catalog, &resolved.name, limits.cheapest_limit);
            if plans.is_empty() {
                return Err(not_found(&resolved.name));
            }
            let total = plans.len();
            Ok(Answer {
                plans,
                next: None,
                total,
            })
        }
        Query::Filter(filter) => {
            let matched = apply_comparison_filter(catalog, &filter);
            if matched.is_empty() {
                return Err(not_found(&filter.to_string()));
            }
            let page = paginate(&matched, 0, limits.page_size);
            Ok(Answer {
                next: page.next_offset.map(|offset| CallbackData::FilterPage { filter, offset }),
                plans: page.plans,
                total: page.total,
            })
        }
        Query::Country(country) => {
            let resolved = resolve_country(catalog, &country).ok_or_else(|| not_found(&country))?;
            let matched = plans_for_country(catalog, &resolved.name);
            if matched.is_empty() {
                return Err(not_found(&resolved.name));
            }
            let page = paginate(&matched, 0, limits.page_size);
            Ok(Answer {
                next: page.next_offset.map(|offset| CallbackData::CountryPage {
                    country: resolved.name.clone(),
                    offset,
                }),
                plans: page.plans,
                total: page.total,
            })
        }
    }
}

fn not_found(query: &str) -> LookupError {
    LookupError::NotFound {
        query: query.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterField;

    #[test]
    fn test_classify_cheapest() {
        assert_eq!(classify("Cheapest USA").unwrap(), Query::Cheapest("usa".to_string()));
        assert_eq!(classify("cheapest").unwrap(), Query::Cheapest(String::new()));
    }

    #[test]
    fn test_classify_filter() {
        match classify("price < 10").unwrap() {
            Query::Filter(filter) => assert_eq!(filter.field, FilterField::Price),
            other => panic!("Unexpected query: {other:?}"),
        }
        assert!(matches!(
            classify("validity > forever"),
            Err(LookupError::UnparseableFilter { .. })
        ));
    }

    #[test]
    fn test_classify_country() {
        assert_eq!(classify("  Japan ").unwrap(), Query::Country("Japan".to_string()));
        assert_eq!(classify("price list").unwrap(), Query::Country("price list".to_string()));
    }

    #[test]
    fn test_bare_cheapest_asks_for_country() {
        let catalog = Catalog::default();
        assert_eq!(
            answer(&catalog, "cheapest", AnswerLimits::default()),
            Err(LookupError::MissingCountry)
        );
        assert_eq!(
            answer(&catalog, "  Cheapest   ", AnswerLimits::default()),
            Err(LookupError::MissingCountry)
        );
    }
}
