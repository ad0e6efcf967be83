//! # Catalog Resolver Module
//!
//! Resolves user input against a catalog snapshot: country names (with
//! aliases and fuzzy matching), plan listings, cheapest-first listings,
//! comparison filters and the continent/country sets behind the browse menu.
//!
//! Every operation takes the catalog explicitly and only reads it, so two
//! requests resolving against the same snapshot never interfere and repeated
//! calls return identical results.

use log::{debug, trace};
use std::collections::BTreeSet;

use crate::aliases::lookup_alias;
use crate::catalog::{normalize_name, Catalog, Plan};
use crate::filter::{parse_price, ComparisonFilter};

/// Minimum similarity for a fuzzy country match
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.6;

/// How a country name was resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolutionSource {
    /// Found in the alias table
    Alias,
    /// Input already named a catalog country
    Exact,
    /// Closest catalog country above the similarity threshold
    Fuzzy(f64),
    /// Nothing matched; the title-cased input is used as-is
    Literal,
}

/// A resolved country name and how it was found
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCountry {
    pub name: String,
    pub source: ResolutionSource,
}

impl ResolvedCountry {
    /// False for the literal fallback, which may not exist in the catalog
    pub fn is_confident(&self) -> bool {
        self.source != ResolutionSource::Literal
    }
}

/// Resolve free-text user input to a canonical country name
///
/// Order of precedence: alias table, exact catalog name, fuzzy match against
/// catalog countries, then the title-cased input as a literal guess.
/// Returns `None` only for blank input.
///
/// # Examples
///
/// ```rust
/// use esim_plans_bot::catalog::{Catalog, Plan};
/// use esim_plans_bot::resolver::resolve_country;
///
/// let catalog = Catalog::new(vec![Plan {
///     country: "Japan".to_string(),
///     ..Default::default()
/// }]);
///
/// assert_eq!(resolve_country(&catalog, "usa").unwrap().name, "United States Of America");
/// assert_eq!(resolve_country(&catalog, "Jpan").unwrap().name, "Japan");
/// ```
pub fn resolve_country(catalog: &Catalog, user_input: &str) -> Option<ResolvedCountry> {
    let key = user_input.trim().to_lowercase();
    if key.is_empty() {
        return None;
    }

    if let Some(canonical) = lookup_alias(&key) {
        debug!("Resolved '{}' through alias to '{}'", key, canonical);
        return Some(ResolvedCountry {
            name: canonical.to_string(),
            source: ResolutionSource::Alias,
        });
    }

    let candidates = catalog_countries(catalog);
    let literal = normalize_name(&key);

    if candidates.contains(&literal) {
        return Some(ResolvedCountry {
            name: literal,
            source: ResolutionSource::Exact,
        });
    }

    if let Some((name, score)) = best_fuzzy_match(&key, &candidates) {
        debug!("Fuzzy matched '{}' to '{}' (score {:.3})", key, name, score);
        return Some(ResolvedCountry {
            name,
            source: ResolutionSource::Fuzzy(score),
        });
    }

    debug!("No match for '{}', using literal '{}'", key, literal);
    Some(ResolvedCountry {
        name: literal,
        source: ResolutionSource::Literal,
    })
}

/// Highest-scoring candidate at or above the threshold.
///
/// Candidates arrive sorted, and only a strictly better score replaces the
/// current best, so ties go to the alphabetically first name.
fn best_fuzzy_match(key: &str, candidates: &BTreeSet<String>) -> Option<(String, f64)> {
    let mut best: Option<(&String, f64)> = None;

    for candidate in candidates {
        let score = strsim::normalized_levenshtein(key, &candidate.to_lowercase());
        trace!("Similarity '{}' ~ '{}' = {:.3}", key, candidate, score);
        if score < FUZZY_MATCH_THRESHOLD {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((candidate, score)),
        }
    }

    best.map(|(name, score)| (name.clone(), score))
}

fn catalog_countries(catalog: &Catalog) -> BTreeSet<String> {
    catalog
        .iter()
        .map(Plan::canonical_country)
        .filter(|country| !country.is_empty())
        .collect()
}

/// All plans for a country, in catalog order
///
/// An empty result means "not found"; it is not an error.
pub fn plans_for_country<'a>(catalog: &'a Catalog, country: &str) -> Vec<&'a Plan> {
    let wanted = normalize_name(country);
    catalog
        .iter()
        .filter(|plan| plan.canonical_country() == wanted)
        .collect()
}

/// Up to `limit` plans for a country, cheapest first
///
/// Rows whose price cannot be parsed are skipped. Plans with equal prices
/// keep their catalog order.
pub fn cheapest<'a>(catalog: &'a Catalog, country: &str, limit: usize) -> Vec<&'a Plan> {
    let mut priced: Vec<(f64, &Plan)> = plans_for_country(catalog, country)
        .into_iter()
        .filter_map(|plan| match parse_price(&plan.price) {
            Ok(price) => Some((price, plan)),
            Err(e) => {
                trace!("Skipping '{}' in cheapest listing: {}", plan.plan_name, e);
                None
            }
        })
        .collect();

    priced.sort_by(|(a, _), (b, _)| a.total_cmp(b));

    priced
        .into_iter()
        .take(limit)
        .map(|(_, plan)| plan)
        .collect()
}

/// All plans passing a comparison filter, in catalog order
pub fn apply_comparison_filter<'a>(catalog: &'a Catalog, filter: &ComparisonFilter) -> Vec<&'a Plan> {
    let matched: Vec<&Plan> = catalog.iter().filter(|plan| filter.matches(plan)).collect();
    debug!("Filter '{}' matched {} of {} plans", filter, matched.len(), catalog.len());
    matched
}

/// Continents present in the catalog, normalized and sorted
pub fn continents_available(catalog: &Catalog) -> BTreeSet<String> {
    catalog
        .iter()
        .map(Plan::canonical_continent)
        .filter(|continent| !continent.is_empty())
        .collect()
}

/// Countries in a continent, normalized and sorted
pub fn countries_in_continent(catalog: &Catalog, continent: &str) -> BTreeSet<String> {
    let wanted = normalize_name(continent);
    catalog
        .iter()
        .filter(|plan| plan.canonical_continent() == wanted)
        .map(Plan::canonical_country)
        .filter(|country| !country.is_empty())
        .collect()
}

/// One page of a result list
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    pub plans: Vec<&'a Plan>,
    /// Offset of the following page, if any rows remain
    pub next_offset: Option<usize>,
    pub total: usize,
}

/// Slice `per_page` plans starting at `offset`
pub fn paginate<'a>(plans: &[&'a Plan], offset: usize, per_page: usize) -> Page<'a> {
    let total = plans.len();
    let start = offset.min(total);
    let end = start.saturating_add(per_page).min(total);

    Page {
        plans: plans[start..end].to_vec(),
        next_offset: (end < total).then_some(end),
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(country: &str, name: &str, price: &str) -> Plan {
        Plan {
            continent: "Asia".to_string(),
            country: country.to_string(),
            plan_name: name.to_string(),
            price: price.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_best_fuzzy_match_prefers_alphabetical_on_tie() {
        let candidates: BTreeSet<String> = ["Mali", "Bali"].iter().map(|s| s.to_string()).collect();
        let (name, _) = best_fuzzy_match("xali", &candidates).unwrap();
        assert_eq!(name, "Bali");
    }

    #[test]
    fn test_exact_resolution_is_normalized() {
        let catalog = Catalog::new(vec![plan("South Korea", "K1", "$5")]);
        let resolved = resolve_country(&catalog, "  SOUTH korea ").unwrap();
        assert_eq!(resolved.name, "South Korea");
        assert_eq!(resolved.source, ResolutionSource::Exact);
    }

    #[test]
    fn test_blank_input() {
        let catalog = Catalog::new(vec![plan("Japan", "J1", "$5")]);
        assert!(resolve_country(&catalog, "   ").is_none());
    }

    #[test]
    fn test_paginate() {
        let catalog = Catalog::new((0..7).map(|i| plan("Japan", &format!("J{i}"), "$1")).collect());
        let all = plans_for_country(&catalog, "Japan");

        let first = paginate(&all, 0, 5);
        assert_eq!(first.plans.len(), 5);
        assert_eq!(first.next_offset, Some(5));

        let second = paginate(&all, 5, 5);
        assert_eq!(second.plans.len(), 2);
        assert_eq!(second.plans[0].plan_name, "J5");
        assert_eq!(second.next_offset, None);

        let past_end = paginate(&all, 50, 5);
        assert!(past_end.plans.is_empty());
        assert_eq!(past_end.total, 7);
    }
}
