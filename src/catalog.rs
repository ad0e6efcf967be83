//! # Catalog Module
//!
//! The in-memory plan catalog and the name normalization every comparison
//! goes through.
//!
//! A [`Catalog`] is an immutable snapshot of the spreadsheet rows in their
//! original order. Handlers never mutate it; they take a snapshot from the
//! [`CatalogHandle`] and resolve queries against it. A reload builds a new
//! catalog and swaps the snapshot, so requests already in flight keep the one
//! they started with.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

/// One row of the plan catalog
///
/// Field names follow the spreadsheet header row. Missing cells deserialize
/// as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(rename = "Continent", default)]
    pub continent: String,
    #[serde(rename = "Country", default)]
    pub country: String,
    #[serde(rename = "Provider", default)]
    pub provider: String,
    #[serde(rename = "Plan", default)]
    pub plan_name: String,
    /// Free text such as "5GB"
    #[serde(rename = "Data", default)]
    pub data_allowance: String,
    /// Free text such as "7 days"
    #[serde(rename = "Validity", default)]
    pub validity: String,
    /// Free text, typically "$<number>"
    #[serde(rename = "Price", default)]
    pub price: String,
    #[serde(rename = "Link", default)]
    pub purchase_link: String,
}

impl Plan {
    /// Canonical (normalized) country name of this row
    pub fn canonical_country(&self) -> String {
        normalize_name(&self.country)
    }

    /// Canonical (normalized) continent name of this row
    pub fn canonical_continent(&self) -> String {
        normalize_name(&self.continent)
    }

    /// True when every field is blank, as with padding rows in a sheet
    pub fn is_blank(&self) -> bool {
        [
            &self.continent,
            &self.country,
            &self.provider,
            &self.plan_name,
            &self.data_allowance,
            &self.validity,
            &self.price,
            &self.purchase_link,
        ]
        .iter()
        .all(|field| field.trim().is_empty())
    }
}

/// Trim and title-case a country or continent name.
///
/// Every run of alphabetic characters starts upper-case and continues
/// lower-case, so "united states of america" becomes
/// "United States Of America" and "côte d'ivoire" becomes "Côte D'Ivoire".
///
/// # Examples
///
/// ```rust
/// use esim_plans_bot::catalog::normalize_name;
///
/// assert_eq!(normalize_name("  jaPAN "), "Japan");
/// assert_eq!(normalize_name("united kingdom"), "United Kingdom");
/// ```
pub fn normalize_name(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut previous_is_alpha = false;

    for c in raw.trim().chars() {
        if c.is_alphabetic() {
            if previous_is_alpha {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_alpha = true;
        } else {
            result.push(c);
            previous_is_alpha = false;
        }
    }

    result
}

/// Immutable, ordered snapshot of the plan catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    plans: Vec<Plan>,
}

impl Catalog {
    /// Build a catalog from rows in spreadsheet order, dropping blank rows
    pub fn new(plans: Vec<Plan>) -> Self {
        let plans = plans.into_iter().filter(|plan| !plan.is_blank()).collect();
        Self { plans }
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Plan> {
        self.plans.iter()
    }
}

impl FromIterator<Plan> for Catalog {
    fn from_iter<I: IntoIterator<Item = Plan>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Shared holder of the current catalog snapshot
#[derive(Debug, Default)]
pub struct CatalogHandle {
    current: RwLock<Arc<Catalog>>,
}

impl CatalogHandle {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// Take the snapshot a request will resolve against
    pub fn snapshot(&self) -> Arc<Catalog> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Swap in a freshly loaded catalog, returning the previous snapshot
    pub fn replace(&self, catalog: Catalog) -> Arc<Catalog> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(catalog))
    }
}
