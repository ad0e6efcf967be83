//! # Lookup Error Types Module
//!
//! This module defines the error taxonomy produced while resolving user queries
//! against the plan catalog. None of these are process-level failures: the bot
//! layer turns all but `UnparseableRowValue` into a localized reply; that one
//! never leaves the resolver.

/// Outcomes of a catalog lookup that did not produce plans
#[derive(Debug, Clone, PartialEq)]
pub enum LookupError {
    /// No rows matched the resolved country or filter
    NotFound { query: String },
    /// The comparison-filter syntax matched but the threshold is not a number
    UnparseableFilter { input: String },
    /// `cheapest` without a country
    MissingCountry,
    /// A single row's numeric field could not be parsed; the row is skipped
    UnparseableRowValue { value: String },
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::NotFound { query } => write!(f, "No plans found for: {query}"),
            LookupError::UnparseableFilter { input } => write!(f, "Invalid filter: {input}"),
            LookupError::MissingCountry => write!(f, "No country given"),
            LookupError::UnparseableRowValue { value } => {
                write!(f, "Unparseable row value: {value}")
            }
        }
    }
}

impl std::error::Error for LookupError {}
