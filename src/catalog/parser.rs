//! # Query Parameter Parser
//!
//! Turns raw list-query parameters into filters plus a page selection.
//! Parsing never fails: unknown keys are dropped and malformed numbers
//! fall back to their defaults.

use std::collections::HashMap;

use super::filter::FilterSet;
use super::pagination::Pagination;

/// Parsed list query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Filter expressions
    pub filters: FilterSet,

    /// Page selection, applied after filtering
    pub pagination: Pagination,
}

impl ListQuery {
    /// Parse query parameters from a HashMap
    pub fn parse(params: &HashMap<String, String>, default_limit: usize) -> Self {
        let pagination = Pagination::from_raw(
            params.get("page").map(String::as_str),
            params.get("limit").map(String::as_str),
            default_limit,
        );

        Self {
            filters: FilterSet::from_params(params),
            pagination,
        }
    }

    /// Unfiltered first page
    pub fn first_page(default_limit: usize) -> Self {
        Self::parse(&HashMap::new(), default_limit)
    }
}
