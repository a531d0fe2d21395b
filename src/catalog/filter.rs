//! # Filter Expressions
//!
//! Allow-listed predicates over catalog records. Comparisons are
//! case-insensitive; every filter in a set must match (AND).

use std::collections::HashMap;

use super::record::Pokemon;

/// Fields a list query may filter on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FilterField {
    /// Substring of the record name
    Name,
    /// Membership in the record's type list
    Types,
}

impl FilterField {
    /// The query-parameter allow-list
    pub const ALLOWED: [FilterField; 2] = [FilterField::Name, FilterField::Types];

    /// Query-parameter name for this field
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterField::Name => "name",
            FilterField::Types => "types",
        }
    }

    /// Look up an allow-listed parameter name
    pub fn from_param(key: &str) -> Option<Self> {
        Self::ALLOWED.iter().copied().find(|f| f.as_str() == key)
    }
}

/// A filter expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpr {
    /// Field to filter on
    pub field: FilterField,

    /// Lower-cased value to look for
    pub value: String,
}

impl FilterExpr {
    /// Create a new filter expression
    pub fn new(field: FilterField, value: &str) -> Self {
        Self {
            field,
            value: value.to_lowercase(),
        }
    }

    /// Create a name-substring filter
    pub fn name(value: &str) -> Self {
        Self::new(FilterField::Name, value)
    }

    /// Create a type-membership filter
    pub fn types(value: &str) -> Self {
        Self::new(FilterField::Types, value)
    }

    /// Check if a record matches this filter
    pub fn matches(&self, pokemon: &Pokemon) -> bool {
        match self.field {
            FilterField::Name => pokemon.name.to_lowercase().contains(&self.value),
            FilterField::Types => pokemon.types.iter().any(|t| t.as_str() == self.value),
        }
    }
}

/// A set of filters combined with AND logic
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub filters: Vec<FilterExpr>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, filter: FilterExpr) -> Self {
        self.filters.push(filter);
        self
    }

    /// Build from raw query parameters, ignoring anything not allow-listed
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let mut filters: Vec<FilterExpr> = params
            .iter()
            .filter_map(|(key, value)| {
                FilterField::from_param(key).map(|field| FilterExpr::new(field, value))
            })
            .collect();
        // Sorted so the set does not depend on map iteration order.
        filters.sort_by_key(|f| f.field);
        Self { filters }
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Check if a record matches all filters
    pub fn matches(&self, pokemon: &Pokemon) -> bool {
        self.filters.iter().all(|f| f.matches(pokemon))
    }

    /// Matching records, in collection order
    pub fn apply<'a>(&self, pokemons: &'a [Pokemon]) -> Vec<&'a Pokemon> {
        pokemons.iter().filter(|p| self.matches(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::record::PokemonType;

    fn sample() -> Vec<Pokemon> {
        vec![
            Pokemon::new(
                "1",
                "Bulbasaur",
                vec![PokemonType::Grass, PokemonType::Poison],
                "/b.png",
            ),
            Pokemon::new("4", "Charmander", vec![PokemonType::Fire], "/c.png"),
            Pokemon::new(
                "6",
                "Charizard",
                vec![PokemonType::Fire, PokemonType::Flying],
                "/cz.png",
            ),
            Pokemon::new("7", "Squirtle", vec![PokemonType::Water], "/s.png"),
        ]
    }

    fn names(found: &[&Pokemon]) -> Vec<String> {
        found.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_name_substring() {
        let pokemons = sample();
        let set = FilterSet::new().and(FilterExpr::name("char"));
        assert_eq!(names(&set.apply(&pokemons)), vec!["Charmander", "Charizard"]);
    }

    #[test]
    fn test_name_case_folded_both_sides() {
        let pokemons = sample();
        let set = FilterSet::new().and(FilterExpr::name("SQUIRT"));
        assert_eq!(names(&set.apply(&pokemons)), vec!["Squirtle"]);
    }

    #[test]
    fn test_types_membership() {
        let pokemons = sample();
        let set = FilterSet::new().and(FilterExpr::types("Fire"));
        assert_eq!(names(&set.apply(&pokemons)), vec!["Charmander", "Charizard"]);

        // Membership, not substring of a type name
        let partial = FilterSet::new().and(FilterExpr::types("fir"));
        assert!(partial.apply(&pokemons).is_empty());
    }

    #[test]
    fn test_filters_are_anded() {
        let pokemons = sample();
        let set = FilterSet::new()
            .and(FilterExpr::name("saur"))
            .and(FilterExpr::types("poison"));
        assert_eq!(names(&set.apply(&pokemons)), vec!["Bulbasaur"]);
    }

    #[test]
    fn test_from_params_ignores_unknown_keys() {
        let mut params = HashMap::new();
        params.insert("name".to_string(), "char".to_string());
        params.insert("color".to_string(), "red".to_string());
        params.insert("Type1".to_string(), "Fire".to_string());

        let set = FilterSet::from_params(&params);
        assert_eq!(set.filters, vec![FilterExpr::name("char")]);
    }

    #[test]
    fn test_from_params_order_is_stable() {
        let mut params = HashMap::new();
        params.insert("types".to_string(), "poison".to_string());
        params.insert("name".to_string(), "saur".to_string());

        let set = FilterSet::from_params(&params);
        assert_eq!(
            set.filters,
            vec![FilterExpr::name("saur"), FilterExpr::types("poison")]
        );
        assert_eq!(FilterField::from_param("Name"), None);
    }

    #[test]
    fn test_empty_set_keeps_everything() {
        let pokemons = sample();
        let set = FilterSet::from_params(&HashMap::new());
        assert!(set.is_empty());
        assert_eq!(set.apply(&pokemons).len(), pokemons.len());
    }
}
