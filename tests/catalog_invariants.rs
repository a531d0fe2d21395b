//! Catalog Invariant Tests
//!
//! Query and mutation behaviour of the catalog over a file-backed store:
//! - Filters are case-insensitive and ANDed
//! - Pagination slices after filtering
//! - Validation reports the first failed rule only
//! - Mutations keep totalPokemons equal to the record count
//! - Ids are never renumbered or reused

use std::collections::HashMap;

use pokedex::catalog::{
    Catalog, CatalogError, Collection, JsonFileStore, ListQuery, Pokemon, PokemonType,
    RecordStore, SchemaProfile,
};
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn pokemon(id: &str, name: &str, types: Vec<PokemonType>) -> Pokemon {
    Pokemon::new(id, name, types, format!("/images/{}.png", name))
}

fn starters() -> Vec<Pokemon> {
    vec![
        pokemon("1", "Bulbasaur", vec![PokemonType::Grass, PokemonType::Poison]),
        pokemon("2", "Ivysaur", vec![PokemonType::Grass, PokemonType::Poison]),
        pokemon("3", "Venusaur", vec![PokemonType::Grass]),
        pokemon("4", "Charmander", vec![PokemonType::Fire]),
        pokemon("5", "Charmeleon", vec![PokemonType::Fire]),
        pokemon("6", "Charizard", vec![PokemonType::Fire, PokemonType::Flying]),
        pokemon("7", "Squirtle", vec![PokemonType::Water]),
        pokemon("25", "Pikachu", vec![PokemonType::Electric]),
    ]
}

/// 25 fire records followed by 5 water records
fn thirty() -> Vec<Pokemon> {
    (1..=30)
        .map(|i| {
            let (name, t) = if i <= 25 {
                (format!("Flame{:02}", i), PokemonType::Fire)
            } else {
                (format!("Drop{:02}", i), PokemonType::Water)
            };
            Pokemon::new(i.to_string(), name, vec![t], format!("/images/{}.png", i))
        })
        .collect()
}

fn setup(pokemons: Vec<Pokemon>) -> (TempDir, Catalog<JsonFileStore>) {
    let tmp = TempDir::new().unwrap();
    let store = JsonFileStore::new(tmp.path().join("db.json"));
    store.save(&Collection::new(pokemons)).unwrap();

    let catalog = Catalog::open(store, SchemaProfile::Basic).unwrap();
    (tmp, catalog)
}

fn query(pairs: &[(&str, &str)]) -> ListQuery {
    let params: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ListQuery::parse(&params, 10)
}

fn names(pokemons: &[Pokemon]) -> Vec<&str> {
    pokemons.iter().map(|p| p.name.as_str()).collect()
}

fn ids(pokemons: &[Pokemon]) -> Vec<&str> {
    pokemons.iter().map(|p| p.id.as_str()).collect()
}

fn persisted(catalog: &Catalog<JsonFileStore>) -> Collection {
    catalog.store().load().unwrap()
}

// =============================================================================
// Filter Tests
// =============================================================================

/// Name filter is a case-insensitive substring match.
#[test]
fn test_name_filter_matches_substring() {
    let (_tmp, catalog) = setup(starters());

    let result = catalog.list(&query(&[("name", "char")])).unwrap();
    assert_eq!(names(&result), vec!["Charmander", "Charmeleon", "Charizard"]);
}

/// Type filter matches on membership in the type list.
#[test]
fn test_types_filter_matches_membership() {
    let (_tmp, catalog) = setup(starters());

    let result = catalog.list(&query(&[("types", "FIRE")])).unwrap();
    assert!(result.iter().all(|p| p.types.contains(&PokemonType::Fire)));
    assert_eq!(result.len(), 3);
}

/// Two filters combine with AND.
#[test]
fn test_filters_combine_with_and() {
    let (_tmp, catalog) = setup(starters());

    let result = catalog
        .list(&query(&[("name", "saur"), ("types", "poison")]))
        .unwrap();
    assert_eq!(names(&result), vec!["Bulbasaur", "Ivysaur"]);
}

/// Parameters outside the allow-list change nothing.
#[test]
fn test_unknown_parameters_are_ignored() {
    let (_tmp, catalog) = setup(starters());

    let all = catalog.list(&query(&[])).unwrap();
    let with_noise = catalog
        .list(&query(&[("Type1", "Fire"), ("color", "red")]))
        .unwrap();
    assert_eq!(all, with_noise);
    assert_eq!(all.len(), 8);
}

/// Same query, same answer.
#[test]
fn test_list_is_idempotent() {
    let (_tmp, catalog) = setup(starters());
    let q = query(&[("types", "grass"), ("limit", "2")]);

    assert_eq!(catalog.list(&q).unwrap(), catalog.list(&q).unwrap());
}

// =============================================================================
// Pagination Tests
// =============================================================================

/// 25 matches split into pages of 10, 10, 5, then nothing.
#[test]
fn test_pages_over_filtered_results() {
    let (_tmp, catalog) = setup(thirty());

    let page2 = catalog
        .list(&query(&[("types", "fire"), ("page", "2"), ("limit", "10")]))
        .unwrap();
    assert_eq!(page2.first().map(|p| p.id.as_str()), Some("11"));
    assert_eq!(page2.last().map(|p| p.id.as_str()), Some("20"));

    let page3 = catalog
        .list(&query(&[("types", "fire"), ("page", "3"), ("limit", "10")]))
        .unwrap();
    assert_eq!(ids(&page3), vec!["21", "22", "23", "24", "25"]);

    let page4 = catalog
        .list(&query(&[("types", "fire"), ("page", "4"), ("limit", "10")]))
        .unwrap();
    assert!(page4.is_empty());
}

/// Non-numeric page and limit fall back to defaults; page 0 is empty.
#[test]
fn test_page_coercion() {
    let (_tmp, catalog) = setup(thirty());

    let fallback = catalog
        .list(&query(&[("page", "first"), ("limit", "lots")]))
        .unwrap();
    assert_eq!(fallback.len(), 10);
    assert_eq!(fallback[0].id, "1");

    let zero = catalog.list(&query(&[("page", "0")])).unwrap();
    assert!(zero.is_empty());
}

// =============================================================================
// Validation Tests
// =============================================================================

/// An invalid type is reported even when there are also too many types.
#[test]
fn test_invalid_type_reported_before_count() {
    let (_tmp, catalog) = setup(starters());

    let err = catalog
        .create(&json!({"name": "Mew", "types": ["psychic", "cosmic", "fairy"], "url": "/m.png"}))
        .unwrap_err();
    assert!(matches!(err, CatalogError::InvalidType(ref t) if t == "cosmic"));
}

/// Three valid distinct types fail the count rule.
#[test]
fn test_three_types_rejected() {
    let (_tmp, catalog) = setup(starters());

    let err = catalog
        .create(&json!({"name": "Mew", "types": ["psychic", "ghost", "fairy"], "url": "/m.png"}))
        .unwrap_err();
    assert!(matches!(err, CatalogError::TooManyTypes { max: 2, got: 3 }));
}

/// Names collide regardless of case.
#[test]
fn test_duplicate_name_any_case() {
    let (_tmp, catalog) = setup(starters());

    for name in ["Pikachu", "PIKACHU", "pikachu"] {
        let err = catalog
            .create(&json!({"name": name, "types": ["electric"], "url": "/p.png"}))
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateName(_)));
    }
}

/// A rejected create leaves the store untouched.
#[test]
fn test_rejected_create_changes_nothing() {
    let (_tmp, catalog) = setup(starters());
    let before = persisted(&catalog);

    let _ = catalog.create(&json!({"name": "Mew", "types": [], "url": "/m.png"}));

    assert_eq!(persisted(&catalog), before);
}

// =============================================================================
// Mutation Tests
// =============================================================================

/// Create takes max id + 1, not length + 1.
#[test]
fn test_create_uses_max_id() {
    let (_tmp, catalog) = setup(starters());

    let created = catalog
        .create(&json!({"name": "Eevee", "types": ["normal"], "url": "/images/Eevee.png"}))
        .unwrap();
    assert_eq!(created.id, "26");

    let stored = persisted(&catalog);
    assert_eq!(stored.total_pokemons, 9);
    assert_eq!(stored.pokemons.last(), Some(&created));
}

/// Delete removes one record, decrements the total, keeps other ids.
#[test]
fn test_delete_one_record() {
    let (_tmp, catalog) = setup(starters());

    catalog.delete("4").unwrap();

    let stored = persisted(&catalog);
    assert_eq!(stored.total_pokemons, 7);
    assert_eq!(ids(&stored.pokemons), vec!["1", "2", "3", "5", "6", "7", "25"]);
}

/// Updating one field keeps all the others.
#[test]
fn test_update_merges_fields() {
    let mut pokemons = starters();
    pokemons[6].weight = Some("9.0 kg".to_string());
    pokemons[6].category = Some("Tiny Turtle".to_string());
    let (_tmp, catalog) = setup(pokemons);

    let updated = catalog.update("7", &json!({"weight": "9.5 kg"})).unwrap();

    assert_eq!(updated.name, "Squirtle");
    assert_eq!(updated.types, vec![PokemonType::Water]);
    assert_eq!(updated.url, "/images/Squirtle.png");
    assert_eq!(updated.category.as_deref(), Some("Tiny Turtle"));
    assert_eq!(updated.weight.as_deref(), Some("9.5 kg"));
    assert_eq!(persisted(&catalog).pokemons[6], updated);
}

/// Update may not touch fields outside the allow-list.
#[test]
fn test_update_rejects_disallowed_field() {
    let (_tmp, catalog) = setup(starters());

    let err = catalog.update("7", &json!({"id": "70"})).unwrap_err();
    assert!(matches!(err, CatalogError::DisallowedField(ref f) if f == "id"));
}

/// Renaming to another record's name is a conflict; keeping your own is fine.
#[test]
fn test_update_name_uniqueness() {
    let (_tmp, catalog) = setup(starters());

    let err = catalog.update("7", &json!({"name": "charizard"})).unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateName(_)));

    assert!(catalog.update("7", &json!({"name": "SQUIRTLE"})).is_ok());
}

/// Mutations survive reopening the store.
#[test]
fn test_mutations_persist_across_reopen() {
    let (tmp, catalog) = setup(starters());
    catalog.delete("1").unwrap();
    catalog
        .create(&json!({"name": "Eevee", "types": ["normal"], "url": "/e.png"}))
        .unwrap();
    drop(catalog);

    let reopened = Catalog::open(
        JsonFileStore::new(tmp.path().join("db.json")),
        SchemaProfile::Basic,
    )
    .unwrap();
    assert_eq!(reopened.total().unwrap(), 8);
    assert!(matches!(reopened.detail("1"), Err(CatalogError::NotFound)));
    assert_eq!(reopened.detail("26").unwrap().pokemon.name, "Eevee");
}

// =============================================================================
// Detail Tests
// =============================================================================

/// Neighbours wrap around at both ends of the collection.
#[test]
fn test_detail_wraparound() {
    let (_tmp, catalog) = setup(starters());

    let first = catalog.detail("1").unwrap();
    assert_eq!(first.previous_pokemon.id, "25");
    assert_eq!(first.next_pokemon.id, "2");

    let last = catalog.detail("25").unwrap();
    assert_eq!(last.previous_pokemon.id, "7");
    assert_eq!(last.next_pokemon.id, "1");
}
