//! # Catalog Service
//!
//! Reads and mutations over the record collection.
//!
//! The collection is held in memory and is authoritative for reads.
//! Each mutation runs under the write lock: it edits a copy, persists the
//! copy through the store, and only then swaps it in. A failed persist
//! therefore leaves the catalog unchanged.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use tracing::info;

use super::errors::{CatalogError, CatalogResult};
use super::parser::ListQuery;
use super::record::{Collection, Pokemon, SchemaProfile};
use super::response::PokemonDetail;
use super::store::RecordStore;
use super::validator::{PokemonDraft, Validator};

/// Record catalog backed by a [`RecordStore`]
pub struct Catalog<S: RecordStore> {
    store: S,
    collection: RwLock<Collection>,
    validator: Validator,
    default_limit: usize,
}

impl<S: RecordStore> Catalog<S> {
    /// Load the collection from `store`
    pub fn open(store: S, profile: SchemaProfile) -> CatalogResult<Self> {
        let collection = store.load()?;
        info!(
            records = collection.len(),
            profile = ?profile,
            "catalog opened"
        );

        Ok(Self {
            store,
            collection: RwLock::new(collection),
            validator: Validator::new(profile),
            default_limit: profile.default_limit(),
        })
    }

    /// Override the profile's default page size
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read(&self) -> CatalogResult<RwLockReadGuard<'_, Collection>> {
        self.collection
            .read()
            .map_err(|_| CatalogError::Internal("Lock poisoned".to_string()))
    }

    fn write(&self) -> CatalogResult<RwLockWriteGuard<'_, Collection>> {
        self.collection
            .write()
            .map_err(|_| CatalogError::Internal("Lock poisoned".to_string()))
    }

    /// Persist `next` and make it current
    fn commit(&self, guard: &mut Collection, mut next: Collection) -> CatalogResult<()> {
        next.recount();
        self.store.save(&next)?;
        *guard = next;
        Ok(())
    }

    /// Number of records
    pub fn total(&self) -> CatalogResult<usize> {
        Ok(self.read()?.total_pokemons)
    }

    /// Filter, then paginate
    pub fn list(&self, query: &ListQuery) -> CatalogResult<Vec<Pokemon>> {
        let data = self.read()?;
        let matched = query.filters.apply(&data.pokemons);

        Ok(query
            .pagination
            .apply(matched)
            .into_iter()
            .cloned()
            .collect())
    }

    /// List from raw query parameters
    pub fn list_params(&self, params: &HashMap<String, String>) -> CatalogResult<Vec<Pokemon>> {
        self.list(&ListQuery::parse(params, self.default_limit))
    }

    /// Record by id with its neighbours; the ends wrap around
    pub fn detail(&self, id: &str) -> CatalogResult<PokemonDetail> {
        let data = self.read()?;
        let index = data.position(id).ok_or(CatalogError::NotFound)?;
        let len = data.pokemons.len();

        let previous = if index == 0 { len - 1 } else { index - 1 };
        let next = if index + 1 == len { 0 } else { index + 1 };

        Ok(PokemonDetail {
            pokemon: data.pokemons[index].clone(),
            previous_pokemon: data.pokemons[previous].clone(),
            next_pokemon: data.pokemons[next].clone(),
        })
    }

    /// Validate and append a new record
    pub fn create(&self, body: &Value) -> CatalogResult<Pokemon> {
        let draft = PokemonDraft::from_body(body)?;

        let mut data = self.write()?;
        let valid = self.validator.validate(draft, &data.pokemons, None)?;
        let pokemon = valid.into_record(data.next_id()?);

        let mut next = data.clone();
        next.pokemons.push(pokemon.clone());
        self.commit(&mut data, next)?;

        info!(id = %pokemon.id, name = %pokemon.name, "pokemon created");
        Ok(pokemon)
    }

    /// Merge `patch` into the record and validate the result
    pub fn update(&self, id: &str, patch: &Value) -> CatalogResult<Pokemon> {
        let mut data = self.write()?;
        let index = data.position(id).ok_or(CatalogError::NotFound)?;

        let merged = PokemonDraft::merge_patch(&data.pokemons[index], patch)?;
        let valid = self.validator.validate(merged, &data.pokemons, Some(id))?;
        let pokemon = valid.into_record(id.to_string());

        let mut next = data.clone();
        next.pokemons[index] = pokemon.clone();
        self.commit(&mut data, next)?;

        info!(id = %pokemon.id, "pokemon updated");
        Ok(pokemon)
    }

    /// Remove the record; remaining ids are untouched
    pub fn delete(&self, id: &str) -> CatalogResult<()> {
        let mut data = self.write()?;
        let index = data.position(id).ok_or(CatalogError::NotFound)?;

        let mut next = data.clone();
        let removed = next.pokemons.remove(index);
        self.commit(&mut data, next)?;

        info!(id = %removed.id, name = %removed.name, "pokemon deleted");
        Ok(())
    }
}
