//! # Pokemon Catalog
//!
//! The record collection and everything that decides over it: list
//! filtering and pagination, record validation, and the create, update
//! and delete operations that persist through a [`RecordStore`].

pub mod errors;
pub mod filter;
pub mod loader;
pub mod pagination;
pub mod parser;
pub mod record;
pub mod response;
pub mod service;
pub mod store;
pub mod validator;

pub use errors::{CatalogError, CatalogResult, ErrorKind};
pub use filter::{FilterExpr, FilterField, FilterSet};
pub use loader::{ImageCheck, ImageDirectory, SeedLoader};
pub use pagination::Pagination;
pub use parser::ListQuery;
pub use record::{Collection, Pokemon, PokemonType, SchemaProfile};
pub use response::{DeleteResponse, HealthResponse, PokemonDetail};
pub use service::Catalog;
pub use store::{JsonFileStore, MemoryStore, RecordStore};
pub use validator::{PokemonDraft, Validator, UPDATABLE_FIELDS};
