//! pokedex - A small, file-backed REST catalog of Pokemon records
//!
//! The catalog holds one ordered collection, answers filtered and paged
//! list queries, and validates every create, update and delete before
//! rewriting the store.

pub mod catalog;
pub mod cli;
pub mod http_server;
pub mod observability;
