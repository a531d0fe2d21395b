//! # Catalog HTTP Server Module
//!
//! Exposes the catalog over HTTP with Axum.
//!
//! # Endpoints
//!
//! - `/health` - Health check with record count
//! - `<prefix>/` - List (GET) and create (POST)
//! - `<prefix>/:id` - Detail (GET), update (PUT), delete (DELETE)
//! - `<image route>/*` - Static record images, when an image directory is set

pub mod config;
pub mod routes;
pub mod server;

pub use config::HttpServerConfig;
pub use server::{HttpServer, ImageMount};
