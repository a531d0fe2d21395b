//! # HTTP Server
//!
//! Combines the catalog, health and image routes into one Axum server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::catalog::{Catalog, RecordStore};

use super::config::HttpServerConfig;
use super::routes::{health_routes, pokemon_routes};

/// Directory of record images and the route it is served under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMount {
    pub route: String,
    pub dir: PathBuf,
}

impl ImageMount {
    pub fn new(route: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            route: route.into(),
            dir: dir.into(),
        }
    }
}

/// HTTP server for the catalog
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over `catalog`, optionally serving record images
    pub fn with_catalog<S: RecordStore + 'static>(
        config: HttpServerConfig,
        catalog: Arc<Catalog<S>>,
        images: Option<ImageMount>,
    ) -> Self {
        let router = Self::build_router(&config, catalog, images);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router<S: RecordStore + 'static>(
        config: &HttpServerConfig,
        catalog: Arc<Catalog<S>>,
        images: Option<ImageMount>,
    ) -> Router {
        // Configure CORS from config
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        let catalog_routes = pokemon_routes(catalog.clone());
        let mut router = Router::new().merge(health_routes(catalog));

        // Axum refuses to nest at the root.
        router = match config.route_prefix.trim_end_matches('/') {
            "" => router.merge(catalog_routes),
            prefix => router.nest(prefix, catalog_routes),
        };

        if let Some(mount) = images {
            router = router.nest_service(&mount.route, ServeDir::new(mount.dir));
        }

        router.layer(cors).layer(TraceLayer::new_for_http())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        info!(
            address = %addr,
            prefix = %self.config.route_prefix,
            "catalog HTTP server listening"
        );

        axum::serve(listener, self.router).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MemoryStore, SchemaProfile};

    fn catalog() -> Arc<Catalog<MemoryStore>> {
        Arc::new(Catalog::open(MemoryStore::default(), SchemaProfile::Basic).unwrap())
    }

    #[test]
    fn test_server_with_custom_port() {
        let config = HttpServerConfig::with_port(8080);
        let server = HttpServer::with_catalog(config, catalog(), None);
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_router_builds_at_root_prefix() {
        let config = HttpServerConfig {
            route_prefix: "/".to_string(),
            ..Default::default()
        };
        let _router = HttpServer::with_catalog(config, catalog(), None).router();
    }
}
