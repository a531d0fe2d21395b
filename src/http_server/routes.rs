//! Catalog HTTP Routes
//!
//! List, detail, create, update and delete endpoints over a shared
//! [`Catalog`]. Handlers only translate between HTTP and catalog calls;
//! every decision is made by the catalog.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;

use crate::catalog::{
    Catalog, CatalogError, CatalogResult, DeleteResponse, HealthResponse, Pokemon, PokemonDetail,
    RecordStore,
};

/// Shared state type
type CatalogState<S> = Arc<Catalog<S>>;

/// Create catalog routes, to be nested under the route prefix
pub fn pokemon_routes<S: RecordStore + 'static>(catalog: CatalogState<S>) -> Router {
    Router::new()
        .route("/", get(list_handler::<S>).post(create_handler::<S>))
        .route(
            "/:id",
            get(detail_handler::<S>)
                .put(update_handler::<S>)
                .delete(delete_handler::<S>),
        )
        .with_state(catalog)
}

/// Create the health route
pub fn health_routes<S: RecordStore + 'static>(catalog: CatalogState<S>) -> Router {
    Router::new()
        .route("/health", get(health_handler::<S>))
        .with_state(catalog)
}

/// Malformed JSON gets the same error body as any other validation failure
fn body_or_error(payload: Result<Json<Value>, JsonRejection>) -> CatalogResult<Value> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| CatalogError::InvalidBody(rejection.body_text()))
}

/// List records handler
async fn list_handler<S: RecordStore + 'static>(
    State(catalog): State<CatalogState<S>>,
    Query(query): Query<HashMap<String, String>>,
) -> CatalogResult<Json<Vec<Pokemon>>> {
    Ok(Json(catalog.list_params(&query)?))
}

/// Get single record handler
async fn detail_handler<S: RecordStore + 'static>(
    State(catalog): State<CatalogState<S>>,
    Path(id): Path<String>,
) -> CatalogResult<Json<PokemonDetail>> {
    Ok(Json(catalog.detail(&id)?))
}

/// Create record handler
async fn create_handler<S: RecordStore + 'static>(
    State(catalog): State<CatalogState<S>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> CatalogResult<Json<Pokemon>> {
    let body = body_or_error(payload)?;
    Ok(Json(catalog.create(&body)?))
}

/// Update record handler
async fn update_handler<S: RecordStore + 'static>(
    State(catalog): State<CatalogState<S>>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> CatalogResult<Json<Pokemon>> {
    let body = body_or_error(payload)?;
    Ok(Json(catalog.update(&id, &body)?))
}

/// Delete record handler
async fn delete_handler<S: RecordStore + 'static>(
    State(catalog): State<CatalogState<S>>,
    Path(id): Path<String>,
) -> CatalogResult<Json<DeleteResponse>> {
    catalog.delete(&id)?;
    Ok(Json(DeleteResponse::default()))
}

async fn health_handler<S: RecordStore + 'static>(
    State(catalog): State<CatalogState<S>>,
) -> CatalogResult<Json<HealthResponse>> {
    Ok(Json(HealthResponse::ok(catalog.total()?)))
}
