//! CLI command implementations
//!
//! `init` writes a default config, `seed` rebuilds the store from CSV,
//! and `start` opens the store and serves HTTP until the process exits.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::catalog::{Catalog, ImageDirectory, JsonFileStore, RecordStore, SeedLoader};
use crate::http_server::{HttpServer, ImageMount};
use crate::observability::init_tracing;

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Init { config } => init(&config),
        Command::Seed { config } => {
            let config = load_with_logging(&config)?;
            seed(&config).map(|_| ())
        }
        Command::Start { config, seed } => {
            let config = load_with_logging(&config)?;
            start(&config, seed)
        }
    }
}

fn load_with_logging(path: &Path) -> CliResult<Config> {
    let config = Config::load(path)?;
    init_tracing(&config.logging).map_err(CliError::io_error)?;
    Ok(config)
}

/// Write a default config file; refuses to overwrite
pub fn init(config_path: &Path) -> CliResult<()> {
    if config_path.exists() {
        return Err(CliError::already_initialized(config_path.display()));
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(&Config::default())?;
    fs::write(config_path, content)?;

    println!("Wrote default configuration to {}", config_path.display());
    Ok(())
}

/// Rebuild the store from the configured CSV; returns the record count
pub fn seed(config: &Config) -> CliResult<usize> {
    let csv_path = config.require_csv_path()?;
    let loader = SeedLoader::new(
        ImageDirectory::new(config.images_path()),
        config.image_base_url.clone(),
    );

    let collection = loader.load_path(&csv_path)?;
    let store = JsonFileStore::new(config.store_path());
    store.save(&collection)?;

    info!(
        records = collection.len(),
        store = %store.path().display(),
        "store seeded"
    );
    Ok(collection.len())
}

/// Open the store and serve HTTP
pub fn start(config: &Config, force_seed: bool) -> CliResult<()> {
    if force_seed || config.seed_on_start {
        seed(config)?;
    }

    let catalog = Catalog::open(JsonFileStore::new(config.store_path()), config.schema)?
        .with_default_limit(config.effective_limit());

    let images = match (config.image_route(), config.images_path()) {
        (Some(route), dir) if dir.is_dir() => Some(ImageMount::new(route, dir)),
        (None, _) => {
            warn!(base_url = %config.image_base_url, "image base URL has no servable path");
            None
        }
        _ => None,
    };
    let server = HttpServer::with_catalog(config.server.clone(), Arc::new(catalog), images);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::serve_failed(format!("Failed to start runtime: {}", e)))?;

    runtime
        .block_on(server.start())
        .map_err(|e| CliError::serve_failed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PokemonType;
    use crate::cli::CliErrorCode;
    use tempfile::TempDir;

    fn seeded_config(tmp: &TempDir) -> Config {
        let images = tmp.path().join("images");
        fs::create_dir_all(&images).unwrap();
        fs::write(images.join("pikachu.png"), b"png").unwrap();
        fs::write(images.join("eevee.png"), b"png").unwrap();

        let csv = tmp.path().join("pokemon.csv");
        fs::write(
            &csv,
            "Name,Type1,Type2\npikachu,Electric,\nraichu,Electric,\neevee,Normal,\n",
        )
        .unwrap();

        Config {
            store_path: tmp.path().join("db.json").display().to_string(),
            csv_path: Some(csv.display().to_string()),
            images_dir: images.display().to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_init_writes_loadable_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pokedex.json");

        init(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_init_refuses_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pokedex.json");
        fs::write(&path, "{}").unwrap();

        let err = init(&path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::AlreadyInitialized);
    }

    #[test]
    fn test_seed_writes_store() {
        let tmp = TempDir::new().unwrap();
        let config = seeded_config(&tmp);

        assert_eq!(seed(&config).unwrap(), 2);

        let stored = JsonFileStore::new(config.store_path()).load().unwrap();
        assert_eq!(stored.total_pokemons, 2);
        assert_eq!(stored.pokemons[1].name, "eevee");
        assert_eq!(stored.pokemons[1].id, "2");
        assert_eq!(stored.pokemons[1].types, vec![PokemonType::Normal]);
        assert_eq!(stored.pokemons[1].url, "/images/eevee.png");
    }

    #[test]
    fn test_seed_without_csv_is_config_error() {
        let err = seed(&Config::default()).unwrap_err();
        assert!(err.message().contains("csv_path"));
    }
}
