//! # Response Formatting
//!
//! Payload shapes returned by catalog endpoints.

use serde::Serialize;

use super::record::Pokemon;

/// A record with its wrap-around neighbours in collection order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonDetail {
    pub pokemon: Pokemon,
    pub previous_pokemon: Pokemon,
    pub next_pokemon: Pokemon,
}

/// Delete response; serializes as `{}`
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteResponse {}

/// Liveness plus the current record count
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub total_pokemons: usize,
}

impl HealthResponse {
    pub fn ok(total_pokemons: usize) -> Self {
        Self {
            status: "ok",
            total_pokemons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::record::PokemonType;
    use serde_json::json;

    #[test]
    fn test_detail_serialization() {
        let p = Pokemon::new("1", "mew", vec![PokemonType::Psychic], "/mew.png");
        let detail = PokemonDetail {
            pokemon: p.clone(),
            previous_pokemon: p.clone(),
            next_pokemon: p,
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["pokemon"]["name"], "mew");
        assert_eq!(json["previousPokemon"]["id"], "1");
        assert_eq!(json["nextPokemon"]["types"], json!(["psychic"]));
    }

    #[test]
    fn test_delete_is_empty_object() {
        let json = serde_json::to_value(DeleteResponse::default()).unwrap();
        assert_eq!(json, json!({}));
    }
}
