//! Wire types for the PokeAPI `pokemon` endpoints.
//!
//! Only the fields the application reads are modelled; serde ignores the
//! rest of each payload.

use serde::Deserialize;

/// One page of the `pokemon` collection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageResult {
    /// Total number of entries in the whole collection, not in this page.
    pub count: u32,
    pub results: Vec<RawEntry>,
}

/// A collection entry exactly as the API returns it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawEntry {
    pub name: String,
    /// Detail reference, e.g. `https://pokeapi.co/api/v2/pokemon/25/`.
    pub url: String,
}

/// The `name` half of a `{ name, url }` reference.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedResource {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypeSlot {
    pub slot: u8,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatSlot {
    pub base_stat: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
}

/// Payload of `GET /pokemon/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PokemonDetail {
    pub id: u32,
    pub name: String,
    /// Decimetres.
    #[serde(default)]
    pub height: u32,
    /// Hectograms.
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub base_experience: Option<u32>,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub stats: Vec<StatSlot>,
    #[serde(default)]
    pub sprites: Sprites,
}

impl PokemonDetail {
    pub fn height_m(&self) -> f64 {
        f64::from(self.height) / 10.0
    }

    pub fn weight_kg(&self) -> f64 {
        f64::from(self.weight) / 10.0
    }

    /// Type in slot 1, falling back to whichever type is listed first.
    pub fn primary_type(&self) -> Option<&str> {
        self.types
            .iter()
            .min_by_key(|t| t.slot)
            .map(|t| t.kind.name.as_str())
    }

    /// Type names ordered by slot.
    pub fn type_names(&self) -> Vec<&str> {
        let mut slots: Vec<&TypeSlot> = self.types.iter().collect();
        slots.sort_by_key(|t| t.slot);
        slots.into_iter().map(|t| t.kind.name.as_str()).collect()
    }
}
