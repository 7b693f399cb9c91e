//! The list row type and its derivation from raw API entries.
//!
//! `PresentableEntry` is what the list screen shows.  Each one is derived from
//! a [`RawEntry`]: the Pokédex number comes out of the detail URL, the sprite
//! URL is built from that number, and the name gets its first letter
//! capitalised.
//!
//! A page is derived all-or-nothing: one bad URL fails the whole page so the
//! list never holds an entry with a made-up number.

use crate::api::RawEntry;
use crate::repository::FetchError;

/// Default location of the front sprites, one `<number>.png` per Pokémon.
pub const DEFAULT_SPRITE_BASE: &str =
    "https://raw.githubusercontent.com/pokeapi/sprites/master/sprites/pokemon";

/// A single row in the Pokémon list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentableEntry {
    /// Display name, first letter capitalised (`"Pikachu"`).
    pub name: String,
    /// Sprite location, `<sprite-base>/<number>.png`.
    pub image_url: String,
    /// Pokédex number parsed from the detail URL.
    pub number: u32,
}

impl PresentableEntry {
    /// Derive a row from a raw entry, failing if the URL carries no number.
    pub fn from_raw(raw: &RawEntry, sprite_base: &str) -> Result<Self, FetchError> {
        let number = parse_number(&raw.url).ok_or_else(|| {
            FetchError::new(format!("Could not read a Pokédex number from {}", raw.url))
        })?;
        Ok(Self {
            name: title_case(&raw.name),
            image_url: sprite_url(sprite_base, number),
            number,
        })
    }

    /// Search predicate: the trimmed query appears in the name (ignoring
    /// case) or in the decimal number.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        self.name.to_lowercase().contains(&query.to_lowercase())
            || self.number.to_string().contains(query)
    }
}

/// Derive every entry of a page, or fail on the first underivable one.
pub fn derive_page(results: &[RawEntry], sprite_base: &str) -> Result<Vec<PresentableEntry>, FetchError> {
    results
        .iter()
        .map(|raw| PresentableEntry::from_raw(raw, sprite_base))
        .collect()
}

/// Extract the trailing number from a detail URL.
///
/// `.../pokemon/25/` and `.../pokemon/25` both give `25`.  Returns `None` when
/// there are no trailing digits or the number does not fit in a `u32`.
pub fn parse_number(url: &str) -> Option<u32> {
    let trimmed = url.strip_suffix('/').unwrap_or(url);
    let digits_start = trimmed
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    trimmed[digits_start..].parse().ok()
}

/// Uppercase the first character, leave the rest as-is.
pub fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn sprite_url(sprite_base: &str, number: u32) -> String {
    format!("{}/{number}.png", sprite_base.trim_end_matches('/'))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
