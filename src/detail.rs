//! State of the detail screen for one Pokémon.

use std::sync::mpsc;

use crate::api::PokemonDetail;
use crate::palette::Rgb;
use crate::repository::Resource;
use crate::worker::Request;

/// Used when neither a sprite colour nor a type colour is known.
pub const FALLBACK_ACCENT: Rgb = Rgb(0x9E, 0x9E, 0x9E);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailStatus {
    Loading,
    Loaded(PokemonDetail),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    /// Display name as shown in the list.
    pub name: String,
    pub number: u32,
    pub status: DetailStatus,
    /// Dominant sprite colour, when one has been extracted.
    pub accent: Option<Rgb>,
}

impl DetailView {
    /// Open the screen and request the detail payload and the sprite colour.
    pub fn open(
        name: &str,
        number: u32,
        image_url: &str,
        requests: &mpsc::Sender<Request>,
    ) -> Self {
        let status = match requests.send(Request::Detail {
            name: name.to_lowercase(),
        }) {
            Ok(()) => DetailStatus::Loading,
            Err(_) => DetailStatus::Failed(crate::repository::UNKNOWN_ERROR.to_string()),
        };
        // No colour just means the fallback accent.
        let _ = requests.send(Request::Sprite {
            number,
            url: image_url.to_string(),
        });
        Self {
            name: name.to_string(),
            number,
            status,
            accent: None,
        }
    }

    /// Apply a detail response.  Responses for other Pokémon are ignored.
    pub fn on_detail_loaded(&mut self, name: &str, result: Resource<PokemonDetail>) {
        if !name.eq_ignore_ascii_case(&self.name) {
            tracing::debug!(%name, showing = %self.name, "ignoring detail for another entry");
            return;
        }
        self.status = match result {
            Ok(detail) => DetailStatus::Loaded(detail),
            Err(e) => DetailStatus::Failed(e.message().to_string()),
        };
    }

    /// Apply an extracted sprite colour.  Colours for other entries, and
    /// sprites without a swatch, leave the accent as it is.
    pub fn on_sprite_color(&mut self, number: u32, color: Option<Rgb>) {
        if number != self.number {
            tracing::debug!(number, showing = self.number, "ignoring sprite for another entry");
            return;
        }
        if let Some(color) = color {
            self.accent = Some(color);
        }
    }

    /// Sprite colour, else primary-type colour, else grey.
    pub fn accent_color(&self) -> Rgb {
        if let Some(accent) = self.accent {
            return accent;
        }
        match &self.status {
            DetailStatus::Loaded(detail) => detail
                .primary_type()
                .and_then(type_color)
                .unwrap_or(FALLBACK_ACCENT),
            _ => FALLBACK_ACCENT,
        }
    }
}

/// Theme colour for a Pokémon type name.
pub fn type_color(type_name: &str) -> Option<Rgb> {
    let rgb = match type_name {
        "normal" => Rgb(0xA8, 0xA7, 0x7A),
        "fire" => Rgb(0xEE, 0x81, 0x30),
        "water" => Rgb(0x63, 0x90, 0xF0),
        "electric" => Rgb(0xF7, 0xD0, 0x2C),
        "grass" => Rgb(0x7A, 0xC7, 0x4C),
        "ice" => Rgb(0x96, 0xD9, 0xD6),
        "fighting" => Rgb(0xC2, 0x2E, 0x28),
        "poison" => Rgb(0xA3, 0x3E, 0xA1),
        "ground" => Rgb(0xE2, 0xBF, 0x65),
        "flying" => Rgb(0xA9, 0x8F, 0xF3),
        "psychic" => Rgb(0xF9, 0x55, 0x87),
        "bug" => Rgb(0xA6, 0xB9, 0x1A),
        "rock" => Rgb(0xB6, 0xA1, 0x36),
        "ghost" => Rgb(0x73, 0x57, 0x97),
        "dragon" => Rgb(0x6F, 0x35, 0xFC),
        "dark" => Rgb(0x70, 0x57, 0x46),
        "steel" => Rgb(0xB7, 0xB7, 0xCE),
        "fairy" => Rgb(0xD6, 0x85, 0xAD),
        _ => return None,
    };
    Some(rgb)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
