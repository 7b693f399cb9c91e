//! Scripted [`PokeApi`] double for tests.

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::{bail, Result};
use image::{ImageFormat, Rgba, RgbaImage};

use super::{PageResult, PokeApi, PokemonDetail, RawEntry, Sprites};

/// Serves pages sliced out of a fixed list of names; ids are 1-based positions.
pub struct FakeApi {
    names: Vec<String>,
    failing: AtomicBool,
    pub page_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub sprite_calls: AtomicUsize,
}

/// Colour of every sprite [`FakeApi`] serves.
pub const SPRITE_COLOR: [u8; 4] = [248, 208, 48, 255];

impl FakeApi {
    pub fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
            failing: AtomicBool::new(false),
            page_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
            sprite_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

pub fn raw(name: &str, id: u32) -> RawEntry {
    RawEntry {
        name: name.to_string(),
        url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
    }
}

/// A `width` x `height` PNG filled with `pixel`.
pub fn png(width: u32, height: u32, pixel: [u8; 4]) -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbaImage::from_pixel(width, height, Rgba(pixel))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// A page with the given total `count` and results.
pub fn page(count: u32, results: Vec<RawEntry>) -> PageResult {
    PageResult { count, results }
}

impl PokeApi for FakeApi {
    fn fetch_page(&self, limit: u32, offset: u32) -> Result<PageResult> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            bail!("connection refused");
        }
        let results = self
            .names
            .iter()
            .enumerate()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|(i, name)| raw(name, i as u32 + 1))
            .collect();
        Ok(page(self.names.len() as u32, results))
    }

    fn fetch_detail(&self, name: &str) -> Result<PokemonDetail> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            bail!("connection refused");
        }
        let Some(pos) = self.names.iter().position(|n| n == name) else {
            bail!("HTTP status client error (404 Not Found)");
        };
        Ok(PokemonDetail {
            id: pos as u32 + 1,
            name: name.to_string(),
            height: 7,
            weight: 69,
            base_experience: Some(64),
            types: Vec::new(),
            stats: Vec::new(),
            sprites: Sprites::default(),
        })
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        self.sprite_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            bail!("connection refused");
        }
        if !url.ends_with(".png") {
            bail!("HTTP status client error (404 Not Found)");
        }
        Ok(png(4, 4, SPRITE_COLOR))
    }
}
