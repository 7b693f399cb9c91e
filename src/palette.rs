//! Dominant-colour extraction from sprite images.
//!
//! Sprites arrive as PNG bytes and are decoded with [`image`] into a
//! [`Bitmap`] of RGBA pixels.
//! Pixels are quantised to 5 bits per channel and counted; the most populated
//! bucket that is neither near-black nor near-white wins, and its mean colour
//! is returned.  Transparent pixels are ignored, which matters for sprites
//! since most of their area is background.
//!
//! Extraction may find nothing (a fully transparent or greyscale-extreme
//! image), so callers always need a fallback colour.

use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;

use anyhow::{ensure, Context, Result};

/// Alpha below this counts as background.
const MIN_ALPHA: u8 = 128;
/// Buckets whose lightness falls outside this range are discarded.
const MIN_LIGHTNESS: f32 = 0.05;
const MAX_LIGHTNESS: f32 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// HSL lightness in `0.0..=1.0`.
    pub fn lightness(self) -> f32 {
        let max = self.0.max(self.1).max(self.2);
        let min = self.0.min(self.1).min(self.2);
        (f32::from(max) + f32::from(min)) / 510.0
    }
}

/// A decoded RGBA image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl Bitmap {
    /// Wrap decoded pixels, row-major; the length must be `width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<[u8; 4]>) -> Result<Self> {
        let expected = u64::from(width) * u64::from(height);
        ensure!(
            pixels.len() as u64 == expected,
            "bitmap is {width}x{height} but has {} pixels",
            pixels.len()
        );
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decode an encoded image (PNG) into RGBA pixels.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let rgba = image::load_from_memory(bytes)
            .context("decoding sprite image")?
            .to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::new(width, height, rgba.pixels().map(|p| p.0).collect())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

#[derive(Default)]
struct Bucket {
    population: u32,
    sum: [u64; 3],
}

fn quantize(channel: u8) -> u8 {
    channel >> 3
}

/// The most prominent colour of `bitmap`, if any survives filtering.
pub fn dominant_color(bitmap: &Bitmap) -> Option<Rgb> {
    let mut buckets: HashMap<(u8, u8, u8), Bucket> = HashMap::new();
    for &[r, g, b, a] in &bitmap.pixels {
        if a < MIN_ALPHA {
            continue;
        }
        let bucket = buckets
            .entry((quantize(r), quantize(g), quantize(b)))
            .or_default();
        bucket.population += 1;
        bucket.sum[0] += u64::from(r);
        bucket.sum[1] += u64::from(g);
        bucket.sum[2] += u64::from(b);
    }

    buckets
        .into_values()
        .map(|bucket| {
            let n = u64::from(bucket.population);
            let mean = |sum: u64| u8::try_from(sum / n).unwrap_or(u8::MAX);
            (
                bucket.population,
                Rgb(mean(bucket.sum[0]), mean(bucket.sum[1]), mean(bucket.sum[2])),
            )
        })
        .filter(|(_, color)| (MIN_LIGHTNESS..=MAX_LIGHTNESS).contains(&color.lightness()))
        // Ties go to the colour with the larger packed value so the result is stable.
        .max_by_key(|(population, Rgb(r, g, b))| (*population, (*r, *g, *b)))
        .map(|(_, color)| color)
}

/// Run [`dominant_color`] on a background thread.
///
/// The receiver yields exactly one colour, or disconnects without yielding
/// anything when the image has no dominant swatch.
pub fn spawn_dominant_color(bitmap: Bitmap) -> mpsc::Receiver<Rgb> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        if let Some(color) = dominant_color(&bitmap) {
            let _ = tx.send(color);
        } else {
            tracing::debug!(
                width = bitmap.width(),
                height = bitmap.height(),
                "no dominant swatch"
            );
        }
    });
    rx
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
