//! Remote fetcher layer.
//!
//! This module defines the [`PokeApi`] trait and the wire types returned by
//! the PokeAPI collection and detail endpoints.  The concrete HTTP client lives
//! in [`http`]; tests use the scripted double in `fake`.
//!
//! ## For contributors
//!
//! Everything above this layer (repository, controller, UI) only sees
//! [`PokeApi`], so swapping the transport means implementing three methods.
//! Errors are plain [`anyhow::Error`]s here; the repository is the place that
//! collapses them into the single user-facing error.

mod http;
mod models;

#[cfg(test)]
pub mod fake;

pub use http::HttpPokeApi;
pub use models::{PageResult, PokemonDetail, RawEntry};
#[cfg(test)]
pub use models::{NamedResource, Sprites, StatSlot, TypeSlot};

use anyhow::Result;

/// The network operations the application needs.
///
/// Both calls block the calling thread; the worker runs them off the UI
/// thread, which is why implementations must be [`Send`] + [`Sync`].
pub trait PokeApi: Send + Sync {
    /// `GET /pokemon?limit=<limit>&offset=<offset>`
    fn fetch_page(&self, limit: u32, offset: u32) -> Result<PageResult>;

    /// `GET /pokemon/{name}`.  `name` is expected to be lowercase.
    fn fetch_detail(&self, name: &str) -> Result<PokemonDetail>;

    /// Raw body of an absolute `url`; used for sprite images.
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}
