//! Repository: the boundary between the remote fetcher and the rest of the app.
//!
//! Every failure below this point (transport, timeout, status, decoding) is
//! collapsed into one [`FetchError`].  The detailed cause is logged and then
//! dropped, so the controller only ever stores a message.

use std::sync::Arc;

use thiserror::Error;

use crate::api::{PageResult, PokeApi, PokemonDetail};
use crate::palette::Bitmap;

/// Message shown for any failure coming out of the remote fetcher.
pub const UNKNOWN_ERROR: &str = "An unknown error occurred!";

/// The single user-facing error kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The collapsed error returned for every remote failure.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_ERROR)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Outcome of a repository call.
pub type Resource<T> = Result<T, FetchError>;

/// Stateless wrapper around a [`PokeApi`]; clones share the same fetcher.
#[derive(Clone)]
pub struct Repository {
    api: Arc<dyn PokeApi>,
}

impl Repository {
    pub fn new(api: Arc<dyn PokeApi>) -> Self {
        Self { api }
    }

    pub fn fetch_page(&self, limit: u32, offset: u32) -> Resource<PageResult> {
        self.api.fetch_page(limit, offset).map_err(|e| {
            tracing::warn!(limit, offset, error = %format!("{e:#}"), "page fetch failed");
            FetchError::unknown()
        })
    }

    /// Fetch one Pokémon by name.  The name is lowercased before the request.
    pub fn fetch_detail(&self, name: &str) -> Resource<PokemonDetail> {
        let name = name.to_lowercase();
        self.api.fetch_detail(&name).map_err(|e| {
            tracing::warn!(%name, error = %format!("{e:#}"), "detail fetch failed");
            FetchError::unknown()
        })
    }

    /// Download and decode a sprite image.
    pub fn fetch_sprite(&self, url: &str) -> Resource<Bitmap> {
        self.api
            .fetch_bytes(url)
            .and_then(|bytes| Bitmap::decode(&bytes))
            .map_err(|e| {
                tracing::warn!(%url, error = %format!("{e:#}"), "sprite fetch failed");
                FetchError::unknown()
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
