//! HTTP implementation of [`PokeApi`].
//!
//! Uses a blocking [`reqwest`] client; calls are made from worker threads, never
//! from the UI thread.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use reqwest::Url;

use super::{PageResult, PokeApi, PokemonDetail};

/// PokeAPI over HTTP.
pub struct HttpPokeApi {
    client: Client,
    /// Always ends with `/`, e.g. `https://pokeapi.co/api/v2/`.
    base_url: Url,
}

impl HttpPokeApi {
    /// Build a client for `base_url` with the given request timeout.
    ///
    /// A missing trailing slash on `base_url` is added.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url).with_context(|| format!("parsing base URL {base_url}"))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("base URL {base_url} cannot carry a path"));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// `base_url` plus `segments`, each percent-encoded as one path segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("base URL {} cannot carry a path", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get(&self, url: Url, query: &[(&str, u32)]) -> Result<reqwest::blocking::Response> {
        tracing::debug!(%url, ?query, "GET");
        let response = self
            .client
            .get(url.clone())
            .query(query)
            .send()
            .with_context(|| format!("requesting {url}"))?
            .error_for_status()?;
        Ok(response)
    }

    /// Decode a collection page body.  Pure, so tests can skip the network.
    pub fn parse_page(body: &str) -> Result<PageResult> {
        serde_json::from_str(body).context("decoding pokemon page")
    }

    /// Decode a detail body.
    pub fn parse_detail(body: &str) -> Result<PokemonDetail> {
        serde_json::from_str(body).context("decoding pokemon detail")
    }
}

impl PokeApi for HttpPokeApi {
    fn fetch_page(&self, limit: u32, offset: u32) -> Result<PageResult> {
        let url = self.endpoint(&["pokemon"])?;
        let body = self.get(url, &[("limit", limit), ("offset", offset)])?.text()?;
        Self::parse_page(&body)
    }

    fn fetch_detail(&self, name: &str) -> Result<PokemonDetail> {
        let url = self.endpoint(&["pokemon", name])?;
        let body = self.get(url, &[])?.text()?;
        Self::parse_detail(&body)
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let url = Url::parse(url).with_context(|| format!("parsing sprite URL {url}"))?;
        Ok(self.get(url, &[])?.bytes()?.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
