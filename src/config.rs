//! Command-line configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::controller::{ControllerConfig, DEFAULT_PAGE_SIZE};
use crate::entry::DEFAULT_SPRITE_BASE;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2/";

/// Browse the Pokédex from your terminal.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Args {
    /// PokeAPI root, e.g. a local mirror.
    #[arg(long, env = "POKEDEX_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Where `<number>.png` sprites live.
    #[arg(long, env = "POKEDEX_SPRITE_BASE", default_value = DEFAULT_SPRITE_BASE)]
    pub sprite_base: String,

    /// Entries fetched per page.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: u32,

    /// HTTP request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Write logs to this file (the terminal is taken by the UI).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            page_size: self.page_size,
            sprite_base: self.sprite_base.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
