//! pokedex-tui — page through the Pokédex from the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐ Request  ┌───────────┐  Response  ┌──────────────┐  draw()  ┌──────────┐
//! │ controller│ ───────► │ worker.rs │ ─────────► │    app.rs    │ ───────► │  ui.rs   │
//! │ detail    │ (channel)│ (threads) │  (channel) │ (state owner)│          │ (render) │
//! └───────────┘          └───────────┘            └──────────────┘          └──────────┘
//!                              │                        ▲
//!                         repository.rs                 │ handle_key_event()
//!                         api/ (HTTP)              ┌──────────┐
//!                                                  │ input.rs │
//!                                                  └──────────┘
//! ```
//!
//! * **`api/`** — the `PokeApi` trait, wire types, and the reqwest client.
//! * **`repository`** — collapses every fetch failure into one `FetchError`.
//! * **`entry`** — derives list rows (number, sprite URL, title-cased name).
//! * **`controller`** — pagination cursor, accumulated rows, and search.
//! * **`worker`** — runs fetches off the UI thread.
//! * **`detail`** / **`palette`** — detail screen state and accent colours.
//! * **`app`** / **`ui`** / **`input`** — the terminal front end.
//! * **`terminal`** — raw mode, alternate screen, and the panic hook.
//! * **`main`** — wires everything together: parse args, set up the terminal,
//!   and run the event loop.

mod api;
mod app;
mod config;
mod controller;
mod detail;
mod entry;
mod input;
mod logging;
mod palette;
mod repository;
mod terminal;
mod ui;
mod worker;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event};

use api::HttpPokeApi;
use app::App;
use config::Args;
use controller::ListController;
use repository::Repository;
use terminal::TerminalGuard;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.log_file.as_deref())?;
    terminal::install_panic_hook();

    // -- remote fetcher + background worker ----------------------------------
    let api = HttpPokeApi::new(&args.base_url, args.timeout())?;
    tracing::info!(base_url = api.base_url(), page_size = args.page_size, "starting");
    let worker = worker::spawn(Repository::new(Arc::new(api)));

    // -- state (the first page is requested right away) ----------------------
    let controller = ListController::new(args.controller_config(), worker.requests.clone());
    let mut app = App::new(controller, worker.requests.clone());

    // -- terminal setup (Drop restores on exit or panic) ---------------------
    let mut guard = TerminalGuard::enter()?;

    // -- main event loop -----------------------------------------------------
    // ~10 fps.  Each iteration:
    //   1. Apply finished fetches and controller snapshots.
    //   2. Render the UI.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        while let Ok(response) = worker.responses.try_recv() {
            app.handle_response(response);
        }
        app.sync_state();

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    tracing::info!("exiting");
    Ok(())
}
