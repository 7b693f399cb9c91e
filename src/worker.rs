//! Background fetching.
//!
//! A dispatcher thread receives [`Request`]s from the UI thread and runs each
//! one on its own short-lived thread, sending the outcome back as a
//! [`Response`] over an [`mpsc`] channel.  The main loop drains responses on
//! every tick and hands them to the controller, so state is only ever touched
//! from the UI thread.
//!
//! ## For contributors
//!
//! There is no cancellation: once a request is issued its response will
//! arrive (unless the receiver is gone) and the controller decides what to do
//! with it.  The dispatcher stops when every request sender has been dropped.

use std::sync::mpsc;
use std::thread;

use crate::api::{PageResult, PokemonDetail};
use crate::palette::{self, Rgb};
use crate::repository::{Repository, Resource};

/// Work the UI thread asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Page { limit: u32, offset: u32 },
    Detail { name: String },
    /// Sprite of Pokédex entry `number`, reduced to its dominant colour.
    Sprite { number: u32, url: String },
}

/// Finished work, sent back to the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Page {
        offset: u32,
        result: Resource<PageResult>,
    },
    Detail {
        name: String,
        result: Resource<PokemonDetail>,
    },
    /// `None` when the sprite could not be fetched or has no dominant swatch.
    Sprite { number: u32, color: Option<Rgb> },
}

/// Both ends the UI thread holds.
pub struct Worker {
    pub requests: mpsc::Sender<Request>,
    pub responses: mpsc::Receiver<Response>,
}

/// Spawn the dispatcher thread.
pub fn spawn(repository: Repository) -> Worker {
    let (req_tx, req_rx) = mpsc::channel::<Request>();
    let (resp_tx, resp_rx) = mpsc::channel();

    thread::spawn(move || {
        for request in req_rx {
            let repository = repository.clone();
            let tx = resp_tx.clone();
            thread::spawn(move || {
                let response = run(&repository, request);
                // A closed receiver means the UI has exited; nothing to do.
                let _ = tx.send(response);
            });
        }
        tracing::debug!("request channel closed, dispatcher exiting");
    });

    Worker {
        requests: req_tx,
        responses: resp_rx,
    }
}

/// Execute one request against the repository.
pub fn run(repository: &Repository, request: Request) -> Response {
    match request {
        Request::Page { limit, offset } => Response::Page {
            offset,
            result: repository.fetch_page(limit, offset),
        },
        Request::Detail { name } => {
            let result = repository.fetch_detail(&name);
            Response::Detail { name, result }
        }
        Request::Sprite { number, url } => {
            let color = repository
                .fetch_sprite(&url)
                .ok()
                .and_then(|bitmap| palette::spawn_dominant_color(bitmap).recv().ok());
            Response::Sprite { number, color }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
