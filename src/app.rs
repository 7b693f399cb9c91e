use std::sync::mpsc;

use chrono::{DateTime, Local};
use ratatui::widgets::ListState;

use crate::controller::{self, ListController};
use crate::detail::DetailView;
use crate::worker::{Request, Response};

pub enum Screen {
    List,
    Detail(DetailView),
}

pub struct App {
    pub controller: ListController,
    /// Snapshots published by the controller after every transition.
    updates: mpsc::Receiver<controller::ListState>,
    /// Cursor of the last snapshot seen, to spot newly appended pages.
    seen_cursor: u32,
    requests: mpsc::Sender<Request>,
    pub screen: Screen,
    /// Current search text.
    pub query: String,
    /// Whether keystrokes go to the search box.
    pub editing: bool,
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// When the last page arrived.
    pub last_page_at: Option<DateTime<Local>>,
}

impl App {
    pub fn new(mut controller: ListController, requests: mpsc::Sender<Request>) -> Self {
        let updates = controller.subscribe();
        let seen_cursor = controller.state().cursor();
        Self {
            controller,
            updates,
            seen_cursor,
            requests,
            screen: Screen::List,
            query: String::new(),
            editing: false,
            list_state: ListState::default(),
            quit: false,
            last_page_at: None,
        }
    }

    /// Route a finished fetch to whoever is waiting for it.
    pub fn handle_response(&mut self, response: Response) {
        match response {
            Response::Page { offset, result } => self.controller.on_page_loaded(offset, result),
            Response::Detail { name, result } => {
                if let Screen::Detail(view) = &mut self.screen {
                    view.on_detail_loaded(&name, result);
                }
            }
            Response::Sprite { number, color } => {
                if let Screen::Detail(view) = &mut self.screen {
                    view.on_sprite_color(number, color);
                }
            }
        }
        self.sync_state();
    }

    /// Drain controller snapshots: stamp newly appended pages and keep the
    /// selection inside the list.
    pub fn sync_state(&mut self) {
        let mut changed = false;
        for state in self.updates.try_iter() {
            if state.cursor() > self.seen_cursor {
                self.seen_cursor = state.cursor();
                self.last_page_at = Some(Local::now());
            }
            changed = true;
        }
        if changed {
            self.clamp_selection();
        }
    }

    // -- navigation ----------------------------------------------------------

    fn len(&self) -> usize {
        self.controller.state().items().len()
    }

    /// Select row `i` and fetch more if it is the last one.
    fn select(&mut self, i: usize) {
        self.list_state.select(Some(i));
        if self.controller.should_prefetch(i) {
            self.controller.load_next_page();
        }
    }

    pub fn select_next(&mut self) {
        if self.len() == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.len() - 1),
            None => 0,
        };
        self.select(i);
    }

    pub fn select_previous(&mut self) {
        if self.len() == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.select(i);
    }

    pub fn select_first(&mut self) {
        if self.len() > 0 {
            self.select(0);
        }
    }

    pub fn select_last(&mut self) {
        if self.len() > 0 {
            self.select(self.len() - 1);
        }
    }

    /// Keep the selection inside the list after it shrinks or empties.
    fn clamp_selection(&mut self) {
        match (self.list_state.selected(), self.len()) {
            (_, 0) => self.list_state.select(None),
            (Some(i), len) if i >= len => self.list_state.select(Some(len - 1)),
            _ => {}
        }
    }

    // -- search --------------------------------------------------------------

    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
        self.apply_query();
    }

    pub fn pop_query_char(&mut self) {
        if self.query.pop().is_some() {
            self.apply_query();
        }
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.editing = false;
        self.apply_query();
    }

    fn apply_query(&mut self) {
        self.controller.search(&self.query);
        self.list_state.select(if self.len() > 0 { Some(0) } else { None });
    }

    // -- screens -------------------------------------------------------------

    pub fn retry(&mut self) {
        if !self.controller.state().error_message().is_empty() {
            self.controller.retry();
        }
    }

    pub fn open_selected(&mut self) {
        let Some(entry) = self
            .list_state
            .selected()
            .and_then(|i| self.controller.state().items().get(i))
            .cloned()
        else {
            return;
        };
        tracing::info!(name = %entry.name, number = entry.number, "opening detail");
        self.screen = Screen::Detail(DetailView::open(
            &entry.name,
            entry.number,
            &entry.image_url,
            &self.requests,
        ));
    }

    pub fn close_detail(&mut self) {
        self.screen = Screen::List;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{page, raw};
    use crate::controller::ControllerConfig;
    use crate::detail::{DetailStatus, FALLBACK_ACCENT};
    use crate::entry::DEFAULT_SPRITE_BASE;
    use crate::palette::Rgb;
    use crate::repository::FetchError;

    fn app(page_size: u32) -> (App, mpsc::Receiver<Request>) {
        let (tx, rx) = mpsc::channel();
        let controller = ListController::new(
            ControllerConfig {
                page_size,
                ..ControllerConfig::default()
            },
            tx.clone(),
        );
        rx.try_recv().unwrap();
        (App::new(controller, tx), rx)
    }

    fn loaded_app() -> (App, mpsc::Receiver<Request>) {
        let (mut app, rx) = app(3);
        app.handle_response(Response::Page {
            offset: 0,
            result: Ok(page(
                9,
                vec![raw("bulbasaur", 1), raw("ivysaur", 2), raw("venusaur", 3)],
            )),
        });
        (app, rx)
    }

    // -- construction --------------------------------------------------------

    #[test]
    fn new_app_starts_on_list_screen() {
        let (app, _rx) = app(20);
        assert!(matches!(app.screen, Screen::List));
        assert!(!app.quit);
        assert!(app.list_state.selected().is_none());
        assert!(app.last_page_at.is_none());
    }

    #[test]
    fn page_response_reaches_controller() {
        let (app, _rx) = loaded_app();
        assert_eq!(app.controller.state().items().len(), 3);
        assert!(app.last_page_at.is_some());
    }

    #[test]
    fn failed_page_does_not_stamp_time() {
        let (mut app, _rx) = app(3);
        app.handle_response(Response::Page {
            offset: 0,
            result: Err(FetchError::unknown()),
        });
        assert!(app.last_page_at.is_none());
        assert!(!app.controller.state().error_message().is_empty());
    }

    // -- navigation ----------------------------------------------------------

    #[test]
    fn select_next_on_empty_is_noop() {
        let (mut app, _rx) = app(3);
        app.select_next();
        assert!(app.list_state.selected().is_none());
    }

    #[test]
    fn select_next_starts_at_zero_then_advances() {
        let (mut app, _rx) = loaded_app();
        app.select_next();
        assert_eq!(app.list_state.selected(), Some(0));
        app.select_next();
        assert_eq!(app.list_state.selected(), Some(1));
    }

    #[test]
    fn reaching_last_row_requests_next_page() {
        let (mut app, rx) = loaded_app();
        app.select_first();
        assert!(rx.try_recv().is_err());

        app.select_last();
        assert_eq!(rx.try_recv().unwrap(), Request::Page { limit: 3, offset: 3 });

        // Already loading: moving around the last row again asks for nothing.
        app.select_previous();
        app.select_next();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn select_previous_clamps_at_zero() {
        let (mut app, _rx) = loaded_app();
        app.select_first();
        app.select_previous();
        assert_eq!(app.list_state.selected(), Some(0));
    }

    // -- search --------------------------------------------------------------

    #[test]
    fn typing_filters_and_backspace_widens() {
        let (mut app, _rx) = loaded_app();
        for c in "venu".chars() {
            app.push_query_char(c);
        }
        assert_eq!(app.controller.state().items().len(), 1);
        assert_eq!(app.list_state.selected(), Some(0));

        app.pop_query_char();
        app.pop_query_char();
        app.pop_query_char();
        assert_eq!(app.query, "v");
        assert_eq!(app.controller.state().items().len(), 2, "Ivysaur and Venusaur");

        app.pop_query_char();
        assert!(!app.controller.state().searching());
        assert_eq!(app.controller.state().items().len(), 3);
    }

    #[test]
    fn no_hits_clears_selection() {
        let (mut app, _rx) = loaded_app();
        app.select_first();
        app.push_query_char('z');
        assert!(app.list_state.selected().is_none());
    }

    #[test]
    fn clear_query_leaves_edit_mode_and_restores() {
        let (mut app, _rx) = loaded_app();
        app.editing = true;
        app.push_query_char('i');
        app.clear_query();
        assert!(!app.editing);
        assert!(app.query.is_empty());
        assert_eq!(app.controller.state().items().len(), 3);
    }

    // -- retry / detail ------------------------------------------------------

    #[test]
    fn retry_only_fires_after_an_error() {
        let (mut app, rx) = app(3);
        app.retry();
        assert!(rx.try_recv().is_err(), "first load still in flight");

        app.handle_response(Response::Page {
            offset: 0,
            result: Err(FetchError::unknown()),
        });
        app.retry();
        assert_eq!(rx.try_recv().unwrap(), Request::Page { limit: 3, offset: 0 });
    }

    #[test]
    fn open_selected_switches_screen_and_requests_detail() {
        let (mut app, rx) = loaded_app();
        app.list_state.select(Some(1));
        app.open_selected();

        assert_eq!(rx.try_recv().unwrap(), Request::Detail { name: "ivysaur".into() });
        assert_eq!(
            rx.try_recv().unwrap(),
            Request::Sprite {
                number: 2,
                url: format!("{DEFAULT_SPRITE_BASE}/2.png"),
            }
        );
        let Screen::Detail(view) = &app.screen else {
            panic!("expected detail screen");
        };
        assert_eq!(view.name, "Ivysaur");
        assert_eq!(view.number, 2);

        app.handle_response(Response::Detail {
            name: "ivysaur".into(),
            result: Err(FetchError::unknown()),
        });
        let Screen::Detail(view) = &app.screen else {
            panic!("expected detail screen");
        };
        assert!(matches!(view.status, DetailStatus::Failed(_)));

        app.close_detail();
        assert!(matches!(app.screen, Screen::List));
    }

    fn accent(app: &App) -> Option<Rgb> {
        match &app.screen {
            Screen::Detail(view) => view.accent,
            Screen::List => panic!("expected detail screen"),
        }
    }

    #[test]
    fn sprite_response_sets_detail_accent() {
        let (mut app, _rx) = loaded_app();
        app.list_state.select(Some(0));
        app.open_selected();

        app.handle_response(Response::Sprite {
            number: 2,
            color: Some(Rgb(9, 9, 9)),
        });
        assert_eq!(accent(&app), None, "sprite for another entry");

        app.handle_response(Response::Sprite {
            number: 1,
            color: None,
        });
        assert_eq!(accent(&app), None);
        let Screen::Detail(view) = &app.screen else {
            panic!("expected detail screen");
        };
        assert_eq!(view.accent_color(), FALLBACK_ACCENT);

        app.handle_response(Response::Sprite {
            number: 1,
            color: Some(Rgb(120, 200, 128)),
        });
        assert_eq!(accent(&app), Some(Rgb(120, 200, 128)));
    }

    #[test]
    fn sprite_response_on_list_screen_is_dropped() {
        let (mut app, _rx) = loaded_app();
        app.handle_response(Response::Sprite {
            number: 1,
            color: Some(Rgb(1, 2, 3)),
        });
        assert!(matches!(app.screen, Screen::List));
    }

    #[test]
    fn sprite_colour_from_worker_reaches_accent() {
        use std::sync::Arc;
        use std::time::Duration;

        use crate::api::fake::{FakeApi, SPRITE_COLOR};
        use crate::repository::Repository;
        use crate::worker;

        let api = Arc::new(FakeApi::new(&["bulbasaur", "ivysaur"]));
        let worker = worker::spawn(Repository::new(api));
        let controller = ListController::new(ControllerConfig::default(), worker.requests.clone());
        let mut app = App::new(controller, worker.requests.clone());

        let wait = |app: &mut App, done: &dyn Fn(&App) -> bool| {
            for _ in 0..50 {
                if let Ok(response) = worker.responses.recv_timeout(Duration::from_millis(100)) {
                    app.handle_response(response);
                }
                if done(app) {
                    return;
                }
            }
            panic!("worker never answered");
        };

        wait(&mut app, &|app: &App| app.controller.state().items().len() == 2);
        app.select_first();
        app.open_selected();
        wait(&mut app, &|app: &App| accent(app).is_some());

        let [r, g, b, _] = SPRITE_COLOR;
        assert_eq!(accent(&app), Some(Rgb(r, g, b)));
    }

    // -- controller subscription ---------------------------------------------

    #[test]
    fn snapshots_are_drained_on_each_response() {
        let (mut app, _rx) = loaded_app();
        app.list_state.select(Some(5));
        app.sync_state();
        assert_eq!(app.list_state.selected(), Some(5), "no new snapshot, nothing to do");

        // The filtered view shrinks behind the app's back; the selection follows.
        app.controller.search("venusaur");
        app.sync_state();
        assert_eq!(app.list_state.selected(), Some(0));
        assert!(app.updates.try_recv().is_err());
    }

    #[test]
    fn ignored_page_does_not_restamp_time() {
        let (mut app, _rx) = loaded_app();
        let stamped = app.last_page_at;
        app.handle_response(Response::Page {
            offset: 0,
            result: Ok(page(9, vec![raw("bulbasaur", 1)])),
        });
        assert_eq!(app.last_page_at, stamped);
        assert_eq!(app.controller.state().items().len(), 3);
    }

    #[test]
    fn open_without_selection_is_noop() {
        let (mut app, rx) = loaded_app();
        app.open_selected();
        assert!(matches!(app.screen, Screen::List));
        assert!(rx.try_recv().is_err());
    }
}
