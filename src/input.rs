//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  The list screen has two
//! modes: normal (navigation keys) and editing (keystrokes go to the search
//! box).  The detail screen only knows how to go back.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Screen};

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit = true;
        return;
    }

    if matches!(app.screen, Screen::Detail(_)) {
        handle_detail_key(app, key);
    } else if app.editing {
        handle_search_key(app, key);
    } else {
        handle_list_key(app, key);
    }
}

fn handle_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('/') => app.editing = true,
        KeyCode::Char('x') => app.clear_query(),
        KeyCode::Char('r') => app.retry(),
        KeyCode::Enter => app.open_selected(),
        _ => {}
    }
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => app.editing = false,
        KeyCode::Backspace => app.pop_query_char(),
        KeyCode::Down => app.select_next(),
        KeyCode::Up => app.select_previous(),
        KeyCode::Char(c) => app.push_query_char(c),
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') | KeyCode::Left => app.close_detail(),
        _ => {}
    }
}
