//! Terminal lifecycle: raw mode and the alternate screen.
//!
//! [`TerminalGuard`] owns the ratatui terminal and puts the tty back the way it
//! found it on drop.  [`install_panic_hook`] covers the path where the guard
//! never gets to drop cleanly, so a panic message lands on a usable screen.

use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

pub type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Restores the terminal via [`Drop`].
pub struct TerminalGuard {
    pub terminal: Tui,
}

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        enable_raw_mode().context("enabling raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        tracing::debug!("terminal entered");
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let raw = disable_raw_mode();
        let screen = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let cursor = self.terminal.show_cursor();
        let flush = self.terminal.backend_mut().flush();
        let steps = [
            ("raw mode", raw),
            ("alternate screen", screen),
            ("cursor", cursor),
            ("flush", flush),
        ];
        for (step, outcome) in steps {
            if let Err(e) = outcome {
                tracing::warn!(step, error = %e, "terminal restore incomplete");
            }
        }
        tracing::debug!("terminal restored");
    }
}

/// Restore the terminal before the default hook prints the panic message.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(%info, "panicked");
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
        let _ = stdout.flush();
        original_hook(info);
    }));
}
