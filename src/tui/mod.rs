use std::io;

use crossterm::cursor::Show;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Frame;
use ratatui::Terminal;

use crate::errors::RashodyError;

use self::actions::{next_event, TuiAction};

pub mod actions;
mod dropdown;
mod editor;
mod fields;
mod form;
mod pointer;
mod row_editor;
mod state;
pub mod table;

/// Runs `widget` full screen until it asks to exit.
///
/// The terminal is restored even when setting it up fails halfway.
pub fn open_widget(mut widget: impl TuiWidget) -> Result<(), RashodyError> {
    guarded(
        setup_terminal,
        |mut terminal| {
            let result = run(&mut terminal, &mut widget);
            widget.on_exit();
            result
        },
        restore_terminal,
    )
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>, RashodyError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal() -> Result<(), RashodyError> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, Show)?;
    Ok(())
}

/// Runs `restore` after `body`, or right after a failed `setup`.
///
/// The first error wins.
fn guarded<T>(
    setup: impl FnOnce() -> Result<T, RashodyError>,
    body: impl FnOnce(T) -> Result<(), RashodyError>,
    restore: impl FnOnce() -> Result<(), RashodyError>,
) -> Result<(), RashodyError> {
    let result = setup().and_then(body);
    let restored = restore();
    result.and(restored)
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    widget: &mut impl TuiWidget,
) -> Result<(), RashodyError> {
    loop {
        terminal.draw(|f| widget.render(f))?;
        let Some(event) = next_event()? else {
            continue;
        };
        if let Some(TuiAction::Exit) = widget.handle_event(event) {
            return Ok(());
        }
    }
}

pub trait TuiWidget {
    /// Processes one terminal event to completion.
    fn handle_event(&mut self, event: Event) -> Option<TuiAction>;
    fn render(&mut self, frame: &mut Frame);
    fn on_exit(&mut self) {}
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn broken_setup() -> Result<(), RashodyError> {
        Err(io::Error::new(io::ErrorKind::Other, "no tty").into())
    }

    #[test]
    fn restores_after_failed_setup() {
        let restored = Cell::new(false);
        let ran = Cell::new(false);
        let result = guarded(
            broken_setup,
            |()| {
                ran.set(true);
                Ok(())
            },
            || {
                restored.set(true);
                Ok(())
            },
        );
        assert!(matches!(result, Err(RashodyError::Io(_))));
        assert!(!ran.get());
        assert!(restored.get());
    }

    #[test]
    fn body_error_wins_over_restore_error() {
        let result = guarded(
            || Ok(()),
            |()| Err(RashodyError::UnknownId("abc".to_string())),
            broken_setup,
        );
        assert!(matches!(result, Err(RashodyError::UnknownId(_))));

        let result = guarded(|| Ok(()), |()| Ok(()), broken_setup);
        assert!(matches!(result, Err(RashodyError::Io(_))));
    }
}
