use std::time::Duration;

use crossterm::event::{
    poll, read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::layout::Position;

use crate::errors::RashodyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiAction {
    MoveUp,
    MoveDown,
    ToTop,
    ToBottom,
    Edit,
    Delete,
    Select,
    FilterMenu,
    SortMenu,
    SwitchFocus,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditingAction {
    InsertChar(char),
    MoveLeft,
    MoveRight,
    DeleteLeft,
    DeleteRight,
    Home,
    End,
    NextField,
    PrevField,
    Confirm,
    Leave,
}

/// Waits briefly for the next terminal event.
pub fn next_event() -> Result<Option<Event>, RashodyError> {
    if poll(Duration::from_millis(50))? {
        return Ok(Some(read()?));
    }
    Ok(None)
}

fn is_press(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
}

pub fn widget_action(key: KeyEvent) -> Option<TuiAction> {
    if !is_press(&key) {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(TuiAction::Exit);
    }
    match key.code {
        KeyCode::Char(c) => match c {
            'k' => Some(TuiAction::MoveUp),
            'j' => Some(TuiAction::MoveDown),
            'g' => Some(TuiAction::ToTop),
            'G' => Some(TuiAction::ToBottom),
            'e' => Some(TuiAction::Edit),
            'd' => Some(TuiAction::Delete),
            'f' => Some(TuiAction::FilterMenu),
            's' => Some(TuiAction::SortMenu),
            'a' => Some(TuiAction::SwitchFocus),
            'q' => Some(TuiAction::Exit),
            _ => None,
        },
        KeyCode::Up => Some(TuiAction::MoveUp),
        KeyCode::Down => Some(TuiAction::MoveDown),
        KeyCode::Home => Some(TuiAction::ToTop),
        KeyCode::End => Some(TuiAction::ToBottom),
        KeyCode::Delete => Some(TuiAction::Delete),
        KeyCode::Enter => Some(TuiAction::Select),
        KeyCode::Tab => Some(TuiAction::SwitchFocus),
        KeyCode::Esc => Some(TuiAction::Exit),
        _ => None,
    }
}

pub fn widget_editing_action(key: KeyEvent) -> Option<EditingAction> {
    if !is_press(&key) {
        return None;
    }
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(EditingAction::InsertChar(c))
        }
        KeyCode::Left => Some(EditingAction::MoveLeft),
        KeyCode::Right => Some(EditingAction::MoveRight),
        KeyCode::Home => Some(EditingAction::Home),
        KeyCode::End => Some(EditingAction::End),
        KeyCode::Backspace => Some(EditingAction::DeleteLeft),
        KeyCode::Delete => Some(EditingAction::DeleteRight),
        KeyCode::Tab => Some(EditingAction::NextField),
        KeyCode::BackTab => Some(EditingAction::PrevField),
        KeyCode::Enter => Some(EditingAction::Confirm),
        KeyCode::Esc => Some(EditingAction::Leave),
        _ => None,
    }
}

/// Position of a left-button press, if `mouse` is one.
pub fn pointer_press(mouse: MouseEvent) -> Option<Position> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Position::new(mouse.column, mouse.row)),
        _ => None,
    }
}
