use ratatui::layout::{Position, Rect};
use uuid::Uuid;

use crate::projection::{Filter, Sort};

use super::dropdown::Menu;
use super::fields::EditField;
use super::pointer::OutsideClickWatcher;
use super::row_editor::RowEditor;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Table,
    Form,
}

/// Screen regions from the last render, used to route pointer presses.
#[derive(Debug, Default, Clone)]
pub struct HitMap {
    pub filter_label: Rect,
    pub sort_label: Rect,
    pub menu_items: Vec<Rect>,
    pub rows: Vec<(Uuid, Rect)>,
    pub edit_buttons: Vec<(Uuid, Rect)>,
    pub delete_buttons: Vec<(Uuid, Rect)>,
    pub row_fields: Vec<(EditField, Rect)>,
    pub form_fields: Vec<(EditField, Rect)>,
    pub submit_button: Rect,
}

pub fn hit<T: Copy>(regions: &[(T, Rect)], position: Position) -> Option<T> {
    regions
        .iter()
        .find(|(_, rect)| rect.contains(position))
        .map(|(value, _)| *value)
}

/// Selection state of the view layer. None of it is persisted.
#[derive(Debug, Default)]
pub struct UiState {
    pub filter: Filter,
    pub sort: Sort,
    pub menu: Option<Menu>,
    pub editor: Option<RowEditor>,
    pub selected: usize,
    pub offset: usize,
    pub focus: Focus,
    pub status: Option<String>,
    pub watcher: OutsideClickWatcher,
    pub hits: HitMap,
}

impl UiState {
    pub fn open_menu(&mut self, menu: Menu) {
        self.close_menu();
        self.watcher.subscribe(menu.listener());
        self.menu = Some(menu);
    }

    pub fn close_menu(&mut self) {
        if let Some(menu) = self.menu.take() {
            self.watcher.unsubscribe(menu.listener());
        }
    }

    pub fn editing_id(&self) -> Option<Uuid> {
        self.editor.as_ref().map(RowEditor::id)
    }
}

#[cfg(test)]
mod tests {
    use crate::projection::Filter;
    use crate::tui::dropdown::Dropdown;
    use crate::tui::pointer::Listener;

    use super::*;

    #[test]
    fn menus_are_exclusive_and_subscribed() {
        let mut ui = UiState::default();
        ui.open_menu(Menu::Filter(Dropdown::new(Filter::options(), Filter::All)));
        assert!(ui.watcher.is_subscribed(Listener::FilterMenu));

        ui.open_menu(Menu::Sort(Dropdown::new(Sort::options(), Sort::default())));
        assert!(!ui.watcher.is_subscribed(Listener::FilterMenu));
        assert!(ui.watcher.is_subscribed(Listener::SortMenu));

        ui.close_menu();
        assert!(ui.menu.is_none());
        assert!(!ui.watcher.is_subscribed(Listener::SortMenu));
    }

    #[test]
    fn hit_finds_containing_region() {
        let id = Uuid::new_v4();
        let regions = vec![(id, Rect::new(2, 3, 10, 1))];
        assert_eq!(hit(&regions, Position::new(5, 3)), Some(id));
        assert_eq!(hit(&regions, Position::new(5, 4)), None);
    }
}
