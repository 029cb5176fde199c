use crossterm::event::{Event, KeyEvent};
use log::info;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use ratatui::Frame;
use uuid::Uuid;

use crate::config::RashodyConfig;
use crate::expenses::store::ExpenseStore;
use crate::expenses::Expense;
use crate::format::{format_amount, format_date, truncate_description};
use crate::projection::{Filter, Projector, Sort};

use super::actions::{
    pointer_press, widget_action, widget_editing_action, EditingAction, TuiAction,
};
use super::dropdown::{Dropdown, Menu};
use super::fields::{EditField, FieldEditor};
use super::form::ExpenseForm;
use super::pointer::Listener;
use super::row_editor::{RowEditor, SyncOutcome};
use super::state::{hit, Focus, HitMap, UiState};
use super::TuiWidget;

const FORM_WIDTH: u16 = 34;
const HELP: &str =
    "j/k выбор  e изменить  d удалить  f фильтр  s сортировка  Tab форма  q выход";

/// The expense table with its side form, filter and sort menus.
#[derive(Debug)]
pub struct ExpenseTable {
    store: ExpenseStore,
    projector: Projector,
    currency: String,
    description_width: usize,
    form: ExpenseForm,
    ui: UiState,
}

impl ExpenseTable {
    pub fn new(store: ExpenseStore, projector: Projector, config: &RashodyConfig) -> Self {
        Self {
            store,
            projector,
            currency: config.currency.clone(),
            description_width: config.description_width,
            form: ExpenseForm::default(),
            ui: UiState::default(),
        }
    }

    pub fn store(&self) -> &ExpenseStore {
        &self.store
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn form(&self) -> &ExpenseForm {
        &self.form
    }

    fn visible_ids(&self) -> Vec<Uuid> {
        self.projector
            .project(self.store.expenses(), self.ui.filter, self.ui.sort)
            .iter()
            .map(|e| e.id)
            .collect()
    }

    pub fn selected_id(&self) -> Option<Uuid> {
        self.visible_ids().get(self.ui.selected).copied()
    }

    fn select_id(&mut self, id: Uuid) {
        if let Some(index) = self.visible_ids().iter().position(|v| *v == id) {
            self.ui.selected = index;
        }
    }

    fn report(&mut self, context: &str, error: impl std::fmt::Display) {
        self.ui.status = Some(format!("{context}: {error}"));
    }

    /// Opens the row editor for `id`, committing any other open editor first.
    pub fn begin_edit(&mut self, id: Uuid) {
        if self.ui.editing_id() == Some(id) {
            return;
        }
        if self.ui.editor.is_some() {
            self.commit_edit();
        }
        if let Some(record) = self.store.get(id) {
            self.ui.editor = Some(RowEditor::begin(record));
            self.ui.watcher.subscribe(Listener::RowEditor);
            self.ui.focus = Focus::Table;
            self.select_id(id);
        }
    }

    /// Writes the open editor's working copy back and leaves editing.
    pub fn commit_edit(&mut self) {
        let Some(editor) = self.ui.editor.take() else {
            return;
        };
        self.ui.watcher.unsubscribe(Listener::RowEditor);
        let id = editor.id();
        match editor.commit(&mut self.store) {
            Ok(_) => {
                self.ui.status = None;
                self.select_id(id);
            }
            Err(e) => self.report("Изменения не сохранены", e),
        }
    }

    fn delete(&mut self, id: Uuid) {
        if let Err(e) = self.store.delete(id) {
            self.report("Не удалось удалить", e);
        }
    }

    fn submit_form(&mut self) {
        match self.form.submit(&mut self.store) {
            Ok(Some(_)) => self.ui.status = None,
            Ok(None) => {}
            Err(e) => self.report("Не удалось сохранить", e),
        }
    }

    fn toggle_menu(&mut self, listener: Listener) {
        let already_open = self.ui.menu.as_ref().map(Menu::listener) == Some(listener);
        if already_open {
            self.ui.close_menu();
            return;
        }
        let menu = match listener {
            Listener::SortMenu => Menu::Sort(Dropdown::new(Sort::options(), self.ui.sort)),
            _ => Menu::Filter(Dropdown::new(Filter::options(), self.ui.filter)),
        };
        self.ui.open_menu(menu);
    }

    fn choose_menu_option(&mut self) {
        match self.ui.menu.take() {
            Some(Menu::Filter(menu)) => {
                self.ui.watcher.unsubscribe(Listener::FilterMenu);
                if let Some(filter) = menu.selection() {
                    info!("event=filter_change module=tui filter={filter}");
                    self.ui.filter = filter;
                    self.ui.selected = 0;
                }
            }
            Some(Menu::Sort(menu)) => {
                self.ui.watcher.unsubscribe(Listener::SortMenu);
                if let Some(sort) = menu.selection() {
                    info!("event=sort_change module=tui sort={sort:?}");
                    self.ui.sort = sort;
                }
            }
            None => {}
        }
    }

    /// Commits a still-open editor; every way out of editing saves.
    pub fn finish(&mut self) {
        self.commit_edit();
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<TuiAction> {
        if let Some(menu) = self.ui.menu.as_mut() {
            match widget_action(key)? {
                TuiAction::MoveUp => menu.move_up(),
                TuiAction::MoveDown => menu.move_down(),
                TuiAction::Select => self.choose_menu_option(),
                TuiAction::FilterMenu => self.toggle_menu(Listener::FilterMenu),
                TuiAction::SortMenu => self.toggle_menu(Listener::SortMenu),
                TuiAction::Exit => self.ui.close_menu(),
                _ => {}
            }
            return None;
        }

        if let Some(editor) = self.ui.editor.as_mut() {
            match widget_editing_action(key)? {
                EditingAction::Confirm | EditingAction::Leave => self.commit_edit(),
                action => editor.apply(action),
            }
            return None;
        }

        if self.ui.focus == Focus::Form {
            match widget_editing_action(key)? {
                EditingAction::Confirm => self.submit_form(),
                EditingAction::Leave => self.ui.focus = Focus::Table,
                action => self.form.apply(action),
            }
            return None;
        }

        match widget_action(key)? {
            TuiAction::MoveUp => self.ui.selected = self.ui.selected.saturating_sub(1),
            TuiAction::MoveDown => self.ui.selected += 1,
            TuiAction::ToTop => self.ui.selected = 0,
            TuiAction::ToBottom => self.ui.selected = usize::MAX,
            TuiAction::Edit | TuiAction::Select => {
                if let Some(id) = self.selected_id() {
                    self.begin_edit(id);
                }
            }
            TuiAction::Delete => {
                if let Some(id) = self.selected_id() {
                    self.delete(id);
                }
            }
            TuiAction::FilterMenu => self.toggle_menu(Listener::FilterMenu),
            TuiAction::SortMenu => self.toggle_menu(Listener::SortMenu),
            TuiAction::SwitchFocus => self.ui.focus = Focus::Form,
            TuiAction::Exit => return Some(TuiAction::Exit),
        }
        None
    }

    fn handle_press(&mut self, position: Position) {
        for listener in self.ui.watcher.dispatch(position) {
            match listener {
                Listener::RowEditor => self.commit_edit(),
                Listener::FilterMenu | Listener::SortMenu => self.ui.close_menu(),
            }
        }

        let hits = self.ui.hits.clone();
        if self.ui.menu.is_some() {
            if let Some(index) = hits.menu_items.iter().position(|r| r.contains(position)) {
                if let Some(menu) = self.ui.menu.as_mut() {
                    menu.highlight(index);
                }
                self.choose_menu_option();
                return;
            }
        }
        if hits.filter_label.contains(position) {
            self.toggle_menu(Listener::FilterMenu);
        } else if hits.sort_label.contains(position) {
            self.toggle_menu(Listener::SortMenu);
        } else if let Some(id) = hit(&hits.edit_buttons, position) {
            self.begin_edit(id);
        } else if let Some(id) = hit(&hits.delete_buttons, position) {
            self.delete(id);
        } else if let Some(field) = self
            .ui
            .editor
            .is_some()
            .then(|| hit(&hits.row_fields, position))
            .flatten()
        {
            if let Some(editor) = self.ui.editor.as_mut() {
                editor.focus(field);
            }
        } else if let Some(field) = hit(&hits.form_fields, position) {
            self.ui.focus = Focus::Form;
            self.form.focus(field);
        } else if hits.submit_button.contains(position) {
            self.ui.focus = Focus::Form;
            self.submit_form();
        } else if let Some(id) = hit(&hits.rows, position) {
            self.ui.focus = Focus::Table;
            self.select_id(id);
        }
    }

    /// Keeps the editor and the selection consistent with the store.
    fn settle(&mut self) {
        if let Some(editor) = self.ui.editor.as_mut() {
            if editor.sync(self.store.get(editor.id())) == SyncOutcome::Gone {
                self.ui.editor = None;
                self.ui.watcher.unsubscribe(Listener::RowEditor);
            }
        }
        let visible = self.visible_ids().len();
        self.ui.selected = self.ui.selected.min(visible.saturating_sub(1));
    }

    fn column_widths(&self) -> [Constraint; 5] {
        [
            Constraint::Length(
                u16::try_from(self.description_width)
                    .unwrap_or(u16::MAX)
                    .saturating_add(3),
            ),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(3),
        ]
    }

    fn render_top(&mut self, frame: &mut Frame, area: Rect) {
        let filter_text = format!("Фильтр: {} ▾", self.ui.filter);
        let sort_text = format!("Сортировка: {} ▾", self.ui.sort);
        let [title_area, filter_area, _, sort_area] = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(Span::raw(&filter_text).width() as u16),
            Constraint::Length(2),
            Constraint::Length(Span::raw(&sort_text).width() as u16),
        ])
        .areas(area);

        let title = Line::from(vec![
            Span::styled("Мои расходы", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled("  Анализ расходов", Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(title), title_area);
        frame.render_widget(Paragraph::new(filter_text).fg(Color::Cyan), filter_area);
        frame.render_widget(Paragraph::new(sort_text).fg(Color::Cyan), sort_area);
        self.ui.hits.filter_label = filter_area;
        self.ui.hits.sort_label = sort_area;
    }

    fn display_cells(&self, expense: &Expense) -> [String; 4] {
        [
            truncate_description(&expense.description, self.description_width),
            expense.category.label().to_string(),
            format_date(expense.date),
            format_amount(expense.amount, &self.currency),
        ]
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Таблица расходов");
        let inner = block.inner(area);
        let widths = self.column_widths();
        let body_height = inner.height.saturating_sub(1) as usize;

        if self.ui.selected < self.ui.offset {
            self.ui.offset = self.ui.selected;
        } else if body_height > 0 && self.ui.selected >= self.ui.offset + body_height {
            self.ui.offset = self.ui.selected + 1 - body_height;
        }
        self.ui.watcher.set_bounds(Listener::RowEditor, Rect::default());

        let projected = self
            .projector
            .project(self.store.expenses(), self.ui.filter, self.ui.sort);
        let mut rows = Vec::new();
        let mut cursor = None;
        for (index, expense) in projected
            .iter()
            .enumerate()
            .skip(self.ui.offset)
            .take(body_height)
        {
            let y = inner.y + 1 + (index - self.ui.offset) as u16;
            let row_area = Rect::new(inner.x, y, inner.width, 1);
            let cell_areas = Layout::horizontal(widths)
                .flex(Flex::Start)
                .spacing(1)
                .split(row_area);
            let actions = cell_areas[4];
            self.ui.hits.rows.push((expense.id, row_area));
            self.ui
                .hits
                .edit_buttons
                .push((expense.id, Rect::new(actions.x, y, 1, 1)));
            self.ui
                .hits
                .delete_buttons
                .push((expense.id, Rect::new(actions.x + 2, y, 1, 1)));

            let actions_cell = Cell::new(Line::from(vec![
                Span::raw("✎").fg(Color::Yellow),
                Span::raw(" "),
                Span::raw("✕").fg(Color::Red),
            ]));

            let row = match self.ui.editor.as_ref().filter(|e| e.id() == expense.id) {
                Some(editor) => {
                    self.ui.watcher.set_bounds(Listener::RowEditor, row_area);
                    let fields = editor.fields();
                    let mut cells = Vec::with_capacity(5);
                    for (field, cell_area) in EditField::ALL.into_iter().zip(cell_areas.iter()) {
                        self.ui.hits.row_fields.push((field, *cell_area));
                        let style = if field == fields.field() {
                            cursor = text_cursor(fields, field, *cell_area);
                            Style::default().fg(Color::Black).bg(Color::Gray)
                        } else {
                            Style::default().add_modifier(Modifier::UNDERLINED)
                        };
                        cells.push(Cell::new(field_text(fields, field)).style(style));
                    }
                    cells.push(actions_cell);
                    Row::new(cells)
                }
                None => {
                    let [description, category, date, amount] = self.display_cells(expense);
                    let row = Row::new(vec![
                        Cell::new(description),
                        Cell::new(category),
                        Cell::new(date),
                        Cell::new(Line::from(amount).alignment(Alignment::Right)),
                        actions_cell,
                    ]);
                    if index == self.ui.selected && self.ui.focus == Focus::Table {
                        row.style(Style::default().add_modifier(Modifier::REVERSED))
                    } else {
                        row
                    }
                }
            };
            rows.push(row);
        }

        let header = Row::new(["Описание", "Категория", "Дата", "Сумма", ""])
            .style(Style::default().add_modifier(Modifier::BOLD))
            .bg(Color::DarkGray);
        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .flex(Flex::Start)
            .block(block);
        frame.render_widget(table, area);
        if let Some(position) = cursor {
            frame.set_cursor_position(position);
        }
    }

    fn render_form(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Новый расход");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let fields = self.form.fields().clone();
        let focused = self.ui.focus == Focus::Form && self.ui.editor.is_none();
        let mut y = inner.y;
        for field in EditField::ALL {
            if y + 1 >= inner.bottom() {
                break;
            }
            let label_area = Rect::new(inner.x, y, inner.width, 1);
            let value_area = Rect::new(inner.x, y + 1, inner.width, 1);
            frame.render_widget(
                Paragraph::new(field.label()).fg(Color::Gray),
                label_area,
            );
            let style = if focused && field == fields.field() {
                if let Some(position) = text_cursor(&fields, field, value_area) {
                    frame.set_cursor_position(position);
                }
                Style::default().fg(Color::Black).bg(Color::Gray)
            } else {
                Style::default().add_modifier(Modifier::UNDERLINED)
            };
            frame.render_widget(
                Paragraph::new(field_text(&fields, field)).style(style),
                value_area,
            );
            self.ui
                .hits
                .form_fields
                .push((field, Rect::new(inner.x, y, inner.width, 2)));
            y += 3;
        }

        if y < inner.bottom() {
            let text = "[ Добавить ]";
            let button = Rect::new(
                inner.x,
                y,
                (Span::raw(text).width() as u16).min(inner.width),
                1,
            );
            frame.render_widget(Paragraph::new(text).fg(Color::Green), button);
            self.ui.hits.submit_button = button;
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let selected_full = self
            .selected_id()
            .and_then(|id| self.store.get(id))
            .filter(|e| e.description.chars().count() > self.description_width)
            .map(|e| e.description.clone());
        let line = match (&self.ui.status, selected_full) {
            (Some(status), _) => Line::from(status.as_str()).fg(Color::Red),
            (None, Some(full)) => Line::from(full),
            (None, None) => Line::from(HELP).fg(Color::DarkGray),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_menu(&mut self, frame: &mut Frame) {
        let Some(menu) = self.ui.menu.as_ref() else {
            return;
        };
        let anchor = match menu {
            Menu::Filter(_) => self.ui.hits.filter_label,
            Menu::Sort(_) => self.ui.hits.sort_label,
        };
        let labels = menu.labels();
        let width = labels
            .iter()
            .map(|l| Span::raw(l.as_str()).width() as u16)
            .max()
            .unwrap_or(0)
            + 4;
        let popup = Rect::new(anchor.x, anchor.y + 1, width, labels.len() as u16 + 2)
            .intersection(frame.area());

        let lines: Vec<Line> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let line = Line::from(format!(" {label}"));
                if i == menu.highlighted() {
                    line.style(Style::default().add_modifier(Modifier::REVERSED))
                } else {
                    line
                }
            })
            .collect();
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
            popup,
        );

        let listener = menu.listener();
        self.ui.hits.menu_items = (0..labels.len() as u16)
            .map(|i| Rect::new(popup.x + 1, popup.y + 1 + i, popup.width.saturating_sub(2), 1))
            .filter(|r| r.y < popup.bottom().saturating_sub(1))
            .collect();
        self.ui.watcher.set_bounds(listener, anchor.union(popup));
    }
}

fn field_text(fields: &FieldEditor, field: EditField) -> String {
    match field {
        EditField::Category => format!("< {} >", fields.value(field)),
        _ => fields.value(field),
    }
}

fn text_cursor(fields: &FieldEditor, field: EditField, area: Rect) -> Option<Position> {
    if field == EditField::Category {
        return None;
    }
    let offset = fields.input().cursor_position() as u16;
    Some(Position::new(
        (area.x + offset).min(area.right().saturating_sub(1)),
        area.y,
    ))
}

impl TuiWidget for ExpenseTable {
    fn handle_event(&mut self, event: Event) -> Option<TuiAction> {
        let action = match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => {
                if let Some(position) = pointer_press(mouse) {
                    self.handle_press(position);
                }
                None
            }
            _ => None,
        };
        self.settle();
        action
    }

    fn render(&mut self, frame: &mut Frame) {
        let [top, main, bottom] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        let [table_area, form_area] =
            Layout::horizontal([Constraint::Min(20), Constraint::Length(FORM_WIDTH)]).areas(main);

        self.ui.hits = HitMap::default();
        self.render_top(frame, top);
        self.render_table(frame, table_area);
        self.render_form(frame, form_area);
        self.render_status(frame, bottom);
        self.render_menu(frame);
    }

    fn on_exit(&mut self) {
        self.finish();
    }
}
