use std::fmt::Display;

use crate::projection::{Filter, Sort};

use super::pointer::Listener;

/// An open menu with one highlighted option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dropdown<T> {
    options: Vec<T>,
    highlighted: usize,
}

impl<T: Copy + PartialEq + Display> Dropdown<T> {
    /// Opens with `current` highlighted.
    pub fn new(options: Vec<T>, current: T) -> Self {
        let highlighted = options.iter().position(|o| *o == current).unwrap_or(0);
        Self {
            options,
            highlighted,
        }
    }

    pub fn options(&self) -> &[T] {
        &self.options
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn selection(&self) -> Option<T> {
        self.options.get(self.highlighted).copied()
    }

    pub fn move_up(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.highlighted + 1 < self.options.len() {
            self.highlighted += 1;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Menu {
    Filter(Dropdown<Filter>),
    Sort(Dropdown<Sort>),
}

impl Menu {
    pub fn listener(&self) -> Listener {
        match self {
            Menu::Filter(_) => Listener::FilterMenu,
            Menu::Sort(_) => Listener::SortMenu,
        }
    }

    pub fn labels(&self) -> Vec<String> {
        match self {
            Menu::Filter(menu) => menu.options().iter().map(ToString::to_string).collect(),
            Menu::Sort(menu) => menu.options().iter().map(ToString::to_string).collect(),
        }
    }

    pub fn highlighted(&self) -> usize {
        match self {
            Menu::Filter(menu) => menu.highlighted(),
            Menu::Sort(menu) => menu.highlighted(),
        }
    }

    pub fn move_up(&mut self) {
        match self {
            Menu::Filter(menu) => menu.move_up(),
            Menu::Sort(menu) => menu.move_up(),
        }
    }

    pub fn move_down(&mut self) {
        match self {
            Menu::Filter(menu) => menu.move_down(),
            Menu::Sort(menu) => menu.move_down(),
        }
    }

    pub fn highlight(&mut self, index: usize) {
        match self {
            Menu::Filter(menu) if index < menu.options.len() => menu.highlighted = index,
            Menu::Sort(menu) if index < menu.options.len() => menu.highlighted = index,
            _ => {}
        }
    }
}
