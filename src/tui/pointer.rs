use ratatui::layout::{Position, Rect};

/// Parts of the screen that react to a press outside their own bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listener {
    RowEditor,
    FilterMenu,
    SortMenu,
}

/// Pointer-press notifications for components that are currently active.
///
/// A component subscribes when it becomes active and unsubscribes when it
/// leaves that state; bounds are refreshed on every render.
#[derive(Debug, Default)]
pub struct OutsideClickWatcher {
    subscriptions: Vec<(Listener, Rect)>,
}

impl OutsideClickWatcher {
    /// Subscribes `listener`; its bounds stay empty until the next render.
    pub fn subscribe(&mut self, listener: Listener) {
        if !self.is_subscribed(listener) {
            self.subscriptions.push((listener, Rect::default()));
        }
    }

    pub fn unsubscribe(&mut self, listener: Listener) {
        self.subscriptions.retain(|(l, _)| *l != listener);
    }

    pub fn is_subscribed(&self, listener: Listener) -> bool {
        self.subscriptions.iter().any(|(l, _)| *l == listener)
    }

    /// Ignored for listeners that are not subscribed.
    pub fn set_bounds(&mut self, listener: Listener, bounds: Rect) {
        for (l, rect) in self.subscriptions.iter_mut() {
            if *l == listener {
                *rect = bounds;
            }
        }
    }

    /// Returns the subscribed listeners whose bounds do not contain `position`,
    /// in subscription order.
    pub fn dispatch(&self, position: Position) -> Vec<Listener> {
        self.subscriptions
            .iter()
            .filter(|(_, bounds)| !bounds.contains(position))
            .map(|(listener, _)| *listener)
            .collect()
    }
}
