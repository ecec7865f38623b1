// Widget registry - Layout CRUD and edit-mode bookkeeping
use crate::domain::widget::{default_widgets, Position, Size, Widget, WidgetPatch};

/// Every mutating operation returns whether the widget collection changed,
/// which the engine uses to decide when to persist.
#[derive(Debug, Clone)]
pub struct WidgetRegistry {
    widgets: Vec<Widget>,
    edit_mode: bool,
    dragged_widget: Option<String>,
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::new(default_widgets())
    }
}

impl WidgetRegistry {
    pub fn new(widgets: Vec<Widget>) -> Self {
        let mut registry = Self {
            widgets: Vec::with_capacity(widgets.len()),
            edit_mode: false,
            dragged_widget: None,
        };
        for widget in widgets {
            registry.add(widget);
        }
        registry
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn get(&self, id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn dragged_widget(&self) -> Option<&str> {
        self.dragged_widget.as_deref()
    }

    pub fn add(&mut self, widget: Widget) -> bool {
        if self.get(&widget.id).is_some() {
            tracing::debug!("Ignoring widget with duplicate id {}", widget.id);
            return false;
        }
        self.widgets.push(widget);
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.widgets.len();
        self.widgets.retain(|w| w.id != id);
        if self.dragged_widget.as_deref() == Some(id) {
            self.dragged_widget = None;
        }
        self.widgets.len() != before
    }

    pub fn update(&mut self, id: &str, patch: WidgetPatch) -> bool {
        self.with_widget(id, |w| w.apply(patch))
    }

    pub fn move_widget(&mut self, id: &str, position: Position) -> bool {
        self.with_widget(id, |w| w.position = position)
    }

    pub fn resize(&mut self, id: &str, size: Size) -> bool {
        self.with_widget(id, |w| w.size = size)
    }

    pub fn toggle_visibility(&mut self, id: &str) -> bool {
        self.with_widget(id, |w| w.is_visible = !w.is_visible)
    }

    /// Returns whether edit-mode state (flag or dragged pointer) changed.
    pub fn set_edit_mode(&mut self, enabled: bool) -> bool {
        let changed = self.edit_mode != enabled || (!enabled && self.dragged_widget.is_some());
        self.edit_mode = enabled;
        if !enabled {
            self.dragged_widget = None;
        }
        changed
    }

    /// Unknown ids are ignored; `None` always clears the pointer.
    pub fn set_dragged_widget(&mut self, id: Option<&str>) -> bool {
        let next = match id {
            Some(id) if self.get(id).is_none() => return false,
            other => other.map(str::to_string),
        };
        if self.dragged_widget == next {
            return false;
        }
        self.dragged_widget = next;
        true
    }

    /// Hard reset to the canonical layout, regardless of current state.
    pub fn reset_layout(&mut self) {
        *self = Self::default();
    }

    /// Leaves edit mode; the layout itself is already persisted on every edit.
    pub fn save_layout(&mut self) -> bool {
        self.set_edit_mode(false)
    }

    fn with_widget(&mut self, id: &str, f: impl FnOnce(&mut Widget)) -> bool {
        match self.widgets.iter_mut().find(|w| w.id == id) {
            Some(widget) => {
                f(widget);
                true
            }
            None => {
                tracing::debug!("Ignoring update for unknown widget {}", id);
                false
            }
        }
    }
}
