use tracing::debug;

use super::types::FieldId;
use super::Compositor;

impl Compositor {
    /// The field gained focus. Commands without a target address it.
    pub fn notify_focus(&mut self, field: FieldId) {
        if self.fields.contains_key(&field) {
            debug!(field = %field, "focus");
            self.focused = Some(field);
        }
    }

    /// The field lost focus. Compositions never span a focus change.
    pub fn notify_blur(&mut self, field: FieldId) {
        self.reset_field(field, "blur");
        if self.focused == Some(field) {
            self.focused = None;
        }
    }

    pub fn focused(&self) -> Option<FieldId> {
        self.focused
    }
}
