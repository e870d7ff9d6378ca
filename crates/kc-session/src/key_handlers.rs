use tracing::{debug, debug_span, warn};

use super::reconcile::reconcile;
use super::resolver::resolve;
use super::synth;
use super::types::{FieldId, Key, KeyEvent, KeyEventKind, KeyResponse};
use super::Compositor;

impl Compositor {
    /// Process a raw key event for `field`. Returns whether the host must
    /// suppress it and the events to dispatch in its place.
    pub fn handle_key(&mut self, field: FieldId, event: KeyEvent) -> KeyResponse {
        let _span = debug_span!("handle_key", field = %field, ?event).entered();

        let Some(state) = self.fields.get_mut(&field) else {
            warn!("key for unknown field");
            return KeyResponse::not_consumed();
        };

        if event.kind == KeyEventKind::Up {
            return if state.release(event.key) {
                KeyResponse::consumed()
            } else {
                KeyResponse::not_consumed()
            };
        }

        // Modifier presses change nothing in the field.
        if event.key.is_modifier() {
            return KeyResponse::not_consumed();
        }

        if self.config.bypasses(event.modifiers) {
            state.buffer.clear();
            state.held.clear();
            return KeyResponse::not_consumed();
        }

        let lang = resolve(&self.overrides, field, state.default_lang.as_deref());
        if state.buffer.language() != lang {
            debug!(from = ?state.buffer.language(), to = ?lang, "language changed");
            state.held.clear();
            state.buffer.set_language(lang);
        }
        let Some(lang) = lang else {
            return KeyResponse::not_consumed();
        };
        let Some(profile) = self.profiles.get(lang) else {
            warn!(lang, "no profile for language, passing key through");
            return KeyResponse::not_consumed();
        };

        match event.key {
            Key::Char(c) => {
                let table = profile.table();
                let max_len = self
                    .config
                    .max_sequence_len
                    .min(table.max_sequence_len())
                    .max(1);
                if !state.buffer.is_consistent(max_len) {
                    warn!(raw = ?state.buffer.raw(), "inconsistent composition state, resetting");
                    state.buffer.clear();
                }
                let correction = reconcile(&mut state.buffer, table, c, max_len);
                debug!(
                    retract = correction.retract,
                    insert = correction.insert.as_str(),
                    committed = correction.committed,
                    "reconciled"
                );
                state.hold(event.key);
                KeyResponse::with_events(synth::transcript(c, event.modifiers, &correction))
            }
            Key::Enter if self.config.refocus_on_enter => {
                state.buffer.clear();
                state.hold(Key::Enter);
                debug!("refocus on enter");
                KeyResponse::with_events(synth::refocus())
            }
            _ => {
                // Editing and navigation keys leave the caret somewhere the
                // buffer no longer describes.
                state.buffer.clear();
                KeyResponse::not_consumed()
            }
        }
    }
}
