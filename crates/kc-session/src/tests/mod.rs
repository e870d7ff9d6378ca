mod proptest_fsm;

use std::sync::Arc;

use kc_core::profile::ProfileSet;

use super::types::{FieldEvent, FieldId, KeyEvent};
use super::{ComposeConfig, Compositor, KeyResponse};

pub(super) fn test_config() -> ComposeConfig {
    ComposeConfig {
        max_sequence_len: 4,
        bypass_alt: true,
        bypass_ctrl: true,
        bypass_meta: true,
        refocus_on_enter: true,
    }
}

pub(super) fn make_compositor() -> Compositor {
    Compositor::with_config(Arc::new(ProfileSet::builtin()), test_config())
}

/// Compositor with one field attached under `lang`.
pub(super) fn make_field(lang: Option<&str>) -> (Compositor, FieldId) {
    let mut c = make_compositor();
    let field = c.attach_field(lang);
    c.notify_focus(field);
    (c, field)
}

// Helper: press and release each character, returning the keydown responses
pub(super) fn type_string(c: &mut Compositor, field: FieldId, s: &str) -> Vec<KeyResponse> {
    let mut responses = Vec::new();
    for ch in s.chars() {
        responses.push(c.handle_key(field, KeyEvent::char_down(ch)));
        let up = c.handle_key(field, KeyEvent::char_up(ch));
        assert!(up.events.is_empty());
    }
    responses
}

pub(super) fn keyboard_events(responses: &[KeyResponse]) -> usize {
    responses.iter().map(KeyResponse::keyboard_event_count).sum()
}

/// Key values of keyboard events, in order, as strings.
pub(super) fn keyboard_keys(responses: &[KeyResponse]) -> Vec<String> {
    responses
        .iter()
        .flat_map(|r| r.events.iter())
        .filter(|e| e.is_keyboard())
        .filter_map(FieldEvent::key)
        .map(|k| k.to_string())
        .collect()
}
