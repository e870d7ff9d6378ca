//! Turns corrections into keyboard-shaped event transcripts.

use super::reconcile::Correction;
use super::types::{FieldEvent, InputType, Key, Modifiers};

/// Press, composition and release of one character, inserting it.
pub(crate) fn push_typed(events: &mut Vec<FieldEvent>, c: char, modifiers: Modifiers) {
    let key = Key::Char(c);
    events.push(FieldEvent::KeyDown { key, modifiers });
    events.push(FieldEvent::KeyPress { key, modifiers });
    events.push(FieldEvent::Input {
        input_type: InputType::InsertText,
        data: Some(c),
    });
    events.push(FieldEvent::KeyUp { key, modifiers });
}

/// One erase of the previous glyph. Carries no glyph and no modifiers.
pub(crate) fn push_erase(events: &mut Vec<FieldEvent>) {
    let key = Key::Backspace;
    let modifiers = Modifiers::NONE;
    events.push(FieldEvent::KeyDown { key, modifiers });
    events.push(FieldEvent::Input {
        input_type: InputType::DeleteContentBackward,
        data: None,
    });
    events.push(FieldEvent::KeyUp { key, modifiers });
}

/// Full transcript for a composed raw key: the key itself, then the
/// erases and insertions of its correction.
pub(crate) fn transcript(
    raw: char,
    modifiers: Modifiers,
    correction: &Correction,
) -> Vec<FieldEvent> {
    let mut events =
        Vec::with_capacity(4 + 3 * correction.retract + 4 * correction.insert.len());
    push_typed(&mut events, raw, modifiers);
    for _ in 0..correction.retract {
        push_erase(&mut events);
    }
    for glyph in correction.insert.chars() {
        push_typed(&mut events, glyph, modifiers);
    }
    events
}

/// Blur then focus of the same field.
pub(crate) fn refocus() -> Vec<FieldEvent> {
    vec![FieldEvent::Blur, FieldEvent::Focus]
}
