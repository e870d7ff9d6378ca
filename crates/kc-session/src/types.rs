use std::fmt;

use serde::{Serialize, Serializer};

use kc_core::unicode::fold_key;

/// Stable identity of an attached field. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FieldId(pub(crate) u64);

impl FieldId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field#{}", self.0)
    }
}

/// Logical key value, named after DOM `KeyboardEvent.key` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    Shift,
    Control,
    Alt,
    Meta,
    CapsLock,
}

const NAMED_KEYS: &[(Key, &str)] = &[
    (Key::Enter, "Enter"),
    (Key::Backspace, "Backspace"),
    (Key::Delete, "Delete"),
    (Key::Tab, "Tab"),
    (Key::Escape, "Escape"),
    (Key::ArrowLeft, "ArrowLeft"),
    (Key::ArrowRight, "ArrowRight"),
    (Key::ArrowUp, "ArrowUp"),
    (Key::ArrowDown, "ArrowDown"),
    (Key::Home, "Home"),
    (Key::End, "End"),
    (Key::Shift, "Shift"),
    (Key::Control, "Control"),
    (Key::Alt, "Alt"),
    (Key::Meta, "Meta"),
    (Key::CapsLock, "CapsLock"),
];

impl Key {
    /// Parse a DOM key name such as `"Enter"` or `"ArrowLeft"`.
    pub fn from_name(name: &str) -> Option<Key> {
        NAMED_KEYS
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(k, _)| *k)
    }

    /// Keys that only change modifier state and never touch the field.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Key::Shift | Key::Control | Key::Alt | Key::Meta | Key::CapsLock
        )
    }

    /// Whether a release of `other` belongs to a press of `self`.
    /// Shift may be released before the letter, so characters compare folded.
    pub(crate) fn releases(self, other: Key) -> bool {
        match (self, other) {
            (Key::Char(a), Key::Char(b)) => fold_key(a) == fold_key(b),
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            named => {
                let name = NAMED_KEYS
                    .iter()
                    .find(|(k, _)| k == named)
                    .map_or("Unidentified", |(_, n)| *n);
                f.write_str(name)
            }
        }
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        alt: false,
        ctrl: false,
        meta: false,
        shift: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    Down,
    Up,
}

/// Raw keyboard event delivered by the host for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn down(key: Key) -> Self {
        Self {
            kind: KeyEventKind::Down,
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn up(key: Key) -> Self {
        Self {
            kind: KeyEventKind::Up,
            ..Self::down(key)
        }
    }

    /// Press of a character key; shift follows the character's case.
    pub fn char_down(c: char) -> Self {
        Self::down(Key::Char(c)).with_modifiers(Modifiers {
            shift: c.is_uppercase(),
            ..Modifiers::NONE
        })
    }

    pub fn char_up(c: char) -> Self {
        Self {
            kind: KeyEventKind::Up,
            ..Self::char_down(c)
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InputType {
    InsertText,
    DeleteContentBackward,
}

/// Event the field observes, in dispatch order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldEvent {
    KeyDown { key: Key, modifiers: Modifiers },
    KeyPress { key: Key, modifiers: Modifiers },
    KeyUp { key: Key, modifiers: Modifiers },
    Input {
        input_type: InputType,
        data: Option<char>,
    },
    Blur,
    Focus,
}

impl FieldEvent {
    pub fn is_keyboard(&self) -> bool {
        matches!(
            self,
            FieldEvent::KeyDown { .. } | FieldEvent::KeyPress { .. } | FieldEvent::KeyUp { .. }
        )
    }

    pub fn key(&self) -> Option<Key> {
        match self {
            FieldEvent::KeyDown { key, .. }
            | FieldEvent::KeyPress { key, .. }
            | FieldEvent::KeyUp { key, .. } => Some(*key),
            _ => None,
        }
    }

    /// Apply the text edit carried by this event to a field value.
    pub fn apply_to(&self, value: &mut String) {
        match self {
            FieldEvent::Input {
                input_type: InputType::InsertText,
                data: Some(c),
            } => value.push(*c),
            FieldEvent::Input {
                input_type: InputType::DeleteContentBackward,
                ..
            } => {
                value.pop();
            }
            _ => {}
        }
    }
}

/// Response from `handle_key`, returned to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyResponse {
    /// The host must suppress the native effect of the raw event.
    pub consumed: bool,
    /// Events to dispatch to the field, in order.
    pub events: Vec<FieldEvent>,
}

impl KeyResponse {
    pub(crate) fn not_consumed() -> Self {
        Self {
            consumed: false,
            events: Vec::new(),
        }
    }

    pub(crate) fn consumed() -> Self {
        Self {
            consumed: true,
            ..Self::not_consumed()
        }
    }

    pub(crate) fn with_events(events: Vec<FieldEvent>) -> Self {
        Self {
            consumed: true,
            events,
        }
    }

    /// Number of keydown/keypress/keyup events in the transcript.
    pub fn keyboard_event_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_keyboard()).count()
    }
}
