//! Property-based tests for the per-field composition state machine.
//!
//! Generates random keystroke and host-notification sequences and checks
//! structural invariants after every action.

use proptest::prelude::*;

use kc_core::mapping::MappingTable;
use kc_core::unicode::fold_key;

use super::simulator::HeadlessField;
use crate::types::{FieldEvent, InputType, Key, KeyEvent, Modifiers};
use crate::{Command, KeyResponse};

const LANGS: &[&str] = &["en", "fr", "de", "ru", "el"];
const MAX_PENDING: usize = 4;

// ---------------------------------------------------------------------------
// Action enum
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Action {
    TypeChar(char),
    Enter,
    Backspace,
    ArrowLeft,
    Shift,
    /// Ctrl+key chord, handled natively.
    Chord(char),
    Blur,
    Focus,
    /// Page clears the field value.
    Clear,
    SetLang(&'static str),
    RemoveLang,
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_key_char() -> impl Strategy<Value = char> {
    // Keys that start or continue multi-key sequences are weighted up.
    prop_oneof![
        4 => prop::sample::select(vec!['s', 'h', 'c', 't', 'y', 'q', 'k', 'p']),
        2 => prop::sample::select(vec!['S', 'H', 'C', 'T', 'Y', 'K', 'P']),
        2 => prop::sample::select(vec![
            'a', 'b', 'd', 'e', 'i', 'o', 'u', 'w', 'x', 'z', 'è', 'ß', 'é',
        ]),
        1 => prop::sample::select(vec![' ', '1', '.', '-']),
    ]
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        60 => arb_key_char().prop_map(Action::TypeChar),
        5 => Just(Action::Enter),
        5 => Just(Action::Backspace),
        3 => Just(Action::ArrowLeft),
        3 => Just(Action::Shift),
        3 => prop::sample::select(vec!['a', 'c', 'v', 'z']).prop_map(Action::Chord),
        2 => Just(Action::Blur),
        2 => Just(Action::Focus),
        2 => Just(Action::Clear),
        3 => prop::sample::select(LANGS.to_vec()).prop_map(Action::SetLang),
        2 => Just(Action::RemoveLang),
    ]
}

/// Actions that keep the field on an identity profile.
fn arb_plain_action() -> impl Strategy<Value = Action> {
    arb_action().prop_filter("no language changes", |a| {
        !matches!(a, Action::SetLang(_) | Action::RemoveLang)
    })
}

fn arb_lang() -> impl Strategy<Value = Option<&'static str>> {
    prop_oneof![
        1 => Just(None),
        4 => prop::sample::select(LANGS.to_vec()).prop_map(Some),
    ]
}

// ---------------------------------------------------------------------------
// Execute an Action against the field
// ---------------------------------------------------------------------------

fn execute_action(f: &mut HeadlessField, action: &Action) -> Option<(KeyResponse, KeyResponse)> {
    match action {
        Action::TypeChar(c) => {
            let modifiers = KeyEvent::char_down(*c).modifiers;
            Some(f.stroke(Key::Char(*c), modifiers))
        }
        Action::Enter => Some(f.stroke(Key::Enter, Modifiers::NONE)),
        Action::Backspace => Some(f.stroke(Key::Backspace, Modifiers::NONE)),
        Action::ArrowLeft => Some(f.stroke(Key::ArrowLeft, Modifiers::NONE)),
        Action::Shift => Some(f.stroke(Key::Shift, Modifiers::shift())),
        Action::Chord(c) => Some(f.stroke(
            Key::Char(*c),
            Modifiers {
                ctrl: true,
                ..Modifiers::NONE
            },
        )),
        Action::Blur => {
            f.compositor.notify_blur(f.field);
            None
        }
        Action::Focus => {
            f.compositor.notify_focus(f.field);
            None
        }
        Action::Clear => {
            f.clear();
            None
        }
        Action::SetLang(lang) => {
            f.compositor.handle_command(
                Some(f.field),
                Command::SetLang {
                    lang: lang.to_string(),
                },
            );
            None
        }
        Action::RemoveLang => {
            f.compositor.handle_command(Some(f.field), Command::RemoveLang);
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant checks
// ---------------------------------------------------------------------------

fn assert_invariants(f: &HeadlessField, action: &Action, down: &KeyResponse, up: &KeyResponse) {
    // 1. Pending sequences stay within the longest mapping.
    let pending = f.compositor.pending_keys(f.field).unwrap_or_default();
    assert!(
        pending.chars().count() <= MAX_PENDING,
        "pending {pending:?} too long after {action:?}",
    );
    assert!(
        f.compositor.pending_rendered_len(f.field) <= pending.chars().count(),
        "more glyphs than keys pending after {action:?}",
    );

    // 2. Releases never produce events.
    assert!(up.events.is_empty(), "keyup leaked {:?} after {action:?}", up.events);

    // 3. Unconsumed presses carry no events.
    if !down.consumed {
        assert!(down.events.is_empty(), "pass-through with events after {action:?}");
    }

    // 4. A composed key is first typed literally.
    if let (Action::TypeChar(c), true) = (action, down.consumed) {
        let key = Key::Char(*c);
        assert!(
            matches!(down.events.first(), Some(FieldEvent::KeyDown { key: k, .. }) if *k == key),
            "transcript must start with keydown after {action:?}",
        );
        assert!(matches!(down.events.get(1), Some(FieldEvent::KeyPress { .. })));
        assert_eq!(
            down.events.get(2),
            Some(&FieldEvent::Input {
                input_type: InputType::InsertText,
                data: Some(*c),
            }),
        );
        assert!(down.keyboard_event_count() >= 3, "after {action:?}");
    }

    // 5. Enter and navigation keys end the composition.
    if matches!(action, Action::Enter | Action::Backspace | Action::ArrowLeft | Action::Chord(_)) {
        assert!(pending.is_empty(), "pending {pending:?} after {action:?}");
    }

    // 6. Refocus is exactly blur then focus.
    if matches!(action, Action::Enter) && down.consumed {
        assert_eq!(down.events, [FieldEvent::Blur, FieldEvent::Focus]);
    }
}

/// Value expected on an identity profile (or no language).
fn apply_plain(model: &mut String, action: &Action, down: &KeyResponse) {
    match action {
        Action::TypeChar(c) => model.push(*c),
        Action::Backspace => {
            model.pop();
        }
        Action::Enter if !down.consumed => model.push('\n'),
        Action::Clear => model.clear(),
        _ => {}
    }
}

/// Rendering of `keys` by plain left-to-right longest match over the rule
/// list, without the trie or any commit bookkeeping. Keys no rule covers
/// stay literal.
fn reference_render(table: &MappingTable, keys: &[char]) -> String {
    let glyph_at = |window: &[char]| {
        let folded: Vec<char> = window.iter().map(|&k| fold_key(k)).collect();
        let rule = table.rules().iter().find(|r| r.sequence == folded)?;
        rule.glyph_for(window[0])
    };

    let mut out = String::new();
    let mut i = 0;
    while i < keys.len() {
        let mut longest = None;
        for len in (1..=keys.len() - i).rev() {
            if let Some(glyph) = glyph_at(&keys[i..i + len]) {
                longest = Some((len, glyph));
                break;
            }
        }
        match longest {
            Some((len, glyph)) => {
                out.push(glyph);
                i += len;
            }
            None => {
                out.push(keys[i]);
                i += 1;
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// proptest entry point
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn field_invariants_hold(
        lang in arb_lang(),
        actions in prop::collection::vec(arb_action(), 1..120),
    ) {
        let mut f = HeadlessField::new(lang);
        for action in &actions {
            if let Some((down, up)) = execute_action(&mut f, action) {
                assert_invariants(&f, action, &down, &up);
            }
        }
    }

    #[test]
    fn identity_profiles_echo_keys(
        lang in prop::sample::select(vec![None, Some("en"), Some("fr"), Some("de")]),
        actions in prop::collection::vec(arb_plain_action(), 1..120),
    ) {
        let mut f = HeadlessField::new(lang);
        let mut model = String::new();
        for action in &actions {
            if let Some((down, up)) = execute_action(&mut f, action) {
                assert_invariants(&f, action, &down, &up);
                if lang.is_some() {
                    if let Action::TypeChar(_) = action {
                        prop_assert_eq!(down.keyboard_event_count(), 3);
                    }
                }
                apply_plain(&mut model, action, &down);
            } else {
                apply_plain(&mut model, action, &KeyResponse::not_consumed());
            }
            prop_assert_eq!(&f.value, &model, "after {:?}", action);
        }
    }

    #[test]
    fn composed_value_matches_reference(
        lang in prop::sample::select(vec!["ru", "el"]),
        keys in prop::collection::vec(arb_key_char(), 1..60),
    ) {
        let mut f = HeadlessField::new(Some(lang));
        let table = f.compositor.profiles().get(lang).unwrap().table();
        let expected = reference_render(table, &keys);
        for &key in &keys {
            f.type_str(&key.to_string());
        }
        prop_assert_eq!(&f.value, &expected, "typed {:?}", keys);
    }
}
