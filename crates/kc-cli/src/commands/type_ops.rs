use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use kc_core::profile::ProfileSet;
use kc_session::{Compositor, FieldEvent, Key, KeyEvent, Modifiers};

/// One key press as seen by the field.
#[derive(Debug, Serialize)]
pub struct Stroke {
    pub key: Key,
    pub consumed: bool,
    pub events: Vec<FieldEvent>,
    /// Field value after the press.
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct TypeReport {
    pub lang: String,
    pub keys: String,
    pub value: String,
    pub strokes: Vec<Stroke>,
}

/// Split `{Name}` key names out of a typed string: `"ab{Enter}c"`.
pub fn parse_keys(input: &str) -> Result<Vec<Key>, String> {
    let mut keys = Vec::new();
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c != '{' {
            keys.push(Key::Char(c));
            continue;
        }
        let name: String = chars.by_ref().take_while(|&c| c != '}').collect();
        match name.as_str() {
            // "{{}" types a literal brace.
            "" | "{" => keys.push(Key::Char('{')),
            _ => {
                let key = Key::from_name(&name).ok_or_else(|| format!("unknown key {{{name}}}"))?;
                keys.push(key);
            }
        }
    }
    Ok(keys)
}

/// Type `keys` into a fresh focused field tagged `lang`, the way a browser
/// would: consumed presses apply the returned events, the rest apply
/// natively.
pub fn simulate(profiles: Arc<ProfileSet>, lang: &str, keys: &[Key]) -> TypeReport {
    let mut compositor = Compositor::new(profiles);
    let field = compositor.attach_field(Some(lang));
    compositor.notify_focus(field);

    let mut value = String::new();
    let mut strokes = Vec::with_capacity(keys.len());
    for &key in keys {
        let down = match key {
            Key::Char(c) => KeyEvent::char_down(c),
            _ => KeyEvent::down(key),
        };
        let resp = compositor.handle_key(field, down);
        if resp.consumed {
            for event in &resp.events {
                event.apply_to(&mut value);
                match event {
                    FieldEvent::Blur => compositor.notify_blur(field),
                    FieldEvent::Focus => compositor.notify_focus(field),
                    _ => {}
                }
            }
        } else {
            apply_native(&mut value, key, down.modifiers);
        }
        compositor.handle_key(field, KeyEvent::up(key).with_modifiers(down.modifiers));
        debug!(%key, consumed = resp.consumed, value = value.as_str(), "stroke");
        strokes.push(Stroke {
            key,
            consumed: resp.consumed,
            events: resp.events,
            value: value.clone(),
        });
    }

    TypeReport {
        lang: lang.to_string(),
        keys: keys.iter().map(Key::to_string).collect(),
        value,
        strokes,
    }
}

fn apply_native(value: &mut String, key: Key, modifiers: Modifiers) {
    if modifiers.alt || modifiers.ctrl || modifiers.meta {
        return;
    }
    match key {
        Key::Char(c) => value.push(c),
        Key::Enter => value.push('\n'),
        Key::Backspace => {
            value.pop();
        }
        _ => {}
    }
}

fn describe(event: &FieldEvent) -> String {
    match event {
        FieldEvent::KeyDown { key, .. } => format!("keydown  {key}"),
        FieldEvent::KeyPress { key, .. } => format!("keypress {key}"),
        FieldEvent::KeyUp { key, .. } => format!("keyup    {key}"),
        FieldEvent::Input { input_type, data } => {
            let data = data.map_or_else(String::new, |c| format!(" {c:?}"));
            format!("input    {input_type:?}{data}")
        }
        FieldEvent::Blur => "blur".to_string(),
        FieldEvent::Focus => "focus".to_string(),
    }
}

pub fn type_cmd(profiles: Arc<ProfileSet>, lang: &str, input: &str, json: bool) {
    let keys = die!(parse_keys(input), "Error: {}");
    if !profiles.contains(lang) {
        eprintln!("Warning: no profile for {lang:?}, keys pass through");
    }
    let report = simulate(profiles, lang, &keys);

    if json {
        println!("{}", die!(serde_json::to_string_pretty(&report), "Error: {}"));
        return;
    }

    for stroke in &report.strokes {
        let keyboard = stroke.events.iter().filter(|e| e.is_keyboard()).count();
        if stroke.consumed {
            println!("[{}] consumed, {} keyboard events", stroke.key, keyboard);
            for event in &stroke.events {
                println!("    {}", describe(event));
            }
        } else {
            println!("[{}] native", stroke.key);
        }
        println!("    => {:?}", stroke.value);
    }
    println!();
    println!("value: {}", report.value);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(lang: &str, input: &str) -> TypeReport {
        simulate(Arc::new(ProfileSet::builtin()), lang, &parse_keys(input).unwrap())
    }

    #[test]
    fn test_parse_keys() {
        let keys = parse_keys("a{Enter}b{{}").unwrap();
        assert_eq!(
            keys,
            [Key::Char('a'), Key::Enter, Key::Char('b'), Key::Char('{')]
        );
        assert!(parse_keys("{Bogus}").is_err());
    }

    #[test]
    fn test_simulate_russian() {
        let report = run("ru", "shchi");
        assert_eq!(report.value, "щи");
        assert_eq!(report.strokes.len(), 5);
        let keyboard = report.strokes[3].events.iter().filter(|e| e.is_keyboard());
        assert_eq!(keyboard.count(), 12);
        assert_eq!(report.keys, "shchi");
    }

    #[test]
    fn test_simulate_enter_refocuses() {
        let report = run("ru", "t{Enter}s");
        assert_eq!(report.value, "тs");
        assert_eq!(report.strokes[1].events, [FieldEvent::Blur, FieldEvent::Focus]);
    }

    #[test]
    fn test_simulate_unknown_language() {
        let report = run("xx", "ab{Backspace}");
        assert_eq!(report.value, "a");
        assert!(report.strokes.iter().all(|s| !s.consumed));
    }

    #[test]
    fn test_report_json() {
        let report = run("el", "w");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["value"], "ω");
        assert_eq!(json["strokes"][0]["events"][0]["type"], "keydown");
        assert_eq!(json["strokes"][0]["events"][0]["key"], "w");
    }
}
