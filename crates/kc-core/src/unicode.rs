//! Character-level helpers for case folding and script classification.

/// Fold a raw key to the form used as a mapping table key.
///
/// Only single-character lower-case mappings are folded; keys whose lower
/// case expands to several characters (e.g. U+0130) are kept as typed so
/// that one key always stays one trie edge.
pub fn fold_key(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Whether a raw key asks for the capital form of a composed glyph.
pub fn is_upper_key(c: char) -> bool {
    c.is_uppercase()
}

/// Writing system of a composed glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Script {
    Latin,
    Cyrillic,
    Greek,
    Other,
}

impl Script {
    pub fn as_str(self) -> &'static str {
        match self {
            Script::Latin => "latin",
            Script::Cyrillic => "cyrillic",
            Script::Greek => "greek",
            Script::Other => "other",
        }
    }
}

pub fn is_cyrillic(c: char) -> bool {
    ('\u{0400}'..='\u{04FF}').contains(&c)
}

/// Greek and Coptic block (U+0370..U+03FF). Polytonic forms in Greek
/// Extended are not produced by any table.
pub fn is_greek(c: char) -> bool {
    ('\u{0370}'..='\u{03FF}').contains(&c)
}

/// ASCII letters plus Latin-1 Supplement and Latin Extended-A letters
/// (à, ä, é, ß, ...).
pub fn is_latin(c: char) -> bool {
    c.is_ascii_alphabetic() || (('\u{00C0}'..='\u{017F}').contains(&c) && c.is_alphabetic())
}

pub fn script_of(c: char) -> Script {
    if is_latin(c) {
        Script::Latin
    } else if is_cyrillic(c) {
        Script::Cyrillic
    } else if is_greek(c) {
        Script::Greek
    } else {
        Script::Other
    }
}
