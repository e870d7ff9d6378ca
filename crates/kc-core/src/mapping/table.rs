/// Built-in mapping tables, `(code, toml)`, sorted by code.
pub const BUILTIN_TABLES: &[(&str, &str)] = &[
    ("de", include_str!("profiles/de.toml")),
    ("el", include_str!("profiles/el.toml")),
    ("en", include_str!("profiles/en.toml")),
    ("fr", include_str!("profiles/fr.toml")),
    ("ru", include_str!("profiles/ru.toml")),
];

/// Returns the embedded TOML for a built-in profile.
pub fn builtin_toml(code: &str) -> Option<&'static str> {
    BUILTIN_TABLES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, toml)| *toml)
}
