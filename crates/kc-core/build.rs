fn main() {
    // Validate embedded TOML files at compile time.
    validate_toml(
        "src/default_settings.toml",
        include_str!("src/default_settings.toml"),
    );
    for (path, content) in [
        (
            "src/mapping/profiles/de.toml",
            include_str!("src/mapping/profiles/de.toml"),
        ),
        (
            "src/mapping/profiles/el.toml",
            include_str!("src/mapping/profiles/el.toml"),
        ),
        (
            "src/mapping/profiles/en.toml",
            include_str!("src/mapping/profiles/en.toml"),
        ),
        (
            "src/mapping/profiles/fr.toml",
            include_str!("src/mapping/profiles/fr.toml"),
        ),
        (
            "src/mapping/profiles/ru.toml",
            include_str!("src/mapping/profiles/ru.toml"),
        ),
    ] {
        validate_mapping(path, content);
    }
}

fn validate_toml(path: &str, content: &str) -> toml::Value {
    match content.parse::<toml::Value>() {
        Ok(v) => v,
        Err(e) => panic!("{path} contains invalid TOML: {e}"),
    }
}

fn validate_mapping(path: &str, content: &str) {
    let value = validate_toml(path, content);
    let code = value
        .get("profile")
        .and_then(|p| p.get("code"))
        .and_then(|c| c.as_str());
    if code.map_or(true, str::is_empty) {
        panic!("{path} is missing [profile] code");
    }
    if let Some(mappings) = value.get("mappings").and_then(|m| m.as_table()) {
        for (key, glyphs) in mappings {
            if glyphs.get("lower").and_then(|l| l.as_str()).is_none() {
                panic!("{path}: mapping {key:?} has no lower glyph");
            }
        }
    }
}
