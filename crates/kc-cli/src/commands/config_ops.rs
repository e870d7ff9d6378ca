use std::fs;

use kc_core::mapping::{self, MappingTable};
use kc_core::profile::ProfileSet;

/// Print a loaded profile as a mapping TOML document.
pub fn mapping_export(profiles: &ProfileSet, code: &str) {
    let Some(profile) = profiles.get(code) else {
        let known: Vec<&str> = profiles.iter().map(|p| p.code()).collect();
        eprintln!("Error: no profile {code:?} (have: {})", known.join(", "));
        std::process::exit(1);
    };
    print!("{}", die!(profile.to_toml(), "Error: {}"));
}

pub fn mapping_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let config = die!(mapping::parse_mapping_toml(&content), "Error: {}");
    let table = MappingTable::from_config(&config);
    println!(
        "OK: {} ({}): {} mappings, longest sequence {}",
        config.profile.code,
        config.profile.name,
        table.rules().len(),
        table.max_sequence_len()
    );
}

pub fn settings_export() {
    print!("{}", kc_core::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(
        kc_core::settings::parse_settings_toml(&content),
        "Error: {}"
    );
    println!(
        "OK: composition.max_sequence_len={}, input.bypass=[alt={}, ctrl={}, meta={}], focus.refocus_on_enter={}",
        s.composition.max_sequence_len,
        s.input.bypass_alt,
        s.input.bypass_ctrl,
        s.input.bypass_meta,
        s.focus.refocus_on_enter
    );
}
