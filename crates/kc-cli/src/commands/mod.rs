use std::path::Path;
use std::sync::Arc;

use kc_core::profile::ProfileSet;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            std::process::exit(1);
        })
    };
}

pub mod config_ops;
pub mod profile_ops;
pub mod type_ops;

/// Built-in profiles, overlaid with `dir` when given.
pub fn load_profiles(dir: Option<&str>) -> Arc<ProfileSet> {
    let set = match dir {
        Some(dir) => die!(
            ProfileSet::load_dir(Path::new(dir)),
            "Error loading profiles from {dir}: {}"
        ),
        None => ProfileSet::builtin(),
    };
    Arc::new(set)
}

/// Install a custom settings file before anything reads the settings.
pub fn load_settings(file: &str) {
    let content = die!(std::fs::read_to_string(file), "Error reading {file}: {}");
    die!(kc_core::settings::init_custom(content), "Error: {}");
}
