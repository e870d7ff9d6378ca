use std::path::Path;

use clap::{Parser, Subcommand};

use kc_cli::commands::{self, config_ops, profile_ops, type_ops};

#[derive(Parser)]
#[command(name = "kctool", about = "Keystroke composition diagnostics")]
struct Cli {
    /// Directory of extra profile TOML files, overlaid on the built-ins
    #[arg(long, global = true)]
    profiles: Option<String>,
    /// Custom settings TOML file
    #[arg(long, global = true)]
    settings: Option<String>,
    /// Write a JSON trace log here instead of stderr (needs the `trace` feature)
    #[arg(long, global = true)]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Type keys into a simulated field and show what it receives
    Type {
        /// Language tag of the field
        lang: String,
        /// Keys to type; `{Enter}`, `{Backspace}` etc. for named keys
        keys: String,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List available language profiles
    Profiles,
    /// Mapping table tools
    Mapping {
        #[command(subcommand)]
        action: MappingAction,
    },
    /// Settings tools
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum MappingAction {
    /// Print a profile's mapping table as TOML
    Export {
        /// Language code
        code: String,
    },
    /// Validate a mapping table TOML file
    Validate {
        /// Path to the TOML file
        file: String,
    },
    /// List the rules of a profile
    Rules {
        /// Language code
        code: String,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the default settings TOML
    Export,
    /// Validate a settings TOML file
    Validate {
        /// Path to the TOML file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();

    kc_cli::trace_init::init_tracing(cli.log_dir.as_deref().map(Path::new));
    if let Some(file) = &cli.settings {
        commands::load_settings(file);
    }

    match cli.command {
        Command::Type { lang, keys, json } => {
            let profiles = commands::load_profiles(cli.profiles.as_deref());
            type_ops::type_cmd(profiles, &lang, &keys, json);
        }
        Command::Profiles => {
            let profiles = commands::load_profiles(cli.profiles.as_deref());
            profile_ops::list(&profiles);
        }
        Command::Mapping { action } => match action {
            MappingAction::Export { code } => {
                let profiles = commands::load_profiles(cli.profiles.as_deref());
                config_ops::mapping_export(&profiles, &code);
            }
            MappingAction::Validate { file } => config_ops::mapping_validate(&file),
            MappingAction::Rules { code } => {
                let profiles = commands::load_profiles(cli.profiles.as_deref());
                profile_ops::rules(&profiles, &code);
            }
        },
        Command::Settings { action } => match action {
            SettingsAction::Export => config_ops::settings_export(),
            SettingsAction::Validate { file } => config_ops::settings_validate(&file),
        },
    }
}
