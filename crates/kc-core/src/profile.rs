//! Language profiles: a code, display metadata, and a mapping table.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::mapping::{
    parse_mapping_toml, GlyphPair, MappingConfig, MappingConfigError, MappingTable, ProfileHeader,
    BUILTIN_TABLES,
};
use crate::unicode::{script_of, Script};

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Mapping {
        path: PathBuf,
        source: MappingConfigError,
    },
    #[error("duplicate profile code: {0}")]
    DuplicateCode(String),
}

/// Immutable per-language profile.
#[derive(Debug)]
pub struct LanguageProfile {
    code: String,
    name: String,
    icon: Option<String>,
    table: MappingTable,
}

impl LanguageProfile {
    pub fn new(code: &str, name: &str, table: MappingTable) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            icon: None,
            table,
        }
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, MappingConfigError> {
        let config = parse_mapping_toml(toml_str)?;
        Ok(Self {
            table: MappingTable::from_config(&config),
            code: config.profile.code,
            name: config.profile.name,
            icon: config.profile.icon,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Flag icon file name, for the host's field decoration.
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    /// The profile as a mapping document, as `from_toml` would read it.
    pub fn to_config(&self) -> MappingConfig {
        let mappings = self
            .table
            .rules()
            .iter()
            .map(|rule| {
                let glyphs = GlyphPair {
                    lower: rule.lower.to_string(),
                    upper: rule.upper.map(String::from),
                };
                (rule.sequence_string(), glyphs)
            })
            .collect();
        MappingConfig {
            profile: ProfileHeader {
                code: self.code.clone(),
                name: self.name.clone(),
                icon: self.icon.clone(),
            },
            mappings,
        }
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(&self.to_config())
    }

    /// True when every key renders as itself.
    pub fn is_pass_through(&self) -> bool {
        self.table.is_identity()
    }

    /// Script of the composed output; Latin for pass-through profiles.
    pub fn script(&self) -> Script {
        let mut counts: BTreeMap<Script, usize> = BTreeMap::new();
        for rule in self.table.rules() {
            *counts.entry(script_of(rule.lower)).or_default() += 1;
        }
        counts
            .into_iter()
            .max_by_key(|&(_, n)| n)
            .map(|(s, _)| s)
            .unwrap_or(Script::Latin)
    }
}

/// Registry of profiles by code.
#[derive(Debug, Default)]
pub struct ProfileSet {
    profiles: BTreeMap<String, LanguageProfile>,
}

impl ProfileSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Profiles embedded in the binary (validated by build.rs).
    pub fn builtin() -> Self {
        let mut set = Self::empty();
        for (code, toml) in BUILTIN_TABLES {
            let profile = LanguageProfile::from_toml(toml)
                .unwrap_or_else(|e| panic!("built-in profile {code} must be valid: {e}"));
            set.profiles.insert(profile.code.clone(), profile);
        }
        set
    }

    /// Built-in profiles overlaid with every `*.toml` file in `dir`.
    ///
    /// A file may replace a built-in profile of the same code, but two files
    /// in `dir` may not share a code.
    pub fn load_dir(dir: &Path) -> Result<Self, ProfileError> {
        let io_err = |source| ProfileError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(io_err)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()
            .map_err(io_err)?;
        paths.retain(|p| p.extension().is_some_and(|ext| ext == "toml"));
        paths.sort();

        let mut set = Self::builtin();
        let mut seen = Vec::new();
        for path in paths {
            let content = fs::read_to_string(&path).map_err(|source| ProfileError::Io {
                path: path.clone(),
                source,
            })?;
            let profile = LanguageProfile::from_toml(&content).map_err(|source| {
                ProfileError::Mapping {
                    path: path.clone(),
                    source,
                }
            })?;
            if seen.contains(&profile.code) {
                return Err(ProfileError::DuplicateCode(profile.code));
            }
            debug!(code = %profile.code, path = %path.display(), "loaded profile");
            seen.push(profile.code.clone());
            set.profiles.insert(profile.code.clone(), profile);
        }
        Ok(set)
    }

    pub fn insert(&mut self, profile: LanguageProfile) -> Result<(), ProfileError> {
        if self.profiles.contains_key(&profile.code) {
            return Err(ProfileError::DuplicateCode(profile.code));
        }
        self.profiles.insert(profile.code.clone(), profile);
        Ok(())
    }

    pub fn get(&self, code: &str) -> Option<&LanguageProfile> {
        self.profiles.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.profiles.contains_key(code)
    }

    /// Profiles in code order.
    pub fn iter(&self) -> impl Iterator<Item = &LanguageProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
