//! Per-language keystroke-sequence to glyph tables.
//!
//! Each table is a case-folded trie over raw keys. Matching is
//! case-insensitive per key; the output case follows the first key of the
//! matched sequence.

mod config;
mod table;
mod trie;

use std::collections::HashSet;

pub use config::{parse_mapping_toml, GlyphPair, MappingConfig, MappingConfigError, ProfileHeader};
pub use table::{builtin_toml, BUILTIN_TABLES};
pub use trie::{KeyTrie, TrieLookupResult};

use crate::unicode::{fold_key, is_upper_key};

/// Longest key sequence any table may contain.
pub const MAX_SEQUENCE_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// One key rendering as itself.
    Identity,
    /// One key rendering as a different glyph.
    SingleSubstitution,
    /// Two keys where the first has no rendering of its own.
    PrefixPair,
    /// Two keys where the first is provisionally rendered by its own rule.
    SuffixPair,
    /// Three or more keys, composed progressively.
    Quad,
}

impl RuleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleKind::Identity => "identity",
            RuleKind::SingleSubstitution => "single",
            RuleKind::PrefixPair => "prefix-pair",
            RuleKind::SuffixPair => "suffix-pair",
            RuleKind::Quad => "quad",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionRule {
    /// Case-folded key sequence.
    pub sequence: Vec<char>,
    pub lower: char,
    /// `None` when the glyph has no capital form.
    pub upper: Option<char>,
    pub kind: RuleKind,
}

impl CompositionRule {
    /// Output for a match whose first raw key is `first_key`.
    ///
    /// Returns `None` when an upper-case key asks for a capital the rule
    /// does not have; the rule then does not apply.
    pub fn glyph_for(&self, first_key: char) -> Option<char> {
        if is_upper_key(first_key) {
            self.upper
        } else {
            Some(self.lower)
        }
    }

    pub fn sequence_string(&self) -> String {
        self.sequence.iter().collect()
    }
}

/// Result of matching the end of a key buffer against a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuffixMatch {
    /// Number of trailing keys covered by the match (at least 1).
    pub len: usize,
    pub glyph: char,
    /// Kind of the matched rule; `Identity` for unmapped keys.
    pub kind: RuleKind,
    /// True when no rule extends the whole input.
    pub is_final: bool,
}

#[derive(Debug, Default)]
pub struct MappingTable {
    trie: KeyTrie,
    rules: Vec<CompositionRule>,
    max_len: usize,
}

impl MappingTable {
    /// A table without rules: every key renders as itself.
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn from_config(config: &MappingConfig) -> Self {
        let mut rules: Vec<CompositionRule> = config
            .mappings
            .iter()
            .map(|(key, glyphs)| CompositionRule {
                sequence: key.chars().map(fold_key).collect(),
                lower: config::glyph_char(&glyphs.lower),
                upper: glyphs.upper.as_deref().map(config::glyph_char),
                kind: RuleKind::Identity,
            })
            .collect();

        // Pair kinds depend on whether their first key has its own rendering.
        let substituted: HashSet<char> = rules
            .iter()
            .filter(|r| {
                r.sequence.len() == 1 && single_kind(r) == RuleKind::SingleSubstitution
            })
            .map(|r| r.sequence[0])
            .collect();
        for rule in &mut rules {
            rule.kind = match rule.sequence.len() {
                1 => single_kind(rule),
                2 if substituted.contains(&rule.sequence[0]) => RuleKind::SuffixPair,
                2 => RuleKind::PrefixPair,
                _ => RuleKind::Quad,
            };
        }

        let sequences: Vec<Vec<char>> = rules.iter().map(|r| r.sequence.clone()).collect();
        let trie = KeyTrie::build(&sequences);
        let max_len = rules.iter().map(|r| r.sequence.len()).max().unwrap_or(0);
        Self {
            trie,
            rules,
            max_len,
        }
    }

    pub fn rules(&self) -> &[CompositionRule] {
        &self.rules
    }

    pub fn is_identity(&self) -> bool {
        self.rules.is_empty()
    }

    /// Length of the longest rule, 0 for identity tables.
    pub fn max_sequence_len(&self) -> usize {
        self.max_len
    }

    pub fn probe(&self, keys: &[char]) -> TrieLookupResult {
        self.trie.probe(keys)
    }

    pub fn rule(&self, keys: &[char]) -> Option<&CompositionRule> {
        self.probe(keys).rule().map(|id| &self.rules[id])
    }

    /// Exact match of a whole key sequence.
    pub fn lookup(&self, keys: &[char]) -> Option<char> {
        let first = *keys.first()?;
        self.rule(keys)?.glyph_for(first)
    }

    /// Whether `keys` is a rule or the start of one.
    pub fn can_extend(&self, keys: &[char]) -> bool {
        self.probe(keys) != TrieLookupResult::None
    }

    /// Longest suffix of `keys` that is a rule, falling back to the last
    /// key rendered as itself. Returns `None` only for empty input.
    pub fn longest_match_suffix(&self, keys: &[char]) -> Option<SuffixMatch> {
        let last = *keys.last()?;
        let is_final = !self.probe(keys).has_children();
        for start in 0..keys.len() {
            let suffix = &keys[start..];
            let Some(rule) = self.rule(suffix) else {
                continue;
            };
            if let Some(glyph) = rule.glyph_for(suffix[0]) {
                return Some(SuffixMatch {
                    len: suffix.len(),
                    glyph,
                    kind: rule.kind,
                    is_final,
                });
            }
        }
        Some(SuffixMatch {
            len: 1,
            glyph: last,
            kind: RuleKind::Identity,
            is_final,
        })
    }
}

fn single_kind(rule: &CompositionRule) -> RuleKind {
    let key = rule.sequence[0];
    let upper_is_key = match rule.upper {
        Some(u) => key.to_uppercase().eq(std::iter::once(u)),
        None => true,
    };
    if rule.lower == key && upper_is_key {
        RuleKind::Identity
    } else {
        RuleKind::SingleSubstitution
    }
}
