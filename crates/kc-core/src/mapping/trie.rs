use lexime_trie::{DoubleArray, TrieSearch};

use crate::unicode::fold_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrieLookupResult {
    None,
    Prefix,
    Exact(usize),
    ExactAndPrefix(usize),
}

impl TrieLookupResult {
    /// Rule index, if the sequence is itself a rule.
    pub fn rule(self) -> Option<usize> {
        match self {
            TrieLookupResult::Exact(id) | TrieLookupResult::ExactAndPrefix(id) => Some(id),
            _ => None,
        }
    }

    /// Whether some longer rule starts with the sequence.
    pub fn has_children(self) -> bool {
        matches!(
            self,
            TrieLookupResult::Prefix | TrieLookupResult::ExactAndPrefix(_)
        )
    }
}

/// Double-array trie over case-folded raw keys. Values are indices into the
/// owning table's rule list.
#[derive(Debug, Clone)]
pub struct KeyTrie {
    da: DoubleArray<char>,
    /// Rule index per trie value id.
    rules: Vec<usize>,
}

impl Default for KeyTrie {
    fn default() -> Self {
        Self::build(&[])
    }
}

impl KeyTrie {
    /// Build from `sequences[i]` carrying rule `i`. Sequences are folded and
    /// sorted here; when two fold to the same keys the later one wins.
    pub fn build(sequences: &[Vec<char>]) -> Self {
        let mut entries: Vec<(Vec<char>, usize)> = sequences
            .iter()
            .enumerate()
            .map(|(id, seq)| (fold_all(seq), id))
            .collect();
        // Stable sort keeps equal sequences in rule order; keep the last.
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries.reverse();
        entries.dedup_by(|later, earlier| later.0 == earlier.0);
        entries.reverse();

        let keys: Vec<&[char]> = entries.iter().map(|(seq, _)| seq.as_slice()).collect();
        let rules = entries.iter().map(|&(_, id)| id).collect();
        let da = DoubleArray::<char>::build(&keys);
        KeyTrie { da, rules }
    }

    /// Probe a raw key sequence. Keys are folded first.
    pub fn probe(&self, keys: &[char]) -> TrieLookupResult {
        let pr = self.da.probe(&fold_all(keys));
        match (pr.value, pr.has_children) {
            (None, false) => TrieLookupResult::None,
            (None, true) => TrieLookupResult::Prefix,
            (Some(id), false) => TrieLookupResult::Exact(self.rules[id as usize]),
            (Some(id), true) => TrieLookupResult::ExactAndPrefix(self.rules[id as usize]),
        }
    }
}

fn fold_all(keys: &[char]) -> Vec<char> {
    keys.iter().map(|&k| fold_key(k)).collect()
}
