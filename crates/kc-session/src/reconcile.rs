//! Maximal-munch reconciliation of a composition buffer after each key.

use tracing::debug;

use kc_core::mapping::MappingTable;

use super::buffer::CompositionBuffer;

/// What has to change on screen after one raw key was inserted literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Correction {
    /// Glyphs to erase from the end of the field.
    pub retract: usize,
    /// Glyphs to type after the erase.
    pub insert: String,
    /// The buffer was committed after this key.
    pub committed: bool,
}

impl Correction {
    /// Minimal edit from `shown` to `wanted`, keeping their common prefix.
    fn between(shown: &str, wanted: &str) -> Self {
        let common = shown
            .chars()
            .zip(wanted.chars())
            .take_while(|(a, b)| a == b)
            .count();
        Self {
            retract: shown.chars().count() - common,
            insert: wanted.chars().skip(common).collect(),
            committed: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.retract == 0 && self.insert.is_empty()
    }
}

/// Feed one raw key into `buffer`.
///
/// The key is assumed to be already shown literally after the buffer's
/// current rendering. Returns the edit that turns that into the best
/// rendering of the extended buffer.
pub(crate) fn reconcile(
    buffer: &mut CompositionBuffer,
    table: &MappingTable,
    key: char,
    max_len: usize,
) -> Correction {
    if !buffer.is_empty() {
        let mut candidate = buffer.raw().to_vec();
        candidate.push(key);
        if candidate.len() > max_len || !table.can_extend(&candidate) {
            debug!(raw = ?buffer.raw(), rendered = buffer.rendered(), "commit before key");
            buffer.clear();
        }
    }

    let shown = format!("{}{key}", buffer.rendered());

    let mut keys = buffer.raw().to_vec();
    keys.push(key);
    let Some(m) = table.longest_match_suffix(&keys) else {
        return Correction::between(&shown, &shown);
    };
    let wanted = format!("{}{}", buffer.rendered_prefix(keys.len() - m.len), m.glyph);

    let mut correction = Correction::between(&shown, &wanted);
    buffer.push(key, wanted);

    if m.is_final || buffer.len() >= max_len {
        debug!(raw = ?buffer.raw(), rendered = buffer.rendered(), kind = m.kind.as_str(), "commit");
        buffer.clear();
        correction.committed = true;
    }
    correction
}

#[cfg(test)]
mod tests {
    use super::*;
    use kc_core::profile::ProfileSet;

    /// Run keys through a fresh buffer, applying each literal key and its
    /// correction to a plain string.
    fn run(code: &str, keys: &str) -> (String, Vec<Correction>) {
        let profiles = ProfileSet::builtin();
        let table = profiles.get(code).unwrap().table();
        let mut buffer = CompositionBuffer::default();
        let mut value = String::new();
        let mut corrections = Vec::new();
        for key in keys.chars() {
            value.push(key);
            let c = reconcile(&mut buffer, table, key, 4);
            for _ in 0..c.retract {
                value.pop();
            }
            value.push_str(&c.insert);
            corrections.push(c);
        }
        (value, corrections)
    }

    fn shape(corrections: &[Correction]) -> Vec<(usize, usize)> {
        corrections
            .iter()
            .map(|c| (c.retract, c.insert.chars().count()))
            .collect()
    }

    #[test]
    fn test_between() {
        let c = Correction::between("шсh", "щ");
        assert_eq!((c.retract, c.insert.as_str()), (3, "щ"));
        let c = Correction::between("шc", "шс");
        assert_eq!((c.retract, c.insert.as_str()), (1, "с"));
        assert!(Correction::between("s", "s").is_empty());
    }

    #[test]
    fn test_single_substitution() {
        let (value, cs) = run("ru", "a");
        assert_eq!(value, "а");
        assert_eq!(shape(&cs), [(1, 1)]);
        assert!(cs[0].committed);
    }

    #[test]
    fn test_prefix_pair() {
        let (value, cs) = run("ru", "ya");
        assert_eq!(value, "я");
        assert_eq!(shape(&cs), [(0, 0), (2, 1)]);
        assert!(!cs[0].committed);
        assert!(cs[1].committed);
    }

    #[test]
    fn test_suffix_pair() {
        let (value, cs) = run("ru", "TS");
        assert_eq!(value, "Ц");
        assert_eq!(shape(&cs), [(1, 1), (2, 1)]);
    }

    #[test]
    fn test_quad_progression() {
        let (value, cs) = run("ru", "shch");
        assert_eq!(value, "щ");
        assert_eq!(shape(&cs), [(0, 0), (2, 1), (1, 1), (3, 1)]);
        assert!(cs[3].committed);
    }

    #[test]
    fn test_commit_when_key_cannot_extend() {
        // "t" waits for "s"; a second "t" commits the first.
        let (value, cs) = run("ru", "tt");
        assert_eq!(value, "тт");
        assert_eq!(shape(&cs), [(1, 1), (1, 1)]);
        assert!(!cs[0].committed);
        assert!(!cs[1].committed);

        // "sh" waits for "ch"; "t" commits "ш".
        let (value, _) = run("ru", "sht");
        assert_eq!(value, "шт");
    }

    #[test]
    fn test_unmapped_key_commits_immediately() {
        let (value, cs) = run("ru", "h");
        assert_eq!(value, "h");
        assert!(cs[0].is_empty());
        assert!(cs[0].committed);
    }

    #[test]
    fn test_identity_profile() {
        let (value, cs) = run("de", "aäß");
        assert_eq!(value, "aäß");
        assert!(cs.iter().all(|c| c.is_empty() && c.committed));
    }

    #[test]
    fn test_final_sigma() {
        let (value, _) = run("el", "ssc");
        assert_eq!(value, "σς");
        let (value, cs) = run("el", "Sc");
        assert_eq!(value, "Σc");
        assert!(cs[1].is_empty());
        assert!(cs[1].committed);
    }

    #[test]
    fn test_max_len_caps_buffer() {
        let profiles = ProfileSet::builtin();
        let table = profiles.get("ru").unwrap().table();
        let mut buffer = CompositionBuffer::default();
        let c = reconcile(&mut buffer, table, 's', 1);
        assert!(c.committed);
        assert!(buffer.is_empty());
    }
}
