/// Raw keys of one field not yet committed, and what is on screen for them.
///
/// `renders[i]` is the text shown for `raw[..=i]`; the last entry is the
/// text currently in the field for the whole buffer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct CompositionBuffer {
    language: Option<String>,
    raw: Vec<char>,
    renders: Vec<String>,
}

impl CompositionBuffer {
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Switch the active language; any pending keys are dropped.
    pub fn set_language(&mut self, language: Option<&str>) {
        if self.language.as_deref() != language {
            self.clear();
            self.language = language.map(str::to_string);
        }
    }

    pub fn raw(&self) -> &[char] {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Text currently shown for the whole buffer.
    pub fn rendered(&self) -> &str {
        self.renders.last().map_or("", String::as_str)
    }

    /// Number of glyphs on screen for the buffer.
    pub fn rendered_len(&self) -> usize {
        self.rendered().chars().count()
    }

    /// Text shown for the first `n` raw keys.
    pub fn rendered_prefix(&self, n: usize) -> &str {
        match n {
            0 => "",
            n => self.renders.get(n - 1).map_or("", String::as_str),
        }
    }

    pub fn push(&mut self, key: char, render: String) {
        self.raw.push(key);
        self.renders.push(render);
    }

    /// Drop pending keys. What is on screen stays as it is.
    pub fn clear(&mut self) {
        self.raw.clear();
        self.renders.clear();
    }

    /// Bookkeeping holds together: one render per key, a non-empty render
    /// for a non-empty buffer, and no more than `max_len` keys.
    pub fn is_consistent(&self, max_len: usize) -> bool {
        self.raw.len() == self.renders.len()
            && self.raw.len() <= max_len
            && (self.raw.is_empty() || self.rendered_len() >= 1)
    }
}
