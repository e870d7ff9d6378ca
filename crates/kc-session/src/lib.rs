//! Per-field composition engine.
//!
//! `Compositor` owns every attached field's state and processes each raw
//! keystroke, returning the events the host must dispatch to the field so
//! that it shows the composed text.

pub(crate) mod types;

mod buffer;
mod focus;
mod key_handlers;
mod reconcile;
mod resolver;
mod synth;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use kc_core::profile::ProfileSet;
use kc_core::settings::{settings, Settings};

pub use resolver::{Command, CommandResponse, LangReport, OverrideStore};
pub use types::{
    FieldEvent, FieldId, InputType, Key, KeyEvent, KeyEventKind, KeyResponse, Modifiers,
};

use buffer::CompositionBuffer;

/// Runtime switches taken from `Settings`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeConfig {
    pub max_sequence_len: usize,
    pub bypass_alt: bool,
    pub bypass_ctrl: bool,
    pub bypass_meta: bool,
    pub refocus_on_enter: bool,
}

impl ComposeConfig {
    pub fn from_settings(s: &Settings) -> Self {
        Self {
            max_sequence_len: s.composition.max_sequence_len,
            bypass_alt: s.input.bypass_alt,
            bypass_ctrl: s.input.bypass_ctrl,
            bypass_meta: s.input.bypass_meta,
            refocus_on_enter: s.focus.refocus_on_enter,
        }
    }

    /// Whether a keystroke with these modifiers must not be composed.
    pub fn bypasses(&self, m: Modifiers) -> bool {
        (m.alt && self.bypass_alt) || (m.ctrl && self.bypass_ctrl) || (m.meta && self.bypass_meta)
    }
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self::from_settings(settings())
    }
}

/// Registry entry for one attached field.
#[derive(Debug, Default)]
pub(crate) struct FieldState {
    /// Static language tag read when the field was attached.
    default_lang: Option<String>,
    buffer: CompositionBuffer,
    /// Keys whose press was consumed; their release is swallowed.
    held: Vec<Key>,
}

const MAX_HELD_KEYS: usize = 16;

impl FieldState {
    /// Auto-repeat sends many presses and one release, so a key is held once.
    fn hold(&mut self, key: Key) {
        if self.held.iter().any(|k| k.releases(key)) {
            return;
        }
        if self.held.len() >= MAX_HELD_KEYS {
            self.held.remove(0);
        }
        self.held.push(key);
    }

    fn release(&mut self, key: Key) -> bool {
        match self.held.iter().position(|k| k.releases(key)) {
            Some(i) => {
                self.held.remove(i);
                true
            }
            None => false,
        }
    }
}

/// Composition engine for every field of one host.
pub struct Compositor {
    profiles: Arc<ProfileSet>,
    pub(crate) config: ComposeConfig,
    fields: HashMap<FieldId, FieldState>,
    overrides: OverrideStore,
    focused: Option<FieldId>,
    next_id: u64,
}

impl Compositor {
    pub fn new(profiles: Arc<ProfileSet>) -> Self {
        Self::with_config(profiles, ComposeConfig::default())
    }

    pub fn with_config(profiles: Arc<ProfileSet>, config: ComposeConfig) -> Self {
        Self {
            profiles,
            config,
            fields: HashMap::new(),
            overrides: OverrideStore::default(),
            focused: None,
            next_id: 1,
        }
    }

    pub fn config(&self) -> &ComposeConfig {
        &self.config
    }

    pub fn profiles(&self) -> &ProfileSet {
        &self.profiles
    }

    /// Register a field with its static language tag.
    pub fn attach_field(&mut self, default_lang: Option<&str>) -> FieldId {
        let id = FieldId(self.next_id);
        self.next_id += 1;
        self.fields.insert(
            id,
            FieldState {
                default_lang: default_lang.map(str::to_string),
                ..FieldState::default()
            },
        );
        debug!(field = %id, lang = ?default_lang, "attach");
        id
    }

    /// Forget a field, its composition state and its override.
    pub fn detach_field(&mut self, field: FieldId) -> bool {
        self.overrides.forget(field);
        if self.focused == Some(field) {
            self.focused = None;
        }
        let removed = self.fields.remove(&field).is_some();
        debug!(field = %field, removed, "detach");
        removed
    }

    pub fn is_attached(&self, field: FieldId) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// The field's value was cleared or replaced by the page.
    pub fn notify_value_cleared(&mut self, field: FieldId) {
        self.reset_field(field, "value cleared");
    }

    /// The caret moved without typing (click, arrow keys handled by host).
    pub fn notify_caret_moved(&mut self, field: FieldId) {
        self.reset_field(field, "caret moved");
    }

    /// Raw keys pending in the field's buffer.
    pub fn pending_keys(&self, field: FieldId) -> Option<String> {
        self.fields
            .get(&field)
            .map(|f| f.buffer.raw().iter().collect())
    }

    /// Glyphs on screen for the field's pending keys.
    pub fn pending_rendered_len(&self, field: FieldId) -> usize {
        self.fields
            .get(&field)
            .map_or(0, |f| f.buffer.rendered_len())
    }

    pub(crate) fn reset_field(&mut self, field: FieldId, reason: &str) {
        if let Some(state) = self.fields.get_mut(&field) {
            if !state.buffer.is_empty() {
                debug!(field = %field, reason, "reset composition");
            }
            state.buffer.clear();
        }
    }
}
