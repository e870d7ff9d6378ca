//! Active-language resolution and the override protocol.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::types::FieldId;
use super::Compositor;

/// Language overrides keyed by field id.
///
/// Holds ids only; the compositor drops an entry when its field detaches.
#[derive(Debug, Default)]
pub struct OverrideStore {
    entries: HashMap<FieldId, String>,
}

impl OverrideStore {
    pub fn get(&self, field: FieldId) -> Option<&str> {
        self.entries.get(&field).map(String::as_str)
    }

    pub fn set(&mut self, field: FieldId, lang: &str) {
        self.entries.insert(field, lang.to_string());
    }

    pub fn remove(&mut self, field: FieldId) -> Option<String> {
        self.entries.remove(&field)
    }

    pub(crate) fn forget(&mut self, field: FieldId) {
        self.entries.remove(&field);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Override, else static default. Empty tags count as unset.
pub(crate) fn resolve<'a>(
    overrides: &'a OverrideStore,
    field: FieldId,
    default_lang: Option<&'a str>,
) -> Option<&'a str> {
    overrides
        .get(field)
        .filter(|l| !l.is_empty())
        .or(default_lang.filter(|l| !l.is_empty()))
}

/// Override protocol message, as sent over the host's message bus:
/// `{"command": "SET_LANG", "lang": "ru"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    GetLang,
    SetLang { lang: String },
    RemoveLang,
}

/// `GET_LANG` reply: `[staticDefault, override]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LangReport(pub Option<String>, pub Option<String>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CommandResponse {
    Lang(LangReport),
    Ack,
}

impl Compositor {
    /// Active language of a field, if any.
    pub fn resolve(&self, field: FieldId) -> Option<&str> {
        let state = self.fields.get(&field)?;
        resolve(&self.overrides, field, state.default_lang.as_deref())
    }

    pub fn overrides(&self) -> &OverrideStore {
        &self.overrides
    }

    /// Run an override command against `target`, or the focused field when
    /// no target is given. Unknown fields get a no-op acknowledgement.
    pub fn handle_command(
        &mut self,
        target: Option<FieldId>,
        command: Command,
    ) -> CommandResponse {
        let target_field = target.or(self.focused);
        let Some(field) = target_field.filter(|f| self.fields.contains_key(f)) else {
            warn!(?target, ?command, "command for unknown field ignored");
            return CommandResponse::Ack;
        };
        debug!(field = %field, ?command, "command");

        match command {
            Command::GetLang => {
                let default = self
                    .fields
                    .get(&field)
                    .and_then(|s| s.default_lang.clone());
                let current = self.overrides.get(field).map(str::to_string);
                CommandResponse::Lang(LangReport(default, current))
            }
            Command::SetLang { lang } => {
                self.overrides.set(field, &lang);
                self.reset_field(field, "language override set");
                CommandResponse::Ack
            }
            Command::RemoveLang => {
                self.overrides.remove(field);
                self.reset_field(field, "language override removed");
                CommandResponse::Ack
            }
        }
    }
}
