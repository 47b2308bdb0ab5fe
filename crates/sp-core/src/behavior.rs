use std::collections::HashSet;
use std::fmt::Debug;

use crate::section::{Section, SectionTemplate};
use crate::value::{last_saved_key, SettingValue, SettingsStore};
use crate::{CoreError, CoreResult};

/// Store-bound behavior of a command.
///
/// Implementations must keep `reset` and `is_at_default` in agreement:
/// `is_at_default` returns `true` right after `reset`, whatever the store
/// held before.
pub trait Behavior: Debug + Send + Sync {
    /// Editable sections for the detail screen, filled from the store.
    fn sections(&self, store: &dyn SettingsStore) -> Vec<Section>;

    /// Restore this command's fields to their defaults.
    fn reset(&self, store: &mut dyn SettingsStore);

    /// Whether every field this command owns holds its default.
    fn is_at_default(&self, store: &dyn SettingsStore) -> bool;

    /// Called when the detail screen opens, before its sections are read.
    fn open(&self, _store: &mut dyn SettingsStore) {}

    /// Reject a value this command's screen cannot hold for `field`.
    /// Fields the command does not own are always accepted.
    fn check(&self, _field: &str, _value: &SettingValue) -> CoreResult<()> {
        Ok(())
    }

    /// Check the definition itself. Called once when the command is built.
    fn validate(&self) -> CoreResult<()> {
        Ok(())
    }
}

/// A behavior described by data: owned fields with their defaults, plus the
/// section layout that edits them.
///
/// Fields come in two kinds. A fixed field resets to its declared default.
/// A saved field resets to the value it had when the detail screen was last
/// opened (kept under [`last_saved_key`]); its declared value is only used
/// when the store has nothing yet. Either way `reset` writes exactly what
/// `is_at_default` compares.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldDefaults {
    defaults: Vec<(String, SettingValue)>,
    saved: Vec<(String, SettingValue)>,
    layout: Vec<SectionTemplate>,
}

impl FieldDefaults {
    /// A behavior that owns no fields and shows no sections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Own a field with a fixed default. Declaring the same field twice keeps
    /// the last default.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, default: SettingValue) -> Self {
        upsert(&mut self.defaults, name.into(), default);
        self
    }

    /// Own a field that resets to its last saved value. `initial` seeds an
    /// empty store.
    #[must_use]
    pub fn saved_field(mut self, name: impl Into<String>, initial: SettingValue) -> Self {
        upsert(&mut self.saved, name.into(), initial);
        self
    }

    /// Append a section to the detail layout.
    #[must_use]
    pub fn section(mut self, template: SectionTemplate) -> Self {
        self.layout.push(template);
        self
    }

    /// Fixed-default fields in declaration order.
    pub fn defaults(&self) -> &[(String, SettingValue)] {
        &self.defaults
    }

    /// Saved fields with their initial values, in declaration order.
    pub fn saved(&self) -> &[(String, SettingValue)] {
        &self.saved
    }

    /// Declared value of an owned field of either kind.
    pub fn default_of(&self, field: &str) -> Option<&SettingValue> {
        self.defaults
            .iter()
            .chain(&self.saved)
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }
}

fn upsert(fields: &mut Vec<(String, SettingValue)>, name: String, value: SettingValue) {
    match fields.iter_mut().find(|(existing, _)| *existing == name) {
        Some((_, slot)) => *slot = value,
        None => fields.push((name, value)),
    }
}

/// Value a saved field returns to: the snapshot, else whatever the store
/// holds, else the declared initial value.
fn revert_target<'a>(
    store: &'a dyn SettingsStore,
    field: &str,
    initial: &'a SettingValue,
) -> &'a SettingValue {
    store
        .get(&last_saved_key(field))
        .or_else(|| store.get(field))
        .unwrap_or(initial)
}

impl Behavior for FieldDefaults {
    fn sections(&self, store: &dyn SettingsStore) -> Vec<Section> {
        self.layout
            .iter()
            .map(|template| template.bind(|field| store.get(field).or_else(|| self.default_of(field))))
            .collect()
    }

    fn reset(&self, store: &mut dyn SettingsStore) {
        for (field, default) in &self.defaults {
            store.set(field, default.clone());
        }
        for (field, initial) in &self.saved {
            let target = revert_target(store, field, initial).clone();
            store.set(field, target);
        }
    }

    fn is_at_default(&self, store: &dyn SettingsStore) -> bool {
        let fixed = self
            .defaults
            .iter()
            .all(|(field, default)| store.get(field) == Some(default));
        let saved = self.saved.iter().all(|(field, _)| match store.get(field) {
            Some(current) => store
                .get(&last_saved_key(field))
                .map_or(true, |last| last == current),
            None => false,
        });
        fixed && saved
    }

    fn open(&self, store: &mut dyn SettingsStore) {
        for (field, initial) in &self.saved {
            let current = store.get(field).unwrap_or(initial).clone();
            store.set(field, current.clone());
            store.set(&last_saved_key(field), current);
        }
    }

    fn check(&self, field: &str, value: &SettingValue) -> CoreResult<()> {
        let rejected = self
            .layout
            .iter()
            .flat_map(|template| &template.controls)
            .any(|control| control.field() == Some(field) && !control.accepts(value));
        if rejected {
            return Err(CoreError::InvalidValue {
                field: field.to_string(),
                value: value.to_string(),
                kind: value.kind(),
            });
        }
        Ok(())
    }

    fn validate(&self) -> CoreResult<()> {
        let fixed: HashSet<&str> = self.defaults.iter().map(|(name, _)| name.as_str()).collect();
        for (name, _) in &self.saved {
            if fixed.contains(name.as_str()) {
                return Err(CoreError::Validation(format!(
                    "`{name}` is declared both as a fixed and as a saved field"
                )));
            }
        }
        for control in self.layout.iter().flat_map(|template| &template.controls) {
            if let Some(field) = control.field() {
                if self.default_of(field).is_none() {
                    return Err(CoreError::Validation(format!(
                        "control edits `{field}` but the command declares no default for it"
                    )));
                }
            }
        }
        Ok(())
    }
}
