use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single settings value.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SettingValue {
    /// On/off switch.
    Bool(bool),
    /// Numeric value, such as a stepper position.
    Int(i64),
    /// Free text or a picker selection.
    Text(String),
    /// A record of named switches compared field by field.
    Toggles(ToggleGroup),
}

impl SettingValue {
    /// Human-readable type name, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Text(_) => "text",
            Self::Toggles(_) => "toggles",
        }
    }

    /// The value as a switch, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The value as a number, if it is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// The value as text, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// The value as a toggle group, if it is one.
    pub fn as_toggles(&self) -> Option<&ToggleGroup> {
        match self {
            Self::Toggles(value) => Some(value),
            _ => None,
        }
    }

    /// Parse `raw` into a value of the same type as `self`.
    ///
    /// Returns `None` when `raw` does not fit, and always for toggle groups,
    /// which are assigned one member at a time.
    pub fn parse_same_kind(&self, raw: &str) -> Option<Self> {
        match self {
            Self::Bool(_) => parse_bool(raw).map(Self::Bool),
            Self::Int(_) => raw.parse().ok().map(Self::Int),
            Self::Text(_) => Some(Self::Text(raw.to_string())),
            Self::Toggles(_) => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("on"),
            Self::Bool(false) => f.write_str("off"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::Toggles(group) => write!(f, "{group}"),
        }
    }
}

/// Parse the switch spellings accepted on the command line.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Named boolean flags that form one setting, e.g. the delivery channels of a
/// notification type.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ToggleGroup {
    flags: BTreeMap<String, bool>,
}

impl ToggleGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a flag, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, on: bool) -> Self {
        self.flags.insert(name.into(), on);
        self
    }

    /// Current state of a flag, if the group has it.
    pub fn get(&self, name: &str) -> Option<bool> {
        self.flags.get(name).copied()
    }

    /// Update an existing flag. Returns `false` if the group has no such flag.
    pub fn set(&mut self, name: &str, on: bool) -> bool {
        match self.flags.get_mut(name) {
            Some(flag) => {
                *flag = on;
                true
            }
            None => false,
        }
    }

    /// Iterate flags in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(name, on)| (name.as_str(), *on))
    }

    /// Number of flags.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether the group has no flags.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl fmt::Display for ToggleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, on) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{name}={}", if on { "on" } else { "off" })?;
        }
        Ok(())
    }
}

/// Prefix of the store entries that hold a field's last saved value.
pub const LAST_SAVED_PREFIX: &str = "last_saved.";

/// Store key holding the value `field` had when its screen was last opened.
pub fn last_saved_key(field: &str) -> String {
    format!("{LAST_SAVED_PREFIX}{field}")
}

/// The mutable settings a command reads and resets.
///
/// Writes must be visible to the next read on the same store.
pub trait SettingsStore {
    /// Current value of a field, if the store has it.
    fn get(&self, field: &str) -> Option<&SettingValue>;
    /// Overwrite a field.
    fn set(&mut self, field: &str, value: SettingValue);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_groups_compare_field_by_field() {
        let a = ToggleGroup::new().with("push", true).with("email", false);
        let b = ToggleGroup::new().with("email", false).with("push", true);
        assert_eq!(a, b);

        let mut c = b.clone();
        assert!(c.set("email", true));
        assert_ne!(a, c);
    }

    #[test]
    fn setting_unknown_flag_is_rejected() {
        let mut group = ToggleGroup::new().with("push", true);
        assert!(!group.set("sms", true));
        assert_eq!(group.get("sms"), None);
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn parse_follows_existing_kind() {
        let flag = SettingValue::Bool(false);
        assert_eq!(flag.parse_same_kind("on"), Some(SettingValue::Bool(true)));
        assert_eq!(flag.parse_same_kind("maybe"), None);

        let size = SettingValue::Int(2);
        assert_eq!(size.parse_same_kind("4"), Some(SettingValue::Int(4)));
        assert_eq!(size.parse_same_kind("big"), None);

        let text = SettingValue::Text(String::new());
        assert_eq!(
            text.parse_same_kind("42"),
            Some(SettingValue::Text("42".into()))
        );

        let group = SettingValue::Toggles(ToggleGroup::new());
        assert_eq!(group.parse_same_kind("on"), None);
    }

    #[test]
    fn display_is_compact() {
        let group = ToggleGroup::new().with("push", true).with("email", false);
        assert_eq!(SettingValue::Toggles(group).to_string(), "email=off, push=on");
        assert_eq!(SettingValue::Bool(true).to_string(), "on");
        assert_eq!(SettingValue::Int(3).to_string(), "3");
    }

    #[test]
    fn kind_names_the_variant() {
        assert_eq!(SettingValue::Bool(true).kind(), "bool");
        assert_eq!(SettingValue::Int(1).kind(), "int");
        assert_eq!(SettingValue::Text(String::new()).kind(), "text");
        assert_eq!(SettingValue::Toggles(ToggleGroup::new()).kind(), "toggles");
    }

    #[test]
    fn last_saved_keys_are_namespaced() {
        assert_eq!(last_saved_key("username"), "last_saved.username");
        assert!(last_saved_key("bio").starts_with(LAST_SAVED_PREFIX));
    }
}
