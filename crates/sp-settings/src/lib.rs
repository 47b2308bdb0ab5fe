//! In-memory settings store and the built-in command catalog for SearchPlus.

use std::collections::BTreeMap;

use log::debug;
use sp_core::{CommandCatalog, CoreError, CoreResult, SettingValue, SettingsStore};
use sp_utils::split_assignment;

mod catalog;

pub use catalog::{builtin_catalog, fields};

/// A settings store backed by a sorted map of field name to value.
///
/// Created by the application at startup and passed to every consumer;
/// there is no process-wide instance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    values: BTreeMap<String, SettingValue>,
}

impl Settings {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the default of every field the catalog owns.
    pub fn from_catalog(catalog: &CommandCatalog) -> Self {
        let mut settings = Self::new();
        catalog.reset_all(&mut settings);
        settings
    }

    /// Apply a `field=value` or `group.member=value` assignment.
    ///
    /// The value is parsed according to the type the field already holds, so
    /// only known fields can be assigned. The catalog then gets to reject
    /// values its screens cannot show, such as a stepper value out of range.
    /// The store is unchanged on error.
    pub fn assign(&mut self, catalog: &CommandCatalog, assignment: &str) -> CoreResult<()> {
        let (key, raw) = split_assignment(assignment)?;
        let (field, value) = self.parse(key, raw)?;
        catalog.check(field, &value)?;
        debug!("assigning {field} = {value}");
        self.values.insert(field.to_string(), value);
        Ok(())
    }

    /// Resolve `key` to the field it changes and that field's new value.
    fn parse<'k>(&self, key: &'k str, raw: &str) -> CoreResult<(&'k str, SettingValue)> {
        if let Some(current) = self.values.get(key) {
            let value = current
                .parse_same_kind(raw)
                .ok_or_else(|| invalid_value(key, raw, current.kind()))?;
            return Ok((key, value));
        }

        let Some((group, member)) = key.split_once('.') else {
            return Err(CoreError::UnknownSetting(key.to_string()));
        };
        let Some(SettingValue::Toggles(flags)) = self.values.get(group) else {
            return Err(CoreError::UnknownSetting(key.to_string()));
        };
        let on = SettingValue::Bool(false)
            .parse_same_kind(raw)
            .and_then(|value| value.as_bool())
            .ok_or_else(|| invalid_value(key, raw, "bool"))?;
        let mut flags = flags.clone();
        if !flags.set(member, on) {
            return Err(CoreError::UnknownSetting(key.to_string()));
        }
        Ok((group, SettingValue::Toggles(flags)))
    }

    /// Iterate fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl SettingsStore for Settings {
    fn get(&self, field: &str) -> Option<&SettingValue> {
        self.values.get(field)
    }

    fn set(&mut self, field: &str, value: SettingValue) {
        self.values.insert(field.to_string(), value);
    }
}

fn invalid_value(field: &str, value: &str, kind: &'static str) -> CoreError {
    CoreError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        kind,
    }
}

#[cfg(test)]
mod tests {
    use sp_core::{Command, ControlTemplate, FieldDefaults, SectionTemplate, ToggleGroup};

    use super::*;

    fn sample() -> Settings {
        let mut settings = Settings::new();
        settings.set("dark_mode", SettingValue::Bool(false));
        settings.set("text_size", SettingValue::Int(3));
        settings.set("username", SettingValue::Text(String::new()));
        settings.set(
            "likes",
            SettingValue::Toggles(ToggleGroup::new().with("push", true).with("email", false)),
        );
        settings
    }

    fn no_screens() -> CommandCatalog {
        CommandCatalog::default()
    }

    fn display_catalog() -> CommandCatalog {
        CommandCatalog::new(vec![Command::builder("Display")
            .behavior(
                FieldDefaults::new()
                    .field("text_size", SettingValue::Int(3))
                    .field("appearance", SettingValue::Text("System".into()))
                    .section(
                        SectionTemplate::new()
                            .control(ControlTemplate::stepper("Text Size", "text_size", 1..=7))
                            .control(ControlTemplate::picker(
                                "Appearance",
                                "appearance",
                                ["Light", "Dark", "System"],
                            )),
                    ),
            )
            .build()
            .unwrap()])
        .unwrap()
    }

    #[test]
    fn writes_are_visible_to_next_read() {
        let mut settings = Settings::new();
        assert_eq!(settings.get("dark_mode"), None);
        settings.set("dark_mode", SettingValue::Bool(true));
        assert_eq!(settings.get("dark_mode"), Some(&SettingValue::Bool(true)));
    }

    #[test]
    fn assign_parses_by_existing_type() {
        let mut settings = sample();
        settings.assign(&no_screens(), "dark_mode=on").unwrap();
        settings.assign(&no_screens(), "text_size = 5").unwrap();
        settings.assign(&no_screens(), "username=sam").unwrap();

        assert_eq!(settings.get("dark_mode"), Some(&SettingValue::Bool(true)));
        assert_eq!(settings.get("text_size"), Some(&SettingValue::Int(5)));
        assert_eq!(settings.get("username"), Some(&SettingValue::Text("sam".into())));
    }

    #[test]
    fn assign_updates_one_group_member() {
        let mut settings = sample();
        settings.assign(&no_screens(), "likes.email=true").unwrap();
        let likes = settings.get("likes").and_then(SettingValue::as_toggles).unwrap();
        assert_eq!(likes.get("email"), Some(true));
        assert_eq!(likes.get("push"), Some(true));
    }

    #[test]
    fn assign_rejects_unknown_fields_and_bad_values() {
        let mut settings = sample();
        let catalog = no_screens();
        assert!(matches!(settings.assign(&catalog, "volume=3"), Err(CoreError::UnknownSetting(_))));
        assert!(matches!(settings.assign(&catalog, "likes.sms=on"), Err(CoreError::UnknownSetting(_))));
        assert!(matches!(settings.assign(&catalog, "dark_mode.x=on"), Err(CoreError::UnknownSetting(_))));
        assert!(matches!(
            settings.assign(&catalog, "text_size=huge"),
            Err(CoreError::InvalidValue { field, kind: "int", .. }) if field == "text_size"
        ));
        assert!(matches!(
            settings.assign(&catalog, "likes=on"),
            Err(CoreError::InvalidValue { kind: "toggles", .. })
        ));
        assert!(matches!(settings.assign(&catalog, "dark_mode"), Err(CoreError::Utils(_))));
        assert_eq!(settings, sample());
    }

    #[test]
    fn assign_respects_control_limits() {
        let catalog = display_catalog();
        let mut settings = Settings::from_catalog(&catalog);
        let before = settings.clone();

        let err = settings.assign(&catalog, "text_size=99").unwrap_err();
        assert!(err.to_string().contains("int"));
        assert!(matches!(settings.assign(&catalog, "text_size=0"), Err(CoreError::InvalidValue { .. })));
        assert!(matches!(
            settings.assign(&catalog, "appearance=Sepia"),
            Err(CoreError::InvalidValue { .. })
        ));
        assert_eq!(settings, before);

        settings.assign(&catalog, "text_size=7").unwrap();
        settings.assign(&catalog, "appearance=Dark").unwrap();
        assert_eq!(settings.get("text_size"), Some(&SettingValue::Int(7)));
    }

    #[test]
    fn iter_walks_fields_in_name_order() {
        let names: Vec<_> = sample().iter().map(|(name, _)| name.to_string()).collect();
        assert_eq!(names, vec!["dark_mode", "likes", "text_size", "username"]);
    }
}
