use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::value::{last_saved_key, SettingValue, ToggleGroup};

/// Placeholder replaced by the field's current value in [`Caption::WhenEdited`].
const VALUE_PLACEHOLDER: &str = "{value}";

/// One group of editable rows on a command's detail screen.
///
/// `content` is passed through to the renderer untouched. Header and footer
/// are already rendered against the store; spacing between adjacent sections
/// is up to the renderer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Section {
    pub content: Vec<Control>,
    pub header: String,
    pub footer: String,
}

/// A row on a detail screen, carrying the current value of its field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Control {
    Toggle {
        label: String,
        field: String,
        on: bool,
    },
    Picker {
        label: String,
        field: String,
        options: Vec<String>,
        selected: String,
    },
    Stepper {
        label: String,
        field: String,
        min: i64,
        max: i64,
        value: i64,
    },
    TextField {
        label: String,
        field: String,
        text: String,
    },
    ToggleGroup {
        label: String,
        field: String,
        flags: ToggleGroup,
    },
    Note {
        text: String,
    },
}

/// Header or footer text of a section.
///
/// In YAML a plain string is [`Caption::Text`]; a map with `field`, `saved`
/// and `edited` keys is [`Caption::WhenEdited`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Caption {
    /// Fixed text.
    Text(String),
    /// `saved` while `field` equals its last saved value, `edited` once it
    /// differs. `{value}` in `edited` is replaced by the current value.
    WhenEdited {
        field: String,
        saved: String,
        edited: String,
    },
}

impl Caption {
    /// Caption that switches text once `field` is edited.
    pub fn when_edited(
        field: impl Into<String>,
        saved: impl Into<String>,
        edited: impl Into<String>,
    ) -> Self {
        Self::WhenEdited {
            field: field.into(),
            saved: saved.into(),
            edited: edited.into(),
        }
    }

    /// Render against current values. Without a saved value the field
    /// counts as unedited.
    fn render<'a>(&self, lookup: &impl Fn(&str) -> Option<&'a SettingValue>) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::WhenEdited {
                field,
                saved,
                edited,
            } => {
                let current = lookup(field.as_str());
                match lookup(last_saved_key(field).as_str()) {
                    Some(last) if current != Some(last) => {
                        let value = current.map(ToString::to_string).unwrap_or_default();
                        edited.replace(VALUE_PLACEHOLDER, &value)
                    }
                    _ => saved.clone(),
                }
            }
        }
    }
}

impl Default for Caption {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for Caption {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Caption {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Declarative layout of a section, bound to store values on demand.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct SectionTemplate {
    #[serde(default)]
    pub header: Caption,
    #[serde(default)]
    pub footer: Caption,
    #[serde(default)]
    pub controls: Vec<ControlTemplate>,
}

impl SectionTemplate {
    /// An empty section with no header, footer or rows.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn header(mut self, header: impl Into<Caption>) -> Self {
        self.header = header.into();
        self
    }

    #[must_use]
    pub fn footer(mut self, footer: impl Into<Caption>) -> Self {
        self.footer = footer.into();
        self
    }

    /// Append a row.
    #[must_use]
    pub fn control(mut self, control: ControlTemplate) -> Self {
        self.controls.push(control);
        self
    }

    /// Fill in current values. `lookup` resolves a store key to its value.
    pub(crate) fn bind<'a>(&self, lookup: impl Fn(&str) -> Option<&'a SettingValue>) -> Section {
        Section {
            content: self
                .controls
                .iter()
                .map(|control| control.bind(control.field().and_then(&lookup)))
                .collect(),
            header: self.header.render(&lookup),
            footer: self.footer.render(&lookup),
        }
    }
}

/// Declarative layout of one row.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlTemplate {
    Toggle {
        label: String,
        field: String,
    },
    Picker {
        label: String,
        field: String,
        options: Vec<String>,
    },
    Stepper {
        label: String,
        field: String,
        min: i64,
        max: i64,
    },
    TextField {
        label: String,
        field: String,
    },
    ToggleGroup {
        label: String,
        field: String,
    },
    Note {
        text: String,
    },
}

impl ControlTemplate {
    pub fn toggle(label: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Toggle {
            label: label.into(),
            field: field.into(),
        }
    }

    pub fn picker<I, S>(label: impl Into<String>, field: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Picker {
            label: label.into(),
            field: field.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    pub fn stepper(
        label: impl Into<String>,
        field: impl Into<String>,
        range: RangeInclusive<i64>,
    ) -> Self {
        Self::Stepper {
            label: label.into(),
            field: field.into(),
            min: *range.start(),
            max: *range.end(),
        }
    }

    pub fn text_field(label: impl Into<String>, field: impl Into<String>) -> Self {
        Self::TextField {
            label: label.into(),
            field: field.into(),
        }
    }

    pub fn toggle_group(label: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ToggleGroup {
            label: label.into(),
            field: field.into(),
        }
    }

    pub fn note(text: impl Into<String>) -> Self {
        Self::Note { text: text.into() }
    }

    /// The store field this row edits, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Toggle { field, .. }
            | Self::Picker { field, .. }
            | Self::Stepper { field, .. }
            | Self::TextField { field, .. }
            | Self::ToggleGroup { field, .. } => Some(field),
            Self::Note { .. } => None,
        }
    }

    /// Whether this row can display `value`: steppers need a number within
    /// their range, pickers one of their options. Other rows take anything.
    pub fn accepts(&self, value: &SettingValue) -> bool {
        match self {
            Self::Stepper { min, max, .. } => value
                .as_int()
                .is_some_and(|value| (*min..=*max).contains(&value)),
            Self::Picker { options, .. } => value
                .as_text()
                .is_some_and(|text| options.iter().any(|option| option == text)),
            _ => true,
        }
    }

    /// A value of the wrong kind, or none at all, renders as the zero value.
    fn bind(&self, value: Option<&SettingValue>) -> Control {
        match self {
            Self::Toggle { label, field } => Control::Toggle {
                label: label.clone(),
                field: field.clone(),
                on: value.and_then(SettingValue::as_bool).unwrap_or_default(),
            },
            Self::Picker {
                label,
                field,
                options,
            } => Control::Picker {
                label: label.clone(),
                field: field.clone(),
                options: options.clone(),
                selected: value
                    .and_then(SettingValue::as_text)
                    .unwrap_or_default()
                    .to_string(),
            },
            Self::Stepper {
                label,
                field,
                min,
                max,
            } => Control::Stepper {
                label: label.clone(),
                field: field.clone(),
                min: *min,
                max: *max,
                value: value.and_then(SettingValue::as_int).unwrap_or(*min),
            },
            Self::TextField { label, field } => Control::TextField {
                label: label.clone(),
                field: field.clone(),
                text: value
                    .and_then(SettingValue::as_text)
                    .unwrap_or_default()
                    .to_string(),
            },
            Self::ToggleGroup { label, field } => Control::ToggleGroup {
                label: label.clone(),
                field: field.clone(),
                flags: value
                    .and_then(SettingValue::as_toggles)
                    .cloned()
                    .unwrap_or_default(),
            },
            Self::Note { text } => Control::Note { text: text.clone() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_reads_current_values() {
        let template = SectionTemplate::new()
            .header("Account")
            .control(ControlTemplate::toggle("Private Account", "private_account"))
            .control(ControlTemplate::note("Only followers see your posts."));
        let value = SettingValue::Bool(true);

        let section = template.bind(|field| (field == "private_account").then_some(&value));

        assert_eq!(section.header, "Account");
        assert_eq!(section.footer, "");
        assert_eq!(
            section.content,
            vec![
                Control::Toggle {
                    label: "Private Account".into(),
                    field: "private_account".into(),
                    on: true,
                },
                Control::Note {
                    text: "Only followers see your posts.".into(),
                },
            ]
        );
    }

    #[test]
    fn missing_or_mistyped_values_render_as_zero() {
        let template = SectionTemplate::new()
            .control(ControlTemplate::stepper("Text Size", "text_size", 1..=7))
            .control(ControlTemplate::text_field("Bio", "bio"));
        let wrong = SettingValue::Bool(true);

        let section = template.bind(|_| Some(&wrong));

        assert!(matches!(section.content[0], Control::Stepper { value: 1, .. }));
        assert!(matches!(&section.content[1], Control::TextField { text, .. } if text.is_empty()));
    }

    #[test]
    fn edited_caption_follows_the_saved_value() {
        let template = SectionTemplate::new()
            .control(ControlTemplate::text_field("Username", "username"))
            .footer(Caption::when_edited(
                "username",
                "You can only edit your username once every 14 days.",
                "Next time, log in as \"{value}\".",
            ));
        let saved = SettingValue::Text("john".into());
        let edited = SettingValue::Text("jane".into());

        let unchanged = template.bind(|field| match field {
            "username" | "last_saved.username" => Some(&saved),
            _ => None,
        });
        assert_eq!(unchanged.footer, "You can only edit your username once every 14 days.");

        let changed = template.bind(|field| match field {
            "username" => Some(&edited),
            "last_saved.username" => Some(&saved),
            _ => None,
        });
        assert_eq!(changed.footer, "Next time, log in as \"jane\".");

        let never_opened = template.bind(|field| (field == "username").then_some(&edited));
        assert_eq!(never_opened.footer, "You can only edit your username once every 14 days.");
    }

    #[test]
    fn captions_read_from_yaml_strings_or_maps() {
        let fixed: Caption = serde_yaml::from_str("\"Posts\"").unwrap();
        assert_eq!(fixed, Caption::from("Posts"));

        let edited: Caption =
            serde_yaml::from_str("{ field: bio, saved: Saved, edited: \"Now {value}\" }").unwrap();
        assert_eq!(edited, Caption::when_edited("bio", "Saved", "Now {value}"));
    }

    #[test]
    fn steppers_and_pickers_limit_accepted_values() {
        let stepper = ControlTemplate::stepper("Minutes", "daily_limit", 0..=240);
        assert!(stepper.accepts(&SettingValue::Int(240)));
        assert!(!stepper.accepts(&SettingValue::Int(241)));
        assert!(!stepper.accepts(&SettingValue::Text("5".into())));

        let picker = ControlTemplate::picker("Comments", "allow_comments", ["Everyone", "No One"]);
        assert!(picker.accepts(&SettingValue::Text("No One".into())));
        assert!(!picker.accepts(&SettingValue::Text("Nobody".into())));

        assert!(ControlTemplate::text_field("Bio", "bio").accepts(&SettingValue::Int(1)));
    }

    #[test]
    fn only_notes_have_no_field() {
        assert_eq!(ControlTemplate::note("hi").field(), None);
        assert_eq!(
            ControlTemplate::picker("Theme", "appearance", ["light", "dark"]).field(),
            Some("appearance")
        );
    }
}
