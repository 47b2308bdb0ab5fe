//! Core domain entities, rules, and traits for SearchPlus.
//!
//! A [`CommandCatalog`] is the fixed, ordered list of settings screens the
//! search overlay knows about. Each [`Command`] carries the metadata used for
//! matching (name, breadcrumb path, [`KeywordIndex`]) and a [`Behavior`] that
//! reads and resets fields of an injected [`SettingsStore`].

use thiserror::Error;

mod behavior;
mod catalog;
mod command;
mod keywords;
mod section;
mod value;

pub use behavior::{Behavior, FieldDefaults};
pub use catalog::CommandCatalog;
pub use command::{Command, CommandBuilder, Detail, PATH_SEPARATOR};
pub use keywords::KeywordIndex;
pub use section::{Caption, Control, ControlTemplate, Section, SectionTemplate};
pub use value::{last_saved_key, SettingValue, SettingsStore, ToggleGroup, LAST_SAVED_PREFIX};

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors returned by core validation and domain rules.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Returned when a command or catalog definition is invalid.
    #[error("validation error: {0}")]
    Validation(String),
    /// Returned when two commands in one catalog share a name.
    #[error("duplicate command: {0}")]
    DuplicateCommand(String),
    /// Returned when a store has no field with the given name.
    #[error("unknown setting: {0}")]
    UnknownSetting(String),
    /// Returned when a value cannot be stored in a field of a different type.
    #[error("invalid {kind} value `{value}` for setting {field}")]
    InvalidValue {
        /// Field that rejected the value.
        field: String,
        /// The raw value as given.
        value: String,
        /// Type of the field, as named by [`SettingValue::kind`].
        kind: &'static str,
    },
    /// Returned when reading or decoding a catalog or config fails.
    #[error("storage error: {0}")]
    Storage(String),
    /// Returned when a shared helper fails.
    #[error(transparent)]
    Utils(#[from] sp_utils::UtilsError),
}
