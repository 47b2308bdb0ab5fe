use log::debug;
use sp_utils::lowercase_words;

use crate::behavior::{Behavior, FieldDefaults};
use crate::keywords::KeywordIndex;
use crate::section::Section;
use crate::value::{SettingValue, SettingsStore};
use crate::{CoreError, CoreResult};

/// Separator between breadcrumb segments in [`Command::path_label`].
pub const PATH_SEPARATOR: &str = " → ";

/// One navigable settings destination.
///
/// Immutable once built; only the store its behavior touches changes.
#[derive(Debug)]
pub struct Command {
    name: String,
    path: Vec<String>,
    keywords: KeywordIndex,
    suggested: bool,
    behavior: Box<dyn Behavior>,
}

impl Command {
    /// Start describing a command with the given display name.
    pub fn builder(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder::new(name)
    }

    /// Display name, unique within a catalog.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Breadcrumb segments from the root to this command.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Search terms the command answers to.
    pub fn keywords(&self) -> &KeywordIndex {
        &self.keywords
    }

    /// Whether the command shows in the home grid.
    pub fn is_suggested(&self) -> bool {
        self.suggested
    }

    /// Breadcrumb text. `Some(depth)` keeps only the first `depth` segments;
    /// zero or `None` means the full path.
    pub fn path_label(&self, depth: Option<usize>) -> String {
        let take = match depth {
            Some(depth) if depth > 0 => depth.min(self.path.len()),
            _ => self.path.len(),
        };
        self.path[..take].join(PATH_SEPARATOR)
    }

    /// True when every whitespace-separated token of `query` is a substring
    /// of at least one keyword, ignoring case. A blank query matches.
    pub fn matches(&self, query: &str) -> bool {
        lowercase_words(query).all(|token| self.keywords.contains_token(&token))
    }

    /// Detail sections filled from the store.
    pub fn sections(&self, store: &dyn SettingsStore) -> Vec<Section> {
        self.behavior.sections(store)
    }

    /// Restore the command's fields.
    pub fn reset(&self, store: &mut dyn SettingsStore) {
        self.behavior.reset(store);
    }

    /// Whether the reset control would change nothing.
    pub fn is_at_default(&self, store: &dyn SettingsStore) -> bool {
        self.behavior.is_at_default(store)
    }

    /// Reject a value this command's screen cannot hold for `field`.
    pub fn check(&self, field: &str, value: &SettingValue) -> CoreResult<()> {
        self.behavior.check(field, value)
    }

    /// Open the detail screen: lets the behavior record what it needs
    /// (such as last saved values), then reads the sections as of now.
    pub fn open_detail(&self, store: &mut dyn SettingsStore) -> Detail<'_> {
        self.behavior.open(store);
        Detail {
            sections: self.behavior.sections(store),
            behavior: self.behavior.as_ref(),
        }
    }
}

/// A command's detail screen, opened against a store.
#[derive(Debug)]
pub struct Detail<'a> {
    sections: Vec<Section>,
    behavior: &'a dyn Behavior,
}

impl Detail<'_> {
    /// Sections as of the last open or refresh.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Take ownership of the sections.
    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }

    /// Re-read the sections after the store changed.
    pub fn refresh(&mut self, store: &dyn SettingsStore) {
        self.sections = self.behavior.sections(store);
    }

    /// Restore the command's fields.
    pub fn reset(&self, store: &mut dyn SettingsStore) {
        self.behavior.reset(store);
    }

    /// Whether the reset control should be disabled.
    pub fn is_at_default(&self, store: &dyn SettingsStore) -> bool {
        self.behavior.is_at_default(store)
    }
}

/// Builder for [`Command`]. Validation happens in [`CommandBuilder::build`].
#[derive(Debug)]
pub struct CommandBuilder {
    name: String,
    path: Vec<String>,
    synonyms: Vec<String>,
    keywords: Option<Vec<String>>,
    suggested: bool,
    behavior: Option<Box<dyn Behavior>>,
}

impl CommandBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: Vec::new(),
            synonyms: Vec::new(),
            keywords: None,
            suggested: true,
            behavior: None,
        }
    }

    /// Breadcrumb segments, root first.
    #[must_use]
    pub fn path<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path = path.into_iter().map(Into::into).collect();
        self
    }

    /// Extra search terms added to the derived keywords.
    #[must_use]
    pub fn synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = synonyms.into_iter().map(Into::into).collect();
        self
    }

    /// Replace keyword derivation entirely.
    #[must_use]
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }

    /// Show the command in the home grid. Defaults to `true`.
    #[must_use]
    pub fn suggested(mut self, suggested: bool) -> Self {
        self.suggested = suggested;
        self
    }

    /// Attach the store-bound behavior. Without one the command owns no fields.
    #[must_use]
    pub fn behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    /// Validate and build the command.
    pub fn build(self) -> CoreResult<Command> {
        let name = self.name;
        if name.trim().is_empty() {
            return Err(CoreError::Validation("command name cannot be empty".into()));
        }

        let keywords = match &self.keywords {
            Some(explicit) => {
                let index = KeywordIndex::explicit(explicit);
                if index.is_empty() {
                    return Err(CoreError::Validation(format!(
                        "command `{name}` overrides its keywords with an empty set"
                    )));
                }
                index
            }
            None => KeywordIndex::derive(&name, &self.path, &self.synonyms),
        };
        if keywords.is_empty() {
            return Err(CoreError::Validation(format!(
                "command `{name}` has no keywords"
            )));
        }

        let behavior = self
            .behavior
            .unwrap_or_else(|| Box::new(FieldDefaults::new()));
        behavior.validate().map_err(|err| match err {
            CoreError::Validation(reason) => CoreError::Validation(format!("command `{name}`: {reason}")),
            other => other,
        })?;

        debug!("built command `{name}` with {} keywords", keywords.len());
        Ok(Command {
            name,
            path: self.path,
            keywords,
            suggested: self.suggested,
            behavior,
        })
    }
}
