//! Query matching over a command catalog.
//!
//! Matching is literal: each query token must appear as a substring of one
//! of a command's keywords. There is no scoring; results keep catalog order.

use log::trace;
use sp_core::{Command, CommandCatalog, SettingsStore};

/// Commands flagged for the home grid, in catalog order.
pub fn suggested(catalog: &CommandCatalog) -> Vec<&Command> {
    catalog.iter().filter(|command| command.is_suggested()).collect()
}

/// Filter commands by a search query
///
/// # Arguments
///
/// * `catalog` - The commands to search through
/// * `query` - Raw text from the search field
///
/// # Returns
///
/// Every command whose keywords cover all query tokens, in catalog order.
/// A blank query returns no commands: the caller should prompt the user to
/// type rather than list the whole catalog.
pub fn search<'a>(catalog: &'a CommandCatalog, query: &str) -> Vec<&'a Command> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let results: Vec<&Command> = catalog
        .iter()
        .filter(|command| command.matches(query))
        .collect();
    trace!("query `{query}` matched {} of {} commands", results.len(), catalog.len());
    results
}

/// Commands whose settings differ from their defaults, in catalog order.
pub fn modified<'a>(catalog: &'a CommandCatalog, store: &dyn SettingsStore) -> Vec<&'a Command> {
    catalog
        .iter()
        .filter(|command| !command.is_at_default(store))
        .collect()
}

/// What the overlay should show.
#[derive(Debug)]
pub enum Listing<'a> {
    /// Home grid: not searching, nothing typed.
    Suggested(Vec<&'a Command>),
    /// Searching with an empty field: ask the user to type a command.
    Prompt,
    /// Matches for the current query.
    Results(Vec<&'a Command>),
    /// The query matched nothing.
    NoResults,
}

/// Search field contents plus whether the field has focus.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchState {
    query: String,
    active: bool,
}

impl SearchState {
    /// Home state: not searching, nothing typed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current search field text, as typed.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether the search field has focus.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Focus the search field.
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Leave search mode and clear the query.
    pub fn cancel(&mut self) {
        self.active = false;
        self.query.clear();
    }

    /// Replace the query text. Typing implies an active search.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        if !self.query.is_empty() {
            self.active = true;
        }
    }

    /// Decide what the overlay shows for this state.
    pub fn listing<'a>(&self, catalog: &'a CommandCatalog) -> Listing<'a> {
        if self.query.trim().is_empty() {
            return if self.active {
                Listing::Prompt
            } else {
                Listing::Suggested(suggested(catalog))
            };
        }

        let results = search(catalog, &self.query);
        if results.is_empty() {
            Listing::NoResults
        } else {
            Listing::Results(results)
        }
    }
}
