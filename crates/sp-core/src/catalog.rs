use std::collections::HashSet;

use log::{debug, info};

use crate::command::Command;
use crate::value::{SettingValue, SettingsStore};
use crate::{CoreError, CoreResult};

/// The fixed, ordered list of commands.
///
/// Declaration order is the display order and the tie-break for search
/// results. The catalog is never mutated after construction, so it can be
/// shared freely between readers.
#[derive(Debug, Default)]
pub struct CommandCatalog {
    commands: Vec<Command>,
}

impl CommandCatalog {
    /// Build a catalog, rejecting names that differ only in case.
    pub fn new(commands: Vec<Command>) -> CoreResult<Self> {
        let mut seen = HashSet::new();
        for command in &commands {
            if !seen.insert(command.name().to_lowercase()) {
                return Err(CoreError::DuplicateCommand(command.name().to_string()));
            }
        }
        debug!("catalog built with {} commands", commands.len());
        Ok(Self { commands })
    }

    /// All commands in declaration order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Iterate commands in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the catalog has no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Look up a command by name, ignoring case.
    pub fn find(&self, name: &str) -> Option<&Command> {
        let name = name.trim().to_lowercase();
        self.commands
            .iter()
            .find(|command| command.name().to_lowercase() == name)
    }

    /// Ask every command whether `value` fits `field`. Several commands may
    /// share a field; all of them must accept it.
    pub fn check(&self, field: &str, value: &SettingValue) -> CoreResult<()> {
        self.commands
            .iter()
            .try_for_each(|command| command.check(field, value))
    }

    /// Reset every command, in catalog order.
    pub fn reset_all(&self, store: &mut dyn SettingsStore) {
        for command in &self.commands {
            command.reset(store);
        }
        info!("reset {} commands to defaults", self.commands.len());
    }
}

impl<'a> IntoIterator for &'a CommandCatalog {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
