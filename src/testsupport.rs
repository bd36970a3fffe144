//! In-memory `PermissionSource` stub shared across unit tests.

use std::collections::HashMap;

use crate::error::{Result, ScopeError};
use crate::resolver::{PermissionEntry, PermissionSource};

pub(crate) struct StaticSource {
    pub entries: HashMap<String, Vec<PermissionEntry>>,
}

impl StaticSource {
    pub fn new(commands: Vec<(&str, Vec<PermissionEntry>)>) -> Self {
        Self {
            entries: commands
                .into_iter()
                .map(|(name, perms)| (name.to_string(), perms))
                .collect(),
        }
    }
}

impl PermissionSource for StaticSource {
    fn find_command(&self, cmdlet: &str, api_version: &str) -> Result<Vec<PermissionEntry>> {
        self.entries
            .get(cmdlet)
            .cloned()
            .ok_or_else(|| ScopeError::UnknownCommand {
                cmdlet: cmdlet.to_string(),
                api_version: api_version.to_string(),
            })
    }
}

pub(crate) fn entry(name: &str, description: &str) -> PermissionEntry {
    PermissionEntry {
        name: name.to_string(),
        description: description.to_string(),
        full_description: String::new(),
    }
}
