//! Offline permission metadata, keyed by cmdlet then API version.
//!
//! The metadata file is a JSON export of the `Find-MgGraphCommand` tables:
//!
//! ```json
//! {
//!   "Get-MgUser": {
//!     "v1.0": [
//!       { "name": "User.ReadBasic.All", "description": "Allows the app to ..." }
//!     ]
//!   }
//! }
//! ```
//!
//! Entries must be ordered least- to most-privileged, matching what the live
//! service returns.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Result, ScopeError};

use super::{PermissionEntry, PermissionSource};

type CommandTable = HashMap<String, HashMap<String, Vec<PermissionEntry>>>;

#[derive(Debug)]
pub struct MetadataPermissionSource {
    commands: CommandTable,
}

impl MetadataPermissionSource {
    /// Load metadata from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let commands: CommandTable =
            serde_json::from_str(&content).map_err(|e| ScopeError::Metadata {
                file: path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { commands })
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }
}

impl PermissionSource for MetadataPermissionSource {
    fn find_command(&self, cmdlet: &str, api_version: &str) -> Result<Vec<PermissionEntry>> {
        let versions = self
            .commands
            .get(cmdlet)
            .ok_or_else(|| ScopeError::UnknownCommand {
                cmdlet: cmdlet.to_string(),
                api_version: api_version.to_string(),
            })?;
        // A known cmdlet with no table for this version has no permissions
        // listed there, which is a valid (empty) answer.
        Ok(versions.get(api_version).cloned().unwrap_or_default())
    }
}
