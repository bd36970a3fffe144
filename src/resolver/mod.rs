//! Permission resolution for a single cmdlet.
//!
//! The lookup itself is an external collaborator behind [`PermissionSource`]
//! (the `Find-MgGraphCommand` surface). The resolver filters the returned
//! entries down to application-level grants and picks the least-privileged
//! one. The source is expected to return entries pre-ordered from least to
//! most privileged; no re-ranking happens here.

pub mod metadata;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Graph API version used when the config and CLI leave it unset.
pub const DEFAULT_API_VERSION: &str = "v1.0";

/// One permission entry as returned by the lookup collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionEntry {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub full_description: String,
}

/// Resolved permission facts for one cmdlet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PermissionInfo {
    /// Minimum-privilege grant, absent when no app-level permission applies.
    pub least_privileged: Option<String>,
    /// Description of that grant.
    pub description: Option<String>,
    /// Deduplicated names of all app-level permissions, source order
    /// preserved (least-privileged first).
    pub all_permissions: Vec<String>,
}

/// Lookup boundary: given a cmdlet and an API version, return the permission
/// entries that apply to it. Unknown cmdlets are an error, never an empty
/// result.
pub trait PermissionSource: Send + Sync {
    fn find_command(&self, cmdlet: &str, api_version: &str) -> Result<Vec<PermissionEntry>>;
}

/// An entry grants app-only access when its description carries the
/// "Allows the app" phrasing without the delegated "your data" qualifier.
/// Delegated grants only cover the signed-in user's own data and say nothing
/// about running the cmdlet against arbitrary targets.
fn is_app_only(description: &str) -> bool {
    let lowered = description.trim().to_lowercase();
    lowered.starts_with("allows the app") && !lowered.contains("your")
}

/// Resolve the app-level permissions for `cmdlet`. A failing lookup aborts
/// the run; an empty filtered set is a valid answer (no app-level grant).
pub fn resolve(
    source: &dyn PermissionSource,
    cmdlet: &str,
    api_version: &str,
) -> Result<PermissionInfo> {
    let entries = source.find_command(cmdlet, api_version)?;

    let filtered: Vec<&PermissionEntry> = entries
        .iter()
        .filter(|e| is_app_only(&e.description))
        .collect();

    let mut all_permissions: Vec<String> = Vec::with_capacity(filtered.len());
    for entry in &filtered {
        if !all_permissions.contains(&entry.name) {
            all_permissions.push(entry.name.clone());
        }
    }

    let (least_privileged, description) = match filtered.first() {
        Some(first) => (Some(first.name.clone()), Some(first.description.clone())),
        None => (None, None),
    };

    Ok(PermissionInfo {
        least_privileged,
        description,
        all_permissions,
    })
}
