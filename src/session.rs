//! Authenticated-session boundary (the `Get-MgContext` surface).

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// Exposes the scopes granted to the current session, or `None` when no
/// session is authenticated.
pub trait SessionContext: Send + Sync {
    fn granted_scopes(&self) -> Option<HashSet<String>>;
}

/// Always unauthenticated. Scope coverage degrades to false for every result.
pub struct NoSession;

impl SessionContext for NoSession {
    fn granted_scopes(&self) -> Option<HashSet<String>> {
        None
    }
}

#[derive(Deserialize)]
struct ContextFile {
    scopes: Vec<String>,
}

/// Session scopes loaded from a JSON context export:
/// `{ "scopes": ["User.Read.All", ...] }`.
pub struct FileSessionContext {
    scopes: HashSet<String>,
}

impl FileSessionContext {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let context: ContextFile = serde_json::from_str(&content)?;
        Ok(Self {
            scopes: context.scopes.into_iter().collect(),
        })
    }
}

impl SessionContext for FileSessionContext {
    fn granted_scopes(&self) -> Option<HashSet<String>> {
        Some(self.scopes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn no_session_has_no_scopes() {
        assert!(NoSession.granted_scopes().is_none());
    }

    #[test]
    fn file_context_loads_scopes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{ "scopes": ["User.Read.All", "Group.Read.All"] }"#)
            .unwrap();
        let context = FileSessionContext::load(file.path()).unwrap();
        let scopes = context.granted_scopes().unwrap();
        assert_eq!(scopes.len(), 2);
        assert!(scopes.contains("User.Read.All"));
    }
}
