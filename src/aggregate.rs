//! Grouping of raw cmdlet occurrences into per-cmdlet analysis rows.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::error::Result;
use crate::matcher::CommandOccurrence;
use crate::resolver::{self, PermissionSource};

/// One output row per distinct cmdlet found in the script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub command_name: String,
    /// Ascending, deduplicated line numbers of every occurrence.
    pub line_numbers: Vec<usize>,
    pub least_privileged: Option<String>,
    pub description: Option<String>,
    pub all_permissions: Vec<String>,
    /// True iff any currently granted scope appears in `all_permissions`.
    /// A match on any listed permission counts, not only the
    /// least-privileged one: a broader grant still covers the call.
    pub has_scope: bool,
}

/// Group occurrences by cmdlet (first-seen order), resolve permissions once
/// per distinct cmdlet, and evaluate scope coverage against `granted`.
///
/// `granted = None` means no authenticated session: `has_scope` is false for
/// every row and a single warning is emitted for the whole run.
pub fn aggregate(
    occurrences: &[CommandOccurrence],
    source: &dyn PermissionSource,
    api_version: &str,
    granted: Option<&HashSet<String>>,
) -> Result<Vec<AnalysisResult>> {
    let mut order: Vec<&str> = Vec::new();
    let mut lines_by_cmdlet: HashMap<&str, Vec<usize>> = HashMap::new();

    for occ in occurrences {
        let lines = lines_by_cmdlet
            .entry(occ.command_name.as_str())
            .or_insert_with(|| {
                order.push(occ.command_name.as_str());
                Vec::new()
            });
        if !lines.contains(&occ.line_number) {
            lines.push(occ.line_number);
        }
    }

    // Once per run, not per row.
    let mut warned_unauthenticated = false;

    let mut results = Vec::with_capacity(order.len());
    for name in order {
        let mut line_numbers = lines_by_cmdlet.remove(name).unwrap_or_default();
        line_numbers.sort_unstable();

        // Exactly one lookup per distinct cmdlet, however often it appears.
        let info = resolver::resolve(source, name, api_version)?;

        let has_scope = match granted {
            Some(scopes) => info.all_permissions.iter().any(|p| scopes.contains(p)),
            None => {
                if !warned_unauthenticated {
                    tracing::warn!(
                        "no authenticated session; HasScope is reported as false for every cmdlet"
                    );
                    warned_unauthenticated = true;
                }
                false
            }
        };

        results.push(AnalysisResult {
            command_name: name.to_string(),
            line_numbers,
            least_privileged: info.least_privileged,
            description: info.description,
            all_permissions: info.all_permissions,
            has_scope,
        });
    }

    Ok(results)
}
