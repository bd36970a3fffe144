//! Cmdlet extraction from raw PowerShell script text.
//!
//! Recognition is pattern-based, not a PowerShell parser: an approved verb,
//! the `-Mg` module marker, and a greedy run of identifier characters.
//! `<# ... #>` block comments are not understood — lines inside one are
//! scanned as ordinary code. Dynamically constructed cmdlet names (splatting,
//! string concatenation, `& $cmd`) are invisible to this matcher.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// PowerShell approved verbs used by the Graph SDK modules. `list-verbs`
/// prints this set.
pub const APPROVED_VERBS: &[&str] = &[
    "Add",
    "Clear",
    "Confirm",
    "Copy",
    "Export",
    "Get",
    "Grant",
    "Hide",
    "Import",
    "Initialize",
    "Invoke",
    "Move",
    "New",
    "Publish",
    "Remove",
    "Rename",
    "Reset",
    "Restore",
    "Revoke",
    "Search",
    "Send",
    "Set",
    "Start",
    "Stop",
    "Suspend",
    "Test",
    "Unhide",
    "Unpublish",
    "Update",
];

/// Cmdlets of the Microsoft.Graph.Authentication module. They manage the
/// session itself and never require Graph authorization scopes, so matches
/// against them are discarded.
pub const AUTH_CMDLETS: &[&str] = &[
    "Connect-MgGraph",
    "Disconnect-MgGraph",
    "Get-MgContext",
    "Get-MgProfile",
    "Select-MgProfile",
    "Get-MgEnvironment",
    "Add-MgEnvironment",
    "Remove-MgEnvironment",
    "Set-MgEnvironment",
    "Invoke-MgGraphRequest",
];

static AUTH_CMDLET_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| AUTH_CMDLETS.iter().copied().collect());

static CMDLET_RE: Lazy<Regex> = Lazy::new(|| {
    // Greedy `+` keeps multi-word nouns intact (Get-MgUserMemberOf, not Get-MgUser).
    let pattern = format!(r"\b(?:{})-Mg[A-Za-z0-9]+", APPROVED_VERBS.join("|"));
    Regex::new(&pattern).expect("cmdlet pattern is valid")
});

/// One instance of a recognized cmdlet in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOccurrence {
    /// Full cmdlet name, e.g. `Get-MgUser`.
    pub command_name: String,
    /// The trimmed line it appeared on, trailing `#` comment stripped.
    pub source_line: String,
    /// 1-based line index within the script.
    pub line_number: usize,
}

/// Finds cmdlet names in a single comment-stripped line. Precompiled-regex
/// implementation is the default; the trait keeps the pattern swappable
/// without touching the extraction loop.
pub trait CommandMatcher: Send + Sync {
    fn find_all<'a>(&self, line: &'a str) -> Vec<&'a str>;
}

/// Matcher for `Verb-MgNoun` cmdlets built from [`APPROVED_VERBS`].
pub struct MgCommandMatcher;

impl CommandMatcher for MgCommandMatcher {
    fn find_all<'a>(&self, line: &'a str) -> Vec<&'a str> {
        CMDLET_RE.find_iter(line).map(|m| m.as_str()).collect()
    }
}

/// Extract all non-excluded cmdlet occurrences from script lines, in line
/// order (left-to-right within a line).
pub fn extract<I, S>(lines: I) -> Vec<CommandOccurrence>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extract_with(&MgCommandMatcher, lines, &HashSet::new())
}

/// Like [`extract`], with a caller-supplied matcher and extra excluded
/// cmdlet names (merged with the built-in authentication set).
pub fn extract_with<I, S>(
    matcher: &dyn CommandMatcher,
    lines: I,
    extra_excluded: &HashSet<String>,
) -> Vec<CommandOccurrence>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut occurrences = Vec::new();

    for (line_idx, line) in lines.into_iter().enumerate() {
        let line_number = line_idx + 1;
        let trimmed = line.as_ref().trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        // Trailing comment: keep the code before the first '#'.
        let code = match trimmed.find('#') {
            Some(pos) => trimmed[..pos].trim_end(),
            None => trimmed,
        };
        if code.is_empty() {
            continue;
        }

        for name in matcher.find_all(code) {
            if AUTH_CMDLET_SET.contains(name) || extra_excluded.contains(name) {
                continue;
            }
            occurrences.push(CommandOccurrence {
                command_name: name.to_string(),
                source_line: code.to_string(),
                line_number,
            });
        }
    }

    occurrences
}
