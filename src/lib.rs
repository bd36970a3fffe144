//! mgscope — static analyzer for Microsoft Graph PowerShell scripts.
//!
//! Scans a script's text for `Verb-MgNoun` cmdlets, resolves the
//! application-level permissions each distinct cmdlet requires, and checks
//! them against the scopes granted to the current session.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use mgscope::resolver::metadata::MetadataPermissionSource;
//! use mgscope::session::NoSession;
//! use mgscope::{analyze, AnalyzeOptions};
//!
//! let source = MetadataPermissionSource::load(Path::new("permissions.json")).unwrap();
//! let report = analyze(
//!     Path::new("./audit.ps1"),
//!     &source,
//!     &NoSession,
//!     &AnalyzeOptions::default(),
//! )
//! .unwrap();
//! println!("{} distinct cmdlet(s)", report.results.len());
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod matcher;
pub mod output;
pub mod resolver;
pub mod session;

#[cfg(test)]
pub(crate) mod testsupport;

use std::path::Path;

use aggregate::AnalysisResult;
use config::Config;
use error::Result;
use output::OutputFormat;
use resolver::PermissionSource;
use session::SessionContext;

/// Options for an analysis invocation.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Path to config file (defaults to `.mgscope.toml` next to the script).
    pub config_path: Option<std::path::PathBuf>,
    /// Output format.
    pub format: OutputFormat,
    /// CLI override for the Graph API version.
    pub api_version_override: Option<String>,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            format: OutputFormat::Console,
            api_version_override: None,
        }
    }
}

/// Complete analysis report for one script.
#[derive(Debug)]
pub struct AnalysisReport {
    pub script_name: String,
    pub results: Vec<AnalysisResult>,
    /// True when no session was authenticated and `has_scope` is therefore
    /// false on every row.
    pub scope_check_skipped: bool,
}

/// Run a complete analysis: extract cmdlets, resolve permissions once per
/// distinct cmdlet, evaluate scope coverage.
pub fn analyze(
    script: &Path,
    source: &dyn PermissionSource,
    session: &dyn SessionContext,
    options: &AnalyzeOptions,
) -> Result<AnalysisReport> {
    let config_path = options.config_path.clone().unwrap_or_else(|| {
        script
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(".mgscope.toml")
    });
    let mut config = Config::load(&config_path)?;

    if let Some(api_version) = &options.api_version_override {
        config.api_version = api_version.clone();
    }

    let content = std::fs::read_to_string(script)?;
    let occurrences =
        matcher::extract_with(&matcher::MgCommandMatcher, content.lines(), &config.exclude);

    let granted = session.granted_scopes();
    let results = aggregate::aggregate(
        &occurrences,
        source,
        &config.api_version,
        granted.as_ref(),
    )?;

    Ok(AnalysisReport {
        script_name: script
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| script.display().to_string()),
        results,
        scope_check_skipped: granted.is_none(),
    })
}

/// Render an analysis report in the specified format.
pub fn render_report(report: &AnalysisReport, format: OutputFormat) -> Result<String> {
    output::render(report, format)
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::session::NoSession;
    use crate::testsupport::{entry, StaticSource};
    use std::collections::HashSet;
    use std::io::Write;

    fn graph_source() -> StaticSource {
        StaticSource::new(vec![
            (
                "Get-MgUser",
                vec![
                    entry("User.ReadBasic.All", "Allows the app to read a basic set of profile properties"),
                    entry("User.Read.All", "Allows the app to read the full set of profile properties"),
                ],
            ),
            (
                "Remove-MgGroup",
                vec![entry("Group.ReadWrite.All", "Allows the app to create and delete groups")],
            ),
        ])
    }

    fn script(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    struct FixedScopes(HashSet<String>);
    impl SessionContext for FixedScopes {
        fn granted_scopes(&self) -> Option<HashSet<String>> {
            Some(self.0.clone())
        }
    }

    #[test]
    fn full_pipeline_merges_and_resolves() {
        let file = script("Get-MgUser -UserId 1\nGet-MgUser -UserId 2\nRemove-MgGroup -GroupId 3\n");
        let report = analyze(
            file.path(),
            &graph_source(),
            &NoSession,
            &AnalyzeOptions::default(),
        )
        .unwrap();

        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[0].command_name, "Get-MgUser");
        assert_eq!(report.results[0].line_numbers, vec![1, 2]);
        assert_eq!(
            report.results[0].least_privileged.as_deref(),
            Some("User.ReadBasic.All")
        );
        assert_eq!(report.results[1].command_name, "Remove-MgGroup");
        assert!(report.scope_check_skipped);
    }

    #[test]
    fn comment_and_auth_lines_yield_nothing() {
        let file = script("# comment only\nDisconnect-MgGraph\n");
        let report = analyze(
            file.path(),
            &graph_source(),
            &NoSession,
            &AnalyzeOptions::default(),
        )
        .unwrap();
        assert!(report.results.is_empty());
    }

    #[test]
    fn granted_scope_marks_coverage() {
        let file = script("Get-MgUser\n");
        let session = FixedScopes(["User.Read.All".to_string()].into_iter().collect());
        let report = analyze(
            file.path(),
            &graph_source(),
            &session,
            &AnalyzeOptions::default(),
        )
        .unwrap();
        assert!(report.results[0].has_scope);
        assert!(!report.scope_check_skipped);
    }

    #[test]
    fn pipeline_is_idempotent() {
        let file = script("Get-MgUser # one\nRemove-MgGroup\nGet-MgUser\n");
        let options = AnalyzeOptions::default();
        let first = analyze(file.path(), &graph_source(), &NoSession, &options).unwrap();
        let second = analyze(file.path(), &graph_source(), &NoSession, &options).unwrap();
        assert_eq!(first.results, second.results);
    }

    #[test]
    fn unknown_cmdlet_in_script_aborts() {
        let file = script("Get-MgTotallyUnknown\n");
        let err = analyze(
            file.path(),
            &graph_source(),
            &NoSession,
            &AnalyzeOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, error::ScopeError::UnknownCommand { .. }));
    }

    #[test]
    fn csv_round_trip_columns() {
        let file = script("Get-MgUser -UserId 1\n");
        let report = analyze(
            file.path(),
            &graph_source(),
            &NoSession,
            &AnalyzeOptions::default(),
        )
        .unwrap();
        let csv = render_report(&report, OutputFormat::Csv).unwrap();
        assert!(csv.starts_with(
            "Cmdlet,LineNumbers,LeastPrivilegedEffectivePermission,Description,Permissions,HasScope\n"
        ));
        assert!(csv.contains("Get-MgUser,1,User.ReadBasic.All"));
    }
}
