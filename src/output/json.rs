use serde::Serialize;

use crate::aggregate::AnalysisResult;
use crate::error::Result;
use crate::AnalysisReport;

#[derive(Serialize)]
struct JsonReport<'a> {
    script: &'a str,
    results: &'a [AnalysisResult],
    scope_check_skipped: bool,
}

/// Render an analysis report as a JSON document.
pub fn render(report: &AnalysisReport) -> Result<String> {
    let json = serde_json::to_string_pretty(&JsonReport {
        script: &report.script_name,
        results: &report.results,
        scope_check_skipped: report.scope_check_skipped,
    })?;
    Ok(json)
}
