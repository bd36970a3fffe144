//! CSV export. The column set matches the original report format and is the
//! durable interchange contract; do not reorder or rename columns.

use crate::aggregate::AnalysisResult;

const HEADER: &str =
    "Cmdlet,LineNumbers,LeastPrivilegedEffectivePermission,Description,Permissions,HasScope";

/// Render results as CSV, one row per cmdlet.
pub fn render(results: &[AnalysisResult]) -> String {
    let mut output = String::from(HEADER);
    output.push('\n');

    for result in results {
        let line_numbers = result
            .line_numbers
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let permissions = result.all_permissions.join(", ");
        let has_scope = if result.has_scope { "True" } else { "False" };

        let fields = [
            result.command_name.as_str(),
            line_numbers.as_str(),
            result.least_privileged.as_deref().unwrap_or(""),
            result.description.as_deref().unwrap_or(""),
            permissions.as_str(),
            has_scope,
        ];
        let row: Vec<String> = fields.into_iter().map(escape).collect();
        output.push_str(&row.join(","));
        output.push('\n');
    }

    output
}

/// Quote a field when it contains a delimiter, quote, or newline, doubling
/// embedded quotes.
fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
