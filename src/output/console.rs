use crate::AnalysisReport;

/// Render results as human-readable console output, one block per cmdlet in
/// first-seen order.
pub fn render(report: &AnalysisReport) -> String {
    let mut output = String::new();

    if report.results.is_empty() {
        output.push_str("\n  No Microsoft Graph cmdlets found.\n\n");
        return output;
    }

    output.push_str(&format!(
        "\n  {} distinct cmdlet(s) in {}:\n\n",
        report.results.len(),
        report.script_name
    ));

    for result in &report.results {
        let lines = join_numbers(&result.line_numbers);
        output.push_str(&format!("  {}  (line {})\n", result.command_name, lines));

        match &result.least_privileged {
            Some(least) => {
                output.push_str(&format!("      least privileged: {}\n", least));
                if let Some(description) = &result.description {
                    output.push_str(&format!("      {}\n", description));
                }
                output.push_str(&format!(
                    "      all permissions:  {}\n",
                    result.all_permissions.join(", ")
                ));
            }
            None => output.push_str("      no application permission applies\n"),
        }

        let covered = if result.has_scope { "yes" } else { "no" };
        output.push_str(&format!("      in current scopes: {}\n\n", covered));
    }

    if report.scope_check_skipped {
        output.push_str("  Note: no authenticated session; scope coverage was not checked.\n\n");
    }

    output
}

fn join_numbers(numbers: &[usize]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AnalysisResult;

    fn report(results: Vec<AnalysisResult>, skipped: bool) -> AnalysisReport {
        AnalysisReport {
            script_name: "audit.ps1".to_string(),
            results,
            scope_check_skipped: skipped,
        }
    }

    #[test]
    fn empty_report_says_so() {
        let rendered = render(&report(vec![], false));
        assert!(rendered.contains("No Microsoft Graph cmdlets found"));
    }

    #[test]
    fn renders_permissions_and_lines() {
        let rendered = render(&report(
            vec![AnalysisResult {
                command_name: "Get-MgUser".to_string(),
                line_numbers: vec![1, 4],
                least_privileged: Some("User.Read.All".to_string()),
                description: Some("Allows the app to read users".to_string()),
                all_permissions: vec![
                    "User.Read.All".to_string(),
                    "User.ReadWrite.All".to_string(),
                ],
                has_scope: true,
            }],
            false,
        ));
        assert!(rendered.contains("Get-MgUser  (line 1, 4)"));
        assert!(rendered.contains("least privileged: User.Read.All"));
        assert!(rendered.contains("User.Read.All, User.ReadWrite.All"));
        assert!(rendered.contains("in current scopes: yes"));
    }

    #[test]
    fn notes_skipped_scope_check() {
        let rendered = render(&report(vec![], true));
        assert!(rendered.contains("no authenticated session"));
    }
}
