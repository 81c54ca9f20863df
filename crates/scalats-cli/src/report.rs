//! Per-library result reporting.

use crate::phases::resolve_inheritance::LibAnalyzed;
use colored::Colorize;
use scalats_ast::TsIdentLibrary;
use scalats_phases::PhaseRes;

/// Render one line per library. Returns the line and whether the library
/// counts as failed for the exit code.
pub fn report_line(
    name: &TsIdentLibrary,
    res: &PhaseRes<TsIdentLibrary, LibAnalyzed>,
) -> (String, bool) {
    match res {
        PhaseRes::Ok(analyzed) => {
            let declarations = analyzed.inheritance.len();
            let unresolved: usize = analyzed
                .inheritance
                .iter()
                .map(|decl| decl.unresolved.len())
                .sum();
            (
                format!(
                    "{} {name} ({declarations} declarations, {unresolved} unresolved parents)",
                    "ok".green()
                ),
                false,
            )
        }
        PhaseRes::Ignore => (format!("{} {name}", "ignored".yellow()), false),
        PhaseRes::Failure(errors) => {
            let mut line = format!("{} {name}", "failed".red());
            for (key, error) in errors {
                line.push_str(&format!("\n  {key}: {error}"));
            }
            (line, true)
        }
    }
}
