//! Terminal rendering through codespan-reporting

use super::{Report, Severity};
use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Severity as CsSeverity};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use termcolor::WriteColor;

/// Convert a report to a codespan diagnostic. Declarations only carry
/// line/column positions, so the location is attached as a note.
pub fn to_codespan(report: &Report) -> CsDiagnostic<usize> {
    match report {
        Report::Message(msg) => {
            let severity = match msg.severity() {
                Severity::Error => CsSeverity::Error,
                Severity::Warning => CsSeverity::Warning,
                Severity::Info => CsSeverity::Note,
            };
            CsDiagnostic::new(severity)
                .with_code(format!("K{}", msg.code))
                .with_message(msg.text())
                .with_notes(vec![format!("at {}", msg.location)])
        }
        Report::InternalError(err) => {
            let mut notes = vec![format!("at {}", err.location)];
            if let Some(cause) = &err.cause {
                notes.push(format!("caused by: {}", cause));
            }
            CsDiagnostic::bug()
                .with_message(format!("internal error: {}", err.text))
                .with_notes(notes)
        }
    }
}

/// Write every report to `writer`
pub fn emit(
    writer: &mut dyn WriteColor,
    reports: &[Report],
) -> Result<(), codespan_reporting::files::Error> {
    let files: SimpleFiles<String, String> = SimpleFiles::new();
    let config = term::Config::default();
    for report in reports {
        term::emit(writer, &config, &files, &to_codespan(report))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Diagnostics;
    use crate::typesys::Location;
    use termcolor::NoColor;

    #[test]
    fn test_message_renders_code_and_location() {
        let mut diags = Diagnostics::new();
        diags.message(7501, &Location::new("a.cs", 4, 2), vec!["Ns.C".to_string()]);
        let mut out = NoColor::new(Vec::new());
        emit(&mut out, diags.reports()).unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.contains("K7501"));
        assert!(text.contains("a.cs(4,2)"));
    }

    #[test]
    fn test_internal_error_is_a_bug() {
        let mut diags = Diagnostics::new();
        diags.internal_error(&Location::default(), "bad", Some("cause".to_string()));
        let cs = to_codespan(&diags.reports()[0]);
        assert_eq!(cs.severity, CsSeverity::Bug);
        assert!(cs.notes.iter().any(|n| n.contains("cause")));
    }
}
