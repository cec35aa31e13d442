//! Pretty error reporting using ariadne
//!
//! Provides colorful, user-friendly error messages with source context.

use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::errors::CompileError;

/// Print an error with source context
pub fn print_error(source: &str, filename: &str, error: &CompileError) {
    match build_report(source, filename, error) {
        Some(report) => {
            if let Err(e) = report.eprint(Source::from(source)) {
                eprintln!("{}", error);
                eprintln!("(failed to render diagnostic: {})", e);
            }
        }
        None => eprintln!("{}", error),
    }
}

/// Format an error as a string (for testing)
pub fn format_error(source: &str, filename: &str, error: &CompileError) -> String {
    let Some(report) = build_report(source, filename, error) else {
        return error.to_string();
    };

    let mut output = Vec::new();
    if report.write(Source::from(source), &mut output).is_err() {
        return error.to_string();
    }
    String::from_utf8_lossy(&output).into_owned()
}

fn build_report<'a>(
    source: &str,
    filename: &str,
    error: &CompileError,
) -> Option<Report<'a, Range<usize>>> {
    let line = error.line()?;
    let span = line_span(source, line).unwrap_or(0..0);

    let report = Report::build(ReportKind::Error, span.clone())
        .with_message(format!("{} in {} (line {})", error.category(), filename, line))
        .with_label(
            Label::new(span)
                .with_message(error.detail())
                .with_color(Color::Red),
        )
        .finish();
    Some(report)
}

/// Byte range covering the 1-based `line` in `source`, without its newline
pub fn line_span(source: &str, line: usize) -> Option<Range<usize>> {
    if line == 0 {
        return None;
    }

    let mut start = 0;
    for (index, text) in source.split('\n').enumerate() {
        let end = start + text.len();
        if index + 1 == line {
            let end = if text.ends_with('\r') { end - 1 } else { end };
            return Some(start..end);
        }
        start = end + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StructuralError;

    #[test]
    fn test_line_span() {
        let source = "line1\nline2\nline3";

        assert_eq!(line_span(source, 1), Some(0..5));
        assert_eq!(line_span(source, 2), Some(6..11));
        assert_eq!(line_span(source, 3), Some(12..17));
        assert_eq!(line_span(source, 4), None);
        assert_eq!(line_span(source, 0), None);
    }

    #[test]
    fn test_line_span_crlf() {
        assert_eq!(line_span("a b\r\nc", 1), Some(0..3));
    }

    #[test]
    fn test_format_error_mentions_detail() {
        let source = "int a\ncase 1";
        let err = CompileError::structural(StructuralError::CaseOutsideSwitch, 2);
        let text = format_error(source, "prog.algo", &err);

        assert!(text.contains("Structural error"));
        assert!(text.contains("'case' statement outside of a 'switch'"));
    }
}
