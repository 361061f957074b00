//! Diagnostic rendering for parse and build errors.

use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};
use jsontree_parse::{ParseError, ParseErrorKind};

use crate::BuildError;
use crate::builder::join_path;

/// Render a parse error with ariadne, pointing at the offending byte.
///
/// `source` is the document the error came from. Returns the plain `Display`
/// text if the report cannot be produced.
pub fn render_parse_error(err: &ParseError, filename: &str, source: &str) -> String {
    let range = char_range(source, err.offset);
    let report = parse_report(&err.kind, filename, range);
    write_report(report, filename, source).unwrap_or_else(|| err.to_string())
}

impl BuildError {
    /// Render this error with ariadne.
    ///
    /// Errors without a position are rendered as a bare message.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let report = match self {
            BuildError::Parse(err) => return render_parse_error(err, filename, source),
            BuildError::MultipleRoots { offset } => {
                let range = char_range(source, *offset);
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message("expected exactly one root node")
                    .with_label(
                        Label::new((filename, range))
                            .with_message("this value belongs to a second root member")
                            .with_color(Color::Red),
                    )
                    .with_help("a document holds a single root key; nest the other members under it")
            }
            BuildError::PathConflict { path, offset } => {
                let range = char_range(source, *offset);
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message(format!("conflicting value for `{}`", join_path(path)))
                    .with_label(
                        Label::new((filename, range))
                            .with_message("path already holds a value or children")
                            .with_color(Color::Red),
                    )
                    .with_help("every leaf path must be unique, and a leaf cannot have children")
            }
            BuildError::Value(_) | BuildError::EmptyDocument => {
                Report::build(ReportKind::Error, (filename, 0..0)).with_message(self.to_string())
            }
        };
        write_report(report, filename, source).unwrap_or_else(|| self.to_string())
    }
}

fn parse_report<'a>(
    kind: &ParseErrorKind,
    filename: &'a str,
    range: Range<usize>,
) -> ariadne::ReportBuilder<'static, (&'a str, Range<usize>)> {
    let builder = Report::build(ReportKind::Error, (filename, range.clone()));
    match kind {
        ParseErrorKind::Unexpected { .. } => builder
            .with_message(kind.to_string())
            .with_label(
                Label::new((filename, range))
                    .with_message("not accepted here")
                    .with_color(Color::Red),
            )
            .with_help("whitespace and non-string values are not accepted"),
        ParseErrorKind::UnexpectedEof => builder
            .with_message("unexpected end of input")
            .with_label(
                Label::new((filename, range))
                    .with_message("input ends here")
                    .with_color(Color::Red),
            )
            .with_help("every opened string and object must be closed"),
        ParseErrorKind::TrailingContent { .. } => builder
            .with_message(kind.to_string())
            .with_label(
                Label::new((filename, range))
                    .with_message("root object already closed")
                    .with_color(Color::Red),
            )
            .with_help("the root object is the entire document; nothing can follow it"),
        ParseErrorKind::DepthLimitExceeded { .. } => builder
            .with_message(kind.to_string())
            .with_label(
                Label::new((filename, range))
                    .with_message("too deeply nested")
                    .with_color(Color::Red),
            ),
        ParseErrorKind::Io(_) => builder.with_message(kind.to_string()),
    }
}

fn write_report(
    report: ariadne::ReportBuilder<'_, (&str, Range<usize>)>,
    filename: &str,
    source: &str,
) -> Option<String> {
    let mut output = Vec::new();
    report
        .finish()
        .write((filename, Source::from(source)), &mut output)
        .ok()?;
    String::from_utf8(output).ok()
}

/// Character range of the byte at `offset`, clamped to the source.
///
/// An offset inside a multi-byte character points at that character.
fn char_range(source: &str, offset: u64) -> Range<usize> {
    let mut offset = usize::try_from(offset).map_or(source.len(), |o| o.min(source.len()));
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    let len = source.chars().count();
    let start = source[..offset].chars().count().min(len.saturating_sub(1));
    start..(start + 1).min(len)
}
