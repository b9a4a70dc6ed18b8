pub mod types;

pub use types::RunSummary;

use colored::Colorize;
use std::io::{self, Write};
use std::path::Path;

/// Write one recording entry's request data for manual review.
///
/// Format:
///
/// ```text
/// ═══ PNPublishTests.bundle/testPublish.plist [0] ═══
/// currentRequest
///   URL: https://ps.pndsn.com/publish/...?pnsdk=...
/// ...
/// ```
///
/// An entry without a `request` key prints `(no request)`.
pub fn write_inspection<W: Write>(
    out: &mut W,
    fixture: &Path,
    index: usize,
    requests: Option<&plist::Value>,
) -> io::Result<()> {
    let header = format!("═══ {} [{}] ═══", display_fixture(fixture), index);
    writeln!(out, "{}", header.bold())?;
    match requests {
        None => writeln!(out, "  {}", "(no request)".dimmed())?,
        Some(value) => write_value(out, value, 0)?,
    }
    writeln!(out)
}

/// Print to stdout; the inspection mode is the only stdout producer.
pub fn print_inspection(
    fixture: &Path,
    index: usize,
    requests: Option<&plist::Value>,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_inspection(&mut lock, fixture, index, requests)
}

fn write_value<W: Write>(out: &mut W, value: &plist::Value, depth: usize) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    match value {
        plist::Value::Dictionary(dict) => {
            for (key, item) in dict {
                if is_scalar(item) {
                    writeln!(out, "{}{}: {}", indent, key.cyan(), scalar_text(item))?;
                } else {
                    writeln!(out, "{}{}", indent, key.cyan())?;
                    write_value(out, item, depth + 1)?;
                }
            }
            Ok(())
        }
        plist::Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if is_scalar(item) {
                    writeln!(out, "{}- [{}] {}", indent, i, scalar_text(item))?;
                } else {
                    writeln!(out, "{}- [{}]", indent, i)?;
                    write_value(out, item, depth + 1)?;
                }
            }
            Ok(())
        }
        scalar => writeln!(out, "{}{}", indent, scalar_text(scalar)),
    }
}

fn is_scalar(value: &plist::Value) -> bool {
    !matches!(value, plist::Value::Dictionary(_) | plist::Value::Array(_))
}

fn scalar_text(value: &plist::Value) -> String {
    match value {
        plist::Value::String(s) => s.clone(),
        plist::Value::Boolean(b) => b.to_string(),
        plist::Value::Integer(i) => match i.as_signed() {
            Some(signed) => signed.to_string(),
            None => i.as_unsigned().map(|u| u.to_string()).unwrap_or_default(),
        },
        plist::Value::Real(r) => r.to_string(),
        plist::Value::Date(d) => d.to_xml_format(),
        plist::Value::Data(bytes) => format!("<{} bytes>", bytes.len()),
        other => format!("<{}>", crate::fixture::value_kind(other)),
    }
}

/// `bundle/fixture` when the fixture has a parent directory, otherwise the full path.
fn display_fixture(fixture: &Path) -> String {
    let name = fixture.file_name().map(|n| n.to_string_lossy());
    let parent = fixture
        .parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy());
    match (parent, name) {
        (Some(parent), Some(name)) => format!("{}/{}", parent, name),
        _ => fixture.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plist::{Dictionary, Value};

    fn render(requests: Option<&Value>) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        write_inspection(
            &mut out,
            Path::new("/fixtures/PNPublishTests.bundle/testPublish.plist"),
            3,
            requests,
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_inspection_lists_request_fields() {
        let mut request = Dictionary::new();
        request.insert("URL".to_string(), Value::from("https://example.com/?pnsdk=1"));
        request.insert("allHTTPHeaderFields".to_string(), Value::Array(vec![Value::from("Accept")]));
        let mut bundle = Dictionary::new();
        bundle.insert("currentRequest".to_string(), Value::Dictionary(request));
        let requests = Value::Dictionary(bundle);

        let text = render(Some(&requests));
        assert!(text.contains("═══ PNPublishTests.bundle/testPublish.plist [3] ═══"));
        assert!(text.contains("currentRequest\n"));
        assert!(text.contains("  URL: https://example.com/?pnsdk=1"));
        assert!(text.contains("    - [0] Accept"));
    }

    #[test]
    fn test_inspection_without_request() {
        let text = render(None);
        assert!(text.contains("(no request)"));
    }

    #[test]
    fn test_display_fixture_without_parent() {
        assert_eq!(display_fixture(Path::new("a.plist")), "a.plist");
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(&Value::Data(vec![1, 2, 3])), "<3 bytes>");
        assert_eq!(scalar_text(&Value::Boolean(true)), "true");
        assert_eq!(scalar_text(&Value::from(7_i64)), "7");
    }
}
