//! Syntax-highlighted rendering of entries.
//!
//! JSON objects are printed with sorted keys and two-space indentation;
//! everything else is shown verbatim in a dim style.

use std::borrow::Cow;

use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};

use crate::parser::{Entry, StructuredValue};
use crate::theme::Theme;

/// Short all-primitive sequences up to this length stay on one line
const INLINE_SEQUENCE_MAX: usize = 5;

const INDENT: &str = "  ";

/// Render an entry for the log viewport
pub fn format_entry(entry: &Entry, theme: &Theme) -> Text<'static> {
    match &entry.structured {
        Some(value) => format_value(value, theme),
        None => Text::from(Line::from(Span::styled(
            entry.content.clone(),
            Style::default().fg(theme.plain_text),
        ))),
    }
}

/// Render a structured value starting at indentation depth zero
pub fn format_value(value: &StructuredValue, theme: &Theme) -> Text<'static> {
    let mut out = StyledWriter::default();
    write_value(&mut out, value, 0, theme);
    out.finish()
}

/// Accumulates spans into lines
#[derive(Default)]
struct StyledWriter {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
}

impl StyledWriter {
    fn styled(&mut self, text: impl Into<Cow<'static, str>>, style: Style) {
        self.current.push(Span::styled(text, style));
    }

    fn raw(&mut self, text: impl Into<Cow<'static, str>>) {
        let text = text.into();
        if !text.is_empty() {
            self.current.push(Span::raw(text));
        }
    }

    fn newline(&mut self) {
        let spans = std::mem::take(&mut self.current);
        self.lines.push(Line::from(spans));
    }

    fn finish(mut self) -> Text<'static> {
        if !self.current.is_empty() || self.lines.is_empty() {
            self.newline();
        }
        Text::from(self.lines)
    }
}

fn write_value(out: &mut StyledWriter, value: &StructuredValue, indent: usize, theme: &Theme) {
    match value {
        StructuredValue::Object(map) => {
            let bracket = Style::default().fg(theme.json_bracket);
            if map.is_empty() {
                out.styled("{}", bracket);
                return;
            }

            out.styled("{", bracket);
            out.newline();
            let pad = INDENT.repeat(indent + 1);
            let last = map.len() - 1;
            for (i, (key, item)) in map.iter().enumerate() {
                out.raw(pad.clone());
                out.styled(quote(key), Style::default().fg(theme.json_key));
                out.raw(": ");
                write_value(out, item, indent + 1, theme);
                if i < last {
                    out.raw(",");
                }
                out.newline();
            }
            out.raw(INDENT.repeat(indent));
            out.styled("}", bracket);
        }
        StructuredValue::Sequence(items) => write_sequence(out, items, indent, theme),
        StructuredValue::String(s) => {
            out.styled(quote(s), Style::default().fg(theme.json_string));
        }
        StructuredValue::Number(n) => {
            out.styled(format_number(*n), Style::default().fg(theme.json_number));
        }
        StructuredValue::Bool(b) => {
            out.styled(b.to_string(), Style::default().fg(theme.json_bool));
        }
        StructuredValue::Null => {
            out.styled("null", Style::default().fg(theme.json_null));
        }
    }
}

fn write_sequence(out: &mut StyledWriter, items: &[StructuredValue], indent: usize, theme: &Theme) {
    let bracket = Style::default().fg(theme.json_bracket);
    if items.is_empty() {
        out.styled("[]", bracket);
        return;
    }

    if items.len() <= INLINE_SEQUENCE_MAX && items.iter().all(StructuredValue::is_primitive) {
        out.styled("[", bracket);
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.raw(", ");
            }
            write_value(out, item, indent, theme);
        }
        out.styled("]", bracket);
        return;
    }

    out.styled("[", bracket);
    out.newline();
    let pad = INDENT.repeat(indent + 1);
    let last = items.len() - 1;
    for (i, item) in items.iter().enumerate() {
        out.raw(pad.clone());
        write_value(out, item, indent + 1, theme);
        if i < last {
            out.raw(",");
        }
        out.newline();
    }
    out.raw(INDENT.repeat(indent));
    out.styled("]", bracket);
}

/// Double-quoted, escaped string literal
fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("{s:?}"))
}

/// Integers print without a decimal point; other values use the shortest
/// representation, switching to exponent form outside `1e-4..1e6`.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        return format!("{n:.0}");
    }

    let scientific = format!("{n:e}");
    let Some((mantissa, exp)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return scientific;
    };

    if (-4..6).contains(&exp) {
        format!("{n}")
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    }
}

/// Concatenated span contents, one output line per text line
#[cfg(test)]
pub(crate) fn plain_text(lines: &[Line<'_>]) -> String {
    lines
        .iter()
        .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_line;

    fn render(line: &str) -> String {
        plain_text(&format_entry(&parse_line(line), &Theme::default()).lines)
    }

    #[test]
    fn plain_entry_is_rendered_verbatim_with_dim_style() {
        let theme = Theme::default();
        let text = format_entry(&parse_line("svc | hello world"), &theme);
        assert_eq!(text.lines.len(), 1);
        assert_eq!(text.lines[0].spans.len(), 1);
        assert_eq!(text.lines[0].spans[0].content, "hello world");
        assert_eq!(text.lines[0].spans[0].style.fg, Some(theme.plain_text));
    }

    #[test]
    fn object_keys_are_sorted_and_indented() {
        let out = render(r#"{"zeta":1,"alpha":"a","mid":{"b":true,"a":null}}"#);
        let expected = [
            "{",
            r#"  "alpha": "a","#,
            r#"  "mid": {"#,
            r#"    "a": null,"#,
            r#"    "b": true"#,
            "  },",
            r#"  "zeta": 1"#,
            "}",
        ]
        .join("\n");
        assert_eq!(out, expected);
    }

    #[test]
    fn empty_containers_render_compactly() {
        assert_eq!(render(r#"{"a":{},"b":[]}"#), "{\n  \"a\": {},\n  \"b\": []\n}");
        assert_eq!(render("{}"), "{}");
    }

    #[test]
    fn short_primitive_sequence_is_inline() {
        assert_eq!(
            render(r#"{"tags":["x",1,false,null]}"#),
            "{\n  \"tags\": [\"x\", 1, false, null]\n}"
        );
    }

    #[test]
    fn long_or_nested_sequences_break_lines() {
        assert_eq!(
            render(r#"{"n":[1,2,3,4,5,6]}"#),
            "{\n  \"n\": [\n    1,\n    2,\n    3,\n    4,\n    5,\n    6\n  ]\n}"
        );
        assert_eq!(
            render(r#"{"rows":[{"id":1}]}"#),
            "{\n  \"rows\": [\n    {\n      \"id\": 1\n    }\n  ]\n}"
        );
    }

    #[test]
    fn strings_are_escaped() {
        assert_eq!(render(r#"{"msg":"say \"hi\"\n"}"#), "{\n  \"msg\": \"say \\\"hi\\\"\\n\"\n}");
    }

    #[test]
    fn numbers_use_compact_notation() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(-7.0), "-7");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(0.001), "0.001");
        assert_eq!(format_number(0.00001), "1e-05");
        assert_eq!(format_number(1234567.5), "1.2345675e+06");
        assert_eq!(format_number(1e20), "1e+20");
    }

    #[test]
    fn each_category_has_its_own_style() {
        let theme = Theme::default();
        let entry = parse_line(r#"{"k":"v","n":2,"b":true,"z":null}"#);
        let text = format_entry(&entry, &theme);
        let style_of = |needle: &str| {
            text.lines
                .iter()
                .flat_map(|l| l.spans.iter())
                .find(|s| s.content == needle)
                .and_then(|s| s.style.fg)
        };
        assert_eq!(style_of("\"k\""), Some(theme.json_key));
        assert_eq!(style_of("\"v\""), Some(theme.json_string));
        assert_eq!(style_of("2"), Some(theme.json_number));
        assert_eq!(style_of("true"), Some(theme.json_bool));
        assert_eq!(style_of("null"), Some(theme.json_null));
        assert_eq!(style_of("{"), Some(theme.json_bracket));
    }

    #[test]
    fn formatting_is_deterministic() {
        let entry = parse_line(r#"{"b":[1,{"y":2,"x":1}],"a":"s"}"#);
        let theme = Theme::default();
        assert_eq!(format_entry(&entry, &theme), format_entry(&entry, &theme));
    }
}
