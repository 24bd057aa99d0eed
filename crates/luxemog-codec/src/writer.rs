use luxemog_value::{Shape, Value};

const STRUCTURAL: &[char] = &['{', '}', '[', ']', '(', ')', ',', ':', '"'];

/// Pretty-print indentation (spec §6: indent character -- tab or space --
/// and indent count).
#[derive(Debug, Clone, Copy)]
pub struct PrettyStyle {
    pub indent_char: char,
    pub indent_count: usize,
}

/// Serialises a [`Value`] back to the codec's textual form. With no
/// pretty style set, output is fully minimized (no inserted whitespace);
/// with one set, each object/array member gets its own indented line.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    pretty: Option<PrettyStyle>,
}

impl Writer {
    pub fn new() -> Self {
        Self { pretty: None }
    }

    pub fn set_pretty(&mut self, style: PrettyStyle) {
        self.pretty = Some(style);
    }

    pub fn write_value(&self, value: &Value) -> String {
        let mut out = String::new();
        self.write_node(&mut out, value, 0);
        out
    }

    /// Writes each of `values` as its own top-level document, separated by
    /// a newline (mirrors `main.cxx` writing each tree in `trees` in turn).
    pub fn write_all(&self, values: &[Value]) -> String {
        let mut out = String::new();
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            self.write_node(&mut out, value, 0);
        }
        out
    }

    fn indent(&self, out: &mut String, depth: usize) {
        if let Some(style) = self.pretty {
            out.push('\n');
            for _ in 0..depth * style.indent_count {
                out.push(style.indent_char);
            }
        }
    }

    fn write_node(&self, out: &mut String, value: &Value, depth: usize) {
        if let Some(ty) = value.ty() {
            out.push('(');
            write_primitive_text(out, ty);
            out.push_str(") ");
        }
        match value.shape() {
            Shape::Primitive(text) => write_primitive_text(out, text),
            Shape::Object(map) => {
                out.push('{');
                let mut first = true;
                for (key, child) in map.iter() {
                    if !first {
                        out.push(',');
                        if self.pretty.is_none() {
                            out.push(' ');
                        }
                    }
                    first = false;
                    self.indent(out, depth + 1);
                    write_primitive_text(out, key);
                    out.push_str(": ");
                    self.write_node(out, child, depth + 1);
                }
                if !first {
                    self.indent(out, depth);
                }
                out.push('}');
            }
            Shape::Array(items) => {
                out.push('[');
                let mut first = true;
                for item in items {
                    if !first {
                        out.push(',');
                        if self.pretty.is_none() {
                            out.push(' ');
                        }
                    }
                    first = false;
                    self.indent(out, depth + 1);
                    self.write_node(out, item, depth + 1);
                }
                if !first {
                    self.indent(out, depth);
                }
                out.push(']');
            }
            Shape::Special(_) => {
                debug_assert!(false, "a special node should never reach the codec");
            }
        }
    }
}

fn needs_quoting(text: &str) -> bool {
    text.is_empty() || text.chars().any(|c| c.is_whitespace() || STRUCTURAL.contains(&c))
}

fn write_primitive_text(out: &mut String, text: &str) {
    if !needs_quoting(text) {
        out.push_str(text);
        return;
    }
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_one;

    #[test]
    fn round_trips_through_reader() {
        let value = read_one(r#"(dog) {x: [1, "two words"], y: 3}"#).unwrap();
        let writer = Writer::new();
        let text = writer.write_value(&value);
        let reparsed = read_one(&text).unwrap();
        assert_eq!(value, reparsed);
    }

    #[test]
    fn pretty_printing_indents_with_given_style() {
        let value = read_one("{x: 1}").unwrap();
        let mut writer = Writer::new();
        writer.set_pretty(PrettyStyle { indent_char: ' ', indent_count: 2 });
        let text = writer.write_value(&value);
        assert_eq!(text, "{\n  x: 1\n}");
    }

    #[test]
    fn quotes_primitives_that_need_it() {
        let mut fields = luxemog_value::OrderedMap::new();
        fields
            .try_insert("k".to_string(), Value::primitive(None, "has space"))
            .unwrap();
        let value = Value::object(None, fields);
        let text = Writer::new().write_value(&value);
        assert!(text.contains("\"has space\""));
    }
}
