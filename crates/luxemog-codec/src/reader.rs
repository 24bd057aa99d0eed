use std::iter::Peekable;
use std::str::Chars;

use luxemog_value::{EngineError, OrderedMap, Result, Value};

const STRUCTURAL: &[char] = &['{', '}', '[', ']', '(', ')', ',', ':', '"'];

struct Cursor<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { chars: src.chars().peekable() }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        self.chars.next()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(EngineError::codec(format!("expected `{expected}`, found `{c}`"))),
            None => Err(EngineError::codec(format!("expected `{expected}`, found end of input"))),
        }
    }
}

/// Parses exactly one top-level value, erroring on trailing non-whitespace
/// content. Used for the transforms file, which names the CLI's single
/// rule-file root element (spec §6).
pub fn read_one(src: &str) -> Result<Value> {
    let mut cursor = Cursor::new(src);
    cursor.skip_ws();
    let value = parse_value(&mut cursor)?;
    cursor.skip_ws();
    if cursor.peek().is_some() {
        return Err(EngineError::codec("trailing content after top-level value"));
    }
    Ok(value)
}

/// Parses a whitespace-separated sequence of top-level values, continuing
/// to end of input. Used for the source file, which may hold more than
/// one document to rewrite (the CLI's `main.cxx` reads a `trees` vector).
pub fn read_all(src: &str) -> Result<Vec<Value>> {
    let mut cursor = Cursor::new(src);
    let mut values = Vec::new();
    loop {
        cursor.skip_ws();
        if cursor.peek().is_none() {
            break;
        }
        values.push(parse_value(&mut cursor)?);
    }
    Ok(values)
}

fn parse_value(cursor: &mut Cursor) -> Result<Value> {
    cursor.skip_ws();
    let ty = if cursor.peek() == Some('(') {
        Some(parse_type(cursor)?)
    } else {
        None
    };
    cursor.skip_ws();
    match cursor.peek() {
        Some('{') => parse_object(cursor, ty),
        Some('[') => parse_array(cursor, ty),
        Some(_) => Ok(Value::primitive(ty, parse_primitive_text(cursor)?)),
        None => Err(EngineError::codec("expected a value, found end of input")),
    }
}

fn parse_type(cursor: &mut Cursor) -> Result<String> {
    cursor.expect('(')?;
    cursor.skip_ws();
    let text = parse_primitive_text(cursor)?;
    cursor.skip_ws();
    cursor.expect(')')?;
    Ok(text)
}

fn parse_primitive_text(cursor: &mut Cursor) -> Result<String> {
    if cursor.peek() == Some('"') {
        parse_quoted_string(cursor)
    } else {
        parse_bare_word(cursor)
    }
}

fn parse_quoted_string(cursor: &mut Cursor) -> Result<String> {
    cursor.expect('"')?;
    let mut text = String::new();
    loop {
        match cursor.bump() {
            None => return Err(EngineError::codec("unterminated quoted string")),
            Some('"') => break,
            Some('\\') => match cursor.bump() {
                Some('"') => text.push('"'),
                Some('\\') => text.push('\\'),
                Some('n') => text.push('\n'),
                Some('t') => text.push('\t'),
                Some('r') => text.push('\r'),
                Some(other) => {
                    return Err(EngineError::codec(format!("unknown string escape `\\{other}`")))
                }
                None => return Err(EngineError::codec("unterminated string escape")),
            },
            Some(c) => text.push(c),
        }
    }
    Ok(text)
}

fn parse_bare_word(cursor: &mut Cursor) -> Result<String> {
    let mut text = String::new();
    while let Some(c) = cursor.peek() {
        if c.is_whitespace() || STRUCTURAL.contains(&c) {
            break;
        }
        text.push(c);
        cursor.bump();
    }
    if text.is_empty() {
        return Err(EngineError::codec(format!(
            "expected a primitive, found `{}`",
            cursor.peek().map_or("end of input".to_string(), String::from)
        )));
    }
    Ok(text)
}

/// Parses `{` ... `}`, calling `on_entry` once per member in source order
/// -- the streaming per-position callback shape the engine's external
/// interface contract names (spec §6), even though [`parse_object`] below
/// just uses it to build a whole tree eagerly.
fn parse_object_streaming(
    cursor: &mut Cursor,
    mut on_entry: impl FnMut(String, Value) -> Result<()>,
) -> Result<()> {
    cursor.expect('{')?;
    cursor.skip_ws();
    if cursor.peek() == Some('}') {
        cursor.bump();
        return Ok(());
    }
    loop {
        cursor.skip_ws();
        let key = parse_primitive_text(cursor)?;
        cursor.skip_ws();
        cursor.expect(':')?;
        cursor.skip_ws();
        let value = parse_value(cursor)?;
        on_entry(key, value)?;
        cursor.skip_ws();
        match cursor.bump() {
            Some(',') => {
                cursor.skip_ws();
                if cursor.peek() == Some('}') {
                    cursor.bump();
                    break;
                }
            }
            Some('}') => break,
            Some(c) => return Err(EngineError::codec(format!("expected `,` or `}}`, found `{c}`"))),
            None => return Err(EngineError::codec("unterminated object")),
        }
    }
    Ok(())
}

/// Parses `[` ... `]`, calling `on_item` once per element in source order
/// (same streaming rationale as [`parse_object_streaming`]).
fn parse_array_streaming(cursor: &mut Cursor, mut on_item: impl FnMut(Value) -> Result<()>) -> Result<()> {
    cursor.expect('[')?;
    cursor.skip_ws();
    if cursor.peek() == Some(']') {
        cursor.bump();
        return Ok(());
    }
    loop {
        cursor.skip_ws();
        let value = parse_value(cursor)?;
        on_item(value)?;
        cursor.skip_ws();
        match cursor.bump() {
            Some(',') => {
                cursor.skip_ws();
                if cursor.peek() == Some(']') {
                    cursor.bump();
                    break;
                }
            }
            Some(']') => break,
            Some(c) => return Err(EngineError::codec(format!("expected `,` or `]`, found `{c}`"))),
            None => return Err(EngineError::codec("unterminated array")),
        }
    }
    Ok(())
}

fn parse_object(cursor: &mut Cursor, ty: Option<String>) -> Result<Value> {
    let mut map = OrderedMap::new();
    parse_object_streaming(cursor, |key, value| {
        map.try_insert(key, value)
            .map_err(|key| EngineError::codec(format!("duplicate object key `{key}`")))
    })?;
    Ok(Value::object(ty, map))
}

fn parse_array(cursor: &mut Cursor, ty: Option<String>) -> Result<Value> {
    let mut items = Vec::new();
    parse_array_streaming(cursor, |value| {
        items.push(value);
        Ok(())
    })?;
    Ok(Value::array(ty, items))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_typed_primitive() {
        let v = read_one("(int) 6").unwrap();
        assert_eq!(v.ty(), Some("int"));
        assert_eq!(v.as_primitive(), Some("6"));
    }

    #[test]
    fn reads_nested_object_and_array() {
        let v = read_one(r#"{x: [1, 2], y: "hi there"}"#).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.get("x").unwrap().as_array().unwrap().len(), 2);
        assert_eq!(obj.get("y").unwrap().as_primitive(), Some("hi there"));
    }

    #[test]
    fn rejects_duplicate_keys() {
        assert!(read_one("{x: 1, x: 2}").is_err());
    }

    #[test]
    fn reads_multiple_top_level_values() {
        let values = read_all("1 2 3").unwrap();
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn rejects_trailing_content_in_read_one() {
        assert!(read_one("1 2").is_err());
    }
}
