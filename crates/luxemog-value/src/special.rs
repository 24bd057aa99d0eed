use regex::Regex;

use crate::error::{EngineError, Result};
use crate::value::Value;

/// A single element of a regex-list (spec §3).
///
/// Either anonymous -- a bare pattern with no capture, used only as a
/// pass/fail gate -- or named, which additionally stores a string capture
/// and may run in search-and-replace mode.
#[derive(Debug, Clone)]
pub enum RegexSpec {
    Anonymous(Regex),
    Named {
        id: String,
        regex: Regex,
        /// When set, the spec substitutes globally instead of searching,
        /// and always succeeds (a replace with no matches is a no-op
        /// substitution, not a failure).
        replace: Option<String>,
    },
}

impl RegexSpec {
    /// Evaluate this spec against `text`, binding a string capture into
    /// `bind` (a closure so both the matcher's and the builder's capture
    /// spaces can reuse this). Returns whether the spec succeeded.
    pub fn eval(&self, text: &str, mut bind: impl FnMut(&str, String) -> Result<()>) -> Result<bool> {
        match self {
            RegexSpec::Anonymous(re) => Ok(re.is_match(text)),
            RegexSpec::Named { id, regex, replace: None } => {
                let Some(m) = regex.captures(text) else {
                    return Ok(false);
                };
                let captured = m
                    .get(1)
                    .or_else(|| m.get(0))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                bind(id, captured)?;
                Ok(true)
            }
            RegexSpec::Named { id, regex, replace: Some(replacement) } => {
                let substituted = regex.replace_all(text, replacement.as_str()).into_owned();
                bind(id, substituted)?;
                Ok(true)
            }
        }
    }
}

/// A regex-list: a conjunction of [`RegexSpec`]s, all of which must
/// succeed (spec §3, §4.3).
pub type RegexList = Vec<RegexSpec>;

pub fn eval_regex_list(
    list: &RegexList,
    text: &str,
    mut bind: impl FnMut(&str, String) -> Result<()>,
) -> Result<bool> {
    for spec in list {
        if !spec.eval(text, &mut bind)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// One piece of a compiled format string (spec §4.7).
#[derive(Debug, Clone)]
pub enum FormatPart {
    Literal(String),
    Reference(String),
}

/// A compiled format string, parsed once at pattern/template build time.
#[derive(Debug, Clone, Default)]
pub struct FormatString(pub Vec<FormatPart>);

impl FormatString {
    /// Parses the single-pass, left-to-right grammar of spec §4.7:
    /// `<name>` substitutes a string capture, `%<` and `%%` are literal
    /// escapes, anything else is a literal character.
    pub fn parse(src: &str) -> Result<Self> {
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut chars = src.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '%' => match chars.next() {
                    Some('<') => literal.push('<'),
                    Some('%') => literal.push('%'),
                    Some(other) => {
                        return Err(EngineError::build(format!(
                            "unknown format escape `%{other}`"
                        )));
                    }
                    None => {
                        return Err(EngineError::build("format string ends with a bare `%`"));
                    }
                },
                '<' => {
                    if !literal.is_empty() {
                        parts.push(FormatPart::Literal(std::mem::take(&mut literal)));
                    }
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('>') => break,
                            Some(c) => name.push(c),
                            None => {
                                return Err(EngineError::build(
                                    "unterminated format reference: missing `>`",
                                ));
                            }
                        }
                    }
                    parts.push(FormatPart::Reference(name));
                }
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            parts.push(FormatPart::Literal(literal));
        }
        Ok(Self(parts))
    }

    /// Renders the format string, looking each reference up via `lookup`.
    pub fn render(&self, mut lookup: impl FnMut(&str) -> Option<String>) -> Result<String> {
        let mut out = String::new();
        for part in &self.0 {
            match part {
                FormatPart::Literal(text) => out.push_str(text),
                FormatPart::Reference(name) => {
                    let value = lookup(name).ok_or_else(|| {
                        EngineError::binding(format!("format reference `{name}` is not bound"))
                    })?;
                    out.push_str(&value);
                }
            }
        }
        Ok(out)
    }
}

/// The engine-internal payload of a `*`-typed node, produced by the
/// pattern builder or template builder (spec §3, §4.2).
#[derive(Debug, Clone)]
pub enum Special {
    /// `*match`: binds the matched subtree (or, in a template, looks one
    /// up) under `id`. Valid in both `from` and `to`.
    Match { id: String, pattern: Box<Value> },
    /// `*wild`: matches anything, binds nothing. `from`-only.
    Wild,
    /// `*alt`: tries each alternative in order, committing the first
    /// match's captures. `from`-only.
    Alt(Vec<Value>),
    /// `*error`: raises a user error with `message` when built. `to`-only.
    Error { message: String },
    /// `*regex`: matches a primitive's text against a regex-list.
    /// `from`-only.
    Regex(RegexList),
    /// `*type_regex`: matches a node's type string against a regex-list,
    /// then matches `inner` against the node ignoring its type.
    /// `from`-only.
    TypeRegex { exp: RegexList, inner: Box<Value> },
    /// `*string`: renders a format string into an untyped primitive.
    /// `to`-only.
    StringTemplate(FormatString),
    /// `*type`: builds `value`, then sets its type to a rendered format
    /// string. `to`-only.
    TypeTemplate { format: FormatString, value: Box<Value> },
}
