use luxemog_value::{EngineError, OrderedMap, RegexSpec, Result, Shape, Special, Value};
use regex::Regex;

/// Builds a pattern tree from a rule-document fragment (spec §4.2).
///
/// Recognizes the pattern-role specials (`*match`, `*wild`, `*alt`,
/// `*regex`, `*type_regex`); `*error`, `*string`, `*type` are template-role
/// and are rejected here with a placement error, since a pattern never
/// legitimately contains them.
pub fn build_pattern(doc: &Value) -> Result<Value> {
    let Some(ty) = doc.ty() else {
        return build_plain(doc);
    };
    let Some(tag) = ty.strip_prefix('*') else {
        return build_plain(doc);
    };
    match tag {
        "match" => build_match(doc),
        "wild" => Ok(Value::special(None, Special::Wild)),
        "alt" => build_alt(doc),
        "regex" => build_regex(doc),
        "type_regex" => build_type_regex(doc),
        "error" | "string" | "type" => Err(EngineError::placement(format!(
            "`*{tag}` may only appear in a `to` template, not a `from` pattern"
        ))),
        escaped => build_escaped(doc, escaped),
    }
}

/// Recursively builds a plain (non-special) node: primitives pass through,
/// object/array children are built recursively.
fn build_plain(doc: &Value) -> Result<Value> {
    match doc.shape() {
        Shape::Primitive(text) => Ok(Value::primitive(doc.ty().map(str::to_string), text.clone())),
        Shape::Object(map) => {
            let mut built = OrderedMap::new();
            for (key, child) in map.iter() {
                built
                    .try_insert(key.to_string(), build_pattern(child)?)
                    .map_err(|key| EngineError::build(format!("duplicate key `{key}` in pattern")))?;
            }
            Ok(Value::object(doc.ty().map(str::to_string), built))
        }
        Shape::Array(items) => {
            let built = items.iter().map(build_pattern).collect::<Result<Vec<_>>>()?;
            Ok(Value::array(doc.ty().map(str::to_string), built))
        }
        Shape::Special(_) => Err(EngineError::build(
            "a rule document may not contain an already-built special node",
        )),
    }
}

/// Strips one leading `*` from the type and otherwise builds the node
/// normally -- the escape for a literal type string that happens to start
/// with `*` (spec §4.2's final bullet).
fn build_escaped(doc: &Value, unescaped_ty: &str) -> Result<Value> {
    let mut rebuilt = build_plain_keep_ty(doc)?;
    rebuilt.set_ty(Some(unescaped_ty.to_string()));
    Ok(rebuilt)
}

fn build_plain_keep_ty(doc: &Value) -> Result<Value> {
    match doc.shape() {
        Shape::Primitive(text) => Ok(Value::primitive(None, text.clone())),
        Shape::Object(map) => {
            let mut built = OrderedMap::new();
            for (key, child) in map.iter() {
                built
                    .try_insert(key.to_string(), build_pattern(child)?)
                    .map_err(|key| EngineError::build(format!("duplicate key `{key}` in pattern")))?;
            }
            Ok(Value::object(None, built))
        }
        Shape::Array(items) => {
            let built = items.iter().map(build_pattern).collect::<Result<Vec<_>>>()?;
            Ok(Value::array(None, built))
        }
        Shape::Special(_) => Err(EngineError::build(
            "a rule document may not contain an already-built special node",
        )),
    }
}

fn build_match(doc: &Value) -> Result<Value> {
    match doc.shape() {
        Shape::Primitive(id) => Ok(Value::special(
            None,
            Special::Match {
                id: id.clone(),
                pattern: Box::new(Value::special(None, Special::Wild)),
            },
        )),
        Shape::Object(map) => {
            let id = map
                .get("id")
                .and_then(Value::as_primitive)
                .ok_or_else(|| EngineError::build("`*match` object requires a primitive `id` field"))?
                .to_string();
            let pattern = match map.get("pattern") {
                Some(pattern_doc) => build_pattern(pattern_doc)?,
                None => Value::special(None, Special::Wild),
            };
            Ok(Value::special(
                None,
                Special::Match {
                    id,
                    pattern: Box::new(pattern),
                },
            ))
        }
        _ => Err(EngineError::build(
            "`*match` must be a primitive (shorthand id) or an object with `id`",
        )),
    }
}

fn build_alt(doc: &Value) -> Result<Value> {
    let Shape::Array(items) = doc.shape() else {
        return Err(EngineError::build("`*alt` must be an array"));
    };
    if items.is_empty() {
        return Err(EngineError::build("`*alt` must not be empty"));
    }
    let built = items.iter().map(build_pattern).collect::<Result<Vec<_>>>()?;
    Ok(Value::special(None, Special::Alt(built)))
}

fn build_regex(doc: &Value) -> Result<Value> {
    let spec = build_regex_spec(doc)?;
    Ok(Value::special(None, Special::Regex(vec![spec])))
}

fn build_regex_spec(doc: &Value) -> Result<RegexSpec> {
    match doc.shape() {
        Shape::Primitive(pattern) => {
            let compiled = Regex::new(pattern)
                .map_err(|e| EngineError::build(format!("invalid regex `{pattern}`: {e}")))?;
            Ok(RegexSpec::Anonymous(compiled))
        }
        Shape::Object(map) => {
            let id = map
                .get("id")
                .and_then(Value::as_primitive)
                .ok_or_else(|| EngineError::build("regex spec object requires a primitive `id` field"))?
                .to_string();
            let exp = map
                .get("exp")
                .and_then(Value::as_primitive)
                .ok_or_else(|| EngineError::build("regex spec object requires a primitive `exp` field"))?;
            let compiled =
                Regex::new(exp).map_err(|e| EngineError::build(format!("invalid regex `{exp}`: {e}")))?;
            let replace = match map.get("replace") {
                Some(v) => Some(
                    v.as_primitive()
                        .ok_or_else(|| EngineError::build("`replace` must be a primitive"))?
                        .to_string(),
                ),
                None => None,
            };
            Ok(RegexSpec::Named {
                id,
                regex: compiled,
                replace,
            })
        }
        _ => Err(EngineError::build(
            "a regex spec must be a primitive pattern or an `{id, exp, replace?}` object",
        )),
    }
}

fn build_regex_list(doc: &Value) -> Result<Vec<RegexSpec>> {
    let Shape::Array(items) = doc.shape() else {
        return Err(EngineError::build("a regex-list must be an array"));
    };
    items.iter().map(build_regex_spec).collect()
}

fn build_type_regex(doc: &Value) -> Result<Value> {
    let Shape::Object(map) = doc.shape() else {
        return Err(EngineError::build("`*type_regex` must be an object"));
    };
    let exp = map
        .get("exp")
        .ok_or_else(|| EngineError::build("`*type_regex` requires an `exp` field"))?;
    let exp = build_regex_list(exp)?;
    let value_doc = map
        .get("value")
        .ok_or_else(|| EngineError::build("`*type_regex` requires a `value` field"))?;
    let inner = build_pattern(value_doc)?;
    if inner.ty().is_some() {
        return Err(EngineError::build(
            "`*type_regex`'s `value` sub-pattern must not specify its own type",
        ));
    }
    Ok(Value::special(
        None,
        Special::TypeRegex {
            exp,
            inner: Box::new(inner),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_doc(v: Value) -> Value {
        v
    }

    #[test]
    fn plain_primitive_passes_through() {
        let doc = parse_doc(Value::primitive(None, "4"));
        let built = build_pattern(&doc).unwrap();
        assert_eq!(built.as_primitive(), Some("4"));
    }

    #[test]
    fn match_shorthand_builds_wild_subpattern() {
        let doc = Value::primitive(Some("*match".to_string()), "w");
        let built = build_pattern(&doc).unwrap();
        match built.as_special().unwrap() {
            Special::Match { id, pattern } => {
                assert_eq!(id, "w");
                assert!(matches!(pattern.as_special().unwrap(), Special::Wild));
            }
            _ => panic!("expected Match"),
        }
    }

    #[test]
    fn alt_rejects_empty_array() {
        let doc = Value::array(Some("*alt".to_string()), vec![]);
        assert!(build_pattern(&doc).is_err());
    }

    #[test]
    fn escaped_star_type_is_stripped() {
        let doc = Value::primitive(Some("*dog".to_string()), "6");
        let built = build_pattern(&doc).unwrap();
        assert_eq!(built.ty(), Some("dog"));
        assert_eq!(built.as_primitive(), Some("6"));
    }

    #[test]
    fn type_regex_rejects_typed_value() {
        let mut fields = OrderedMap::new();
        fields
            .try_insert(
                "exp".to_string(),
                Value::array(None, vec![Value::primitive(None, "a")]),
            )
            .unwrap();
        fields
            .try_insert(
                "value".to_string(),
                Value::primitive(Some("oops".to_string()), "x"),
            )
            .unwrap();
        let doc = Value::object(Some("*type_regex".to_string()), fields);
        assert!(build_pattern(&doc).is_err());
    }
}
