use luxemog_value::{EngineError, FormatString, OrderedMap, Result, Shape, Special, Value};

/// Builds a template tree from a rule-document fragment (spec §4.2, §4.4).
///
/// Recognizes the template-role specials (`*match`, `*error`, `*string`,
/// `*type`); `*wild`, `*alt`, `*regex`, `*type_regex` are pattern-role and
/// are rejected here with a placement error, since a template never
/// legitimately contains them.
pub fn build_template(doc: &Value) -> Result<Value> {
    let Some(ty) = doc.ty() else {
        return build_plain(doc);
    };
    let Some(tag) = ty.strip_prefix('*') else {
        return build_plain(doc);
    };
    match tag {
        "match" => build_match(doc),
        "error" => build_error(doc),
        "string" => build_string_template(doc),
        "type" => build_type_template(doc),
        "wild" | "alt" | "regex" | "type_regex" => Err(EngineError::placement(format!(
            "`*{tag}` may only appear in a `from` pattern, not a `to` template"
        ))),
        escaped => build_escaped(doc, escaped),
    }
}

fn build_plain(doc: &Value) -> Result<Value> {
    match doc.shape() {
        Shape::Primitive(text) => Ok(Value::primitive(doc.ty().map(str::to_string), text.clone())),
        Shape::Object(map) => {
            let mut built = OrderedMap::new();
            for (key, child) in map.iter() {
                built
                    .try_insert(key.to_string(), build_template(child)?)
                    .map_err(|key| EngineError::build(format!("duplicate key `{key}` in template")))?;
            }
            Ok(Value::object(doc.ty().map(str::to_string), built))
        }
        Shape::Array(items) => {
            let built = items.iter().map(build_template).collect::<Result<Vec<_>>>()?;
            Ok(Value::array(doc.ty().map(str::to_string), built))
        }
        Shape::Special(_) => Err(EngineError::build(
            "a rule document may not contain an already-built special node",
        )),
    }
}

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
                    .try_insert(key.to_string(), build_template(child)?)
                    .map_err(|key| EngineError::build(format!("duplicate key `{key}` in template")))?;
            }
            Ok(Value::object(None, built))
        }
        Shape::Array(items) => {
            let built = items.iter().map(build_template).collect::<Result<Vec<_>>>()?;
            Ok(Value::array(None, built))
        }
        Shape::Special(_) => Err(EngineError::build(
            "a rule document may not contain an already-built special node",
        )),
    }
}

/// `*match` in template position only ever reads `id` -- a `pattern`
/// field, if present, is the from-role sub-pattern and has no effect on
/// lookup (spec §4.4: `Match{id}` templates look up `id`, full stop).
fn build_match(doc: &Value) -> Result<Value> {
    let id = match doc.shape() {
        Shape::Primitive(id) => id.clone(),
        Shape::Object(map) => map
            .get("id")
            .and_then(Value::as_primitive)
            .ok_or_else(|| EngineError::build("`*match` object requires a primitive `id` field"))?
            .to_string(),
        _ => {
            return Err(EngineError::build(
                "`*match` must be a primitive (shorthand id) or an object with `id`",
            ))
        }
    };
    Ok(Value::special(
        None,
        Special::Match {
            id,
            pattern: Box::new(Value::special(None, Special::Wild)),
        },
    ))
}

fn build_error(doc: &Value) -> Result<Value> {
    let message = doc
        .as_primitive()
        .ok_or_else(|| EngineError::build("`*error` must be a primitive message"))?
        .to_string();
    Ok(Value::special(None, Special::Error { message }))
}

fn build_string_template(doc: &Value) -> Result<Value> {
    let format = doc
        .as_primitive()
        .ok_or_else(|| EngineError::build("`*string` must be a primitive format string"))?;
    let format = FormatString::parse(format)?;
    Ok(Value::special(None, Special::StringTemplate(format)))
}

fn build_type_template(doc: &Value) -> Result<Value> {
    let Shape::Object(map) = doc.shape() else {
        return Err(EngineError::build("`*type` must be an object"));
    };
    let format = map
        .get("format")
        .and_then(Value::as_primitive)
        .ok_or_else(|| EngineError::build("`*type` requires a primitive `format` field"))?;
    let format = FormatString::parse(format)?;
    let value_doc = map
        .get("value")
        .ok_or_else(|| EngineError::build("`*type` requires a `value` field"))?;
    let value = build_template(value_doc)?;
    Ok(Value::special(
        None,
        Special::TypeTemplate {
            format,
            value: Box::new(value),
        },
    ))
}
