use luxemog_value::{EngineError, MatchMap, OrderedMap, Result, Shape, Special, Value};

/// Builds a fresh `Value` from `template` and the bound captures in
/// `matches` (spec §4.4). The template and the value it builds from it
/// never share nodes: tree captures are deep-cloned on the way out.
pub fn materialize(template: &Value, matches: &MatchMap) -> Result<Value> {
    if let Some(special) = template.as_special() {
        return materialize_special(special, matches);
    }
    match template.shape() {
        Shape::Primitive(text) => Ok(Value::primitive(template.ty().map(str::to_string), text.clone())),
        Shape::Object(map) => {
            let mut built = OrderedMap::new();
            for (key, child) in map.iter() {
                built
                    .try_insert(key.to_string(), materialize(child, matches)?)
                    .map_err(|key| EngineError::build(format!("duplicate key `{key}` in template")))?;
            }
            Ok(Value::object(template.ty().map(str::to_string), built))
        }
        Shape::Array(items) => {
            let built = items
                .iter()
                .map(|item| materialize(item, matches))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::array(template.ty().map(str::to_string), built))
        }
        Shape::Special(_) => unreachable!("handled above"),
    }
}

fn materialize_special(special: &Special, matches: &MatchMap) -> Result<Value> {
    match special {
        Special::Match { id, .. } => {
            let captured = matches
                .get_tree(id)
                .ok_or_else(|| EngineError::binding(format!("capture `{id}` is not bound")))?;
            Ok(captured.clone())
        }
        Special::Error { message } => Err(EngineError::user_error(message.clone())),
        Special::StringTemplate(format) => {
            let rendered = format.render(|name| matches.get_string(name).map(str::to_string))?;
            Ok(Value::primitive(None, rendered))
        }
        Special::TypeTemplate { format, value } => {
            let mut built = materialize(value, matches)?;
            let rendered = format.render(|name| matches.get_string(name).map(str::to_string))?;
            built.set_ty(Some(rendered));
            Ok(built)
        }
        Special::Wild | Special::Alt(_) | Special::Regex(_) | Special::TypeRegex { .. } => {
            Err(EngineError::placement(
                "a `from`-only special cannot appear in a `to` template",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use luxemog_value::Special;

    #[test]
    fn match_template_deep_clones_capture() {
        let mut matches = MatchMap::new();
        matches
            .bind_tree("w", Value::primitive(None, "captured"))
            .unwrap();
        let template = Value::special(
            None,
            Special::Match {
                id: "w".to_string(),
                pattern: Box::new(Value::special(None, Special::Wild)),
            },
        );
        let built = materialize(&template, &matches).unwrap();
        assert_eq!(built.as_primitive(), Some("captured"));
    }

    #[test]
    fn missing_capture_is_a_binding_error() {
        let matches = MatchMap::new();
        let template = Value::special(
            None,
            Special::Match {
                id: "missing".to_string(),
                pattern: Box::new(Value::special(None, Special::Wild)),
            },
        );
        assert!(materialize(&template, &matches).is_err());
    }

    #[test]
    fn error_template_raises_user_message() {
        let matches = MatchMap::new();
        let template = Value::special(
            None,
            Special::Error {
                message: "testing".to_string(),
            },
        );
        let err = materialize(&template, &matches).unwrap_err();
        assert!(matches!(err, EngineError::UserError(ref m) if m == "testing"));
    }
}
