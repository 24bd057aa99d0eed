use luxemog_value::{eval_regex_list, EngineError, MatchMap, Result, Shape, Special, Value};

/// Safety cap on matcher steps for a single `match_pattern` call tree
/// (spec §4.3). No terminating pattern should come close; this only
/// guards against a pathological or cyclic pattern.
const MAX_STEPS: u64 = 1_000_000;

fn step(steps: &mut u64) -> Result<()> {
    *steps += 1;
    if *steps > MAX_STEPS {
        return Err(EngineError::build("exceeded maximum matcher steps"));
    }
    Ok(())
}

fn types_match(target: Option<&str>, pattern: Option<&str>) -> bool {
    target == pattern
}

/// Matches `pattern` against `target`, binding captures into `matches`.
///
/// Returns `Ok(true)`/`Ok(false)` for match success/failure; `Err` for a
/// rule error (duplicate capture, a `to`-only special encountered in
/// pattern position, an invalid regex-list, or the step cap above).
/// `Alt` is the only backtracking construct (spec §4.3): each branch
/// tries against a clone of `matches` and is merged in on success,
/// discarded on failure.
pub fn match_pattern(
    target: &Value,
    pattern: &Value,
    matches: &mut MatchMap,
    steps: &mut u64,
) -> Result<bool> {
    step(steps)?;
    if let Some(special) = pattern.as_special() {
        return match_special(target, special, matches, steps);
    }
    if !types_match(target.ty(), pattern.ty()) {
        return Ok(false);
    }
    match (target.shape(), pattern.shape()) {
        (Shape::Primitive(t), Shape::Primitive(p)) => Ok(t == p),
        (Shape::Object(t), Shape::Object(p)) => match_object(t, p, matches, steps),
        (Shape::Array(t), Shape::Array(p)) => match_array(t, p, matches, steps),
        _ => Ok(false),
    }
}

fn match_object(
    target: &luxemog_value::OrderedMap,
    pattern: &luxemog_value::OrderedMap,
    matches: &mut MatchMap,
    steps: &mut u64,
) -> Result<bool> {
    if target.len() != pattern.len() {
        return Ok(false);
    }
    for (key, pchild) in pattern.iter() {
        let Some(tchild) = target.get(key) else {
            return Ok(false);
        };
        if !match_pattern(tchild, pchild, matches, steps)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn match_array(
    target: &[Value],
    pattern: &[Value],
    matches: &mut MatchMap,
    steps: &mut u64,
) -> Result<bool> {
    if target.len() != pattern.len() {
        return Ok(false);
    }
    for (tchild, pchild) in target.iter().zip(pattern.iter()) {
        if !match_pattern(tchild, pchild, matches, steps)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn match_special(
    target: &Value,
    special: &Special,
    matches: &mut MatchMap,
    steps: &mut u64,
) -> Result<bool> {
    match special {
        Special::Wild => Ok(true),
        Special::Match { id, pattern } => {
            if match_pattern(target, pattern, matches, steps)? {
                matches.bind_tree(id, target.clone())?;
                Ok(true)
            } else {
                Ok(false)
            }
        }
        Special::Alt(branches) => {
            for branch in branches {
                let mut attempt = matches.clone();
                if match_pattern(target, branch, &mut attempt, steps)? {
                    *matches = attempt;
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Special::Regex(list) => {
            let Shape::Primitive(text) = target.shape() else {
                return Ok(false);
            };
            eval_regex_list(list, text, |id, value| matches.bind_string(id, value))
        }
        Special::TypeRegex { exp, inner } => {
            let Some(ty) = target.ty() else {
                return Ok(false);
            };
            if !eval_regex_list(exp, ty, |id, value| matches.bind_string(id, value))? {
                return Ok(false);
            }
            let mut detyped = target.clone();
            detyped.set_ty(None);
            match_pattern(&detyped, inner, matches, steps)
        }
        Special::Error { .. } | Special::StringTemplate(_) | Special::TypeTemplate { .. } => {
            Err(EngineError::placement(
                "a `to`-only special cannot appear in a `from` pattern",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_pattern;
    use luxemog_value::OrderedMap;

    fn matches(pattern: &Value, target: &Value) -> bool {
        let mut matches = MatchMap::new();
        let mut steps = 0;
        match_pattern(target, pattern, &mut matches, &mut steps).unwrap()
    }

    #[test]
    fn primitive_equality() {
        let pattern = build_pattern(&Value::primitive(None, "4")).unwrap();
        assert!(matches(&pattern, &Value::primitive(None, "4")));
        assert!(!matches(&pattern, &Value::primitive(None, "5")));
    }

    #[test]
    fn wild_matches_anything() {
        let pattern = build_pattern(&Value::primitive(Some("*wild".to_string()), "")).unwrap();
        assert!(matches(&pattern, &Value::primitive(None, "anything")));
    }

    #[test]
    fn object_rejects_extra_keys() {
        let mut pfields = OrderedMap::new();
        pfields.try_insert("x".to_string(), Value::primitive(None, "1")).unwrap();
        let pattern = build_pattern(&Value::object(None, pfields)).unwrap();

        let mut tfields = OrderedMap::new();
        tfields.try_insert("x".to_string(), Value::primitive(None, "1")).unwrap();
        tfields.try_insert("y".to_string(), Value::primitive(None, "2")).unwrap();
        let target = Value::object(None, tfields);

        assert!(!matches(&pattern, &target));
    }

    #[test]
    fn alt_backtracks_and_discards_losing_captures() {
        let doc = Value::array(
            Some("*alt".to_string()),
            vec![
                Value::primitive(Some("*match".to_string()), "w"),
                Value::primitive(None, "7"),
            ],
        );
        let pattern = build_pattern(&doc).unwrap();
        let mut matches = MatchMap::new();
        let mut steps = 0;
        // The first alternative is `*match w`, which always succeeds and
        // binds `w`; since alt commits the *first* matching branch, `w`
        // should end up bound even though "7" would also match a literal 7.
        let ok = match_pattern(&Value::primitive(None, "7"), &pattern, &mut matches, &mut steps).unwrap();
        assert!(ok);
        assert!(matches.get_tree("w").is_some());
    }

    #[test]
    fn duplicate_capture_is_a_binding_error() {
        let doc = Value::array(
            None,
            vec![
                Value::primitive(Some("*match".to_string()), "w"),
                Value::primitive(Some("*match".to_string()), "w"),
            ],
        );
        let pattern = build_pattern(&doc).unwrap();
        let target = Value::array(None, vec![Value::primitive(None, "1"), Value::primitive(None, "2")]);
        let mut matches = MatchMap::new();
        let mut steps = 0;
        assert!(match_pattern(&target, &pattern, &mut matches, &mut steps).is_err());
    }
}
