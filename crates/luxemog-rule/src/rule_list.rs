use luxemog_value::{EngineError, Result, Value};

use crate::rule::Rule;

/// The root rule-file value's type (spec §6; confirmed literal against
/// `original_source/app/main.cxx`'s `"luxemog 0.0.1"` check). Any other
/// type, or no type at all, is a fatal build error.
const RULE_FILE_VERSION: &str = "luxemog 0.0.1";

/// An ordered collection of compiled rules (spec §4.6).
///
/// Only the forward rules are built up front. A rule's swapped (`to`
/// becomes `from`) build can fail with a placement error whenever `from`
/// and `to` use role-specific specials -- the normal case, not an edge
/// case (e.g. `{from: (*alt)[...], to: 9}` has nothing to swap `*alt`
/// into on the template side). Since most rule files never run with
/// `--reverse`, that failure must surface only from a reversed `apply`,
/// not from `build`: the raw rule documents are kept around so the
/// swapped `Vec<Rule>` can be built on demand, the first (and every)
/// time `apply(tree, true)` is actually called.
pub struct RuleList {
    docs: Vec<Value>,
    forward: Vec<Rule>,
}

impl RuleList {
    /// Builds a `RuleList` from a rule-file root value: it must carry the
    /// type [`RULE_FILE_VERSION`] and contain an array of rule documents.
    pub fn build(root: &Value) -> Result<Self> {
        match root.ty() {
            None => return Err(EngineError::build("rule file is missing a version type")),
            Some(ty) if ty != RULE_FILE_VERSION => {
                return Err(EngineError::build(format!("unknown rule file version `{ty}`")))
            }
            Some(_) => {}
        }
        let docs = root
            .as_array()
            .ok_or_else(|| EngineError::build("rule file payload must be an array of rule documents"))?;

        let forward = docs
            .iter()
            .map(|doc| Rule::build(doc, false))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { docs: docs.to_vec(), forward })
    }

    /// The number of rules in this list (same for the forward and reverse
    /// forms -- reversal swaps roles, not cardinality).
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Applies each rule, in order, to `tree`. `reverse` swaps `from`/`to`
    /// globally for this call (spec §4.6); the swapped rules are built
    /// from the stored rule documents here, so a rule that can't sensibly
    /// be reversed only raises its build error on a reversed `apply`.
    pub fn apply(&self, tree: &mut Value, reverse: bool) -> Result<()> {
        if reverse {
            let reverse = self
                .docs
                .iter()
                .map(|doc| Rule::build(doc, true))
                .collect::<Result<Vec<_>>>()?;
            for rule in &reverse {
                rule.apply(tree)?;
            }
        } else {
            for rule in &self.forward {
                rule.apply(tree)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use luxemog_value::OrderedMap;

    fn rule_file(rules: Vec<Value>) -> Value {
        Value::array(Some(RULE_FILE_VERSION.to_string()), rules)
    }

    fn rule_doc(from: Value, to: Value) -> Value {
        let mut fields = OrderedMap::new();
        fields.try_insert("from".to_string(), from).unwrap();
        fields.try_insert("to".to_string(), to).unwrap();
        Value::object(None, fields)
    }

    #[test]
    fn missing_version_is_a_build_error() {
        let root = Value::array(None, vec![]);
        assert!(RuleList::build(&root).is_err());
    }

    #[test]
    fn unknown_version_is_a_build_error() {
        let root = Value::array(Some("luxemog 9.9.9".to_string()), vec![]);
        assert!(RuleList::build(&root).is_err());
    }

    #[test]
    fn forward_and_reverse_apply() {
        let root = rule_file(vec![rule_doc(
            Value::primitive(None, "4"),
            Value::primitive(None, "5"),
        )]);
        let rules = RuleList::build(&root).unwrap();

        let mut forward_tree = Value::primitive(None, "4");
        rules.apply(&mut forward_tree, false).unwrap();
        assert_eq!(forward_tree.as_primitive(), Some("5"));

        let mut reverse_tree = Value::primitive(None, "5");
        rules.apply(&mut reverse_tree, true).unwrap();
        assert_eq!(reverse_tree.as_primitive(), Some("4"));
    }

    #[test]
    fn a_rule_that_cannot_be_reversed_still_builds_and_applies_forward() {
        // (*alt)[1, 7] has nothing to swap `*alt` into on the template
        // side; this must not fail `RuleList::build`, only a reversed
        // `apply`.
        let mut fields = OrderedMap::new();
        fields
            .try_insert(
                "from".to_string(),
                Value::array(
                    Some("*alt".to_string()),
                    vec![Value::primitive(None, "1"), Value::primitive(None, "7")],
                ),
            )
            .unwrap();
        fields
            .try_insert("to".to_string(), Value::primitive(None, "9"))
            .unwrap();
        let root = rule_file(vec![Value::object(None, fields)]);

        let rules = RuleList::build(&root).unwrap();

        let mut tree = Value::primitive(None, "7");
        rules.apply(&mut tree, false).unwrap();
        assert_eq!(tree.as_primitive(), Some("9"));

        let mut tree = Value::primitive(None, "2");
        rules.apply(&mut tree, true).unwrap_err();
    }
}
