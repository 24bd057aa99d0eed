use luxemog_pattern::{build_pattern, match_pattern};
use luxemog_transform::{build_template, materialize};
use luxemog_value::{EngineError, MatchMap, Result, Value};

/// A compiled rule: a `from` pattern, an optional `to` template, and an
/// ordered list of sub-rules that run at the match site with the
/// parent's captures still visible (spec §3, §4.5).
///
/// `to` is optional: a rule with no `to` leaves a matched root's *value*
/// unchanged but still runs its `subtransforms` against it (SPEC_FULL.md
/// §2, confirmed against `original_source`'s `test_subtransforms`).
#[derive(Debug, Clone)]
pub struct Rule {
    from: Value,
    to: Option<Value>,
    subtransforms: Vec<Rule>,
}

impl Rule {
    /// Builds a `Rule` from a rule-document object (`{from, to?, matches?,
    /// subtransforms?}`). When `swapped` is set, `from` and `to` trade
    /// roles -- this is how [`super::RuleList`] builds the reversed form
    /// of a rule document on demand, the first time a reversed `apply` is
    /// actually requested, rather than re-parsing from text (spec §4.6).
    /// A rule document whose `from`/`to` don't reverse cleanly (role-
    /// specific specials on the wrong side once swapped, or no `to` to
    /// swap in at all) only fails here when `swapped` is set -- i.e. only
    /// when a reversed `apply` is in fact requested.
    pub fn build(doc: &Value, swapped: bool) -> Result<Self> {
        let fields = doc
            .as_object()
            .ok_or_else(|| EngineError::build("a rule document must be an object"))?;

        let from_doc = fields
            .get("from")
            .ok_or_else(|| EngineError::build("a rule document requires a `from` field"))?;
        let to_doc = fields.get("to");

        let (pattern_doc, template_doc) = if swapped {
            let pattern_doc = to_doc.ok_or_else(|| {
                EngineError::build("cannot reverse a rule with no `to` pattern")
            })?;
            (pattern_doc, Some(from_doc))
        } else {
            (from_doc, to_doc)
        };

        let from = build_pattern(pattern_doc)?;
        let to = template_doc.map(build_template).transpose()?;

        // `matches` pre-declares capture ids for documentation only (spec
        // §9, confirmed by SPEC_FULL.md §8): bare `*match` references in
        // `from`/`to` already unify by id, so this is syntax-checked and
        // otherwise discarded.
        if let Some(declared) = fields.get("matches") {
            let declared = declared
                .as_array()
                .ok_or_else(|| EngineError::build("`matches` must be an array"))?;
            for entry in declared {
                build_pattern(entry)?;
            }
        }

        let subtransforms = match fields.get("subtransforms") {
            Some(list) => {
                let list = list
                    .as_array()
                    .ok_or_else(|| EngineError::build("`subtransforms` must be an array"))?;
                list.iter()
                    .map(|doc| Rule::build(doc, swapped))
                    .collect::<Result<Vec<_>>>()?
            }
            None => Vec::new(),
        };

        Ok(Self { from, to, subtransforms })
    }

    /// Applies this rule to `node` and, recursively, to all of its
    /// descendants (spec §4.5). The three-phase descent: attempt a match
    /// at `node`, rebuild and run sub-rules on success, then recurse into
    /// `node`'s (possibly new) children regardless of whether `node`
    /// itself matched.
    pub fn apply(&self, node: &mut Value) -> Result<()> {
        self.apply_inner(node, &MatchMap::new())
    }

    fn apply_inner(&self, node: &mut Value, inherited: &MatchMap) -> Result<()> {
        let mut captures = inherited.clone();
        let mut steps = 0u64;
        if match_pattern(node, &self.from, &mut captures, &mut steps)? {
            if let Some(to) = &self.to {
                *node = materialize(to, &captures)?;
            }
            for sub in &self.subtransforms {
                sub.apply_inner(node, &captures)?;
            }
        }
        for child in node.children_mut() {
            self.apply_inner(child, &MatchMap::new())?;
        }
        Ok(())
    }
}
