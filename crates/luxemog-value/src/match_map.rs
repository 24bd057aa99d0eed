use std::collections::HashMap;

use crate::error::{EngineError, Result};
use crate::value::Value;

/// The capture environment threaded through a single match attempt.
///
/// Tree captures (`*match`) and string captures (`*regex`/`*type_regex`
/// named groups) are stored separately -- a tree capture is looked up by a
/// `*match` template, a string capture by a `*string`/`*type` format
/// reference -- but they share one id namespace (spec §4.1): an id may be
/// written at most once across a successful match attempt, whichever space
/// claims it first. A second write for the same id, in either space, is a
/// binding error (spec §4.3) -- this is what makes backtracking at `*alt`
/// sound, since a fresh clone of the pre-alternative environment is always
/// available to retry the next alternative.
#[derive(Debug, Clone, Default)]
pub struct MatchMap {
    trees: HashMap<String, Value>,
    strings: HashMap<String, String>,
}

impl MatchMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unused(&self, id: &str) -> Result<()> {
        if self.trees.contains_key(id) || self.strings.contains_key(id) {
            return Err(EngineError::binding(format!(
                "capture `{id}` is already bound"
            )));
        }
        Ok(())
    }

    pub fn bind_tree(&mut self, id: &str, value: Value) -> Result<()> {
        self.check_unused(id)?;
        self.trees.insert(id.to_string(), value);
        Ok(())
    }

    pub fn bind_string(&mut self, id: &str, value: String) -> Result<()> {
        self.check_unused(id)?;
        self.strings.insert(id.to_string(), value);
        Ok(())
    }

    pub fn get_tree(&self, id: &str) -> Option<&Value> {
        self.trees.get(id)
    }

    pub fn get_string(&self, id: &str) -> Option<&str> {
        self.strings.get(id).map(String::as_str)
    }
}
