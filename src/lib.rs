//! luxemog: a declarative tree-rewriting engine. A document is a rooted,
//! optionally-typed tree of primitives, objects, and arrays; rewrite
//! rules are themselves trees, each naming a `from` pattern and a `to`
//! template. See `SPEC_FULL.md` for the full design.

pub use luxemog_codec as codec;
pub use luxemog_pattern as pattern;
pub use luxemog_rule as rule;
pub use luxemog_transform as transform;
pub use luxemog_value as value;

pub use luxemog_rule::{Rule, RuleList};
pub use luxemog_value::{EngineError, MatchMap, OrderedMap, Result, Shape, Special, Value};
