//! The tree value model, capture environment, and shared error type for
//! the luxemog rewrite engine.

mod error;
mod match_map;
mod special;
mod value;

pub use error::{EngineError, Result};
pub use match_map::MatchMap;
pub use special::{eval_regex_list, FormatPart, FormatString, RegexList, RegexSpec, Special};
pub use value::{OrderedMap, Shape, Value};
