//! Pattern builder and matcher (spec §4.2, §4.3): turns a rule document
//! fragment into a pattern tree, then walks a pattern against an input
//! tree, binding captures into a [`luxemog_value::MatchMap`].

mod builder;
mod matcher;

pub use builder::build_pattern;
pub use matcher::match_pattern;
