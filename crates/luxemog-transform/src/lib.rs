//! Template builder and runtime builder (spec §4.4, §4.7): turns a rule
//! document's `to` fragment into a template tree at parse time, then
//! walks a template against a populated `MatchMap` to synthesise output
//! at apply time.

mod builder;
mod materialize;

pub use builder::build_template;
pub use materialize::materialize;
