//! Rule driver and rule-list façade (spec §4.5, §4.6): compiles a rule
//! document into a [`Rule`], applies it to a tree with the three-phase
//! descent of §4.5, and holds an ordered, optionally-reversed collection
//! of rules (a [`RuleList`]).

mod rule;
mod rule_list;

pub use rule::Rule;
pub use rule_list::RuleList;
