//! Split resolver: decides whether a description names a handle + knot
//! composite, cuts it at the separator, and records which part came first.

mod resolver;
mod rules;

pub use resolver::{CompositeSplit, SplitOutcome, SplitResolver};
pub use rules::{SeparatorRule, SplitRules, SplitRulesError};
