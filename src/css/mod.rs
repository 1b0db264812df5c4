//! Styling surface: selector tokenizer/parser, selector AST, textual style rules.

pub mod tokenizer;
pub mod model;
pub mod parser;
pub mod rules;

pub use model::{Combinator, CompoundSelector, Selector, SelectorComponent, SelectorPart};
pub use parser::{parse_selector_list, SelectorError};
pub use rules::{parse_rules, Declaration, RuleList, StyleRule};
