use std::rc::Rc;

use tomita_runtime::{FeatureCheck, FeatureMap, ParamSlot, Symbol};

/// A position in a rule's `right` sequence: a terminal, a back-reference
/// into `left`, a `*name` feature reference (§4.6), or a standalone
/// output-only nonterminal. Replaces the source's mixed int/string
/// typing, including its leading-`*`-prefix string convention, with a
/// tagged variant (Design Notes, "polymorphism over symbol positions").
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RightItem {
    Terminal(Symbol),
    BackRef(usize),
    FeatureRef(Rc<str>),
    NonTerminal(Symbol),
}

/// A compiled production rule: the input side (`left`), the output side
/// (`right`), feature constraints, and per-alternative metadata.
///
/// Rules are hashable and compared structurally in the source; here
/// structural equality is `#[derive(PartialEq)]` and hashing is left to
/// callers that key on `RuleId` instead, since `FeatureMap`'s values are
/// not all `Hash`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    pub head: Symbol,
    pub left: Vec<Symbol>,
    pub right: Vec<RightItem>,
    pub feat: FeatureMap,
    pub checklist: Vec<(std::rc::Rc<str>, FeatureCheck)>,
    pub lparam: Vec<ParamSlot>,
    pub rparam: Vec<ParamSlot>,
    pub cost: i64,
    pub cut: bool,
}

impl Rule {
    /// The augmented start rule `S' -> S`, always rule 0 in a `RuleStore`.
    pub fn augmented_start(start: Symbol) -> Self {
        Rule {
            head: Symbol::start(),
            left: vec![start],
            right: vec![RightItem::BackRef(0)],
            feat: FeatureMap::new(),
            checklist: Vec::new(),
            lparam: vec![ParamSlot::NonTerminal(None)],
            rparam: vec![ParamSlot::NonTerminal(None)],
            cost: 0,
            cut: false,
        }
    }

    /// True when every symbol on the left side is a terminal: such a
    /// rule may be folded entirely into the trie when `auto_dict` is set
    /// (§4.1), never entering the DFA-visible ruleset.
    pub fn is_terminal_only(&self) -> bool {
        self.left.iter().all(Symbol::is_terminal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn augmented_start_shape() {
        let rule = Rule::augmented_start(Symbol::new("S"));
        assert_eq!(rule.head, Symbol::start());
        assert_eq!(rule.left, vec![Symbol::new("S")]);
        assert_eq!(rule.right, vec![RightItem::BackRef(0)]);
    }
}
