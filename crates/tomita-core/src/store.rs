use std::collections::HashMap;

use tomita_runtime::{RuleId, Symbol, TomitaError, TomitaResult};

use crate::rule::Rule;
use crate::trie::Trie;

/// Owns the immutable set of compiled rules plus the terminal-phrase
/// trie (C1). Rule 0 is always the augmented start rule (P1).
#[derive(Clone, Debug)]
pub struct RuleStore {
    rules: Vec<Rule>,
    by_head: HashMap<Symbol, Vec<RuleId>>,
    trie: Trie,
}

impl RuleStore {
    /// Builds a store from an externally-produced rule list (already
    /// decoded from the grammar-text boundary format, per §6) plus a
    /// trie for multi-token lexical entries. `rules[0]` must be the
    /// augmented start rule.
    pub fn new(rules: Vec<Rule>, trie: Trie) -> TomitaResult<Self> {
        let start = Symbol::start();
        match rules.first() {
            Some(r) if r.head == start => {}
            _ => {
                return Err(TomitaError::grammar(
                    "rule 0 must be the augmented start rule S' -> S",
                ))
            }
        }

        let mut by_head: HashMap<Symbol, Vec<RuleId>> = HashMap::new();
        for (idx, rule) in rules.iter().enumerate() {
            by_head.entry(rule.head.clone()).or_default().push(RuleId::from(idx));
        }

        Ok(RuleStore { rules, by_head, trie })
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.index()]
    }

    pub fn rules_for(&self, head: &Symbol) -> &[RuleId] {
        self.by_head.get(head).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    pub fn start_symbol(&self) -> &Symbol {
        &self.rules[0].left[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = (RuleId, &Rule)> {
        self.rules.iter().enumerate().map(|(i, r)| (RuleId::from(i), r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;

    #[test]
    fn rejects_non_augmented_rule_zero() {
        let start = Rule::augmented_start(Symbol::new("S"));
        let bad = vec![Rule {
            head: Symbol::new("S"),
            ..start
        }];
        assert!(RuleStore::new(bad, Trie::new()).is_err());
    }

    #[test]
    fn accepts_augmented_rule_zero() {
        let rules = vec![Rule::augmented_start(Symbol::new("S"))];
        let store = RuleStore::new(rules, Trie::new()).unwrap();
        assert_eq!(store.rule_count(), 1);
        assert_eq!(store.start_symbol(), &Symbol::new("S"));
    }
}
