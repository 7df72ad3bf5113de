use std::collections::HashSet;

use tomita_runtime::Symbol;

use crate::store::RuleStore;

/// The least fixed point of "a head is nullable if some rule for it has
/// an all-nullable left side" (§4.2, P3). Only nonterminal symbols are
/// ever inserted: a terminal can never be nullable, so a rule whose left
/// side contains one is correctly excluded by the membership test below.
pub fn compute_nullable(store: &RuleStore) -> HashSet<Symbol> {
    let mut nullable: HashSet<Symbol> = HashSet::new();
    loop {
        let mut changed = false;
        for (_, rule) in store.iter() {
            if nullable.contains(&rule.head) {
                continue;
            }
            if rule.left.iter().all(|s| nullable.contains(s)) {
                nullable.insert(rule.head.clone());
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    nullable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Rule, RightItem};
    use crate::trie::Trie;
    use tomita_runtime::ParamSlot;

    fn simple_rule(head: &str, left: Vec<&str>) -> Rule {
        Rule {
            head: Symbol::new(head),
            left: left.iter().map(|s| Symbol::new(*s)).collect(),
            right: vec![RightItem::BackRef(0)],
            feat: Default::default(),
            checklist: Vec::new(),
            lparam: left.iter().map(|_| ParamSlot::NonTerminal(None)).collect(),
            rparam: vec![ParamSlot::NonTerminal(None)],
            cost: 0,
            cut: false,
        }
    }

    #[test]
    fn empty_production_makes_head_nullable() {
        let rules = vec![
            Rule::augmented_start(Symbol::new("S")),
            simple_rule("S", vec!["Det", "N"]),
            simple_rule("Det", vec![]),
        ];
        let store = RuleStore::new(rules, Trie::new()).unwrap();
        let nullable = compute_nullable(&store);
        assert!(nullable.contains(&Symbol::new("Det")));
        assert!(!nullable.contains(&Symbol::new("S")));
    }

    #[test]
    fn transitive_nullability() {
        let rules = vec![
            Rule::augmented_start(Symbol::new("S")),
            simple_rule("S", vec!["A"]),
            simple_rule("A", vec!["B"]),
            simple_rule("B", vec![]),
        ];
        let store = RuleStore::new(rules, Trie::new()).unwrap();
        let nullable = compute_nullable(&store);
        assert!(nullable.contains(&Symbol::new("B")));
        assert!(nullable.contains(&Symbol::new("A")));
        assert!(nullable.contains(&Symbol::new("S")));
    }
}
