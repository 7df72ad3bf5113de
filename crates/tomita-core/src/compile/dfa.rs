use std::collections::{BTreeMap, HashMap, VecDeque};

use tomita_runtime::{StateId, Symbol};

use crate::compile::items::{closure, Item, ItemSet};
use crate::store::RuleStore;
use tomita_runtime::RuleId;

/// The LR(0) DFA: states in discovery order and their transitions.
/// `(state, symbol)` has at most one successor (P2).
#[derive(Clone, Debug, Default)]
pub struct Dfa {
    pub states: Vec<ItemSet>,
    pub transitions: HashMap<(StateId, Symbol), StateId>,
}

impl Dfa {
    pub fn get(&self, state: StateId, symbol: &Symbol) -> Option<StateId> {
        self.transitions.get(&(state, symbol.clone())).copied()
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }
}

/// Subset construction from state 0 = closure of `{(rule 0, dot 0)}`.
/// Groups each state's items by the symbol after the dot (symbols
/// visited in sorted order via `BTreeMap`) and recurses on each group's
/// closure, assigning state ids in discovery order for reproducibility
/// (§4.2 Determinism, P7).
pub fn build_dfa(store: &RuleStore) -> Dfa {
    let start_kernel: ItemSet = [Item {
        rule: RuleId::from(0u32),
        dot: 0,
    }]
    .into_iter()
    .collect();
    let start_set = closure(store, start_kernel);

    let mut states: Vec<ItemSet> = vec![start_set.clone()];
    let mut index: HashMap<ItemSet, StateId> = HashMap::new();
    index.insert(start_set, StateId::from(0u32));

    let mut transitions: HashMap<(StateId, Symbol), StateId> = HashMap::new();
    let mut queue: VecDeque<StateId> = VecDeque::from([StateId::from(0u32)]);

    while let Some(sid) = queue.pop_front() {
        let item_set = states[sid.index()].clone();
        let mut groups: BTreeMap<Symbol, ItemSet> = BTreeMap::new();
        for item in &item_set {
            let rule = store.rule(item.rule);
            if let Some(sym) = rule.left.get(item.dot).cloned() {
                groups.entry(sym).or_default().insert(Item {
                    rule: item.rule,
                    dot: item.dot + 1,
                });
            }
        }

        for (sym, kernel) in groups {
            let target = closure(store, kernel);
            let target_id = match index.get(&target) {
                Some(&id) => id,
                None => {
                    let id = StateId::from(states.len());
                    states.push(target.clone());
                    index.insert(target, id);
                    queue.push_back(id);
                    id
                }
            };
            transitions.insert((sid, sym), target_id);
        }
    }

    Dfa { states, transitions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;
    use crate::trie::Trie;
    use tomita_runtime::Symbol;

    #[test]
    fn deterministic_transitions_for_simple_grammar() {
        let rules = vec![
            Rule::augmented_start(Symbol::new("S")),
            Rule {
                head: Symbol::new("S"),
                left: vec![Symbol::new("NP"), Symbol::new("VP")],
                ..Rule::augmented_start(Symbol::new("S"))
            },
            Rule {
                head: Symbol::new("NP"),
                left: vec![Symbol::new("i")],
                ..Rule::augmented_start(Symbol::new("S"))
            },
            Rule {
                head: Symbol::new("VP"),
                left: vec![Symbol::new("saw")],
                ..Rule::augmented_start(Symbol::new("S"))
            },
        ];
        let store = RuleStore::new(rules, Trie::new()).unwrap();
        let dfa = build_dfa(&store);
        assert!(dfa.state_count() >= 3);
        let s0 = StateId::from(0u32);
        let np_state = dfa.get(s0, &Symbol::new("NP"));
        assert!(np_state.is_some());
    }
}
