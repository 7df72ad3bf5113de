use std::collections::{HashMap, HashSet};

use tomita_runtime::{RuleId, StateId, Symbol};

use crate::compile::dfa::Dfa;
use crate::store::RuleStore;

/// A reduction recorded at a state: the rule to reduce and the dot
/// position actually reached (which may be less than `left.len()` when
/// the remaining tail is all-nullable and gets right-nulled in rather
/// than shifted).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reduction {
    pub rule: RuleId,
    pub dot: usize,
}

/// Reduce and empty-reduce tables keyed by state (§4.2).
#[derive(Clone, Debug, Default)]
pub struct ReduceTables {
    pub reduce: HashMap<StateId, Vec<Reduction>>,
    pub ereduce: HashMap<StateId, Vec<RuleId>>,
}

fn tail_all_nullable(rule_left: &[Symbol], dot: usize, nullable: &HashSet<Symbol>) -> bool {
    rule_left[dot..].iter().all(|s| nullable.contains(s))
}

/// For each state and each item whose remaining tail is entirely
/// nullable: `dot == 0` registers an empty-reduction, otherwise a
/// reduction retaining the dot position so the recognizer can
/// right-null the rest of the tail in (§4.2, §4.3).
pub fn build_reduce_tables(
    store: &RuleStore,
    dfa: &Dfa,
    nullable: &HashSet<Symbol>,
) -> ReduceTables {
    let mut tables = ReduceTables::default();

    for (idx, item_set) in dfa.states.iter().enumerate() {
        let sid = StateId::from(idx);
        for item in item_set {
            let rule = store.rule(item.rule);
            if item.dot > rule.left.len() {
                continue;
            }
            if !tail_all_nullable(&rule.left, item.dot, nullable) {
                continue;
            }
            if item.dot == 0 {
                tables.ereduce.entry(sid).or_default().push(item.rule);
            } else {
                tables.reduce.entry(sid).or_default().push(Reduction {
                    rule: item.rule,
                    dot: item.dot,
                });
            }
        }
    }

    tables
}
