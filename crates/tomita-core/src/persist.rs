//! The persisted form of a compiled grammar (§6): the tuple `(rules,
//! trie, suffix dictionary, DFA, reduce, ereduce, ruledict)`, serialized
//! with `serde` + `bincode` as `logicaffeine-system`/`logos_core` do for
//! on-disk compiled state. The byte encoding is implementation-defined;
//! only the round-trip is load-bearing.

use std::collections::BTreeMap;

use tomita_runtime::{RuleId, StateId, Symbol, TomitaError, TomitaResult};

use crate::compile::{CompiledGrammar, Dfa, Item, Reduction, ReduceTables};
use crate::config::GrammarConfig;
use crate::rule::Rule;
use crate::store::RuleStore;
use crate::trie::Trie;

#[derive(serde::Serialize, serde::Deserialize)]
struct PersistedItem {
    rule: RuleId,
    dot: usize,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct PersistedConfig {
    auto_dict: bool,
    cost_level_penalty: bool,
    max_alternatives: usize,
}

/// The on-disk tuple. `suffix_dictionary` is carried through untouched:
/// the morphological post-processor that would populate it is out of
/// scope (§1), but the field is kept so the persisted shape matches the
/// documented seven-tuple. `ruledict` is likewise kept for fidelity even
/// though `load_compiled` recomputes it from `rules` rather than trust
/// the serialized copy.
#[derive(serde::Serialize, serde::Deserialize)]
struct PersistedGrammar {
    rules: Vec<Rule>,
    trie: Trie,
    suffix_dictionary: BTreeMap<String, String>,
    states: Vec<Vec<PersistedItem>>,
    transitions: Vec<(StateId, Symbol, StateId)>,
    reduce: Vec<(StateId, Vec<(RuleId, usize)>)>,
    ereduce: Vec<(StateId, Vec<RuleId>)>,
    ruledict: BTreeMap<Symbol, Vec<RuleId>>,
    config: PersistedConfig,
}

pub fn save_compiled(grammar: &CompiledGrammar) -> TomitaResult<Vec<u8>> {
    let states = grammar
        .dfa
        .states
        .iter()
        .map(|set| {
            set.iter()
                .map(|item| PersistedItem {
                    rule: item.rule,
                    dot: item.dot,
                })
                .collect()
        })
        .collect();

    let transitions = grammar
        .dfa
        .transitions
        .iter()
        .map(|((s, sym), t)| (*s, sym.clone(), *t))
        .collect();

    let reduce = grammar
        .tables
        .reduce
        .iter()
        .map(|(s, v)| (*s, v.iter().map(|r| (r.rule, r.dot)).collect()))
        .collect();

    let ereduce = grammar
        .tables
        .ereduce
        .iter()
        .map(|(s, v)| (*s, v.clone()))
        .collect();

    let ruledict = grammar
        .store
        .iter()
        .fold(BTreeMap::<Symbol, Vec<RuleId>>::new(), |mut acc, (id, r)| {
            acc.entry(r.head.clone()).or_default().push(id);
            acc
        });

    let persisted = PersistedGrammar {
        rules: grammar.store.iter().map(|(_, r)| r.clone()).collect(),
        trie: grammar.store.trie().clone(),
        suffix_dictionary: BTreeMap::new(),
        states,
        transitions,
        reduce,
        ereduce,
        ruledict,
        config: PersistedConfig {
            auto_dict: grammar.config.auto_dict,
            cost_level_penalty: grammar.config.cost_level_penalty,
            max_alternatives: grammar.config.max_alternatives,
        },
    };

    bincode::serialize(&persisted)
        .map_err(|e| TomitaError::grammar(format!("failed to serialize compiled grammar: {e}")))
}

pub fn load_compiled(bytes: &[u8]) -> TomitaResult<CompiledGrammar> {
    let persisted: PersistedGrammar = bincode::deserialize(bytes)
        .map_err(|e| TomitaError::grammar(format!("failed to deserialize compiled grammar: {e}")))?;

    let store = RuleStore::new(persisted.rules, persisted.trie)?;
    let nullable = crate::compile::compute_nullable(&store);

    let states = persisted
        .states
        .into_iter()
        .map(|items| {
            items
                .into_iter()
                .map(|i| Item {
                    rule: i.rule,
                    dot: i.dot,
                })
                .collect()
        })
        .collect();

    let transitions = persisted
        .transitions
        .into_iter()
        .map(|(s, sym, t)| ((s, sym), t))
        .collect();

    let dfa = Dfa { states, transitions };

    let reduce = persisted
        .reduce
        .into_iter()
        .map(|(s, v)| {
            (
                s,
                v.into_iter()
                    .map(|(rule, dot)| Reduction { rule, dot })
                    .collect(),
            )
        })
        .collect();

    let ereduce = persisted.ereduce.into_iter().collect();

    let tables = ReduceTables { reduce, ereduce };

    let config = GrammarConfig::new()
        .auto_dict(persisted.config.auto_dict)
        .cost_level_penalty(persisted.config.cost_level_penalty)
        .max_alternatives(persisted.config.max_alternatives);

    Ok(CompiledGrammar {
        store,
        nullable,
        dfa,
        tables,
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;
    use tomita_runtime::Symbol;

    #[test]
    fn round_trips_a_small_grammar() {
        let rules = vec![
            Rule::augmented_start(Symbol::new("S")),
            Rule {
                head: Symbol::new("S"),
                left: vec![Symbol::new("i")],
                ..Rule::augmented_start(Symbol::new("S"))
            },
        ];
        let store = RuleStore::new(rules, Trie::new()).unwrap();
        let compiled = compile(store, GrammarConfig::default()).unwrap();

        let bytes = save_compiled(&compiled).unwrap();
        let reloaded = load_compiled(&bytes).unwrap();

        assert_eq!(reloaded.store.rule_count(), compiled.store.rule_count());
        assert_eq!(reloaded.dfa.state_count(), compiled.dfa.state_count());
    }
}
