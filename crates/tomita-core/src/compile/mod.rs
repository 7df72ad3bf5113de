mod dfa;
mod items;
mod nullable;
mod reduce;

pub use dfa::Dfa;
pub use items::{closure, Item, ItemSet};
pub use nullable::compute_nullable;
pub use reduce::{build_reduce_tables, Reduction, ReduceTables};

use std::collections::HashSet;

use tomita_runtime::{Symbol, TomitaResult};

use crate::config::GrammarConfig;
use crate::store::RuleStore;

/// The immutable, frozen output of the grammar compiler (C2): the rule
/// store it was built from plus the derived nullable set, DFA, and
/// reduce/empty-reduce tables. Shared read-only across concurrent
/// parses once built (§5).
pub struct CompiledGrammar {
    pub store: RuleStore,
    pub nullable: HashSet<Symbol>,
    pub dfa: Dfa,
    pub tables: ReduceTables,
    pub config: GrammarConfig,
}

impl CompiledGrammar {
    pub fn start_state(&self) -> tomita_runtime::StateId {
        tomita_runtime::StateId::from(0u32)
    }
}

/// Derives `ruledict` (via `RuleStore`), the nullable set, the DFA
/// transition table, and the reduce/empty-reduce tables from a compiled
/// rule store (§2, §4.2).
pub fn compile(store: RuleStore, config: GrammarConfig) -> TomitaResult<CompiledGrammar> {
    log::info!(
        "compiling grammar: {} rules, auto_dict={}",
        store.rule_count(),
        config.auto_dict
    );

    let nullable = compute_nullable(&store);
    log::debug!("nullable set: {} symbols", nullable.len());

    let dfa = dfa::build_dfa(&store);
    log::debug!("dfa built: {} states", dfa.state_count());

    let tables = build_reduce_tables(&store, &dfa, &nullable);
    log::debug!(
        "reduce tables built: {} reduce states, {} ereduce states",
        tables.reduce.len(),
        tables.ereduce.len()
    );

    Ok(CompiledGrammar {
        store,
        nullable,
        dfa,
        tables,
        config,
    })
}
