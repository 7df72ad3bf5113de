//! Rule store, phrase trie, and LR(0) grammar compiler (C1, C2).

pub mod compile;
mod config;
mod rule;
mod store;
mod trie;

#[cfg(feature = "serde")]
mod persist;

pub use compile::{compile, CompiledGrammar, Dfa, ReduceTables};
pub use config::GrammarConfig;
pub use rule::{RightItem, Rule};
pub use store::RuleStore;
pub use trie::Trie;

#[cfg(feature = "serde")]
pub use persist::{load_compiled, save_compiled};
