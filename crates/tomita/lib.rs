//! Facade crate: re-exports the pipeline stages behind the Core API
//! (compile → parse → forest → unify → translate → enumerate) as a
//! single dependency, mirroring the teacher's top-level facade crate
//! which exists solely to re-export its per-stage crates behind one
//! `lib.rs`.

pub use tomita_core::{compile, CompiledGrammar, GrammarConfig, Rule, RuleStore, Trie};
pub use tomita_enum::{enumerate, Candidate, Enumerator, IdentityPostProcessor, PostProcessor};
pub use tomita_recognize::{build_forest, recognize, ParseForest, RecognizerState};
pub use tomita_runtime::{
    FeatureCheck, FeatureMap, FeatureValue, NodeId, RuleId, StateId, Symbol, Token, TomitaError,
    TomitaResult,
};
pub use tomita_unify::{translate, unify_upward, TranslatedForest};

/// Runs the whole pipeline (compile excluded — callers compile once and
/// reuse the result across many parses) over one token sequence,
/// stopping at the first stage that fails.
pub fn translate_tokens(grammar: &CompiledGrammar, tokens: &[Token]) -> TomitaResult<TranslatedForest> {
    let state = recognize(grammar, tokens)?;
    let forest = build_forest(&state, grammar)?;
    let unified = unify_upward(&forest, grammar)?;
    translate(&unified, grammar)
}

/// Runs the whole pipeline through enumeration, draining the lazy C7
/// sequence (`enumerate`) into a `Vec` and sorting it ascending by cost
/// — the same collect-then-sort a caller performs at its own call site
/// when it wants every candidate rather than the first few
/// (`parser.py: trans_sent`'s own `result.sort(...)` after `enumx()`).
/// Fails only if every candidate's post-processing failed.
pub fn translate_and_enumerate(
    grammar: &CompiledGrammar,
    tokens: &[Token],
    post: &dyn PostProcessor,
) -> TomitaResult<Vec<Candidate>> {
    let translated = translate_tokens(grammar, tokens)?;

    let mut results = Vec::new();
    let mut last_error = None;
    for item in enumerate(&translated, grammar, post) {
        match item {
            Ok(candidate) => results.push(candidate),
            Err(e) => last_error = Some(e),
        }
    }
    if results.is_empty() {
        return Err(last_error.unwrap_or_else(|| TomitaError::post_process("no candidate to post-process")));
    }

    results.sort_by_key(|c| c.cost);
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<Token> {
        s.split_whitespace().map(Token::from).collect()
    }

    #[test]
    fn pipeline_runs_end_to_end_on_a_trivial_grammar() {
        let rules = vec![
            Rule::augmented_start(Symbol::new("S")),
            Rule {
                head: Symbol::new("S"),
                left: vec![Symbol::new("hi")],
                right: vec![tomita_core::RightItem::Terminal(Symbol::new("merhaba"))],
                feat: FeatureMap::new(),
                checklist: Vec::new(),
                lparam: vec![tomita_runtime::ParamSlot::Terminal],
                rparam: vec![tomita_runtime::ParamSlot::Terminal],
                cost: 0,
                cut: false,
            },
        ];
        let store = RuleStore::new(rules, Trie::new()).unwrap();
        let grammar = compile(store, GrammarConfig::default()).unwrap();

        let results = translate_and_enumerate(&grammar, &toks("hi"), &IdentityPostProcessor).unwrap();
        assert_eq!(results[0].text, "merhaba");
    }
}
