use std::rc::Rc;

use tomita_core::{compile, GrammarConfig, RightItem, Rule, RuleStore, Trie};
use tomita_recognize::{build_forest, recognize};
use tomita_runtime::{FeatureMap, FeatureValue, ParamSlot, Symbol, Token, TomitaError};

use crate::{translate, unify_upward, TransChild, TranslatedForest};

fn toks(s: &str) -> Vec<Token> {
    s.split_whitespace().map(Token::from).collect()
}

/// Walks one deterministic path through a (possibly ambiguous)
/// translated forest, always following the first surviving alternative —
/// enough to read back a concrete surface string in tests where the
/// grammar is unambiguous.
fn flatten(forest: &TranslatedForest, id: tomita_runtime::NodeId) -> Vec<String> {
    let node = forest.node(id);
    let mut out = Vec::new();
    for child in &node.right {
        match child {
            TransChild::Terminal(tok) => out.push(tok.to_string()),
            TransChild::Nested(ids) => out.extend(flatten(forest, ids[0])),
        }
    }
    out
}

/// `S -> NP VP` translates with the target order reversed
/// (`right = [BackRef(1), BackRef(0)]`), exercising back-reference
/// reordering end to end (spec scenario: translation with
/// back-references).
#[test]
fn translate_reorders_backreferences_end_to_end() {
    let rules = vec![
        Rule::augmented_start(Symbol::new("S")),
        Rule {
            head: Symbol::new("S"),
            left: vec![Symbol::new("NP"), Symbol::new("VP")],
            right: vec![RightItem::BackRef(1), RightItem::BackRef(0)],
            feat: FeatureMap::new(),
            checklist: Vec::new(),
            lparam: vec![ParamSlot::NonTerminal(None), ParamSlot::NonTerminal(None)],
            rparam: vec![ParamSlot::NonTerminal(None), ParamSlot::NonTerminal(None)],
            cost: 0,
            cut: false,
        },
        Rule {
            head: Symbol::new("NP"),
            left: vec![Symbol::new("i")],
            right: vec![RightItem::Terminal(Symbol::new("ben"))],
            feat: FeatureMap::new(),
            checklist: Vec::new(),
            lparam: vec![ParamSlot::Terminal],
            rparam: vec![ParamSlot::Terminal],
            cost: 0,
            cut: false,
        },
        Rule {
            head: Symbol::new("VP"),
            left: vec![Symbol::new("sleeps")],
            right: vec![RightItem::Terminal(Symbol::new("uyur"))],
            feat: FeatureMap::new(),
            checklist: Vec::new(),
            lparam: vec![ParamSlot::Terminal],
            rparam: vec![ParamSlot::Terminal],
            cost: 0,
            cut: false,
        },
    ];
    let store = RuleStore::new(rules, Trie::new()).unwrap();
    let grammar = compile(store, GrammarConfig::default()).unwrap();

    let tokens = toks("i sleeps");
    let state = recognize(&grammar, &tokens).unwrap();
    let forest = build_forest(&state, &grammar).unwrap();
    let unified = unify_upward(&forest, &grammar).unwrap();
    let translated = translate(&unified, &grammar).unwrap();

    assert_eq!(translated.roots.len(), 1);
    let words = flatten(&translated, translated.roots[0]);
    assert_eq!(words, vec!["uyur".to_string(), "ben".to_string()]);
}

/// A `*name` feature reference to an uppercase literal expands through
/// `make_trans_tree` into a brand-new output-only subtree with no
/// counterpart on the input side (spec scenario: `*k` feature
/// reference).
#[test]
fn feature_reference_expands_output_only_nonterminal() {
    let mut feat = FeatureMap::new();
    feat.insert(Rc::from("aux"), FeatureValue::Literal("Helper".to_string()));

    let rules = vec![
        Rule::augmented_start(Symbol::new("S")),
        Rule {
            head: Symbol::new("S"),
            left: vec![Symbol::new("w")],
            right: vec![RightItem::FeatureRef(Rc::from("aux"))],
            feat,
            checklist: Vec::new(),
            lparam: vec![ParamSlot::Terminal],
            rparam: vec![ParamSlot::NonTerminal(None)],
            cost: 0,
            cut: false,
        },
        Rule {
            head: Symbol::new("Helper"),
            left: vec![Symbol::new("x")],
            right: vec![RightItem::Terminal(Symbol::new("y"))],
            feat: FeatureMap::new(),
            checklist: Vec::new(),
            lparam: vec![ParamSlot::Terminal],
            rparam: vec![ParamSlot::Terminal],
            cost: 0,
            cut: false,
        },
    ];
    let store = RuleStore::new(rules, Trie::new()).unwrap();
    let grammar = compile(store, GrammarConfig::default()).unwrap();

    let tokens = toks("w");
    let state = recognize(&grammar, &tokens).unwrap();
    let forest = build_forest(&state, &grammar).unwrap();
    let unified = unify_upward(&forest, &grammar).unwrap();
    let translated = translate(&unified, &grammar).unwrap();

    let words = flatten(&translated, translated.roots[0]);
    assert_eq!(words, vec!["y".to_string()]);
}

/// Referencing a symbol with zero rules at all is a `Parse` error, never
/// a `Unify` error (the `make_trans_tree` "no rule defined" distinction
/// supplemented from the original source).
#[test]
fn feature_reference_to_undefined_symbol_is_a_parse_error() {
    let mut feat = FeatureMap::new();
    feat.insert(Rc::from("aux"), FeatureValue::Literal("Nowhere".to_string()));

    let rules = vec![
        Rule::augmented_start(Symbol::new("S")),
        Rule {
            head: Symbol::new("S"),
            left: vec![Symbol::new("w")],
            right: vec![RightItem::FeatureRef(Rc::from("aux"))],
            feat,
            checklist: Vec::new(),
            lparam: vec![ParamSlot::Terminal],
            rparam: vec![ParamSlot::NonTerminal(None)],
            cost: 0,
            cut: false,
        },
    ];
    let store = RuleStore::new(rules, Trie::new()).unwrap();
    let grammar = compile(store, GrammarConfig::default()).unwrap();

    let tokens = toks("w");
    let state = recognize(&grammar, &tokens).unwrap();
    let forest = build_forest(&state, &grammar).unwrap();
    let unified = unify_upward(&forest, &grammar).unwrap();
    let err = translate(&unified, &grammar).unwrap_err();
    assert!(matches!(err, TomitaError::Parse { .. }));
}
