//! Golden-file scenario fixtures shared by the `tests/` integration
//! suite. Carries no pipeline logic of its own — every rule set below
//! builds the grammars described in the six end-to-end scenarios, by
//! hand, since the grammar-text reader is an external collaborator
//! (out of scope).

use std::rc::Rc;

use tomita_core::{RightItem, Rule, RuleStore, Trie};
use tomita_runtime::{FParam, FeatureMap, FeatureValue, ParamKind, ParamSlot, Symbol, Token};

pub fn toks(s: &str) -> Vec<Token> {
    s.split_whitespace().map(Token::from).collect()
}

fn nonterm(param: Option<FParam>) -> ParamSlot {
    ParamSlot::NonTerminal(param)
}

fn plain_rule(head: &str, left: Vec<&str>, right: Vec<RightItem>, cost: i64) -> Rule {
    let lparam = left
        .iter()
        .map(|s| if Symbol::new(*s).is_terminal() { ParamSlot::Terminal } else { nonterm(None) })
        .collect();
    let rparam = right
        .iter()
        .map(|item| match item {
            RightItem::Terminal(_) => ParamSlot::Terminal,
            _ => nonterm(None),
        })
        .collect();
    Rule {
        head: Symbol::new(head),
        left: left.into_iter().map(Symbol::new).collect(),
        right,
        feat: FeatureMap::new(),
        checklist: Vec::new(),
        lparam,
        rparam,
        cost,
        cut: false,
    }
}

/// Scenario 1/2's PP-attachment grammar (§8): `S -> NP VP | S PP`,
/// `NP -> i | the man | the telescope | the house | NP PP`,
/// `PP -> in NP | with NP`, `VP -> saw NP`. Two PPs attaching at either
/// `S` or the innermost `NP` produces five distinct bracketings.
pub fn pp_attachment_grammar() -> RuleStore {
    let rules = vec![
        Rule::augmented_start(Symbol::new("S")),
        plain_rule("S", vec!["NP", "VP"], vec![RightItem::BackRef(0), RightItem::BackRef(1)], 0),
        plain_rule("S", vec!["S", "PP"], vec![RightItem::BackRef(0), RightItem::BackRef(1)], 0),
        plain_rule("NP", vec!["i"], vec![RightItem::Terminal(Symbol::new("ben"))], 0),
        plain_rule(
            "NP",
            vec!["the", "man"],
            vec![RightItem::Terminal(Symbol::new("adam"))],
            0,
        ),
        plain_rule(
            "NP",
            vec!["the", "telescope"],
            vec![RightItem::Terminal(Symbol::new("dürbün"))],
            0,
        ),
        plain_rule(
            "NP",
            vec!["the", "house"],
            vec![RightItem::Terminal(Symbol::new("ev"))],
            0,
        ),
        plain_rule("NP", vec!["NP", "PP"], vec![RightItem::BackRef(1), RightItem::BackRef(0)], 0),
        plain_rule(
            "PP",
            vec!["in", "NP"],
            vec![RightItem::BackRef(1), RightItem::Terminal(Symbol::new("içinde"))],
            0,
        ),
        plain_rule(
            "PP",
            vec!["with", "NP"],
            vec![RightItem::BackRef(1), RightItem::Terminal(Symbol::new("ile"))],
            0,
        ),
        plain_rule("VP", vec!["saw", "NP"], vec![RightItem::Terminal(Symbol::new("gördü")), RightItem::BackRef(1)], 0),
    ];
    RuleStore::new(rules, Trie::new()).unwrap()
}

pub const PP_ATTACHMENT_SENTENCE: &str = "i saw the man in the house with the telescope";

/// Scenario 3's agreement grammar: `S -> NP VP` requires matching
/// `numb` between subject and verb. `a man` is singular, `watch`
/// (bare plural form) disagrees, forcing a unification clash.
pub fn agreement_clash_grammar() -> RuleStore {
    let mut numb_ref = FeatureMap::new();
    numb_ref.insert(Rc::from("numb"), FeatureValue::Reference("numb".to_string()));
    let np_param = nonterm(Some(FParam::new(numb_ref.clone(), ParamKind::Only)));
    let vp_param = nonterm(Some(FParam::new(numb_ref, ParamKind::Only)));

    let mut s_rule = plain_rule("S", vec!["NP", "VP"], vec![RightItem::BackRef(0), RightItem::BackRef(1)], 0);
    s_rule.lparam = vec![np_param, vp_param];

    let mut np_sing = plain_rule("NP", vec!["a", "man"], vec![RightItem::Terminal(Symbol::new("a-man"))], 0);
    np_sing.feat.insert(Rc::from("numb"), FeatureValue::Literal("sing".to_string()));

    let mut vp_plur = plain_rule("VP", vec!["watch", "us"], vec![RightItem::Terminal(Symbol::new("watch-us"))], 0);
    vp_plur.feat.insert(Rc::from("numb"), FeatureValue::Literal("plur".to_string()));

    let rules = vec![Rule::augmented_start(Symbol::new("S")), s_rule, np_sing, vp_plur];
    RuleStore::new(rules, Trie::new()).unwrap()
}

/// Scenario 4: `Det -> this | these | the | ε`, so `men watch us`
/// parses with the empty determiner alternative.
pub fn nullable_determiner_grammar() -> RuleStore {
    let rules = vec![
        Rule::augmented_start(Symbol::new("S")),
        plain_rule(
            "S",
            vec!["Det", "NP", "VP"],
            vec![RightItem::BackRef(0), RightItem::BackRef(1), RightItem::BackRef(2)],
            0,
        ),
        plain_rule("Det", vec!["this"], vec![RightItem::Terminal(Symbol::new("this"))], 0),
        plain_rule("Det", vec!["these"], vec![RightItem::Terminal(Symbol::new("these"))], 0),
        plain_rule("Det", vec!["the"], vec![RightItem::Terminal(Symbol::new("the"))], 0),
        plain_rule("Det", vec![], vec![], 0),
        plain_rule("NP", vec!["men"], vec![RightItem::Terminal(Symbol::new("men"))], 0),
        plain_rule("VP", vec!["watch", "us"], vec![RightItem::Terminal(Symbol::new("watch-us"))], 0),
    ];
    RuleStore::new(rules, Trie::new()).unwrap()
}

/// Scenario 5: two rules for the same head produce the same surface
/// form at different costs.
pub fn cost_ranked_ties_grammar() -> RuleStore {
    let rules = vec![
        Rule::augmented_start(Symbol::new("S")),
        plain_rule("S", vec!["NP"], vec![RightItem::BackRef(0)], 0),
        plain_rule("NP", vec!["bank"], vec![RightItem::Terminal(Symbol::new("bank"))], 0),
        plain_rule("NP", vec!["bank"], vec![RightItem::Terminal(Symbol::new("bank"))], 3),
    ];
    RuleStore::new(rules, Trie::new()).unwrap()
}

/// Scenario 6: a rule's feature map has `case=*1` (a back-reference to
/// left position 1); after upward unification it resolves to the
/// subtree matched at that position, which the translator's `*name`
/// reference then consults.
pub fn feature_backref_grammar() -> RuleStore {
    let mut s_rule = plain_rule(
        "S",
        vec!["NP", "VP"],
        vec![RightItem::FeatureRef(Rc::from("case"))],
        0,
    );
    s_rule.feat.insert(Rc::from("case"), FeatureValue::ChildRef(0));

    let rules = vec![
        Rule::augmented_start(Symbol::new("S")),
        s_rule,
        plain_rule("NP", vec!["i"], vec![RightItem::Terminal(Symbol::new("ben"))], 0),
        plain_rule("VP", vec!["sleep"], vec![RightItem::Terminal(Symbol::new("uyu"))], 0),
    ];
    RuleStore::new(rules, Trie::new()).unwrap()
}
