//! Scenario 1 (§8): simple ambiguous PP-attachment.

use tomita_core::{compile, GrammarConfig};
use tomita_recognize::{build_forest, recognize, LeftSlot};
use tomita_test::{pp_attachment_grammar, toks, PP_ATTACHMENT_SENTENCE};

#[test]
fn two_pps_attach_five_distinct_ways() {
    let store = pp_attachment_grammar();
    let grammar = compile(store, GrammarConfig::default()).unwrap();

    let tokens = toks(PP_ATTACHMENT_SENTENCE);
    let state = recognize(&grammar, &tokens).unwrap();
    let forest = build_forest(&state, &grammar).unwrap();

    let root = forest.node(forest.root);
    let LeftSlot::Alt(s_alts) = &root.left[0] else {
        panic!("augmented start node's only slot must be the S alternatives");
    };
    assert_eq!(s_alts.len(), 5, "two independently-attaching PPs should yield five bracketings");
}
