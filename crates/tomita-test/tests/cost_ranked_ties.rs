//! Scenario 5 (§8): two rules producing the same surface output at
//! different costs; enumeration returns the cheaper one first.

use tomita_core::{compile, GrammarConfig};
use tomita_enum::{enumerate, IdentityPostProcessor};
use tomita_recognize::{build_forest, recognize};
use tomita_test::{cost_ranked_ties_grammar, toks};
use tomita_unify::{translate, unify_upward};

#[test]
fn cheaper_rule_ranks_first_and_both_survive() {
    let store = cost_ranked_ties_grammar();
    let grammar = compile(store, GrammarConfig::default().cost_level_penalty(false)).unwrap();

    let tokens = toks("bank");
    let state = recognize(&grammar, &tokens).unwrap();
    let forest = build_forest(&state, &grammar).unwrap();
    let unified = unify_upward(&forest, &grammar).unwrap();
    let translated = translate(&unified, &grammar).unwrap();

    // `enumerate` yields lazily; collect and sort explicitly, the way
    // any caller wanting a fully cost-ranked list would.
    let mut results: Vec<_> = enumerate(&translated, &grammar, &IdentityPostProcessor)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    results.sort_by_key(|c| c.cost);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].text, "bank");
    assert_eq!(results[0].cost, 0);
    assert_eq!(results[1].cost, 3);
}
