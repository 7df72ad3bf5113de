use tomita_core::{CompiledGrammar, GrammarConfig};
use tomita_runtime::{NodeId, TomitaError, TomitaResult};
use tomita_unify::{TransChild, TranslatedForest};

use crate::post_process::PostProcessor;

/// One flattened translation option together with the cost accumulated
/// along its derivation (C7, `tree.py: enumx`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub text: String,
    pub cost: i64,
}

fn join(first: &str, rest: &str) -> String {
    if first.is_empty() {
        rest.to_string()
    } else if rest.is_empty() {
        first.to_string()
    } else {
        format!("{first} {rest}")
    }
}

/// Lazily walks one translated node's `right` sequence from `idx`,
/// yielding every surviving `(text, cost)` combination one at a time
/// (`tree.py: enumx`, a generator). Each level of recursion becomes one
/// boxed iterator nested inside the next, so the whole chain is the
/// explicit frame stack a caller's `next()` call unwinds through; no
/// combination is computed until it is pulled, and a caller that stops
/// pulling early leaves the rest of the tree unexplored.
fn enumx<'a>(
    forest: &'a TranslatedForest,
    node_id: NodeId,
    idx: usize,
    config: &'a GrammarConfig,
) -> Box<dyn Iterator<Item = Candidate> + 'a> {
    let node = forest.node(node_id);
    if idx == node.right.len() {
        return Box::new(std::iter::once(Candidate { text: String::new(), cost: node.cost }));
    }

    match &node.right[idx] {
        TransChild::Terminal(tok) => Box::new(
            enumx(forest, node_id, idx + 1, config)
                .map(move |r| Candidate { text: join(tok, &r.text), cost: r.cost }),
        ),
        TransChild::Nested(ids) => {
            let penalty = if config.cost_level_penalty { 1 } else { 0 };
            let max_alts = config.max_alternatives;
            Box::new(enumx(forest, node_id, idx + 1, config).flat_map(move |rest| {
                let rest_text = rest.text.clone();
                let rest_cost = rest.cost;
                let alts = ids.iter().flat_map(move |&alt_id| enumx(forest, alt_id, 0, config));
                let alts: Box<dyn Iterator<Item = Candidate>> =
                    if max_alts > 0 { Box::new(alts.take(max_alts)) } else { Box::new(alts) };
                alts.map(move |alt| Candidate {
                    text: join(&alt.text, &rest_text),
                    cost: rest_cost + alt.cost + penalty,
                })
            }))
        }
    }
}

/// The enumerator (C7): a lazy `Iterator` over post-processed candidates
/// (`parser.py: trans_sent`'s `tree3.enumx()` call, minus the sort that
/// call site performs afterward — see [`enumerate`]). Yields `Ok` for
/// every candidate whose post-processing succeeds; a candidate whose
/// post-processing fails is silently dropped unless *no* candidate ever
/// succeeds, in which case the last such failure is yielded once, as
/// the final item, per §7's "Enumeration errors are per-candidate"
/// policy.
pub struct Enumerator<'a> {
    inner: Box<dyn Iterator<Item = Candidate> + 'a>,
    post: &'a dyn PostProcessor,
    last_error: Option<TomitaError>,
    yielded_any: bool,
    done: bool,
}

impl<'a> Enumerator<'a> {
    fn new(forest: &'a TranslatedForest, grammar: &'a CompiledGrammar, post: &'a dyn PostProcessor) -> Self {
        log::debug!("enumerating {} root alternative(s)", forest.roots.len());
        let config = &grammar.config;
        let inner: Box<dyn Iterator<Item = Candidate> + 'a> =
            Box::new(forest.roots.iter().flat_map(move |&root| enumx(forest, root, 0, config)));
        Enumerator { inner, post, last_error: None, yielded_any: false, done: false }
    }
}

impl<'a> Iterator for Enumerator<'a> {
    type Item = TomitaResult<Candidate>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.inner.next() {
                Some(candidate) => match self.post.process(&candidate.text) {
                    Ok(text) => {
                        self.yielded_any = true;
                        return Some(Ok(Candidate { text, cost: candidate.cost }));
                    }
                    Err(e) => {
                        self.last_error = Some(e);
                        continue;
                    }
                },
                None => {
                    self.done = true;
                    if !self.yielded_any {
                        let err = self
                            .last_error
                            .take()
                            .unwrap_or_else(|| TomitaError::post_process("no candidate to post-process"));
                        return Some(Err(err));
                    }
                    return None;
                }
            }
        }
    }
}

/// Runs the enumerator (C7) over every root alternative of a translated
/// forest as a lazy sequence of `(string, cost)` pairs (§6's Core API
/// table): nothing is computed until the returned iterator is pulled,
/// and a caller may stop pulling at any point (§5's "may be cancelled by
/// the caller by simply not requesting the next"). Unlike the source's
/// own call site (`parser.py: trans_sent`), this does not sort — a
/// caller that wants results ranked ascending by cost collects into a
/// `Vec` and sorts explicitly, exactly as `trans_sent` itself does after
/// its own `tree3.enumx()` call.
pub fn enumerate<'a>(
    forest: &'a TranslatedForest,
    grammar: &'a CompiledGrammar,
    post: &'a dyn PostProcessor,
) -> Enumerator<'a> {
    Enumerator::new(forest, grammar, post)
}

#[cfg(test)]
mod tests {
    use tomita_core::{compile, GrammarConfig, RightItem, Rule, RuleStore, Trie};
    use tomita_recognize::{build_forest, recognize};
    use tomita_runtime::{FeatureMap, ParamSlot, Symbol, Token};
    use tomita_unify::{translate, unify_upward};

    use super::*;

    struct RejectingPostProcessor;
    impl PostProcessor for RejectingPostProcessor {
        fn process(&self, _candidate: &str) -> Result<String, TomitaError> {
            Err(TomitaError::post_process("always rejects"))
        }
    }

    fn toks(s: &str) -> Vec<Token> {
        s.split_whitespace().map(Token::from).collect()
    }

    /// `S -> NP VP` with two competing `NP` rules at different costs; a
    /// caller collecting and sorting the lazy sequence sees the cheaper
    /// translation first (spec scenario: cost-ranked ties).
    #[test]
    fn cheaper_alternative_sorts_first_once_collected() {
        let rules = vec![
            Rule::augmented_start(Symbol::new("S")),
            Rule {
                head: Symbol::new("S"),
                left: vec![Symbol::new("NP"), Symbol::new("VP")],
                right: vec![RightItem::BackRef(0), RightItem::BackRef(1)],
                feat: FeatureMap::new(),
                checklist: Vec::new(),
                lparam: vec![ParamSlot::NonTerminal(None), ParamSlot::NonTerminal(None)],
                rparam: vec![ParamSlot::NonTerminal(None), ParamSlot::NonTerminal(None)],
                cost: 0,
                cut: false,
            },
            Rule {
                head: Symbol::new("NP"),
                left: vec![Symbol::new("they")],
                right: vec![RightItem::Terminal(Symbol::new("cheap"))],
                feat: FeatureMap::new(),
                checklist: Vec::new(),
                lparam: vec![ParamSlot::Terminal],
                rparam: vec![ParamSlot::Terminal],
                cost: 0,
                cut: false,
            },
            Rule {
                head: Symbol::new("NP"),
                left: vec![Symbol::new("they")],
                right: vec![RightItem::Terminal(Symbol::new("pricey"))],
                feat: FeatureMap::new(),
                checklist: Vec::new(),
                lparam: vec![ParamSlot::Terminal],
                rparam: vec![ParamSlot::Terminal],
                cost: 5,
                cut: false,
            },
            Rule {
                head: Symbol::new("VP"),
                left: vec![Symbol::new("sleep")],
                right: vec![RightItem::Terminal(Symbol::new("sleep"))],
                feat: FeatureMap::new(),
                checklist: Vec::new(),
                lparam: vec![ParamSlot::Terminal],
                rparam: vec![ParamSlot::Terminal],
                cost: 0,
                cut: false,
            },
        ];
        let store = RuleStore::new(rules, Trie::new()).unwrap();
        let grammar = compile(store, GrammarConfig::default().cost_level_penalty(false)).unwrap();

        let tokens = toks("they sleep");
        let state = recognize(&grammar, &tokens).unwrap();
        let forest = build_forest(&state, &grammar).unwrap();
        let unified = unify_upward(&forest, &grammar).unwrap();
        let translated = translate(&unified, &grammar).unwrap();

        let mut results: Vec<Candidate> = enumerate(&translated, &grammar, &crate::IdentityPostProcessor)
            .collect::<TomitaResult<Vec<_>>>()
            .unwrap();
        results.sort_by_key(|c| c.cost);

        assert_eq!(results[0].text, "cheap sleep");
        assert_eq!(results[0].cost, 0);
        assert!(results.iter().any(|c| c.text == "pricey sleep" && c.cost == 5));
        assert!(results.windows(2).all(|w| w[0].cost <= w[1].cost));
    }

    /// Pulling just the first item from the lazy sequence stops short of
    /// ever touching the pricier alternative's translation.
    #[test]
    fn caller_may_stop_after_the_first_item() {
        let rules = vec![
            Rule::augmented_start(Symbol::new("S")),
            Rule {
                head: Symbol::new("S"),
                left: vec![Symbol::new("w")],
                right: vec![RightItem::BackRef(0)],
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

        let mut iter = enumerate(&translated, &grammar, &crate::IdentityPostProcessor);
        let first = iter.next().unwrap().unwrap();
        assert_eq!(first.text, "w");
    }

    /// Every candidate's post-processor fails; the lazy sequence
    /// surfaces the failure as its one and only item rather than
    /// silently running dry.
    #[test]
    fn all_candidates_failing_post_process_is_an_error() {
        let rules = vec![
            Rule::augmented_start(Symbol::new("S")),
            Rule {
                head: Symbol::new("S"),
                left: vec![Symbol::new("w")],
                right: vec![RightItem::BackRef(0)],
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

        let mut iter = enumerate(&translated, &grammar, &RejectingPostProcessor);
        let err = iter.next().unwrap().unwrap_err();
        assert!(matches!(err, TomitaError::PostProcess { .. }));
        assert!(iter.next().is_none());
    }

    #[test]
    fn identity_post_processor_is_reexported() {
        let _p: &dyn PostProcessor = &crate::IdentityPostProcessor;
    }
}
