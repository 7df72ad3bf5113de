use std::collections::{HashMap, HashSet};

use tomita_core::CompiledGrammar;
use tomita_runtime::{StateId, Symbol, TomitaError, TomitaResult, Token};

use crate::edge::{Child, Edge, EdgeAlt};

/// The node/edge tables that encode every successful derivation under a
/// grammar, plus the top-level edge the forest builder starts from
/// (C3).
pub struct RecognizerState {
    pub nodes: HashMap<(usize, StateId, Symbol), HashSet<(usize, StateId)>>,
    pub edges: HashMap<Edge, Vec<EdgeAlt>>,
    pub top_edge: Edge,
}

struct Branch {
    pos: usize,
    state: StateId,
    ptree: Vec<Child>,
}

/// Walks `body[from..]`, each step following a DFA transition from
/// `state`, materializing a synthetic zero-width edge per symbol. Used
/// both for a reduction's right-nulled tail and for a pure empty
/// reduction's entire body. Returns `None` if any transition is
/// missing — a malformed-closure condition that should not arise from a
/// grammar actually compiled by `tomita-core`, in which case the
/// reduction is simply not applied.
fn right_null_tail(
    grammar: &CompiledGrammar,
    body: &[Symbol],
    from: usize,
    pos: usize,
    state: StateId,
) -> Option<(Vec<Child>, StateId)> {
    let mut children = Vec::new();
    let mut cur = state;
    for symbol in &body[from..] {
        let next = grammar.dfa.get(cur, symbol)?;
        children.push(Child::Edge(Edge {
            start_pos: pos,
            start_state: cur,
            symbol: symbol.clone(),
            end_pos: pos,
            end_state: next,
        }));
        cur = next;
    }
    Some((children, cur))
}

/// The GLR recognizer (C3): consumes a token sequence under a compiled
/// grammar and writes the node/edge tables encoding every successful
/// derivation. Appends the end-of-input sentinel itself.
pub fn recognize(grammar: &CompiledGrammar, tokens: &[Token]) -> TomitaResult<RecognizerState> {
    let dfa = &grammar.dfa;
    let store = &grammar.store;
    let tables = &grammar.tables;

    log::info!("parsing {} tokens", tokens.len());

    let mut toks: Vec<Token> = tokens.to_vec();
    toks.push(Token::from("$"));
    let inlen = toks.len();

    let start_symbol = store.start_symbol().clone();
    let fstate = dfa
        .get(StateId::from(0u32), &start_symbol)
        .ok_or_else(|| TomitaError::grammar("grammar has no rule for the start symbol"))?;

    let mut nodes: HashMap<(usize, StateId, Symbol), HashSet<(usize, StateId)>> = HashMap::new();
    let mut edges: HashMap<Edge, Vec<EdgeAlt>> = HashMap::new();
    let top_edge = Edge {
        start_pos: 0,
        start_state: StateId::from(0u32),
        symbol: start_symbol,
        end_pos: inlen - 1,
        end_state: fstate,
    };

    let mut act_states: Vec<HashSet<StateId>> = vec![HashSet::new(); inlen];
    let mut act_edges: Vec<Vec<Edge>> = vec![Vec::new(); inlen];
    let mut act_edges_seen: Vec<HashSet<Edge>> = vec![HashSet::new(); inlen];
    act_states[0].insert(StateId::from(0u32));

    for pos in 0..inlen {
        let mut rlist: Vec<Edge> = act_edges[pos].clone();
        let mut seen_edges: HashSet<Edge> = rlist.iter().cloned().collect();

        // 1. Reduction closure over edges ending at `pos`.
        let mut i = 0;
        while i < rlist.len() {
            let edge = rlist[i].clone();
            i += 1;
            let estate = edge.end_state;

            let Some(reductions) = tables.reduce.get(&estate).cloned() else {
                continue;
            };
            for red in reductions {
                let rule = store.rule(red.rule);
                let head = rule.head.clone();
                let body = rule.left.clone();
                let rulepos = red.dot;

                let Some((tail, estate_after_tail)) =
                    right_null_tail(grammar, &body, rulepos, pos, estate)
                else {
                    continue;
                };
                let mut ptree: Vec<Child> = vec![Child::Edge(edge.clone())];
                ptree.extend(tail);
                let _ = estate_after_tail;

                let mut stack = vec![Branch {
                    pos: edge.start_pos,
                    state: edge.start_state,
                    ptree,
                }];

                if rulepos >= 2 {
                    for idx in (0..=rulepos - 2).rev() {
                        let symbol = body[idx].clone();
                        let mut nstack = Vec::new();
                        for branch in &stack {
                            if let Some(preds) = nodes.get(&(branch.pos, branch.state, symbol.clone()))
                            {
                                for &(xpos, xstate) in preds {
                                    let mut new_ptree = vec![Child::Edge(Edge {
                                        start_pos: xpos,
                                        start_state: xstate,
                                        symbol: symbol.clone(),
                                        end_pos: branch.pos,
                                        end_state: branch.state,
                                    })];
                                    new_ptree.extend(branch.ptree.clone());
                                    nstack.push(Branch {
                                        pos: xpos,
                                        state: xstate,
                                        ptree: new_ptree,
                                    });
                                }
                            }
                        }
                        stack = nstack;
                    }
                }

                for branch in stack {
                    if let Some(nstate) = dfa.get(branch.state, &head) {
                        log::trace!("reduce {} -> state {}", head, nstate);
                        act_states[pos].insert(nstate);
                        nodes
                            .entry((pos, nstate, head.clone()))
                            .or_default()
                            .insert((branch.pos, branch.state));
                        let nedge = Edge {
                            start_pos: branch.pos,
                            start_state: branch.state,
                            symbol: head.clone(),
                            end_pos: pos,
                            end_state: nstate,
                        };
                        if !edges.contains_key(&nedge) && seen_edges.insert(nedge.clone()) {
                            rlist.push(nedge.clone());
                        }
                        edges.entry(nedge).or_default().push(EdgeAlt {
                            rule: red.rule,
                            children: branch.ptree,
                        });
                    }
                }
            }
        }

        // 2. Empty reductions at `pos`.
        let mut actlist: Vec<StateId> = act_states[pos].iter().copied().collect();
        let mut j = 0;
        while j < actlist.len() {
            let state = actlist[j];
            j += 1;
            let Some(rules) = tables.ereduce.get(&state).cloned() else {
                continue;
            };
            for rule_id in rules {
                let rule = store.rule(rule_id);
                let head = rule.head.clone();
                let body = rule.left.clone();
                let Some((children, _)) = right_null_tail(grammar, &body, 0, pos, state) else {
                    continue;
                };
                if let Some(nstate) = dfa.get(state, &head) {
                    log::trace!("e-reduce {} -> state {}", head, nstate);
                    if act_states[pos].insert(nstate) {
                        actlist.push(nstate);
                    }
                    nodes
                        .entry((pos, nstate, head.clone()))
                        .or_default()
                        .insert((pos, state));
                    let nedge = Edge {
                        start_pos: pos,
                        start_state: state,
                        symbol: head.clone(),
                        end_pos: pos,
                        end_state: nstate,
                    };
                    edges.entry(nedge).or_default().push(EdgeAlt {
                        rule: rule_id,
                        children,
                    });
                }
            }
        }

        log::debug!("pos={} active={:?}", pos, act_states[pos]);

        if pos == inlen - 1 {
            if act_states[pos].contains(&fstate) {
                log::info!("parse successful");
            } else {
                let mut p = pos;
                while p > 0 && act_states[p].is_empty() {
                    p -= 1;
                }
                let consumed = toks[0..p].iter().map(|t| t.to_string()).collect();
                let remaining = toks[p..inlen - 1].iter().map(|t| t.to_string()).collect();
                return Err(TomitaError::parse(p, consumed, remaining));
            }
        } else {
            if act_states[pos].is_empty() {
                continue;
            }

            let token = toks[pos].clone();
            let token_symbol = Symbol::new(token.as_ref());
            for state in act_states[pos].clone() {
                if let Some(nstate) = dfa.get(state, &token_symbol) {
                    nodes
                        .entry((pos + 1, nstate, token_symbol.clone()))
                        .or_default()
                        .insert((pos, state));
                    let edge = Edge {
                        start_pos: pos,
                        start_state: state,
                        symbol: token_symbol.clone(),
                        end_pos: pos + 1,
                        end_state: nstate,
                    };
                    if act_edges_seen[pos + 1].insert(edge.clone()) {
                        act_edges[pos + 1].push(edge);
                    }
                    act_states[pos + 1].insert(nstate);
                }
            }

            let matches = store.trie().search(&toks, pos);
            for (len, rule_id) in matches {
                let rule = store.rule(rule_id);
                let head = rule.head.clone();
                let nextpos = pos + len;
                for state in act_states[pos].clone() {
                    if let Some(nstate) = dfa.get(state, &head) {
                        nodes
                            .entry((nextpos, nstate, head.clone()))
                            .or_default()
                            .insert((pos, state));
                        let nedge = Edge {
                            start_pos: pos,
                            start_state: state,
                            symbol: head.clone(),
                            end_pos: nextpos,
                            end_state: nstate,
                        };
                        if act_edges_seen[nextpos].insert(nedge.clone()) {
                            act_edges[nextpos].push(nedge.clone());
                        }
                        act_states[nextpos].insert(nstate);
                        let children = toks[pos..nextpos].iter().cloned().map(Child::Terminal).collect();
                        edges.entry(nedge).or_default().push(EdgeAlt {
                            rule: rule_id,
                            children,
                        });
                    }
                }
            }
        }
    }

    Ok(RecognizerState { nodes, edges, top_edge })
}
