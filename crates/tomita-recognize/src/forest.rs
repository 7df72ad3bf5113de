use std::collections::HashMap;

use tomita_core::CompiledGrammar;
use tomita_runtime::{FeatureMap, NodeId, RuleId, Symbol, Token, TomitaError, TomitaResult};

use crate::edge::{Child, Edge};
use crate::recognizer::RecognizerState;

/// One position in a forest node's `left` sequence: a literal token, or
/// a packed disjunction of alternative subtrees sharing that span.
#[derive(Clone, Debug)]
pub enum LeftSlot {
    Terminal(Token),
    Alt(Vec<NodeId>),
}

/// A forest node (C4): one alternative derivation of `head` over
/// `span`, arena-allocated and referenced by `NodeId` rather than by
/// pointer (Design Notes). `feat`/`cost` are the rule's own values,
/// prior to unification — `tomita-unify` produces its own arena with
/// resolved values rather than mutating this one in place.
#[derive(Clone, Debug)]
pub struct ParseTreeNode {
    pub head: Symbol,
    pub rule: RuleId,
    pub left: Vec<LeftSlot>,
    pub feat: FeatureMap,
    pub cost: i64,
    pub span: (usize, usize),
}

/// The packed parse forest produced by C4: an arena of nodes plus the
/// id of the singleton root (the augmented `S'` node, P8).
pub struct ParseForest {
    pub nodes: Vec<ParseTreeNode>,
    pub root: NodeId,
}

impl ParseForest {
    pub fn node(&self, id: NodeId) -> &ParseTreeNode {
        &self.nodes[id.index()]
    }
}

fn build_node_alts(
    edge: &Edge,
    state: &RecognizerState,
    grammar: &CompiledGrammar,
    memo: &mut HashMap<Edge, Vec<NodeId>>,
    arena: &mut Vec<ParseTreeNode>,
) -> Vec<NodeId> {
    if let Some(ids) = memo.get(edge) {
        return ids.clone();
    }

    let mut ids = Vec::new();
    if let Some(alts) = state.edges.get(edge) {
        for alt in alts {
            let rule = grammar.store.rule(alt.rule);
            let mut left = Vec::with_capacity(alt.children.len());
            for child in &alt.children {
                match child {
                    Child::Terminal(tok) => left.push(LeftSlot::Terminal(tok.clone())),
                    Child::Edge(child_edge) => {
                        if state.edges.contains_key(child_edge) {
                            let sub_ids = build_node_alts(child_edge, state, grammar, memo, arena);
                            left.push(LeftSlot::Alt(sub_ids));
                        } else {
                            // No edge entry: this position is a plain
                            // terminal shift, and the edge's own symbol
                            // text IS the matched token.
                            left.push(LeftSlot::Terminal(Token::from(child_edge.symbol.as_str())));
                        }
                    }
                }
            }

            let node = ParseTreeNode {
                head: edge.symbol.clone(),
                rule: alt.rule,
                left,
                feat: rule.feat.clone(),
                cost: rule.cost,
                span: (edge.start_pos, edge.end_pos),
            };
            let id = NodeId::from(arena.len());
            arena.push(node);
            ids.push(id);
        }
    }

    memo.insert(edge.clone(), ids.clone());
    ids
}

/// Projects the recognizer's top edge into a `ParseTree` (C4): one
/// alternative per recorded child list, each child either a terminal or
/// a nested disjunction. The augmented start rule wraps the top edge's
/// alternatives in a singleton root node.
pub fn build_forest(state: &RecognizerState, grammar: &CompiledGrammar) -> TomitaResult<ParseForest> {
    let mut arena = Vec::new();
    let mut memo = HashMap::new();

    let alts = build_node_alts(&state.top_edge, state, grammar, &mut memo, &mut arena);
    if alts.is_empty() {
        return Err(TomitaError::parse(state.top_edge.end_pos, vec![], vec![]));
    }

    let start_rule_id = RuleId::from(0u32);
    let start_rule = grammar.store.rule(start_rule_id);
    let root = ParseTreeNode {
        head: Symbol::start(),
        rule: start_rule_id,
        left: vec![LeftSlot::Alt(alts)],
        feat: start_rule.feat.clone(),
        cost: start_rule.cost,
        span: (state.top_edge.start_pos, state.top_edge.end_pos),
    };
    let root_id = NodeId::from(arena.len());
    arena.push(root);

    Ok(ParseForest { nodes: arena, root: root_id })
}
