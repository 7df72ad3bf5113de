use tomita_runtime::{RuleId, StateId, Symbol, Token};

/// A GSS arc: matching `symbol` transitions `start_state` to `end_state`
/// while spanning `start_pos..end_pos`. Doubles as the key into the edge
/// table (C3's `edge[(startPos, startState, symbol, endPos, endState)]`).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Edge {
    pub start_pos: usize,
    pub start_state: StateId,
    pub symbol: Symbol,
    pub end_pos: usize,
    pub end_state: StateId,
}

/// One child of an edge alternative: either a nested edge (resolved by
/// recursing into the edge table, or — if the table has no entry for it
/// — treated as a plain terminal using the edge's own symbol) or a
/// literal token, used only for the flattened left-side of a
/// trie-matched phrase rule.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Child {
    Edge(Edge),
    Terminal(Token),
}

/// One alternative derivation recorded for an edge: the rule that
/// produced it and its children in rule-body order.
#[derive(Clone, Debug)]
pub struct EdgeAlt {
    pub rule: RuleId,
    pub children: Vec<Child>,
}
