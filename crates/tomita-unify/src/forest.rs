use std::collections::HashMap;

use tomita_core::CompiledGrammar;
use tomita_recognize::{LeftSlot, ParseForest, ParseTreeNode};
use tomita_runtime::{FeatureMap, FeatureValue, NodeId, RuleId, Symbol, Token, TomitaError, TomitaResult};

/// One position in a unified node's `left` sequence: mirrors
/// [`LeftSlot`], but `Alts` now indexes into the *unified* arena rather
/// than the raw forest — every id it names already carries a fully
/// resolved feature map.
#[derive(Clone, Debug)]
pub enum UnifiedSlot {
    Terminal(Token),
    Alts(Vec<NodeId>),
}

/// One surviving alternative of a forest node after upward unification
/// (C5): the rule that produced it, its (now unification-filtered)
/// children, and its fully merged feature map.
#[derive(Clone, Debug)]
pub struct UnifiedNode {
    pub head: Symbol,
    pub rule: RuleId,
    pub left: Vec<UnifiedSlot>,
    pub feat: FeatureMap,
    pub cost: i64,
}

/// The result of running C5 over a [`ParseForest`]: a fresh arena built
/// bottom-up, never mutating the original (Design Notes: unification
/// produces "a new forest", `parser.py: unify_tree`'s `ntree`).
pub struct UnifiedForest {
    pub nodes: Vec<UnifiedNode>,
    pub roots: Vec<NodeId>,
}

impl UnifiedForest {
    pub fn node(&self, id: NodeId) -> &UnifiedNode {
        &self.nodes[id.index()]
    }
}

type Memo = HashMap<NodeId, TomitaResult<Vec<NodeId>>>;

/// One accumulating combination of (feature map so far, children chosen
/// so far) while walking a node's left side left-to-right — the direct
/// analogue of `unify_tree`'s `stack` of `(fdict, seq)` pairs.
struct Combo {
    feat: FeatureMap,
    left: Vec<UnifiedSlot>,
}

fn unify_node(
    forest: &ParseForest,
    grammar: &CompiledGrammar,
    orig_id: NodeId,
    memo: &mut Memo,
    arena: &mut Vec<UnifiedNode>,
) -> TomitaResult<Vec<NodeId>> {
    if let Some(cached) = memo.get(&orig_id) {
        return cached.clone();
    }

    let result = unify_node_uncached(forest, grammar, orig_id, memo, arena);
    memo.insert(orig_id, result.clone());
    result
}

fn unify_node_uncached(
    forest: &ParseForest,
    grammar: &CompiledGrammar,
    orig_id: NodeId,
    memo: &mut Memo,
    arena: &mut Vec<UnifiedNode>,
) -> TomitaResult<Vec<NodeId>> {
    let orig: &ParseTreeNode = forest.node(orig_id);
    let rule = grammar.store.rule(orig.rule);

    let mut stack = vec![Combo {
        feat: rule.feat.clone(),
        left: Vec::with_capacity(orig.left.len()),
    }];

    for (item, fparam_slot) in orig.left.iter().zip(rule.lparam.iter()) {
        match item {
            LeftSlot::Terminal(tok) => {
                for combo in &mut stack {
                    combo.left.push(UnifiedSlot::Terminal(tok.clone()));
                }
            }
            LeftSlot::Alt(alt_ids) => {
                let fparam = fparam_slot.param();
                let mut next_stack: Vec<Combo> = Vec::new();
                let mut last_error: Option<TomitaError> = None;

                for combo in stack {
                    // Groups of (resulting fdict, subtree ids) that
                    // coalesce when unification yields an identical
                    // feature map, mirroring `unify_tree`'s
                    // `nkeys`/`nvals` accumulation.
                    let mut groups: Vec<(FeatureMap, Vec<NodeId>)> = Vec::new();

                    for &alt_id in alt_ids {
                        let subtrees = match unify_node(forest, grammar, alt_id, memo, arena) {
                            Ok(ids) => ids,
                            Err(e) => {
                                last_error = Some(e.with_rule(&orig.head));
                                continue;
                            }
                        };
                        for sub_id in subtrees {
                            let sub = &arena[sub_id.index()];
                            match crate::param_unify::unify_up(&combo.feat, fparam, &sub.feat) {
                                Ok(new_feat) => {
                                    if let Some((_, ids)) = groups.iter_mut().find(|(f, _)| *f == new_feat) {
                                        ids.push(sub_id);
                                    } else {
                                        groups.push((new_feat, vec![sub_id]));
                                    }
                                }
                                Err(e) => {
                                    last_error = Some(e.with_rule(&orig.head));
                                }
                            }
                        }
                    }

                    for (feat, ids) in groups {
                        let mut left = combo.left.clone();
                        left.push(UnifiedSlot::Alts(ids));
                        next_stack.push(Combo { feat, left });
                    }
                }

                stack = next_stack;
                if stack.is_empty() {
                    return Err(last_error.unwrap_or_else(|| TomitaError::unify(
                        "<left>",
                        "no surviving alternative",
                        orig.head.as_str(),
                        vec![orig.head.clone()],
                    )));
                }
            }
        }
    }

    let mut ids = Vec::with_capacity(stack.len());
    for combo in stack {
        let feat = resolve_back_references(combo.feat, &combo.left);
        let id = NodeId::from(arena.len());
        arena.push(UnifiedNode {
            head: orig.head.clone(),
            rule: orig.rule,
            left: combo.left,
            feat,
            cost: orig.cost,
        });
        ids.push(id);
    }
    Ok(ids)
}

/// Replaces `FeatureValue::ChildRef(i)` entries with the actual
/// subtree(s) that ended up at left-position `i` once this node's own
/// unification settled (`parser.py: unify_tree`'s
/// `fdict[key] = tree.left[val]` step). Unlike the source, which
/// indexes the *pre*-unification `tree.left`, this resolves against the
/// node's *own* (already chosen) children — the natural reading once
/// unification produces a distinct arena rather than mutating in place.
fn resolve_back_references(mut feat: FeatureMap, left: &[UnifiedSlot]) -> FeatureMap {
    let updates: Vec<(std::rc::Rc<str>, FeatureValue)> = feat
        .iter()
        .filter_map(|(k, v)| match v {
            FeatureValue::ChildRef(idx) => match left.get(*idx) {
                Some(UnifiedSlot::Alts(ids)) => Some((k.clone(), FeatureValue::Subtree(ids.clone()))),
                Some(UnifiedSlot::Terminal(_)) | None => None,
            },
            _ => None,
        })
        .collect();
    for (k, v) in updates {
        feat.insert(k, v);
    }
    feat
}

/// Runs the upward unifier (C5) over an entire forest. The augmented
/// start node ordinarily collapses to a single alternative (P8); unlike
/// the source's hard assertion, a root that still carries more than one
/// surviving feature combination is kept as multiple roots rather than
/// panicking — downstream translation/enumeration already handles
/// multiple alternatives everywhere else in the pipeline.
pub fn unify_upward(forest: &ParseForest, grammar: &CompiledGrammar) -> TomitaResult<UnifiedForest> {
    log::info!("unifying forest bottom-up");
    let mut arena = Vec::new();
    let mut memo = Memo::new();
    let roots = unify_node(forest, grammar, forest.root, &mut memo, &mut arena)?;
    log::debug!("unification produced {} root alternative(s)", roots.len());
    Ok(UnifiedForest { nodes: arena, roots })
}
