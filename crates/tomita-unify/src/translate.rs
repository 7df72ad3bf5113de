use tomita_core::{CompiledGrammar, RightItem};
use tomita_runtime::{no_rules_for, FParam, FeatureMap, FeatureValue, NodeId, RuleId, Symbol, Token, TomitaError, TomitaResult};

use crate::forest::{UnifiedForest, UnifiedSlot};
use crate::param_unify::unify_down;

/// One child of a translated node's `right` sequence: a literal token,
/// or a disjunction of translated alternatives sharing that position
/// (mirrors `trans.append(self.trans_alts(...))`/`make_trans_tree`'s
/// list-valued entries).
#[derive(Clone, Debug)]
pub enum TransChild {
    Terminal(Token),
    Nested(Vec<NodeId>),
}

/// One translated node (C6): the rule it was driven from, its output
/// sequence, and the feature map `unify_down` settled on. Output-only
/// subtrees built by `make_trans_tree` have no counterpart in the input
/// forest — their `cost` is the originating rule's own cost.
#[derive(Clone, Debug)]
pub struct TranslatedNode {
    pub head: Symbol,
    pub rule: RuleId,
    pub right: Vec<TransChild>,
    pub feat: FeatureMap,
    pub cost: i64,
}

pub struct TranslatedForest {
    pub nodes: Vec<TranslatedNode>,
    pub roots: Vec<NodeId>,
}

impl TranslatedForest {
    pub fn node(&self, id: NodeId) -> &TranslatedNode {
        &self.nodes[id.index()]
    }
}

fn push_node(arena: &mut Vec<TranslatedNode>, node: TranslatedNode) -> NodeId {
    let id = NodeId::from(arena.len());
    arena.push(node);
    id
}

/// Resolves a `*name` feature reference shared by `trans_tree` and
/// `make_trans_tree`: a lowercase literal emits as a terminal, an
/// uppercase one recurses through `make_trans_tree`, and a resolved
/// back-reference subtree list recurses through `trans_alts`.
fn resolve_feature_ref(
    unified: &UnifiedForest,
    grammar: &CompiledGrammar,
    key: &str,
    fdict: &FeatureMap,
    param: Option<&FParam>,
    arena: &mut Vec<TranslatedNode>,
) -> TomitaResult<TransChild> {
    let val = fdict
        .get(key)
        .ok_or_else(|| TomitaError::unify(key.to_string(), "<missing>", "*-reference", Vec::new()))?;
    match val {
        FeatureValue::Literal(s) => {
            if s.chars().next().map(|c| c.is_uppercase()).unwrap_or(false) {
                let ids = make_trans_tree(unified, grammar, &Symbol::new(s.as_str()), fdict, param, arena)?;
                Ok(TransChild::Nested(ids))
            } else {
                Ok(TransChild::Terminal(Token::from(s.as_str())))
            }
        }
        FeatureValue::Subtree(ids) => {
            let translated = trans_alts(unified, grammar, ids, fdict, param, arena)?;
            Ok(TransChild::Nested(translated))
        }
        other => Err(TomitaError::unify(
            key.to_string(),
            format!("{other:?}"),
            "string or subtree",
            Vec::new(),
        )),
    }
}

/// Translates and unifies the right-hand side of one already-unified
/// node (C6, `parser.py: trans_tree`), returning a single translated
/// node — the `tree` it was called on already picked its alternative,
/// so there is exactly one result.
fn trans_tree(
    unified: &UnifiedForest,
    grammar: &CompiledGrammar,
    node_id: NodeId,
    ambient_feat: &FeatureMap,
    ambient_param: Option<&FParam>,
    arena: &mut Vec<TranslatedNode>,
) -> TomitaResult<NodeId> {
    let node = unified.node(node_id);
    let rule = grammar.store.rule(node.rule);

    let fdict = unify_down(&node.feat, ambient_param, ambient_feat, &rule.checklist).map_err(|e| e.with_rule(&node.head))?;

    let mut right = Vec::with_capacity(rule.right.len());
    for (item, param_slot) in rule.right.iter().zip(rule.rparam.iter()) {
        let param = param_slot.param();
        let child = match item {
            RightItem::BackRef(idx) => {
                let ids = match node.left.get(*idx) {
                    Some(UnifiedSlot::Alts(ids)) => ids.clone(),
                    Some(UnifiedSlot::Terminal(_)) | None => {
                        return Err(TomitaError::grammar(format!(
                            "rule for {} back-references left position {idx}, which is not a nonterminal slot",
                            node.head
                        )))
                    }
                };
                TransChild::Nested(trans_alts(unified, grammar, &ids, &fdict, param, arena)?)
            }
            RightItem::FeatureRef(key) => resolve_feature_ref(unified, grammar, key, &fdict, param, arena)?,
            RightItem::Terminal(sym) => TransChild::Terminal(Token::from(sym.as_str())),
            RightItem::NonTerminal(sym) => {
                TransChild::Nested(make_trans_tree(unified, grammar, sym, &fdict, param, arena)?)
            }
        };
        right.push(child);
    }

    Ok(push_node(
        arena,
        TranslatedNode {
            head: node.head.clone(),
            rule: node.rule,
            right,
            feat: fdict,
            cost: node.cost,
        },
    ))
}

/// Translates every surviving alternative at a back-referenced left
/// position (C6, `parser.py: trans_alts`): tries each in turn, stopping
/// early on the first success whose originating rule is marked `cut`.
/// Fails only if every alternative fails.
fn trans_alts(
    unified: &UnifiedForest,
    grammar: &CompiledGrammar,
    ids: &[NodeId],
    fdict: &FeatureMap,
    param: Option<&FParam>,
    arena: &mut Vec<TranslatedNode>,
) -> TomitaResult<Vec<NodeId>> {
    let mut alts = Vec::new();
    let mut last_error = None;
    for &id in ids {
        match trans_tree(unified, grammar, id, fdict, param, arena) {
            Ok(translated_id) => {
                let cut = grammar.store.rule(unified.node(id).rule).cut;
                alts.push(translated_id);
                if cut {
                    break;
                }
            }
            Err(e) => last_error = Some(e),
        }
    }
    if alts.is_empty() {
        Err(last_error.unwrap_or_else(|| TomitaError::unify("<alts>", "no surviving alternative", "", Vec::new())))
    } else {
        Ok(alts)
    }
}

/// Builds a brand-new output-only subtree for `symbol` (C6,
/// `parser.py: make_trans_tree`): enumerates every rule defined for
/// `symbol`, running `unify_down` against each in turn, recursing into
/// that rule's own right side. Stops at the first alternative marked
/// `cut`. A symbol with zero rules at all is a [`TomitaError::Parse`]
/// (no production exists), distinct from every alternative unifying and
/// failing, which is a [`TomitaError::Unify`].
fn make_trans_tree(
    unified: &UnifiedForest,
    grammar: &CompiledGrammar,
    symbol: &Symbol,
    feat: &FeatureMap,
    fparam: Option<&FParam>,
    arena: &mut Vec<TranslatedNode>,
) -> TomitaResult<Vec<NodeId>> {
    let rule_ids = grammar.store.rules_for(symbol);
    if rule_ids.is_empty() {
        return Err(no_rules_for(symbol));
    }

    let mut ntree = Vec::new();
    let mut last_error = None;

    for &rule_id in rule_ids {
        let rule = grammar.store.rule(rule_id);
        match unify_down(&rule.feat, fparam, feat, &rule.checklist) {
            Ok(fdict) => {
                let mut trans_result: TomitaResult<Vec<TransChild>> = Ok(Vec::with_capacity(rule.right.len()));
                for (item, param_slot) in rule.right.iter().zip(rule.rparam.iter()) {
                    let param = param_slot.param();
                    let child = match item {
                        RightItem::BackRef(_) => Err(TomitaError::grammar(format!(
                            "output-only rule for {symbol} cannot back-reference an input-side position"
                        ))),
                        RightItem::FeatureRef(key) => resolve_feature_ref(unified, grammar, key, &fdict, param, arena),
                        RightItem::Terminal(sym) => Ok(TransChild::Terminal(Token::from(sym.as_str()))),
                        RightItem::NonTerminal(sym) => {
                            make_trans_tree(unified, grammar, sym, &fdict, param, arena).map(TransChild::Nested)
                        }
                    };
                    match child {
                        Ok(c) => {
                            if let Ok(right) = &mut trans_result {
                                right.push(c);
                            }
                        }
                        Err(e) => {
                            trans_result = Err(e);
                            break;
                        }
                    }
                }

                match trans_result {
                    Ok(right) => {
                        let id = push_node(
                            arena,
                            TranslatedNode {
                                head: symbol.clone(),
                                rule: rule_id,
                                right,
                                feat: fdict,
                                cost: rule.cost,
                            },
                        );
                        ntree.push(id);
                        if rule.cut {
                            break;
                        }
                    }
                    Err(e) => last_error = Some(e),
                }
            }
            Err(e) => last_error = Some(e.with_rule(symbol)),
        }
    }

    if ntree.is_empty() {
        Err(last_error.unwrap_or_else(|| TomitaError::unify(symbol.as_str(), "no surviving alternative", "", Vec::new())))
    } else {
        Ok(ntree)
    }
}

/// Runs the downward translator (C6) over every surviving root
/// alternative of a unified forest, producing a [`TranslatedForest`]
/// whose roots feed the enumerator (C7).
pub fn translate(unified: &UnifiedForest, grammar: &CompiledGrammar) -> TomitaResult<TranslatedForest> {
    log::info!("translating {} root alternative(s)", unified.roots.len());
    let mut arena = Vec::new();
    let mut roots = Vec::new();
    let mut last_error = None;
    let empty_feat = FeatureMap::new();

    for &root_id in &unified.roots {
        match trans_tree(unified, grammar, root_id, &empty_feat, None, &mut arena) {
            Ok(id) => roots.push(id),
            Err(e) => last_error = Some(e),
        }
    }

    if roots.is_empty() {
        Err(last_error.unwrap_or_else(|| TomitaError::unify("<root>", "no surviving alternative", "", Vec::new())))
    } else {
        Ok(TranslatedForest { nodes: arena, roots })
    }
}
