use std::collections::BTreeSet;

use tomita_runtime::RuleId;

use crate::store::RuleStore;

/// An LR(0) item: the rule being matched and how far the dot has
/// advanced through its `left` sequence.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Item {
    pub rule: RuleId,
    pub dot: usize,
}

pub type ItemSet = BTreeSet<Item>;

/// The symbol an item is sitting before, or `None` if the item is
/// completed (dot at the end of `left`).
pub fn symbol_after_dot(store: &RuleStore, item: Item) -> Option<tomita_runtime::Symbol> {
    let rule = store.rule(item.rule);
    rule.left.get(item.dot).cloned()
}

/// Closes an item set: for every item with the dot before a nonterminal
/// `A`, adds `(r, 0)` for every rule whose head is `A` (§4.2).
pub fn closure(store: &RuleStore, kernel: ItemSet) -> ItemSet {
    let mut set = kernel;
    let mut worklist: Vec<Item> = set.iter().copied().collect();
    while let Some(item) = worklist.pop() {
        if let Some(sym) = symbol_after_dot(store, item) {
            if sym.is_nonterminal() {
                for &rid in store.rules_for(&sym) {
                    let new_item = Item { rule: rid, dot: 0 };
                    if set.insert(new_item) {
                        worklist.push(new_item);
                    }
                }
            }
        }
    }
    set
}
