//! The upward feature unifier and downward translator (C5, C6).

mod forest;
mod param_unify;
mod translate;

pub use forest::{unify_upward, UnifiedForest, UnifiedNode, UnifiedSlot};
pub use param_unify::{unify_down, unify_up};
pub use translate::{translate, TransChild, TranslatedForest, TranslatedNode};

#[cfg(test)]
mod tests;
