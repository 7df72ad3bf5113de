use std::collections::BTreeMap;
use std::rc::Rc;

use crate::ids::NodeId;

/// A feature-map value, as a tagged sum type.
///
/// `ChildRef`/`Subtree` model the pre- and post-resolution states of a
/// `*name` back-reference: a rule's feature map may name `case = *2`
/// before upward unification resolves `2` into the matched child
/// subtree(s) at that position (see `unify_up`'s back-reference step).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FeatureValue {
    /// A plain literal value, e.g. `numb = sing`.
    Literal(String),
    /// A `+`/`-` boolean value.
    Bool(bool),
    /// `?x` — required: the referenced feature must equal `x`.
    Required(String),
    /// `!x` — forbidden: the referenced feature must differ from `x`.
    Forbidden(String),
    /// `~x` — optional-value: accepted whether or not it is present.
    Optional(String),
    /// `*name` — copy-from-another-feature reference, prior to resolution.
    Reference(String),
    /// An as-yet-unresolved back-reference index into a rule's `left`.
    ChildRef(usize),
    /// A back-reference resolved to the actual matched child subtree(s)
    /// at that position (there may be more than one surviving alternative).
    Subtree(Vec<NodeId>),
}

impl FeatureValue {
    /// True for values that behave as plain, comparable values during
    /// unification. `Required`/`Forbidden`/`Optional` read as ordinary
    /// concrete values here too — the source only special-cases `?`/`!`
    /// inside the separate checklist mechanism ("currently ?! is
    /// ignored in Up Propagation"), never inside `unify_up`/`unify_down`
    /// themselves. Only `Reference`/`ChildRef` remain non-concrete:
    /// markers consumed before a comparison would ever see them.
    pub fn is_concrete(&self) -> bool {
        matches!(
            self,
            FeatureValue::Literal(_)
                | FeatureValue::Bool(_)
                | FeatureValue::Required(_)
                | FeatureValue::Forbidden(_)
                | FeatureValue::Optional(_)
                | FeatureValue::Subtree(_)
        )
    }
}

/// A mapping from short feature name to feature value. Immutable once
/// stored on a rule; unification always produces a fresh map.
pub type FeatureMap = BTreeMap<Rc<str>, FeatureValue>;

/// A checklist assertion: `?` (exists), `!` (absent), `?x` (equals x),
/// `!x` (differs from x).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FeatureCheck {
    Exists,
    Absent,
    Equals(String),
    NotEquals(String),
}
