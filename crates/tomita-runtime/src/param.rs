use crate::feature::FeatureMap;

/// Controls which features propagate during upward unification when a
/// `none`-entry or a wildcard entry is present in an `FParam`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamKind {
    /// Only the features explicitly named in the param propagate.
    None,
    /// Same as `None`, kept distinct for the source's `only` kind.
    Only,
    /// Named features propagate, plus every feature in `src` the param
    /// does not mention.
    WithPlus,
    /// Named features propagate, except those explicitly excluded.
    WithoutMinus,
}

/// The formal parameter map attached to a nonterminal occurrence in a
/// rule body: a feature map plus a kind flag.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FParam {
    pub features: FeatureMap,
    pub kind: ParamKind,
}

impl FParam {
    pub fn new(features: FeatureMap, kind: ParamKind) -> Self {
        FParam { features, kind }
    }
}

/// A position in a rule's `left`/`right` sequence: either a terminal (no
/// parameter is ever attached) or a nonterminal, which may or may not
/// carry an `FParam`. Replaces the source's `False` sentinel with a
/// proper tagged variant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamSlot {
    Terminal,
    NonTerminal(Option<FParam>),
}

impl ParamSlot {
    pub fn param(&self) -> Option<&FParam> {
        match self {
            ParamSlot::Terminal => None,
            ParamSlot::NonTerminal(p) => p.as_ref(),
        }
    }
}
