use std::fmt;

use crate::symbol::Symbol;

/// The crate-wide error type. One variant per §7 error kind, each
/// carrying the structured fields a caller needs to report the failure
/// without re-deriving them, mirroring the teacher's hand-rolled
/// `SherpaError` (no `thiserror`).
#[derive(Clone, Debug, PartialEq)]
pub enum TomitaError {
    /// A rule or directive was malformed. Raised by the (out of scope)
    /// grammar-text reader, but surfaces through `compile` when it
    /// validates rule shapes.
    Grammar { message: String },

    /// No valid derivation of the input exists under the grammar.
    Parse {
        /// Farthest position reached before the recognizer ran out of
        /// active states.
        position: usize,
        consumed: Vec<String>,
        remaining: Vec<String>,
    },

    /// Feature structures were incompatible during unification.
    Unify {
        feature: String,
        src_value: String,
        dst_value: String,
        /// Head symbols of the rules walked to reach this clash, root
        /// first.
        rule_trail: Vec<Symbol>,
    },

    /// The post-processor rejected a concatenation.
    PostProcess { message: String },
}

impl TomitaError {
    pub fn grammar(message: impl Into<String>) -> Self {
        TomitaError::Grammar {
            message: message.into(),
        }
    }

    pub fn parse(position: usize, consumed: Vec<String>, remaining: Vec<String>) -> Self {
        TomitaError::Parse {
            position,
            consumed,
            remaining,
        }
    }

    pub fn unify(
        feature: impl Into<String>,
        src_value: impl Into<String>,
        dst_value: impl Into<String>,
        rule_trail: Vec<Symbol>,
    ) -> Self {
        TomitaError::Unify {
            feature: feature.into(),
            src_value: src_value.into(),
            dst_value: dst_value.into(),
            rule_trail,
        }
    }

    pub fn post_process(message: impl Into<String>) -> Self {
        TomitaError::PostProcess {
            message: message.into(),
        }
    }

    /// Prefixes an existing [`TomitaError::Unify`]'s rule trail with a
    /// rule head as the recursion unwinds back toward the root.
    pub fn with_rule(mut self, head: &Symbol) -> Self {
        if let TomitaError::Unify { rule_trail, .. } = &mut self {
            rule_trail.insert(0, head.clone());
        }
        self
    }
}

impl fmt::Display for TomitaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TomitaError::Grammar { message } => write!(f, "grammar error: {message}"),
            TomitaError::Parse {
                position,
                consumed,
                remaining,
            } => write!(
                f,
                "parse error at position {position}: consumed [{}], remaining [{}]",
                consumed.join(" "),
                remaining.join(" ")
            ),
            TomitaError::Unify {
                feature,
                src_value,
                dst_value,
                rule_trail,
            } => write!(
                f,
                "unify error on feature `{feature}`: src={src_value} dst={dst_value} (trail: {})",
                rule_trail
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(" > ")
            ),
            TomitaError::PostProcess { message } => write!(f, "post-process error: {message}"),
        }
    }
}

impl std::error::Error for TomitaError {}

/// Raised when translating an output-only nonterminal that has zero
/// rules defined for it at all — distinct from exhausting every
/// alternative through unification failure (a [`TomitaError::Unify`]).
/// Reuses the `Parse` variant's shape since "no production exists" is,
/// structurally, the same kind of fact as "no derivation exists".
pub fn no_rules_for(symbol: &Symbol) -> TomitaError {
    TomitaError::parse(0, vec![], vec![symbol.to_string()])
}

/// Convenience alias used throughout the pipeline, mirroring the
/// teacher's `RadlrResult`.
pub type TomitaResult<T> = Result<T, TomitaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_are_non_empty() {
        let e = TomitaError::unify("numb", "1", "3", vec![Symbol::new("S")]);
        assert!(!e.to_string().is_empty());
    }
}
