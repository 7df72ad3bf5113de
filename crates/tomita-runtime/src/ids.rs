use std::fmt;

/// Generates a `u32`-backed index newtype with the conversions every
/// table in the pipeline needs. Mirrors the teacher's
/// `indexed_id_implementations!` macro for `DBRuleKey`/`DBNonTermKey`.
macro_rules! index_type {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl From<u32> for $name {
            fn from(v: u32) -> Self {
                $name(v)
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                $name(v as u32)
            }
        }

        impl From<$name> for usize {
            fn from(v: $name) -> Self {
                v.index()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

index_type!(RuleId, "Index into a `RuleStore`'s rule table. Rule 0 is always the augmented start rule.");
index_type!(StateId, "Index into a compiled grammar's DFA state table.");
index_type!(NodeId, "Index into a forest arena (raw, unified, or translated).");
