//! Shared primitives for the tomita GLR pipeline.
//!
//! This crate carries no logic beyond `Display`/`Debug`/equality: symbols,
//! feature values, the error hierarchy, and the integer-indexed id types
//! that every other crate in the workspace builds on.

mod error;
mod feature;
mod ids;
mod param;
mod symbol;

pub use error::{no_rules_for, TomitaError, TomitaResult};
pub use feature::{FeatureCheck, FeatureMap, FeatureValue};
pub use ids::{NodeId, RuleId, StateId};
pub use param::{FParam, ParamKind, ParamSlot};
pub use symbol::{Symbol, Token};
