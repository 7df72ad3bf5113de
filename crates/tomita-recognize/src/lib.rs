//! The GLR recognizer and packed forest builder (C3, C4).

mod edge;
mod forest;
mod recognizer;

pub use edge::{Child, Edge, EdgeAlt};
pub use forest::{build_forest, LeftSlot, ParseForest, ParseTreeNode};
pub use recognizer::{recognize, RecognizerState};
