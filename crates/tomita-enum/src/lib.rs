//! The enumerator and post-processor seam (C7).

mod enumerate;
mod post_process;

pub use enumerate::{enumerate, Candidate, Enumerator};
pub use post_process::{IdentityPostProcessor, PostProcessor};
