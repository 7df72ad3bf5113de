use tomita_runtime::TomitaError;

/// Caller-supplied mapping over a fully concatenated translation string
/// (C7, `parser.py`'s `post_processors` registry). Out of scope are any
/// language-specific implementations (English apostrophe-joining,
/// Turkish vowel harmony) — only the seam and an identity default live
/// here.
pub trait PostProcessor {
    fn process(&self, candidate: &str) -> Result<String, TomitaError>;
}

/// Returns its input unchanged. Used where a grammar has no
/// language-specific post-processing (`parser.py: DummyPostProcessor`).
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityPostProcessor;

impl PostProcessor for IdentityPostProcessor {
    fn process(&self, candidate: &str) -> Result<String, TomitaError> {
        Ok(candidate.to_string())
    }
}
