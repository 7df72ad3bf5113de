/// Builder-style configuration for grammar compilation and downstream
/// enumeration, in the shape of the teacher's `ParserConfig`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrammarConfig {
    /// Fold terminal-only rules entirely into the trie instead of the
    /// DFA-visible ruleset (§4.1).
    pub auto_dict: bool,
    /// Add 1 per tree level to a candidate's enumeration cost
    /// (§4.7, §9 "make it configurable").
    pub cost_level_penalty: bool,
    /// Cap on enumerated alternatives per forest node; 0 means
    /// unbounded.
    pub max_alternatives: usize,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        GrammarConfig {
            auto_dict: true,
            cost_level_penalty: true,
            max_alternatives: 0,
        }
    }
}

impl GrammarConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auto_dict(mut self, on: bool) -> Self {
        self.auto_dict = on;
        self
    }

    pub fn cost_level_penalty(mut self, on: bool) -> Self {
        self.cost_level_penalty = on;
        self
    }

    pub fn max_alternatives(mut self, n: usize) -> Self {
        self.max_alternatives = n;
        self
    }
}
