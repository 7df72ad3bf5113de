use std::fmt;
use std::rc::Rc;

/// A grammar symbol. Distinguished by initial capitalization: uppercase
/// first letter means nonterminal, anything else means terminal.
///
/// `S'` (the augmented start symbol) is a `Symbol` like any other; callers
/// that introduce the augmented rule construct it with [`Symbol::start`].
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Symbol(Rc<str>);

impl Symbol {
    pub fn new(name: impl Into<Rc<str>>) -> Self {
        Symbol(name.into())
    }

    /// The augmented start symbol `S'`.
    pub fn start() -> Self {
        Symbol::new("S'")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Uppercase first character means nonterminal; anything else
    /// (lowercase, digit, punctuation) is a terminal.
    pub fn is_nonterminal(&self) -> bool {
        self.0
            .chars()
            .next()
            .map(|c| c.is_uppercase())
            .unwrap_or(false)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_nonterminal()
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Symbol::new(s)
    }
}

/// An opaque input token. The recognizer never inspects its internal
/// structure beyond equality against a `Symbol`'s terminal text.
pub type Token = Rc<str>;
