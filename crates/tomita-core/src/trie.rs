use std::collections::HashMap;

use tomita_runtime::{RuleId, Token};

/// A prefix tree keyed by terminal token sequences, recording which
/// rules' left side is exactly that sequence. Used to let multi-token
/// lexical phrases ("the man") enter the recognizer in one shift.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trie {
    root: TrieNode,
}

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct TrieNode {
    children: HashMap<Token, TrieNode>,
    rules: Vec<RuleId>,
}

impl Trie {
    pub fn new() -> Self {
        Trie::default()
    }

    /// Registers `rule` under the exact token sequence `phrase`.
    pub fn insert(&mut self, phrase: &[Token], rule: RuleId) {
        let mut node = &mut self.root;
        for tok in phrase {
            node = node.children.entry(tok.clone()).or_default();
        }
        node.rules.push(rule);
    }

    /// Returns every prefix of `tokens[from..]` that matches a stored
    /// phrase, as `(length, ruleId)` pairs, longest-first ties broken by
    /// insertion order within a length.
    pub fn search(&self, tokens: &[Token], from: usize) -> Vec<(usize, RuleId)> {
        let mut out = Vec::new();
        let mut node = &self.root;
        for (offset, tok) in tokens[from..].iter().enumerate() {
            match node.children.get(tok) {
                Some(next) => {
                    node = next;
                    if !node.rules.is_empty() {
                        let len = offset + 1;
                        out.extend(node.rules.iter().map(|&r| (len, r)));
                    }
                }
                None => break,
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty() && self.root.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(s: &str) -> Token {
        Token::from(s)
    }

    #[test]
    fn finds_longest_and_shorter_prefixes() {
        let mut trie = Trie::new();
        trie.insert(&[tok("the"), tok("man")], RuleId::from(1u32));
        trie.insert(&[tok("the")], RuleId::from(2u32));

        let tokens = vec![tok("the"), tok("man"), tok("ran")];
        let mut matches = trie.search(&tokens, 0);
        matches.sort_by_key(|(len, _)| *len);

        assert_eq!(matches, vec![(1, RuleId::from(2u32)), (2, RuleId::from(1u32))]);
    }

    #[test]
    fn no_match_returns_empty() {
        let trie = Trie::new();
        let tokens = vec![tok("saw")];
        assert!(trie.search(&tokens, 0).is_empty());
    }
}
