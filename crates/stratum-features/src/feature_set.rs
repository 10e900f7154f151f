//! Ordered feature token collection
//!
//! A feature set is logically a set, but it is also the persisted form of
//! every module's configuration, so insertion order is kept and survives
//! serialization.

use crate::token::{FeatureToken, TokenEnum, TokenKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One configuration snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<FeatureToken>", into = "Vec<FeatureToken>")]
pub struct FeatureSet {
    tokens: Vec<FeatureToken>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t.as_str() == token)
    }

    pub fn contains_any(&self, tokens: &[&str]) -> bool {
        tokens.iter().any(|token| self.contains(token))
    }

    /// Append a token; returns false if it was already present
    pub fn insert(&mut self, token: impl Into<FeatureToken>) -> bool {
        let token = token.into();
        if self.contains(token.as_str()) {
            return false;
        }
        self.tokens.push(token);
        true
    }

    /// Remove a token; returns false if it was not present
    pub fn remove(&mut self, token: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t.as_str() != token);
        before != self.tokens.len()
    }

    pub fn remove_all(&mut self, tokens: &[&str]) {
        self.tokens.retain(|t| !tokens.contains(&t.as_str()));
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&FeatureToken) -> bool) {
        self.tokens.retain(|t| keep(t));
    }

    /// Builder-style insert used by the token transforms
    pub fn with(mut self, token: impl Into<FeatureToken>) -> Self {
        self.insert(token);
        self
    }

    /// Builder-style remove used by the token transforms
    pub fn without(mut self, token: &str) -> Self {
        self.remove(token);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureToken> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn as_slice(&self) -> &[FeatureToken] {
        &self.tokens
    }

    /// Classify every token against one module's closed set
    pub fn classify<K: TokenEnum>(&self) -> impl Iterator<Item = TokenKind<K>> + '_ {
        self.tokens.iter().map(TokenKind::<K>::classify)
    }

    /// The tokens of `K` that are present, in declaration order of `K`
    pub fn known<K: TokenEnum>(&self) -> Vec<K> {
        K::ALL
            .iter()
            .copied()
            .filter(|known| self.contains(known.as_str()))
            .collect()
    }

    /// Same membership regardless of order
    pub fn same_tokens(&self, other: &FeatureSet) -> bool {
        self.len() == other.len() && self.iter().all(|t| other.contains(t.as_str()))
    }
}

impl<T: Into<FeatureToken>> Extend<T> for FeatureSet {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for token in iter {
            self.insert(token);
        }
    }
}

impl<T: Into<FeatureToken>> FromIterator<T> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = FeatureSet::new();
        set.extend(iter);
        set
    }
}

impl From<Vec<FeatureToken>> for FeatureSet {
    fn from(tokens: Vec<FeatureToken>) -> Self {
        tokens.into_iter().collect()
    }
}

impl From<FeatureSet> for Vec<FeatureToken> {
    fn from(set: FeatureSet) -> Self {
        set.tokens
    }
}

impl<'a> IntoIterator for &'a FeatureSet {
    type Item = &'a FeatureToken;
    type IntoIter = std::slice::Iter<'a, FeatureToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(token.as_str())?;
        }
        Ok(())
    }
}
