//! Candidate lists for ambiguous input.
//!
//! A phonetic value typed on the keyboard (say `nfr`) can map to several
//! signs. Each database layer answers with a [`PossibilitiesList`] in its own
//! preference order; layers are combined with [`PossibilitiesList::merge`],
//! which keeps earlier candidates ahead of later ones.

use serde::Serialize;

use crate::signs::SignCode;

/// Ordered, deduplicated candidate codes for one input token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PossibilitiesList {
    key: String,
    candidates: Vec<SignCode>,
}

impl PossibilitiesList {
    /// An empty list for `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            candidates: Vec::new(),
        }
    }

    /// The already-resolved list: `code` is its own only candidate.
    pub fn resolved(code: impl Into<SignCode>) -> Self {
        let code = code.into();
        Self {
            key: code.as_str().to_string(),
            candidates: vec![code],
        }
    }

    /// Build a list from candidates in preference order. Later duplicates are dropped.
    pub fn from_candidates(
        key: impl Into<String>,
        candidates: impl IntoIterator<Item = SignCode>,
    ) -> Self {
        let mut list = Self::new(key);
        for code in candidates {
            list.push(code);
        }
        list
    }

    /// Append `code` unless it is already a candidate. Returns whether it was added.
    pub fn push(&mut self, code: SignCode) -> bool {
        if self.contains(&code) {
            return false;
        }
        self.candidates.push(code);
        true
    }

    /// All candidates of `self` in order, then the candidates of `other` not yet present.
    ///
    /// The key of `self` is kept. The operation is associative, so chains of
    /// layers can be folded left to right.
    #[must_use]
    pub fn merge(&self, other: &PossibilitiesList) -> PossibilitiesList {
        let mut merged = self.clone();
        for code in &other.candidates {
            merged.push(code.clone());
        }
        merged
    }

    /// The input token these candidates answer.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Candidates in precedence order.
    pub fn candidates(&self) -> &[SignCode] {
        &self.candidates
    }

    /// The preferred candidate.
    pub fn first(&self) -> Option<&SignCode> {
        self.candidates.first()
    }

    pub fn contains(&self, code: &SignCode) -> bool {
        self.candidates.contains(code)
    }

    /// Exactly one candidate: no choice left to the user.
    pub fn is_resolved(&self) -> bool {
        self.candidates.len() == 1
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SignCode> {
        self.candidates.iter()
    }
}

impl<'a> IntoIterator for &'a PossibilitiesList {
    type Item = &'a SignCode;
    type IntoIter = std::slice::Iter<'a, SignCode>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}
