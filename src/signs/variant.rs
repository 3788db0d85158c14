//! Variant relations between signs and the symmetric variant index.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::signs::SignCode;

/// How two signs are related when one is declared a variant of the other.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum VariantRelation {
    /// Same linguistic value in every use.
    Full,
    /// Shares some of its values.
    Partial,
    /// Looks alike, no linguistic relation.
    Graphical,
    /// Declared without further detail.
    #[default]
    Unspecified,
}

impl std::fmt::Display for VariantRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Partial => write!(f, "partial"),
            Self::Graphical => write!(f, "graphical"),
            Self::Unspecified => write!(f, "unspecified"),
        }
    }
}

/// Which relations a variant search accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantFilter {
    #[default]
    All,
    /// Full or partial variants.
    Linguistic,
    Full,
    Graphical,
}

impl VariantFilter {
    pub fn matches(self, relation: VariantRelation) -> bool {
        match self {
            Self::All => true,
            Self::Linguistic => matches!(relation, VariantRelation::Full | VariantRelation::Partial),
            Self::Full => relation == VariantRelation::Full,
            Self::Graphical => relation == VariantRelation::Graphical,
        }
    }
}

impl std::str::FromStr for VariantFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "linguistic" => Ok(Self::Linguistic),
            "full" => Ok(Self::Full),
            "graphical" => Ok(Self::Graphical),
            other => Err(format!("unknown variant filter: {other}")),
        }
    }
}

/// A related sign and how it relates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SignVariant {
    pub code: SignCode,
    pub relation: VariantRelation,
}

impl SignVariant {
    pub fn new(code: impl Into<SignCode>, relation: VariantRelation) -> Self {
        Self {
            code: code.into(),
            relation,
        }
    }
}

/// Symmetric adjacency over declared variant edges.
///
/// Every edge `a -> (b, r)` is stored as both `a -> (b, r)` and `b -> (a, r)`,
/// so `b ∈ variants(a)` iff `a ∈ variants(b)`. The index is immutable once
/// built; rebuilding is the only way to change it.
#[derive(Debug, Clone, Default)]
pub struct VariantIndex {
    adjacency: BTreeMap<SignCode, BTreeSet<SignVariant>>,
}

impl VariantIndex {
    /// Build from `(code, declared variant)` edges.
    pub fn build<'a>(edges: impl IntoIterator<Item = (&'a SignCode, &'a SignVariant)>) -> Self {
        let mut adjacency: BTreeMap<SignCode, BTreeSet<SignVariant>> = BTreeMap::new();
        for (code, variant) in edges {
            adjacency
                .entry(code.clone())
                .or_default()
                .insert(variant.clone());
            adjacency
                .entry(variant.code.clone())
                .or_default()
                .insert(SignVariant::new(code.clone(), variant.relation));
        }
        Self { adjacency }
    }

    /// Codes related to `code` through a relation accepted by `filter`, in Gardiner order.
    pub fn variants(&self, code: &SignCode, filter: VariantFilter) -> BTreeSet<SignCode> {
        self.adjacency
            .get(code)
            .into_iter()
            .flatten()
            .filter(|v| filter.matches(v.relation))
            .map(|v| v.code.clone())
            .collect()
    }

    /// Every code that takes part in at least one edge.
    pub fn codes(&self) -> impl Iterator<Item = &SignCode> {
        self.adjacency.keys()
    }

    /// Number of stored (directed) adjacency entries.
    pub fn entry_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum()
    }
}
