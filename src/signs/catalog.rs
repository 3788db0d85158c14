//! One layer of sign descriptions, parsed from a TOML source.
//!
//! A source is a list of `[[sign]]` tables:
//!
//! ```toml
//! [[sign]]
//! code = "G1"
//! always_displayed = true
//! tags = ["bird"]
//! description = "Egyptian vulture"
//! values = [{ value = "A", level = "mdc" }, { value = "3", level = "keyboard" }]
//! variants = [{ of = "G2", relation = "graphical" }]
//! ```
//!
//! Codes are unique within one catalog. Cross-layer concerns (merging,
//! symmetric variants) live in [`CompositeSignDatabase`](super::CompositeSignDatabase).

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::signs::error::{SignError, SignResult};
use crate::signs::{
    PossibilitiesList, SignCode, SignDatabase, SignVariant, VariantRelation,
};

/// Where a phonetic value may be offered.
///
/// `Keyboard`, `Palette` and `Informative` form a chain from most to least
/// restrictive: a query at `Palette` also returns keyboard values. `Mdc`
/// values are code aliases and only match `Mdc` queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhoneticLevel {
    Keyboard,
    #[default]
    Palette,
    Informative,
    Mdc,
}

impl PhoneticLevel {
    /// Whether a value declared at `declared` answers a query at `self`.
    pub fn includes(self, declared: PhoneticLevel) -> bool {
        match (self.chain_rank(), declared.chain_rank()) {
            (Some(query), Some(decl)) => decl <= query,
            _ => self == declared,
        }
    }

    fn chain_rank(self) -> Option<u8> {
        match self {
            Self::Keyboard => Some(0),
            Self::Palette => Some(1),
            Self::Informative => Some(2),
            Self::Mdc => None,
        }
    }
}

impl std::str::FromStr for PhoneticLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keyboard" => Ok(Self::Keyboard),
            "palette" => Ok(Self::Palette),
            "informative" => Ok(Self::Informative),
            "mdc" => Ok(Self::Mdc),
            other => Err(format!("unknown phonetic level: {other}")),
        }
    }
}

/// A transliteration attached to a sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhoneticValue {
    pub value: String,
    #[serde(default)]
    pub level: PhoneticLevel,
}

/// Everything one catalog knows about one sign.
#[derive(Debug, Clone, Serialize)]
pub struct SignEntry {
    pub code: SignCode,
    /// Explicit family, or the one derived from the code. Empty when neither exists.
    pub family: String,
    pub always_displayed: bool,
    pub tags: BTreeSet<String>,
    pub description: String,
    /// Signs this sign is composed of.
    pub contains: Vec<SignCode>,
    pub values: Vec<PhoneticValue>,
    pub variants: Vec<SignVariant>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SourceDocument {
    #[serde(default)]
    sign: Vec<SignRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SignRecord {
    code: String,
    #[serde(default)]
    family: Option<String>,
    #[serde(default)]
    always_displayed: bool,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    contains: Vec<String>,
    #[serde(default)]
    values: Vec<PhoneticValue>,
    #[serde(default)]
    variants: Vec<VariantRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct VariantRecord {
    of: String,
    #[serde(default)]
    relation: VariantRelation,
}

/// A flat catalog: code → entry, plus phonetic values in declaration order.
#[derive(Debug, Clone, Default)]
pub struct SignCatalog {
    origin: String,
    entries: BTreeMap<SignCode, SignEntry>,
    /// `(value, level, code)` in source order; the order is candidate precedence.
    phonetics: Vec<(String, PhoneticLevel, SignCode)>,
}

impl SignCatalog {
    /// A catalog with no signs.
    pub fn empty(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            ..Default::default()
        }
    }

    /// Parse a TOML sign-description source. `origin` names it in diagnostics.
    pub fn parse(origin: impl Into<String>, source: &str) -> SignResult<Self> {
        let origin = origin.into();
        let malformed = |message: String| SignError::MalformedCatalog {
            origin: origin.clone(),
            message,
        };

        let document: SourceDocument =
            toml::from_str(source).map_err(|e| malformed(e.to_string()))?;

        let mut entries = BTreeMap::new();
        let mut phonetics = Vec::new();
        for record in document.sign {
            let code_str = record.code.trim();
            if code_str.is_empty() {
                return Err(malformed("sign with empty code".into()));
            }
            let code = SignCode::new(code_str);
            if entries.contains_key(&code) {
                return Err(malformed(format!("duplicate sign code {code}")));
            }
            if record.variants.iter().any(|v| v.of.trim() == code_str)
                || record.contains.iter().any(|c| c.trim() == code_str)
            {
                return Err(malformed(format!("sign {code} refers to itself")));
            }

            let family = record
                .family
                .or_else(|| code.family().map(|f| f.code.to_string()))
                .unwrap_or_default();
            for value in &record.values {
                phonetics.push((value.value.clone(), value.level, code.clone()));
            }
            let entry = SignEntry {
                code: code.clone(),
                family,
                always_displayed: record.always_displayed,
                tags: record.tags.into_iter().collect(),
                description: record.description,
                contains: record.contains.iter().map(|c| SignCode::new(c.trim())).collect(),
                values: record.values,
                variants: record
                    .variants
                    .into_iter()
                    .map(|v| SignVariant::new(v.of.trim(), v.relation))
                    .collect(),
            };
            entries.insert(code, entry);
        }

        tracing::debug!(origin = %origin, signs = entries.len(), "parsed sign catalog");
        Ok(Self {
            origin,
            entries,
            phonetics,
        })
    }

    /// Read and parse a catalog file.
    pub fn load(path: &Path) -> SignResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| SignError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(path.display().to_string(), &source)
    }

    /// Name of the source this catalog was parsed from.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn entry(&self, code: &SignCode) -> Option<&SignEntry> {
        self.entries.get(code)
    }

    pub fn entries(&self) -> impl Iterator<Item = &SignEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn in_family<'a>(&'a self, family: &'a str) -> impl Iterator<Item = &'a SignEntry> + 'a {
        self.entries.values().filter(move |e| e.family == family)
    }
}

impl SignDatabase for SignCatalog {
    fn all_codes(&self) -> Vec<SignCode> {
        self.entries.keys().cloned().collect()
    }

    fn canonical_code(&self, code: &str) -> SignCode {
        if let Some(normalized) = SignCode::normalize(code) {
            return normalized;
        }
        self.possibilities_for(code, PhoneticLevel::Mdc)
            .first()
            .cloned()
            .unwrap_or_else(|| SignCode::new(code))
    }

    fn codes_for_family(&self, family: &str, include_user_codes: bool) -> Vec<SignCode> {
        self.in_family(family)
            .filter(|e| include_user_codes || !e.code.is_user_glyph())
            .map(|e| e.code.clone())
            .collect()
    }

    fn signs_with_tag_in_family(&self, tag: &str, family: &str) -> Vec<SignCode> {
        self.in_family(family)
            .filter(|e| e.tags.contains(tag))
            .map(|e| e.code.clone())
            .collect()
    }

    fn signs_without_tag_in_family(&self, family: &str) -> Vec<SignCode> {
        self.in_family(family)
            .filter(|e| e.tags.is_empty())
            .map(|e| e.code.clone())
            .collect()
    }

    fn tags_for_sign(&self, code: &SignCode) -> BTreeSet<String> {
        self.entry(code).map(|e| e.tags.clone()).unwrap_or_default()
    }

    fn tags_for_family(&self, family: &str) -> BTreeSet<String> {
        self.in_family(family)
            .flat_map(|e| e.tags.iter().cloned())
            .collect()
    }

    fn values_for(&self, code: &SignCode) -> Vec<String> {
        self.entry(code)
            .map(|e| e.values.iter().map(|v| v.value.clone()).collect())
            .unwrap_or_default()
    }

    fn description_for(&self, code: &SignCode) -> String {
        self.entry(code)
            .map(|e| e.description.clone())
            .unwrap_or_default()
    }

    fn is_always_displayed(&self, code: &SignCode) -> bool {
        self.entry(code).is_some_and(|e| e.always_displayed)
    }

    fn declared_variants(&self, code: &SignCode) -> BTreeSet<SignVariant> {
        self.entry(code)
            .map(|e| e.variants.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn signs_containing(&self, code: &SignCode) -> Vec<SignCode> {
        self.entries
            .values()
            .filter(|e| e.contains.contains(code))
            .map(|e| e.code.clone())
            .collect()
    }

    fn signs_in(&self, code: &SignCode) -> Vec<SignCode> {
        let mut parts: Vec<SignCode> = self
            .entry(code)
            .map(|e| e.contains.clone())
            .unwrap_or_default();
        parts.sort();
        parts.dedup();
        parts
    }

    fn possibilities_for(&self, value: &str, level: PhoneticLevel) -> PossibilitiesList {
        PossibilitiesList::from_candidates(
            value,
            self.phonetics
                .iter()
                .filter(|(v, declared, _)| v == value && level.includes(*declared))
                .map(|(_, _, code)| code.clone()),
        )
    }

    fn codes_starting_with(&self, prefix: &str) -> PossibilitiesList {
        PossibilitiesList::from_candidates(
            prefix,
            self.entries
                .keys()
                .filter(|c| c.as_str().starts_with(prefix))
                .cloned(),
        )
    }

    fn suitable_signs_for_code(&self, code: &str) -> PossibilitiesList {
        let Some(normalized) = SignCode::normalize(code) else {
            return PossibilitiesList::resolved(code);
        };
        let Some(base) = normalized.gardiner().map(|k| k.base()) else {
            return PossibilitiesList::resolved(normalized);
        };
        let user_forms = self.entries.keys().filter(|c| {
            c.is_user_glyph() && c.gardiner().is_some_and(|k| k.base() == base)
        });
        let mut list = PossibilitiesList::resolved(normalized);
        for form in user_forms {
            list.push(form.clone());
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
        [[sign]]
        code = "G1"
        always_displayed = true
        tags = ["bird"]
        description = "Egyptian vulture"
        values = [{ value = "A", level = "mdc" }, { value = "3", level = "keyboard" }]

        [[sign]]
        code = "G5"
        tags = ["bird", "god"]
        values = [{ value = "Hr", level = "palette" }]
        variants = [{ of = "G7", relation = "partial" }]

        [[sign]]
        code = "G7"
        tags = ["bird", "god"]
        values = [{ value = "Hr", level = "informative" }]

        [[sign]]
        code = "US1G5"
        family = "G"

        [[sign]]
        code = "G17"
        values = [{ value = "m", level = "keyboard" }]

        [[sign]]
        code = "D28"
        contains = ["D41", "D36"]
    "#;

    fn catalog() -> SignCatalog {
        SignCatalog::parse("test", SOURCE).unwrap()
    }

    fn raw(codes: &[SignCode]) -> Vec<&str> {
        codes.iter().map(SignCode::as_str).collect()
    }

    #[test]
    fn parses_entries_in_gardiner_order() {
        let c = catalog();
        assert_eq!(c.len(), 6);
        assert_eq!(raw(&c.all_codes()), ["D28", "G1", "G5", "US1G5", "G7", "G17"]);
        assert!(c.is_always_displayed(&SignCode::new("G1")));
        assert!(!c.is_always_displayed(&SignCode::new("G5")));
        assert_eq!(c.description_for(&SignCode::new("G1")), "Egyptian vulture");
        assert_eq!(c.description_for(&SignCode::new("G5")), "");
    }

    #[test]
    fn family_queries() {
        let c = catalog();
        assert_eq!(raw(&c.codes_for_family("G", false)), ["G1", "G5", "G7", "G17"]);
        assert_eq!(
            raw(&c.codes_for_family("G", true)),
            ["G1", "G5", "US1G5", "G7", "G17"]
        );
        assert_eq!(raw(&c.signs_with_tag_in_family("god", "G")), ["G5", "G7"]);
        assert_eq!(raw(&c.signs_without_tag_in_family("G")), ["US1G5", "G17"]);
        let tags: Vec<_> = c.tags_for_family("G").into_iter().collect();
        assert_eq!(tags, ["bird", "god"]);
    }

    #[test]
    fn phonetic_levels_nest() {
        let c = catalog();
        assert!(c.possibilities_for("Hr", PhoneticLevel::Keyboard).is_empty());
        assert_eq!(raw(c.possibilities_for("Hr", PhoneticLevel::Palette).candidates()), ["G5"]);
        assert_eq!(
            raw(c.possibilities_for("Hr", PhoneticLevel::Informative).candidates()),
            ["G5", "G7"]
        );
        assert!(c.possibilities_for("A", PhoneticLevel::Informative).is_empty());
        assert_eq!(raw(c.possibilities_for("A", PhoneticLevel::Mdc).candidates()), ["G1"]);
    }

    #[test]
    fn canonical_code_resolution() {
        let c = catalog();
        assert_eq!(c.canonical_code("g5").as_str(), "G5");
        assert_eq!(c.canonical_code("A").as_str(), "G1");
        assert_eq!(c.canonical_code("xyz").as_str(), "xyz");
    }

    #[test]
    fn suitable_signs_include_user_forms() {
        let c = catalog();
        assert_eq!(raw(c.suitable_signs_for_code("g5").candidates()), ["G5", "US1G5"]);
        assert_eq!(raw(c.suitable_signs_for_code("G1").candidates()), ["G1"]);
        let unresolved = c.suitable_signs_for_code("nfr");
        assert!(unresolved.is_resolved());
        assert_eq!(unresolved.key(), "nfr");
    }

    #[test]
    fn composition_queries() {
        let c = catalog();
        assert_eq!(raw(&c.signs_in(&SignCode::new("D28"))), ["D36", "D41"]);
        assert_eq!(raw(&c.signs_containing(&SignCode::new("D36"))), ["D28"]);
    }

    #[test]
    fn rejects_duplicates_and_self_references() {
        let dup = "[[sign]]\ncode = \"A1\"\n[[sign]]\ncode = \"A1\"\n";
        assert!(matches!(
            SignCatalog::parse("dup", dup),
            Err(SignError::MalformedCatalog { .. })
        ));
        let selfref = "[[sign]]\ncode = \"A1\"\nvariants = [{ of = \"A1\" }]\n";
        assert!(SignCatalog::parse("self", selfref).is_err());
        let empty = "[[sign]]\ncode = \"  \"\n";
        assert!(SignCatalog::parse("empty", empty).is_err());
    }

    #[test]
    fn rejects_bad_syntax_and_unknown_fields() {
        assert!(SignCatalog::parse("syntax", "[[sign]\ncode = ").is_err());
        assert!(SignCatalog::parse("field", "[[sign]]\ncode = \"A1\"\ncolour = 3\n").is_err());
        let bad_relation = "[[sign]]\ncode = \"A1\"\nvariants = [{ of = \"A2\", relation = \"cousin\" }]\n";
        assert!(SignCatalog::parse("relation", bad_relation).is_err());
    }

    #[test]
    fn empty_source_is_valid() {
        let c = SignCatalog::parse("blank", "").unwrap();
        assert!(c.is_empty());
    }

    #[test]
    fn prefix_search_in_gardiner_order() {
        let c = catalog();
        assert_eq!(raw(c.codes_starting_with("G").candidates()), ["G1", "G5", "G7", "G17"]);
        assert_eq!(raw(c.codes_starting_with("G1").candidates()), ["G1", "G17"]);
        assert_eq!(raw(c.codes_starting_with("US").candidates()), ["US1G5"]);
        let none = c.codes_starting_with("Z");
        assert!(none.is_empty());
        assert_eq!(none.key(), "Z");
    }
}
