//! Sign codes and the Gardiner ordering.
//!
//! A [`SignCode`] wraps the raw code string together with its parsed
//! [`GardinerKey`], so comparisons never re-parse. Codes that follow the
//! Gardiner shape (`[US<n>]<family><number>[suffix]`) sort by family rank,
//! then number, then suffix. Anything else sorts after them, lexicographically.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A Gardiner sign family (e.g. `G`, "Birds").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Family {
    /// Family code as written in sign codes.
    pub code: &'static str,
    /// Human-readable description.
    pub description: &'static str,
}

/// Gardiner families in canonical order. The position in this slice is the
/// family rank used for sorting.
static FAMILIES: &[Family] = &[
    Family { code: "A", description: "Man and his occupations" },
    Family { code: "B", description: "Woman and her occupations" },
    Family { code: "C", description: "Anthropomorphic deities" },
    Family { code: "D", description: "Parts of the human body" },
    Family { code: "E", description: "Mammals" },
    Family { code: "F", description: "Parts of mammals" },
    Family { code: "G", description: "Birds" },
    Family { code: "H", description: "Parts of birds" },
    Family { code: "I", description: "Amphibious animals, reptiles" },
    Family { code: "K", description: "Fishes and parts of fishes" },
    Family { code: "L", description: "Invertebrata and lesser animals" },
    Family { code: "M", description: "Trees and plants" },
    Family { code: "N", description: "Sky, earth, water" },
    Family { code: "NL", description: "Nomes of Lower Egypt" },
    Family { code: "NU", description: "Nomes of Upper Egypt" },
    Family { code: "O", description: "Buildings and parts of buildings" },
    Family { code: "P", description: "Ships and parts of ships" },
    Family { code: "Q", description: "Domestic and funerary furniture" },
    Family { code: "R", description: "Temple furniture and sacred emblems" },
    Family { code: "S", description: "Crowns, dress, staves" },
    Family { code: "T", description: "Warfare, hunting, butchery" },
    Family { code: "U", description: "Agriculture, crafts and professions" },
    Family { code: "V", description: "Rope, fibre, baskets, bags" },
    Family { code: "W", description: "Vessels of stone and earthenware" },
    Family { code: "X", description: "Loaves and cakes" },
    Family { code: "Y", description: "Writings, games, music" },
    Family { code: "Z", description: "Strokes and geometrical figures" },
    Family { code: "Aa", description: "Unclassified" },
    Family { code: "Ff", description: "Additional signs" },
];

/// All Gardiner families, in canonical order.
pub fn families() -> &'static [Family] {
    FAMILIES
}

/// Look up a family by its exact code.
pub fn family(code: &str) -> Option<&'static Family> {
    FAMILIES.iter().find(|f| f.code == code)
}

/// Parsed components of a Gardiner-shaped code.
///
/// Field order is the sort order: family rank, number, suffix, then the
/// user-glyph prefix (so `US1A1` sorts right after `A1`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GardinerKey {
    family_rank: usize,
    number: u32,
    suffix: String,
    user_prefix: Option<u32>,
}

impl GardinerKey {
    /// Parse a code, matching family names exactly.
    pub fn parse(code: &str) -> Option<Self> {
        Self::parse_with(code, false)
    }

    /// Parse a code, matching family names and the `US` prefix without regard to case.
    pub fn parse_ignore_case(code: &str) -> Option<Self> {
        Self::parse_with(code, true)
    }

    fn parse_with(code: &str, ignore_case: bool) -> Option<Self> {
        let (user_prefix, rest) = split_user_prefix(code, ignore_case)?;

        // Two-letter families first: "NL3" must not parse as "N" + "L3".
        let (family_rank, rest) = FAMILIES
            .iter()
            .enumerate()
            .filter(|(_, f)| f.code.len() == 2)
            .chain(FAMILIES.iter().enumerate().filter(|(_, f)| f.code.len() == 1))
            .find_map(|(rank, f)| {
                let head = rest.get(..f.code.len())?;
                let matches = if ignore_case {
                    head.eq_ignore_ascii_case(f.code)
                } else {
                    head == f.code
                };
                matches.then(|| (rank, &rest[f.code.len()..]))
            })?;

        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits_end == 0 {
            return None;
        }
        let number = rest[..digits_end].parse().ok()?;
        let suffix = &rest[digits_end..];
        if !suffix.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        let suffix = if ignore_case {
            suffix.to_ascii_uppercase()
        } else {
            suffix.to_string()
        };

        Some(Self {
            family_rank,
            number,
            suffix,
            user_prefix,
        })
    }

    /// The family this code belongs to.
    pub fn family(&self) -> &'static Family {
        &FAMILIES[self.family_rank]
    }

    /// Whether this is a user-designed glyph (`US<n>` prefix).
    pub fn is_user_glyph(&self) -> bool {
        self.user_prefix.is_some()
    }

    /// The same key without its user-glyph prefix.
    pub fn base(&self) -> Self {
        Self {
            user_prefix: None,
            ..self.clone()
        }
    }

    /// Render the key in canonical spelling.
    pub fn to_code(&self) -> String {
        let prefix = self
            .user_prefix
            .map(|n| format!("US{n}"))
            .unwrap_or_default();
        format!(
            "{prefix}{}{}{}",
            self.family().code,
            self.number,
            self.suffix
        )
    }
}

fn split_user_prefix(code: &str, ignore_case: bool) -> Option<(Option<u32>, &str)> {
    let has_prefix = match code.get(..2) {
        Some(head) if ignore_case => head.eq_ignore_ascii_case("US"),
        Some(head) => head == "US",
        None => false,
    };
    if !has_prefix {
        return Some((None, code));
    }
    let rest = &code[2..];
    let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    if digits_end == 0 {
        // "U" family followed by "S..." is not a valid Gardiner code either.
        return None;
    }
    let n = rest[..digits_end].parse().ok()?;
    Some((Some(n), &rest[digits_end..]))
}

/// A sign code with domain ordering.
///
/// Equality and hashing use the raw string. Ordering uses the Gardiner key
/// and falls back to the raw string, so it stays consistent with equality.
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SignCode {
    raw: String,
    key: Option<GardinerKey>,
}

impl SignCode {
    /// Wrap a raw code string.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let key = GardinerKey::parse(&raw);
        Self { raw, key }
    }

    /// Normalize a Gardiner code typed in any case (`g5` → `G5`, `aa15` → `Aa15`).
    ///
    /// Returns `None` when the input does not have the Gardiner shape.
    pub fn normalize(input: &str) -> Option<Self> {
        GardinerKey::parse_ignore_case(input).map(|k| Self::new(k.to_code()))
    }

    /// The raw code string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed Gardiner key, when the code has the Gardiner shape.
    pub fn gardiner(&self) -> Option<&GardinerKey> {
        self.key.as_ref()
    }

    /// The family derived from the code.
    pub fn family(&self) -> Option<&'static Family> {
        self.key.as_ref().map(GardinerKey::family)
    }

    /// Whether the code names a user-designed glyph (`US1A1`).
    pub fn is_user_glyph(&self) -> bool {
        self.key.as_ref().is_some_and(GardinerKey::is_user_glyph)
    }
}

impl From<String> for SignCode {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for SignCode {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<SignCode> for String {
    fn from(code: SignCode) -> Self {
        code.raw
    }
}

impl PartialEq for SignCode {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for SignCode {}

impl Hash for SignCode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialOrd for SignCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SignCode {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.key, &other.key) {
            (Some(a), Some(b)) => a.cmp(b).then_with(|| self.raw.cmp(&other.raw)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.raw.cmp(&other.raw),
        }
    }
}

impl std::fmt::Debug for SignCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SignCode({})", self.raw)
    }
}

impl std::fmt::Display for SignCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
