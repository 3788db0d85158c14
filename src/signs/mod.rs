//! Sign database: catalogs of hieroglyphic signs and their layered composition.
//!
//! ## Components
//!
//! - [`code`]: [`SignCode`] with Gardiner ordering and the family table
//! - [`catalog`]: one layer of sign descriptions parsed from TOML
//! - [`composite`]: distribution + user layers behind one query surface
//! - [`possibilities`]: ordered candidate lists for ambiguous input
//! - [`variant`]: variant relations and the symmetric variant index
//! - [`merge`]: ordered merge of pre-sorted sequences
//!
//! Both [`SignCatalog`] and [`CompositeSignDatabase`] implement
//! [`SignDatabase`], so consumers can query a single layer or the union.

pub mod catalog;
pub mod code;
pub mod composite;
pub mod error;
pub mod merge;
pub mod possibilities;
pub mod variant;

use std::collections::BTreeSet;

pub use catalog::{PhoneticLevel, PhoneticValue, SignCatalog, SignEntry};
pub use code::{Family, GardinerKey, SignCode};
pub use composite::CompositeSignDatabase;
pub use error::{SignError, SignResult};
pub use possibilities::PossibilitiesList;
pub use variant::{SignVariant, VariantFilter, VariantIndex, VariantRelation};

/// Queries answered by a sign database.
///
/// Code collections come back sorted in Gardiner order without duplicates.
/// Candidate lists ([`PossibilitiesList`]) keep precedence order instead.
pub trait SignDatabase {
    /// Every code the database defines.
    fn all_codes(&self) -> Vec<SignCode>;

    /// Resolve a code typed by the user to the code used internally.
    ///
    /// Gardiner codes are normalized regardless of case; MdC aliases (like
    /// `A` for `G1`) resolve to their sign; anything else is returned as is.
    fn canonical_code(&self, code: &str) -> SignCode;

    /// Codes in `family`, optionally including user-designed glyphs (`US<n>...`).
    fn codes_for_family(&self, family: &str, include_user_codes: bool) -> Vec<SignCode>;

    fn signs_with_tag_in_family(&self, tag: &str, family: &str) -> Vec<SignCode>;

    /// Signs of `family` that carry no tag at all.
    fn signs_without_tag_in_family(&self, family: &str) -> Vec<SignCode>;

    fn tags_for_sign(&self, code: &SignCode) -> BTreeSet<String>;

    fn tags_for_family(&self, family: &str) -> BTreeSet<String>;

    /// Phonetic values of `code`, in declaration order.
    fn values_for(&self, code: &SignCode) -> Vec<String>;

    /// Descriptive text, empty when none is known.
    fn description_for(&self, code: &SignCode) -> String;

    /// Whether the sign is shown in the palette even when filtering is on.
    fn is_always_displayed(&self, code: &SignCode) -> bool;

    /// Variants as declared on `code` itself, without symmetric closure.
    fn declared_variants(&self, code: &SignCode) -> BTreeSet<SignVariant>;

    /// Signs whose composition includes `code`.
    fn signs_containing(&self, code: &SignCode) -> Vec<SignCode>;

    /// Signs `code` is composed of.
    fn signs_in(&self, code: &SignCode) -> Vec<SignCode>;

    /// Signs answering the phonetic `value` at `level`.
    fn possibilities_for(&self, value: &str, level: PhoneticLevel) -> PossibilitiesList;

    fn codes_starting_with(&self, prefix: &str) -> PossibilitiesList;

    /// Signs usable for a Gardiner code: the code itself, then user glyphs drawn for it.
    fn suitable_signs_for_code(&self, code: &str) -> PossibilitiesList;
}
