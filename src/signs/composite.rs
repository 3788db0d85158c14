//! Distribution + user sign catalogs behind one query surface.
//!
//! The distribution layer is required: failing to load it fails construction.
//! The user layer is optional and untrusted: if it cannot be read or parsed,
//! the database records that fact (see [`CompositeSignDatabase::is_user_file_valid`])
//! and carries on with the distribution layer alone.
//!
//! Collection queries merge both layers in Gardiner order via
//! [`merge_sorted`]; candidate lists merge with
//! [`PossibilitiesList::merge`], distribution first.

use std::collections::BTreeSet;
use std::path::Path;

use crate::config::DatabaseConfig;
use crate::paths::MdcPaths;
use crate::signs::code::{self, Family};
use crate::signs::error::{SignError, SignResult};
use crate::signs::merge::merge_sorted;
use crate::signs::{
    PhoneticLevel, PossibilitiesList, SignCatalog, SignCode, SignDatabase, SignVariant,
    VariantFilter, VariantIndex,
};

/// The sign catalog shipped with the crate.
pub const BUILTIN_SIGNS: &str = include_str!("../../data/signs_description.toml");

/// Origin label of the built-in catalog in diagnostics.
pub const BUILTIN_ORIGIN: &str = "<built-in signs_description.toml>";

/// Two-layer sign database.
///
/// Build it once at startup and pass it by reference to whatever needs sign
/// lookups; there is no global instance.
#[derive(Debug, Clone)]
pub struct CompositeSignDatabase {
    distribution: SignCatalog,
    user: SignCatalog,
    user_file_valid: bool,
    user_file_message: String,
    variant_index: VariantIndex,
}

impl CompositeSignDatabase {
    /// Compose two already-parsed layers.
    pub fn new(distribution: SignCatalog, user: SignCatalog) -> Self {
        let variant_index = build_variant_index(&distribution, &user);
        tracing::info!(
            distribution = distribution.len(),
            user = user.len(),
            variant_entries = variant_index.entry_count(),
            "sign database ready"
        );
        Self {
            distribution,
            user,
            user_file_valid: true,
            user_file_message: String::new(),
            variant_index,
        }
    }

    /// The built-in distribution catalog with an empty user layer.
    pub fn builtin() -> SignResult<Self> {
        Self::from_sources(BUILTIN_SIGNS, None)
    }

    /// Build from source texts. A malformed distribution source is an error;
    /// a malformed user source only invalidates the user layer.
    pub fn from_sources(distribution: &str, user: Option<&str>) -> SignResult<Self> {
        let distribution = SignCatalog::parse(BUILTIN_ORIGIN, distribution)?;
        let mut db = Self::new(distribution, SignCatalog::empty("<none>"));
        if user.is_some() {
            db.reload_user_catalog(user);
        }
        Ok(db)
    }

    /// Build from configuration, reading files as needed.
    pub fn open(config: &DatabaseConfig) -> SignResult<Self> {
        let distribution = match &config.distribution_file {
            Some(path) if !path.exists() => {
                return Err(SignError::MissingDistribution {
                    path: path.display().to_string(),
                });
            }
            Some(path) => SignCatalog::load(path)?,
            None => SignCatalog::parse(BUILTIN_ORIGIN, BUILTIN_SIGNS)?,
        };
        let mut db = Self::new(distribution, SignCatalog::empty("<none>"));

        let paths = MdcPaths::resolve().ok();
        if let Some(user_file) = config.resolve_user_file(paths.as_ref()) {
            db.reload_user_file(&user_file);
        }
        Ok(db)
    }

    /// Replace the user layer from source text (`None` clears it).
    ///
    /// Resets the validity flag and rebuilds the variant index.
    pub fn reload_user_catalog(&mut self, source: Option<&str>) {
        let result = match source {
            Some(text) => SignCatalog::parse("<user signs_definition>", text),
            None => Ok(SignCatalog::empty("<none>")),
        };
        self.install_user(result);
    }

    /// Replace the user layer from a file. A missing file is an empty, valid layer.
    pub fn reload_user_file(&mut self, path: &Path) {
        let result = if path.exists() {
            SignCatalog::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no user sign definition file");
            Ok(SignCatalog::empty(path.display().to_string()))
        };
        self.install_user(result);
    }

    fn install_user(&mut self, result: SignResult<SignCatalog>) {
        match result {
            Ok(user) => {
                self.user = user;
                self.user_file_valid = true;
                self.user_file_message.clear();
            }
            Err(e) => {
                tracing::warn!(error = %e, "user sign catalog rejected, using distribution signs only");
                self.user = SignCatalog::empty("<rejected>");
                self.user_file_valid = false;
                self.user_file_message = e.to_string();
            }
        }
        self.variant_index = build_variant_index(&self.distribution, &self.user);
        tracing::debug!(
            user = self.user.len(),
            variant_entries = self.variant_index.entry_count(),
            "user sign catalog reloaded"
        );
    }

    /// False when the user catalog exists but could not be read or parsed.
    pub fn is_user_file_valid(&self) -> bool {
        self.user_file_valid
    }

    /// Why the user catalog was rejected. Empty when it is valid.
    pub fn user_file_message(&self) -> &str {
        &self.user_file_message
    }

    pub fn distribution(&self) -> &SignCatalog {
        &self.distribution
    }

    pub fn user(&self) -> &SignCatalog {
        &self.user
    }

    /// The Gardiner family table.
    pub fn families(&self) -> &'static [Family] {
        code::families()
    }

    /// Codes related to `code` by a relation matching `filter`, in either
    /// direction of declaration, across both layers.
    pub fn variants(&self, code: &SignCode, filter: VariantFilter) -> BTreeSet<SignCode> {
        self.variant_index.variants(code, filter)
    }

    pub fn variant_index(&self) -> &VariantIndex {
        &self.variant_index
    }
}

fn build_variant_index(distribution: &SignCatalog, user: &SignCatalog) -> VariantIndex {
    // User entries may name distribution codes; both layers feed one index.
    let edges = distribution
        .entries()
        .chain(user.entries())
        .flat_map(|e| e.variants.iter().map(move |v| (&e.code, v)));
    VariantIndex::build(edges)
}

impl SignDatabase for CompositeSignDatabase {
    fn all_codes(&self) -> Vec<SignCode> {
        merge_sorted(self.distribution.all_codes(), self.user.all_codes())
    }

    fn canonical_code(&self, code: &str) -> SignCode {
        self.distribution.canonical_code(code)
    }

    fn codes_for_family(&self, family: &str, include_user_codes: bool) -> Vec<SignCode> {
        merge_sorted(
            self.distribution.codes_for_family(family, include_user_codes),
            self.user.codes_for_family(family, include_user_codes),
        )
    }

    fn signs_with_tag_in_family(&self, tag: &str, family: &str) -> Vec<SignCode> {
        merge_sorted(
            self.distribution.signs_with_tag_in_family(tag, family),
            self.user.signs_with_tag_in_family(tag, family),
        )
    }

    fn signs_without_tag_in_family(&self, family: &str) -> Vec<SignCode> {
        merge_sorted(
            self.distribution.signs_without_tag_in_family(family),
            self.user.signs_without_tag_in_family(family),
        )
    }

    fn tags_for_sign(&self, code: &SignCode) -> BTreeSet<String> {
        let mut tags = self.distribution.tags_for_sign(code);
        tags.extend(self.user.tags_for_sign(code));
        tags
    }

    fn tags_for_family(&self, family: &str) -> BTreeSet<String> {
        let mut tags = self.distribution.tags_for_family(family);
        tags.extend(self.user.tags_for_family(family));
        tags
    }

    fn values_for(&self, code: &SignCode) -> Vec<String> {
        let mut values = self.distribution.values_for(code);
        values.extend(self.user.values_for(code));
        values
    }

    fn description_for(&self, code: &SignCode) -> String {
        let user = self.user.description_for(code);
        if user.is_empty() {
            self.distribution.description_for(code)
        } else {
            user
        }
    }

    fn is_always_displayed(&self, code: &SignCode) -> bool {
        self.distribution.is_always_displayed(code) || self.user.is_always_displayed(code)
    }

    fn declared_variants(&self, code: &SignCode) -> BTreeSet<SignVariant> {
        let mut variants = self.distribution.declared_variants(code);
        variants.extend(self.user.declared_variants(code));
        variants
    }

    fn signs_containing(&self, code: &SignCode) -> Vec<SignCode> {
        merge_sorted(
            self.distribution.signs_containing(code),
            self.user.signs_containing(code),
        )
    }

    fn signs_in(&self, code: &SignCode) -> Vec<SignCode> {
        merge_sorted(self.distribution.signs_in(code), self.user.signs_in(code))
    }

    fn possibilities_for(&self, value: &str, level: PhoneticLevel) -> PossibilitiesList {
        self.distribution
            .possibilities_for(value, level)
            .merge(&self.user.possibilities_for(value, level))
    }

    fn codes_starting_with(&self, prefix: &str) -> PossibilitiesList {
        self.distribution
            .codes_starting_with(prefix)
            .merge(&self.user.codes_starting_with(prefix))
    }

    fn suitable_signs_for_code(&self, code: &str) -> PossibilitiesList {
        if SignCode::normalize(code).is_none() {
            return PossibilitiesList::resolved(code);
        }
        self.distribution
            .suitable_signs_for_code(code)
            .merge(&self.user.suitable_signs_for_code(code))
    }
}
