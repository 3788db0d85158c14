// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # mdc-model
//!
//! Sign database and document model for hieroglyphic text encoded in the
//! Manuel de Codage (MdC).
//!
//! ## Architecture
//!
//! - **Sign database** (`signs`): a built-in distribution catalog layered with an
//!   optional user catalog, with phonetic lookup and a symmetric variant index
//! - **Document model** (`mdc`): top-level items, the modifier-state algebra,
//!   batched zone edits and change notification
//! - **Configuration** (`config`, `paths`): TOML config and XDG locations
//!
//! ## Library usage
//!
//! ```no_run
//! use mdc_model::signs::{CompositeSignDatabase, PhoneticLevel, SignDatabase};
//!
//! let db = CompositeSignDatabase::builtin().unwrap();
//! let nfr = db.possibilities_for("nfr", PhoneticLevel::Palette);
//! println!("{:?}", nfr.first());
//! ```

pub mod config;
pub mod error;
pub mod mdc;
pub mod paths;
pub mod signs;
