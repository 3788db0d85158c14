//! In-memory document model.
//!
//! - [`modifier`]: sign modifiers and the pure [`ModifierState`] algebra
//! - [`item`]: the closed set of [`TopItem`] kinds
//! - [`list`]: [`TopItemList`] with zone operations, marks and observers
//! - [`operation`]: change events announced by a list

pub mod error;
pub mod item;
pub mod list;
pub mod modifier;
pub mod operation;

pub use error::{ModelError, ModelResult};
pub use item::{Cadrat, ItemState, Shading, Sign, TopItem};
pub use list::{ListObserver, MarkGravity, MarkId, Marks, ObserverId, TopItemList};
pub use modifier::{Modifier, ModifierKind, ModifierState};
pub use operation::ListOperation;
