//! Change events emitted by a [`TopItemList`](crate::mdc::TopItemList).

use serde::Serialize;

/// What changed in a list. Ranges are half-open `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ListOperation {
    /// `count` items now occupy `[index, index + count)`.
    Inserted { index: usize, count: usize },
    /// Items formerly at `[start, end)` are gone.
    Removed { start: usize, end: usize },
    /// The item at `index` was edited in place.
    ItemModified { index: usize },
    /// Every item in `[start, end)` may have been edited in place.
    ZoneModified { start: usize, end: usize },
}
