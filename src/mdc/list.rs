//! The ordered list of top-level items, with marks and observers.
//!
//! Every structural edit and every zone operation is announced on two
//! channels, in a fixed order: the list's [`Marks`] are updated first, then
//! each registered [`ListObserver`] is called with the operation and the
//! already-updated marks.
//!
//! Zone operations (`shade`, `shade_partial`, `set_red`) edit many items but
//! announce a single [`ListOperation::ZoneModified`].

use std::collections::BTreeMap;

use crate::mdc::error::{ModelError, ModelResult};
use crate::mdc::item::{Shading, TopItem};
use crate::mdc::operation::ListOperation;

/// Handle to a mark registered on a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkId(u64);

/// Handle to an observer registered on a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(u64);

/// Where a mark goes when items are inserted exactly at its position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MarkGravity {
    /// Stay before the inserted items.
    #[default]
    Left,
    /// Move after the inserted items.
    Right,
}

#[derive(Debug, Clone, Copy)]
struct Mark {
    position: usize,
    gravity: MarkGravity,
}

/// Stable positions into a list.
///
/// A position is a gap between items, `0..=len`.
#[derive(Debug, Default)]
pub struct Marks {
    marks: BTreeMap<MarkId, Mark>,
    next_id: u64,
}

impl Marks {
    /// Current position of a mark.
    pub fn position(&self, id: MarkId) -> Option<usize> {
        self.marks.get(&id).map(|m| m.position)
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    fn add(&mut self, position: usize, gravity: MarkGravity) -> MarkId {
        let id = MarkId(self.next_id);
        self.next_id += 1;
        self.marks.insert(id, Mark { position, gravity });
        id
    }

    fn remove(&mut self, id: MarkId) -> bool {
        self.marks.remove(&id).is_some()
    }

    fn update(&mut self, op: &ListOperation) {
        match *op {
            ListOperation::Inserted { index, count } => {
                for mark in self.marks.values_mut() {
                    let shifts = mark.position > index
                        || (mark.position == index && mark.gravity == MarkGravity::Right);
                    if shifts {
                        mark.position += count;
                    }
                }
            }
            ListOperation::Removed { start, end } => {
                for mark in self.marks.values_mut() {
                    if mark.position >= end {
                        mark.position -= end - start;
                    } else if mark.position > start {
                        mark.position = start;
                    }
                }
            }
            ListOperation::ItemModified { .. } | ListOperation::ZoneModified { .. } => {}
        }
    }
}

/// Receives list change events, after marks have been updated.
pub trait ListObserver {
    fn list_changed(&mut self, op: &ListOperation, marks: &Marks);
}

impl<F> ListObserver for F
where
    F: FnMut(&ListOperation, &Marks),
{
    fn list_changed(&mut self, op: &ListOperation, marks: &Marks) {
        self(op, marks)
    }
}

/// Ordered sequence of [`TopItem`]s in reading order.
pub struct TopItemList {
    items: Vec<TopItem>,
    marks: Marks,
    observers: Vec<(ObserverId, Box<dyn ListObserver>)>,
    next_observer: u64,
    /// False only while a zone operation is running.
    updates_enabled: bool,
}

impl Default for TopItemList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TopItemList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopItemList")
            .field("items", &self.items)
            .field("marks", &self.marks)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl TopItemList {
    pub fn new() -> Self {
        Self::from_items(Vec::new())
    }

    pub fn from_items(items: Vec<TopItem>) -> Self {
        Self {
            items,
            marks: Marks::default(),
            observers: Vec::new(),
            next_observer: 0,
            updates_enabled: true,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TopItem> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[TopItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TopItem> {
        self.items.iter()
    }

    /// Number of pages: one more than the number of page breaks.
    pub fn page_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_page_break()).count() + 1
    }

    // ── Structural edits ────────────────────────────────────────────────

    pub fn push(&mut self, item: TopItem) {
        let index = self.items.len();
        self.items.push(item);
        self.notify(ListOperation::Inserted { index, count: 1 });
    }

    /// Insert `item` before position `index` (`0..=len`).
    pub fn insert(&mut self, index: usize, item: TopItem) -> ModelResult<()> {
        self.check_position(index)?;
        self.items.insert(index, item);
        self.notify(ListOperation::Inserted { index, count: 1 });
        Ok(())
    }

    /// Insert several items at once; one event covers them all.
    pub fn insert_all(&mut self, index: usize, items: Vec<TopItem>) -> ModelResult<()> {
        self.check_position(index)?;
        if items.is_empty() {
            return Ok(());
        }
        let count = items.len();
        self.items.splice(index..index, items);
        self.notify(ListOperation::Inserted { index, count });
        Ok(())
    }

    /// Remove and return the item at `index`.
    pub fn remove(&mut self, index: usize) -> ModelResult<TopItem> {
        if index >= self.items.len() {
            return Err(ModelError::OutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        let item = self.items.remove(index);
        self.notify(ListOperation::Removed {
            start: index,
            end: index + 1,
        });
        Ok(item)
    }

    /// Remove `[a, b)` and return the removed items, so the edit can be undone
    /// with [`insert_all`](Self::insert_all).
    pub fn remove_range(&mut self, a: usize, b: usize) -> ModelResult<Vec<TopItem>> {
        let (start, end) = self.checked_range(a, b)?;
        if start == end {
            return Ok(Vec::new());
        }
        let removed: Vec<TopItem> = self.items.drain(start..end).collect();
        self.notify(ListOperation::Removed { start, end });
        Ok(removed)
    }

    /// Independent copies of the items in `[a, b)`.
    pub fn copy_range(&self, a: usize, b: usize) -> ModelResult<Vec<TopItem>> {
        let (start, end) = self.checked_range(a, b)?;
        Ok(self.items[start..end].to_vec())
    }

    /// Edit one item in place and announce it.
    pub fn update_item<F>(&mut self, index: usize, edit: F) -> ModelResult<()>
    where
        F: FnOnce(&mut TopItem),
    {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(ModelError::OutOfBounds { index, len })?;
        edit(item);
        self.notify(ListOperation::ItemModified { index });
        Ok(())
    }

    /// A copy of the items alone; marks and observers are not carried over.
    pub fn duplicate(&self) -> Self {
        Self::from_items(self.items.clone())
    }

    // ── Zone operations ─────────────────────────────────────────────────

    /// Set or clear the shade flag of every item in `[a, b)`.
    ///
    /// Bounds past the end are rejected before anything is mutated or announced.
    pub fn shade(&mut self, a: usize, b: usize, on: bool) -> ModelResult<()> {
        self.zone_edit("shade", a, b, |item| item.state_mut().shaded = on)
    }

    /// Set quarter shading on every cadrat in `[a, b)`.
    ///
    /// Cadrats also lose their whole-item shade flag. Other item kinds are
    /// left untouched.
    pub fn shade_partial(&mut self, a: usize, b: usize, shading: Shading) -> ModelResult<()> {
        self.zone_edit("shade_partial", a, b, |item| {
            if let Some(cadrat) = item.as_cadrat_mut() {
                cadrat.shading = shading;
                cadrat.state.shaded = false;
            }
        })
    }

    /// Set or clear the red flag of every item in `[a, b)`.
    pub fn set_red(&mut self, a: usize, b: usize, red: bool) -> ModelResult<()> {
        self.zone_edit("set_red", a, b, |item| item.state_mut().red = red)
    }

    fn zone_edit<F>(&mut self, name: &str, a: usize, b: usize, mut edit: F) -> ModelResult<()>
    where
        F: FnMut(&mut TopItem),
    {
        let (start, end) = self.checked_range(a, b)?;
        self.updates_enabled = false;
        for index in start..end {
            edit(&mut self.items[index]);
            self.notify(ListOperation::ItemModified { index });
        }
        self.updates_enabled = true;
        tracing::trace!(zone_op = name, start, end, "zone edited");
        self.notify(ListOperation::ZoneModified { start, end });
        Ok(())
    }

    // ── Marks and observers ─────────────────────────────────────────────

    /// Register a mark at gap `position` (`0..=len`).
    pub fn add_mark(&mut self, position: usize, gravity: MarkGravity) -> ModelResult<MarkId> {
        self.check_position(position)?;
        Ok(self.marks.add(position, gravity))
    }

    pub fn mark_position(&self, id: MarkId) -> Option<usize> {
        self.marks.position(id)
    }

    /// Returns false if the mark was not registered.
    pub fn remove_mark(&mut self, id: MarkId) -> bool {
        self.marks.remove(id)
    }

    pub fn marks(&self) -> &Marks {
        &self.marks
    }

    pub fn add_observer(&mut self, observer: impl ListObserver + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if the observer was not registered.
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(registered, _)| *registered != id);
        self.observers.len() != before
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn notify(&mut self, op: ListOperation) {
        if !self.updates_enabled {
            return;
        }
        self.marks.update(&op);
        for (_, observer) in &mut self.observers {
            observer.list_changed(&op, &self.marks);
        }
    }

    fn check_position(&self, index: usize) -> ModelResult<()> {
        if index > self.items.len() {
            return Err(ModelError::OutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    /// Order the bounds, then check the upper one.
    fn checked_range(&self, a: usize, b: usize) -> ModelResult<(usize, usize)> {
        let (start, end) = (a.min(b), a.max(b));
        self.check_position(end)?;
        Ok((start, end))
    }
}

impl<'a> IntoIterator for &'a TopItemList {
    type Item = &'a TopItem;
    type IntoIter = std::slice::Iter<'a, TopItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn recorded(list: &mut TopItemList) -> Rc<RefCell<Vec<ListOperation>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        list.add_observer(move |op: &ListOperation, _: &Marks| sink.borrow_mut().push(*op));
        log
    }

    fn sample(n: usize) -> TopItemList {
        TopItemList::from_items((0..n).map(|_| TopItem::cadrat(["A1"])).collect())
    }

    #[test]
    fn shade_emits_exactly_one_zone_event() {
        let mut list = sample(6);
        let log = recorded(&mut list);
        list.shade(1, 4, true).unwrap();

        let shaded: Vec<bool> = list.iter().map(|i| i.state().shaded).collect();
        assert_eq!(shaded, [false, true, true, true, false, false]);
        assert_eq!(
            *log.borrow(),
            [ListOperation::ZoneModified { start: 1, end: 4 }]
        );
    }

    #[test]
    fn reversed_zone_bounds_are_normalized() {
        let mut list = sample(5);
        let log = recorded(&mut list);
        list.set_red(4, 2, true).unwrap();
        let red: Vec<bool> = list.iter().map(|i| i.state().red).collect();
        assert_eq!(red, [false, false, true, true, false]);
        assert_eq!(
            *log.borrow(),
            [ListOperation::ZoneModified { start: 2, end: 4 }]
        );
    }

    #[test]
    fn empty_zone_still_reports_once() {
        let mut list = sample(3);
        let log = recorded(&mut list);
        list.shade(2, 2, true).unwrap();
        assert!(list.iter().all(|i| !i.state().shaded));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn zone_past_end_is_rejected_without_events() {
        let mut list = sample(3);
        let log = recorded(&mut list);
        let err = list.shade(1, 9, true).unwrap_err();
        assert!(matches!(err, ModelError::OutOfBounds { index: 9, len: 3 }));
        assert!(log.borrow().is_empty());
        assert!(list.iter().all(|i| !i.state().shaded));
    }

    #[test]
    fn partial_shading_touches_only_cadrats() {
        let mut list = TopItemList::from_items(vec![
            TopItem::cadrat(["A1"]),
            TopItem::page_break(),
            TopItem::cadrat(["B1"]),
        ]);
        list.shade(0, 3, true).unwrap();
        list.shade_partial(0, 3, Shading::TOP_START | Shading::TOP_END)
            .unwrap();

        let first = list.get(0).and_then(TopItem::as_cadrat).unwrap();
        assert_eq!(first.shading.bits(), 3);
        assert!(!first.state.shaded);
        assert!(list.get(1).unwrap().state().shaded);
    }

    #[test]
    fn update_item_reports_single_modification() {
        let mut list = sample(2);
        let log = recorded(&mut list);
        list.update_item(1, |item| item.state_mut().red = true)
            .unwrap();
        assert!(list.get(1).unwrap().state().red);
        assert_eq!(*log.borrow(), [ListOperation::ItemModified { index: 1 }]);
        assert!(list.update_item(2, |_| {}).is_err());
    }

    #[test]
    fn structural_events() {
        let mut list = TopItemList::new();
        let log = recorded(&mut list);
        list.push(TopItem::text("a"));
        list.insert(0, TopItem::line_break()).unwrap();
        list.insert_all(1, vec![TopItem::tabulation(1), TopItem::tabulation(2)])
            .unwrap();
        let removed = list.remove_range(3, 1).unwrap();
        assert_eq!(removed.len(), 2);
        list.remove(0).unwrap();
        assert_eq!(
            *log.borrow(),
            [
                ListOperation::Inserted { index: 0, count: 1 },
                ListOperation::Inserted { index: 0, count: 1 },
                ListOperation::Inserted { index: 1, count: 2 },
                ListOperation::Removed { start: 1, end: 3 },
                ListOperation::Removed { start: 0, end: 1 },
            ]
        );
        assert_eq!(list.items(), [TopItem::text("a")]);
    }

    #[test]
    fn out_of_bounds_positions() {
        let mut list = sample(2);
        assert!(list.insert(3, TopItem::page_break()).is_err());
        assert!(list.remove(2).is_err());
        assert!(list.copy_range(0, 3).is_err());
        assert!(list.add_mark(3, MarkGravity::Left).is_err());
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn removed_range_restores_by_reinsertion() {
        let mut list = TopItemList::from_items(vec![
            TopItem::text("a"),
            TopItem::text("b"),
            TopItem::text("c"),
        ]);
        let snapshot = list.duplicate();
        let removed = list.remove_range(1, 3).unwrap();
        list.insert_all(1, removed).unwrap();
        assert_eq!(list.items(), snapshot.items());
    }

    #[test]
    fn copy_range_does_not_alias() {
        let mut list = sample(3);
        let mut copy = list.copy_range(0, 2).unwrap();
        copy[0].state_mut().shaded = true;
        assert!(!list.get(0).unwrap().state().shaded);
        list.shade(0, 1, true).unwrap();
        assert!(!copy[1].state().shaded);
    }

    #[test]
    fn page_count_tracks_breaks() {
        let mut list = TopItemList::new();
        assert_eq!(list.page_count(), 1);
        list.push(TopItem::page_break());
        list.push(TopItem::cadrat(["A1"]));
        list.push(TopItem::page_break());
        assert_eq!(list.page_count(), 3);
        list.remove(0).unwrap();
        assert_eq!(list.page_count(), 2);
    }

    #[test]
    fn marks_follow_edits() {
        let mut list = sample(4);
        let left = list.add_mark(2, MarkGravity::Left).unwrap();
        let right = list.add_mark(2, MarkGravity::Right).unwrap();
        let tail = list.add_mark(4, MarkGravity::Left).unwrap();

        list.insert(2, TopItem::page_break()).unwrap();
        assert_eq!(list.mark_position(left), Some(2));
        assert_eq!(list.mark_position(right), Some(3));
        assert_eq!(list.mark_position(tail), Some(5));

        list.remove_range(1, 4).unwrap();
        assert_eq!(list.mark_position(left), Some(1));
        assert_eq!(list.mark_position(right), Some(1));
        assert_eq!(list.mark_position(tail), Some(2));

        assert!(list.remove_mark(left));
        assert!(!list.remove_mark(left));
        assert_eq!(list.mark_position(left), None);
    }

    #[test]
    fn marks_are_updated_before_observers_run() {
        let mut list = sample(2);
        let mark = list.add_mark(1, MarkGravity::Left).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        list.add_observer(move |_: &ListOperation, marks: &Marks| {
            sink.borrow_mut().push(marks.position(mark));
        });
        list.insert(0, TopItem::line_break()).unwrap();
        assert_eq!(*seen.borrow(), [Some(2)]);
    }

    #[test]
    fn removed_observer_is_silent() {
        let mut list = sample(1);
        let log = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&log);
        let id = list.add_observer(move |_: &ListOperation, _: &Marks| *sink.borrow_mut() += 1);
        list.push(TopItem::page_break());
        assert!(list.remove_observer(id));
        list.push(TopItem::page_break());
        assert_eq!(*log.borrow(), 1);
        assert!(!list.remove_observer(id));
    }

    #[test]
    fn duplicate_drops_marks_and_observers() {
        let mut list = sample(2);
        list.add_mark(0, MarkGravity::Left).unwrap();
        let _log = recorded(&mut list);
        let copy = list.duplicate();
        assert_eq!(copy.items(), list.items());
        assert!(copy.marks().is_empty());
        assert!(format!("{copy:?}").contains("observers: 0"));
    }
}
