//! Ordered merge of two pre-sorted sequences.
//!
//! Both layers of the composite database answer collection queries in sorted
//! order; the composite combines them here instead of re-sorting. The
//! comparator is the element's `Ord` (for [`SignCode`](super::SignCode), the
//! Gardiner ordering), which is also the deduplication key.

use std::cmp::Ordering;

/// Merge two ascending sequences into one ascending, deduplicated `Vec`.
///
/// Inputs must already be sorted. Duplicates inside one input are collapsed
/// too, so the output is strictly increasing.
pub fn merge_sorted<T, A, B>(left: A, right: B) -> Vec<T>
where
    T: Ord,
    A: IntoIterator<Item = T>,
    B: IntoIterator<Item = T>,
{
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    let mut out: Vec<T> = Vec::new();

    loop {
        let next = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => match l.cmp(r) {
                Ordering::Less => left.next(),
                Ordering::Greater => right.next(),
                Ordering::Equal => {
                    right.next();
                    left.next()
                }
            },
            (Some(_), None) => left.next(),
            (None, Some(_)) => right.next(),
            (None, None) => break,
        };
        if let Some(item) = next {
            if out.last() != Some(&item) {
                out.push(item);
            }
        }
    }

    out
}
