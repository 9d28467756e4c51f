//! Pure ordering rules applied between consecutive live documents.

use std::cmp::Ordering;

use crate::verify::{MissingPolicy, Selector, SortOrder};

/// Whether moving from a document with `prev_has` to one with `has` is
/// allowed under `policy`.
///
/// Under [`MissingPolicy::Fail`] every transition is allowed here; a missing
/// value has already stopped the scan before this is consulted. Two present
/// values are left to [`order_holds`].
pub fn missing_transition_allowed(prev_has: bool, has: bool, policy: MissingPolicy) -> bool {
    match (prev_has, has) {
        _ if policy == MissingPolicy::Fail => true,
        (false, false) => true,
        (false, true) => policy == MissingPolicy::First,
        (true, false) => policy == MissingPolicy::Last,
        (true, true) => true,
    }
}

/// Pick the representative of an ascending per-document value list.
///
/// Returns `None` only for an empty list.
pub fn select<T: Copy>(values: &[T], selector: Selector) -> Option<T> {
    match selector {
        Selector::Min => values.first().copied(),
        Selector::Max => values.last().copied(),
    }
}

/// Whether `prev` followed by `current` respects `order`. Ties always hold.
pub fn order_holds<T: Ord + ?Sized>(prev: &T, current: &T, order: SortOrder) -> bool {
    match (prev.cmp(current), order) {
        (Ordering::Equal, _) => true,
        (Ordering::Less, SortOrder::Ascending) => true,
        (Ordering::Greater, SortOrder::Descending) => true,
        _ => false,
    }
}
