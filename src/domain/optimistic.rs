//! Shared optimistic-then-reconcile policy.
//!
//! Two call sites use the same model: a local mutation stands in for
//! not-yet-confirmed server state, and authoritative data later either
//! consumes the speculated entry (messages) or replaces the whole slot
//! (reactions). Server data always wins.

/// Removes and returns the first pending entry that an authoritative arrival
/// matches. At most one entry is consumed per call.
pub fn confirm_first<T>(
    items: &mut Vec<T>,
    is_pending: impl Fn(&T) -> bool,
    matches: impl Fn(&T) -> bool,
) -> Option<T> {
    let index = items
        .iter()
        .position(|item| is_pending(item) && matches(item))?;
    Some(items.remove(index))
}

/// Replaces a slot wholesale with authoritative entries, dropping any that
/// fail `keep` (e.g. aggregates whose reactor set emptied).
pub fn server_wins<T>(slot: &mut Vec<T>, authoritative: Vec<T>, keep: impl Fn(&T) -> bool) {
    *slot = authoritative.into_iter().filter(|item| keep(item)).collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_first_consumes_only_the_first_match() {
        let mut items = vec![1, 2, 2, 3];

        let taken = confirm_first(&mut items, |n| *n > 1, |n| *n == 2);

        assert_eq!(taken, Some(2));
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn confirm_first_ignores_non_pending_entries() {
        let mut items = vec![2, 2];

        let taken = confirm_first(&mut items, |_| false, |n| *n == 2);

        assert_eq!(taken, None);
        assert_eq!(items, vec![2, 2]);
    }

    #[test]
    fn server_wins_replaces_and_filters() {
        let mut slot = vec![1, 2, 3];

        server_wins(&mut slot, vec![4, 0, 5], |n| *n > 0);

        assert_eq!(slot, vec![4, 5]);
    }
}
