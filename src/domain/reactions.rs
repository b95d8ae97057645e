use std::collections::{BTreeSet, HashMap};

use super::optimistic;

/// The set of users who reacted to one message with one emoji.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionAggregate {
    pub emoji: String,
    pub reactor_ids: BTreeSet<String>,
}

impl ReactionAggregate {
    pub fn new(emoji: impl Into<String>) -> Self {
        Self {
            emoji: emoji.into(),
            reactor_ids: BTreeSet::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.reactor_ids.len()
    }
}

/// Per-message reaction aggregates with optimistic toggle and server-wins
/// reconciliation. An aggregate with no reactors is removed, never kept at
/// zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReactionBoard {
    by_message: HashMap<String, Vec<ReactionAggregate>>,
}

impl ReactionBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregates for a message, ordered by emoji.
    pub fn aggregates_for(&self, message_id: &str) -> &[ReactionAggregate] {
        self.by_message
            .get(message_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Optimistically flips the user's membership in the emoji's reactor
    /// set. Returns whether the user is a reactor afterwards.
    pub fn toggle(&mut self, message_id: &str, emoji: &str, user_id: &str) -> bool {
        let aggregates = self.by_message.entry(message_id.to_owned()).or_default();

        let now_present = match aggregates.iter_mut().find(|agg| agg.emoji == emoji) {
            Some(aggregate) => {
                if !aggregate.reactor_ids.remove(user_id) {
                    aggregate.reactor_ids.insert(user_id.to_owned());
                }
                aggregate.reactor_ids.contains(user_id)
            }
            None => {
                let mut aggregate = ReactionAggregate::new(emoji);
                aggregate.reactor_ids.insert(user_id.to_owned());
                aggregates.push(aggregate);
                aggregates.sort_by(|a, b| a.emoji.cmp(&b.emoji));
                true
            }
        };

        aggregates.retain(|agg| agg.count() > 0);
        if aggregates.is_empty() {
            self.by_message.remove(message_id);
        }
        now_present
    }

    /// Undoes a failed outbound toggle. The toggle is self-inverse, so this
    /// is the same flip applied again.
    pub fn revert(&mut self, message_id: &str, emoji: &str, user_id: &str) -> bool {
        self.toggle(message_id, emoji, user_id)
    }

    /// Replaces all aggregates for a message with the server's authoritative
    /// list. The only path that can correct an optimistic mistake.
    pub fn reconcile(&mut self, message_id: &str, mut authoritative: Vec<ReactionAggregate>) {
        authoritative.sort_by(|a, b| a.emoji.cmp(&b.emoji));
        let slot = self.by_message.entry(message_id.to_owned()).or_default();
        optimistic::server_wins(slot, authoritative, |agg| agg.count() > 0);
        if slot.is_empty() {
            self.by_message.remove(message_id);
        }
    }

    /// Re-keys aggregates when a placeholder is replaced by its server echo.
    pub fn rename_message(&mut self, old_id: &str, new_id: &str) {
        if let Some(aggregates) = self.by_message.remove(old_id) {
            self.by_message.insert(new_id.to_owned(), aggregates);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregate(emoji: &str, reactors: &[&str]) -> ReactionAggregate {
        ReactionAggregate {
            emoji: emoji.to_owned(),
            reactor_ids: reactors.iter().map(|id| (*id).to_owned()).collect(),
        }
    }

    #[test]
    fn first_toggle_creates_singleton_aggregate() {
        let mut board = ReactionBoard::new();

        assert!(board.toggle("m1", "👍", "u1"));

        let aggregates = board.aggregates_for("m1");
        assert_eq!(aggregates, &[aggregate("👍", &["u1"])]);
        assert_eq!(aggregates[0].count(), 1);
    }

    #[test]
    fn second_toggle_removes_the_aggregate_entirely() {
        let mut board = ReactionBoard::new();
        board.toggle("m1", "👍", "u1");

        assert!(!board.toggle("m1", "👍", "u1"));

        assert!(board.aggregates_for("m1").is_empty());
    }

    #[test]
    fn toggle_by_second_user_grows_the_set() {
        let mut board = ReactionBoard::new();
        board.toggle("m1", "👍", "u1");
        board.toggle("m1", "👍", "u2");

        assert_eq!(board.aggregates_for("m1"), &[aggregate("👍", &["u1", "u2"])]);
    }

    #[test]
    fn withdrawing_one_of_two_reactors_keeps_the_aggregate() {
        let mut board = ReactionBoard::new();
        board.toggle("m1", "👍", "u1");
        board.toggle("m1", "👍", "u2");

        board.toggle("m1", "👍", "u1");

        assert_eq!(board.aggregates_for("m1"), &[aggregate("👍", &["u2"])]);
    }

    #[test]
    fn aggregates_stay_ordered_by_emoji() {
        let mut board = ReactionBoard::new();
        board.toggle("m1", "🎉", "u1");
        board.toggle("m1", "👀", "u1");

        let emojis: Vec<&str> = board
            .aggregates_for("m1")
            .iter()
            .map(|agg| agg.emoji.as_str())
            .collect();
        let mut sorted = emojis.clone();
        sorted.sort();
        assert_eq!(emojis, sorted);
    }

    #[test]
    fn reconcile_replaces_local_state_wholesale() {
        let mut board = ReactionBoard::new();
        board.toggle("m1", "👍", "u1");

        board.reconcile(
            "m1",
            vec![aggregate("🎉", &["u2", "u3"]), aggregate("👍", &["u2"])],
        );

        assert_eq!(
            board.aggregates_for("m1"),
            &[aggregate("🎉", &["u2", "u3"]), aggregate("👍", &["u2"])]
        );
    }

    #[test]
    fn reconcile_drops_empty_aggregates() {
        let mut board = ReactionBoard::new();
        board.toggle("m1", "👍", "u1");

        board.reconcile("m1", vec![aggregate("👍", &[])]);

        assert!(board.aggregates_for("m1").is_empty());
    }

    #[test]
    fn revert_undoes_an_optimistic_toggle() {
        let mut board = ReactionBoard::new();
        board.toggle("m1", "👍", "u1");
        board.toggle("m1", "👍", "u2");
        let before = board.clone();

        board.toggle("m1", "🎉", "u2");
        board.revert("m1", "🎉", "u2");

        assert_eq!(board, before);
    }

    #[test]
    fn rename_message_moves_aggregates_to_the_server_id() {
        let mut board = ReactionBoard::new();
        board.toggle("local-1", "👍", "u1");

        board.rename_message("local-1", "42");

        assert!(board.aggregates_for("local-1").is_empty());
        assert_eq!(board.aggregates_for("42"), &[aggregate("👍", &["u1"])]);
    }
}
