use std::collections::BTreeSet;

/// Members currently subscribed to the conversation's live channel.
///
/// Membership is transport-derived: a full roster on subscription success,
/// then incremental add/remove events. Last write wins per user id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceTracker {
    online: BTreeSet<String>,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the full roster, discarding any previous state.
    pub fn set_all(&mut self, member_ids: Vec<String>) {
        self.online = member_ids.into_iter().collect();
    }

    pub fn add(&mut self, user_id: &str) {
        self.online.insert(user_id.to_owned());
    }

    pub fn remove(&mut self, user_id: &str) {
        self.online.remove(user_id);
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.online.contains(user_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.online.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.online.len()
    }

    pub fn is_empty(&self) -> bool {
        self.online.is_empty()
    }
}
