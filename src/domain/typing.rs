use std::collections::HashMap;

/// How long a typing signal stays visible without being renewed.
pub const DEFAULT_TYPING_TTL_MS: i64 = 2_500;

#[derive(Debug, Clone, PartialEq, Eq)]
struct TypingEntry {
    display_name: Option<String>,
    expires_at_ms: i64,
}

/// Short-lived map of who is typing. Entries are never explicitly deleted:
/// absence is expressed purely through TTL expiry on the sweep tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingRegistry {
    entries: HashMap<String, TypingEntry>,
    ttl_ms: i64,
}

impl Default for TypingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypingRegistry {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TYPING_TTL_MS)
    }

    pub fn with_ttl(ttl_ms: i64) -> Self {
        Self {
            entries: HashMap::new(),
            ttl_ms,
        }
    }

    /// Records a typing ping. The last signal wins: an existing entry's
    /// expiry is overwritten, never extended additively.
    pub fn signal(&mut self, user_id: &str, display_name: Option<String>, now_ms: i64) {
        self.entries.insert(
            user_id.to_owned(),
            TypingEntry {
                display_name,
                expires_at_ms: now_ms + self.ttl_ms,
            },
        );
    }

    /// Drops entries whose TTL has elapsed. Called from the periodic tick.
    pub fn sweep(&mut self, now_ms: i64) {
        self.entries.retain(|_, entry| entry.expires_at_ms > now_ms);
    }

    /// Display names of everyone currently typing except `exclude_user_id`,
    /// sorted by name so the presentation order is stable.
    pub fn active_typers(&self, exclude_user_id: &str, now_ms: i64) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .iter()
            .filter(|(user_id, entry)| {
                user_id.as_str() != exclude_user_id && entry.expires_at_ms > now_ms
            })
            .map(|(user_id, entry)| entry.display_name.clone().unwrap_or_else(|| user_id.clone()))
            .collect();
        names.sort();
        names
    }

    /// Presentation line: one name, two names, or the first two plus a
    /// remainder count. `None` when nobody is typing.
    pub fn summary(&self, exclude_user_id: &str, now_ms: i64) -> Option<String> {
        let names = self.active_typers(exclude_user_id, now_ms);
        match names.as_slice() {
            [] => None,
            [one] => Some(format!("{one} is typing")),
            [one, two] => Some(format!("{one} and {two} are typing")),
            [one, two, rest @ ..] => Some(format!(
                "{one}, {two} and {} others are typing",
                rest.len()
            )),
        }
    }
}
