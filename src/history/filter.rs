//! Search-field matching for the history list.

use super::entry::HistoryEntry;
use super::host::SceneHost;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchMode {
    #[default]
    All,
    Name,
    Type,
}

/// Case-insensitive substring filter applied to list rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub query: String,
    pub mode: SearchMode,
}

impl HistoryFilter {
    pub fn new(query: impl Into<String>, mode: SearchMode) -> Self {
        Self {
            query: query.into(),
            mode,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    /// Dead entries always match so they stay visible as disabled rows.
    pub fn matches(&self, entry: &HistoryEntry, host: &dyn SceneHost) -> bool {
        if self.query.is_empty() || !entry.exists(host) {
            return true;
        }
        let needle = self.query.to_lowercase();
        let name_hit = || contains_ignore_case(&entry.resolved_name(host), &needle);
        let type_hit = || contains_ignore_case(entry.type_name(), &needle);
        match self.mode {
            SearchMode::All => name_hit() || type_hit(),
            SearchMode::Name => name_hit(),
            SearchMode::Type => type_hit(),
        }
    }
}

fn contains_ignore_case(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}
