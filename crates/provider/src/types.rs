use catalog::SuggestionResult;
use serde::{Deserialize, Serialize};

/// What the host knows about the current keystroke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryContext {
    /// Identifier the host assigns to each query. A later keystroke gets a
    /// new id, which is how stale matches are told apart.
    pub query_id: u64,
    /// Raw text in the address bar.
    pub search_string: String,
}

impl QueryContext {
    pub fn new(query_id: u64, search_string: impl Into<String>) -> Self {
        Self {
            query_id,
            search_string: search_string.into(),
        }
    }
}

/// Session lifecycle notifications from the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The user started a new interaction with the address bar.
    Start,
    /// The user picked a result. `selected_provider` names the provider that
    /// produced it, as reported by the host.
    Engagement { selected_provider: Option<String> },
    /// The user left without picking anything.
    Abandonment,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    Engagement,
    Abandonment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    Url,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    OtherNetwork,
}

/// A suggestion packaged for the host's result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderResult {
    pub suggestion: SuggestionResult,
    pub result_type: ResultType,
    pub source: ResultSource,
    /// Preferred row in the dropdown.
    pub suggested_index: u32,
}
