use serde::{Deserialize, Serialize};

/// A discoverable location as served by the backend.
///
/// Counters are maintained server-side; the client never changes them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub dislike_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Place {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_counts(mut self, like_count: u64, dislike_count: u64) -> Self {
        self.like_count = like_count;
        self.dislike_count = dislike_count;
        self
    }

    /// Share of votes that were likes, or `None` before anyone voted.
    pub fn approval(&self) -> Option<f64> {
        let total = self.like_count + self.dislike_count;
        if total == 0 {
            return None;
        }
        Some(self.like_count as f64 / total as f64)
    }
}

/// Payload for submitting a new place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlace {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl NewPlace {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Direction of a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Like,
    Dislike,
}

impl Vote {
    /// Path segment used by the backend's vote endpoints.
    pub fn as_str(&self) -> &'static str {
        match self {
            Vote::Like => "like",
            Vote::Dislike => "dislike",
        }
    }
}
