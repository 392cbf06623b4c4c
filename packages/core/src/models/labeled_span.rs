//! Labeled Spans
//!
//! A labeled example is an utterance plus a tree of entity labels whose shape
//! mirrors an entity schema. Offsets are half-open `[start, end)` and count
//! characters, not bytes.
//!
//! ```json
//! {
//!   "startIndex": 7,
//!   "endIndex": 30,
//!   "entityName": "Pizza",
//!   "children": [
//!     { "startIndex": 7, "endIndex": 9, "entityName": "Quantity" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledSpan {
    pub start_index: usize,
    pub end_index: usize,
    pub entity_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LabeledSpan>,
}

impl LabeledSpan {
    pub fn new(entity_name: impl Into<String>, start_index: usize, end_index: usize) -> Self {
        Self {
            start_index,
            end_index,
            entity_name: entity_name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<LabeledSpan>) -> Self {
        self.children = children;
        self
    }

    /// Length in characters (zero for inverted spans)
    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Half-open overlap test
    pub fn overlaps(&self, other: &LabeledSpan) -> bool {
        self.start_index < other.end_index && other.start_index < self.end_index
    }

    /// True when `other` lies within `self`
    pub fn contains(&self, other: &LabeledSpan) -> bool {
        self.start_index <= other.start_index && other.end_index <= self.end_index
    }

    /// The labeled characters of `text`, or `None` if out of range
    pub fn covered_text(&self, text: &str) -> Option<String> {
        if self.start_index > self.end_index {
            return None;
        }
        let covered: String = text
            .chars()
            .skip(self.start_index)
            .take(self.len())
            .collect();
        if covered.chars().count() == self.len() {
            Some(covered)
        } else {
            None
        }
    }
}

impl fmt::Display for LabeledSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}'[{},{})",
            self.entity_name, self.start_index, self.end_index
        )
    }
}

/// An utterance labeled with an intent and entity spans
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledExample {
    pub text: String,
    pub intent_name: String,
    #[serde(default)]
    pub entity_labels: Vec<LabeledSpan>,
}
