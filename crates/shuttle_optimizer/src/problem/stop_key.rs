use std::fmt::Display;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Identity of a virtual stop: the physical stop it comes from and, when the
/// physical stop was split, the 1-based part number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub struct StopKey {
    pub original_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_index: Option<u32>,
}

impl StopKey {
    pub fn new(original_id: impl Into<String>, split_index: Option<u32>) -> Self {
        Self {
            original_id: original_id.into(),
            split_index,
        }
    }

    pub fn unsplit(original_id: impl Into<String>) -> Self {
        Self::new(original_id, None)
    }
}

impl Display for StopKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.split_index {
            Some(index) => write!(f, "{}#{}", self.original_id, index),
            None => write!(f, "{}", self.original_id),
        }
    }
}
