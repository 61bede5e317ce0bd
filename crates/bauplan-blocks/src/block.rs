use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::Compound;
use crate::state::BlockState;

/// A named block with optional state and optional extra data.
///
/// Blocks are immutable value types: the `with_*` methods return a new
/// block rather than mutating in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<BlockState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Compound>,
}

impl Block {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: None,
            data: None,
        }
    }

    /// A copy of this block with the given state attached.
    pub fn with_state(&self, state: BlockState) -> Self {
        Self {
            state: Some(state),
            ..self.clone()
        }
    }

    /// A copy of this block with the given extra data attached.
    pub fn with_data(&self, data: Compound) -> Self {
        Self {
            data: Some(data),
            ..self.clone()
        }
    }

    /// Pattern match against `pattern`.
    ///
    /// Names must be equal. When the pattern declares a state, this block
    /// must declare one too and its properties must all be reproduced in
    /// the pattern's. Otherwise, when the pattern declares data, this
    /// block's data must be a shallow submapping of the pattern's. A
    /// name-only pattern matches any state or data.
    pub fn matches(&self, pattern: &Block) -> bool {
        if self.name != pattern.name {
            return false;
        }
        if let Some(pattern_state) = &pattern.state {
            return match &self.state {
                Some(state) => state.matches(pattern_state),
                None => false,
            };
        }
        if let Some(pattern_data) = &pattern.data {
            return match &self.data {
                Some(data) => data.is_submapping_of(pattern_data),
                None => false,
            };
        }
        true
    }

    pub fn matches_any_of(&self, patterns: &[Block]) -> bool {
        patterns.iter().any(|p| self.matches(p))
    }

    pub fn matches_all_of(&self, patterns: &[Block]) -> bool {
        patterns.iter().all(|p| self.matches(p))
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(state) = &self.state {
            write!(f, "{state}")?;
        }
        if let Some(data) = &self.data {
            write!(f, "{data}")?;
        }
        Ok(())
    }
}
