use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single block state property value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateValue::Bool(true) => f.write_str("true"),
            StateValue::Bool(false) => f.write_str("false"),
            StateValue::Int(v) => write!(f, "{v}"),
            StateValue::Str(v) => f.write_str(v),
        }
    }
}

impl From<bool> for StateValue {
    fn from(v: bool) -> Self {
        StateValue::Bool(v)
    }
}

impl From<i64> for StateValue {
    fn from(v: i64) -> Self {
        StateValue::Int(v)
    }
}

impl From<&str> for StateValue {
    fn from(v: &str) -> Self {
        StateValue::Str(v.to_string())
    }
}

impl From<String> for StateValue {
    fn from(v: String) -> Self {
        StateValue::Str(v)
    }
}

/// Mapping from property name to value, attached to a block at definition
/// time and never mutated afterwards. Keys are unique by construction and
/// the display form is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockState {
    props: BTreeMap<String, StateValue>,
}

impl BlockState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<StateValue>) {
        self.props.insert(key.into(), value.into());
    }

    /// Builder form of [`BlockState::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<StateValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&StateValue> {
        self.props.get(key)
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StateValue)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// True when every property of `self` appears with an equal value in
    /// `other`.
    pub fn matches(&self, other: &BlockState) -> bool {
        self.props.iter().all(|(k, v)| other.props.get(k) == Some(v))
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, (k, v)) in self.props.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{k}={v}")?;
        }
        f.write_str("]")
    }
}

impl FromIterator<(String, StateValue)> for BlockState {
    fn from_iter<I: IntoIterator<Item = (String, StateValue)>>(iter: I) -> Self {
        Self {
            props: iter.into_iter().collect(),
        }
    }
}
