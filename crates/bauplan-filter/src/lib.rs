//! Ordered keep/remove/replace transformations over a block map.
#![forbid(unsafe_code)]

use bauplan_blocks::Block;
use bauplan_map::BlockMap;

/// A single block-set transformation.
///
/// Rules carry fully resolved pattern blocks; applying a rule never
/// performs lookup.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterRule {
    /// Retain only cells matching one of the patterns.
    Keep { blocks: Vec<Block> },
    /// Delete cells matching one of the patterns.
    Remove { blocks: Vec<Block> },
    /// Substitute cells matching one of the patterns, preserving position.
    Replace {
        blocks: Vec<Block>,
        replacement: Block,
    },
}

impl FilterRule {
    pub fn apply(&self, block_map: &mut BlockMap) {
        match self {
            FilterRule::Keep { blocks } => block_map.keep_blocks(blocks),
            FilterRule::Remove { blocks } => block_map.remove_blocks(blocks),
            FilterRule::Replace {
                blocks,
                replacement,
            } => block_map.replace_blocks(blocks, replacement),
        }
    }
}

/// An ordered list of rules applied in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    pub rules: Vec<FilterRule>,
}

impl Filter {
    pub fn new(rules: Vec<FilterRule>) -> Self {
        Self { rules }
    }

    pub fn apply(&self, block_map: &mut BlockMap) {
        for rule in &self.rules {
            rule.apply(block_map);
        }
    }
}
