//! Palette-indexed structure artifacts and their serializers.
#![forbid(unsafe_code)]

pub mod file;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use bauplan_blocks::{Block, Compound};
use bauplan_geom::Vec3;
use bauplan_map::{BlockMap, MapError, MapSize};

pub use file::{FileBlockEntry, FileEntityEntry, FilePaletteEntry, StructureFile, StructureSerializer};

/// One distinct block definition referenced by a structure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructurePaletteEntry {
    pub index: usize,
    pub block: Block,
}

/// One placed block, referencing the palette by index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructureBlockEntry {
    /// Palette index.
    pub state: usize,
    pub pos: Vec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Compound>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructureEntityEntry {
    pub pos: Vec3,
    pub data: Compound,
}

/// The flattened grid's palette-deduplicated representation; the terminal
/// artifact of composition, never mutated after production.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructureData {
    pub size: Vec3,
    pub palette: Vec<StructurePaletteEntry>,
    pub blocks: Vec<StructureBlockEntry>,
    pub entities: Vec<StructureEntityEntry>,
}

#[derive(Debug, Error)]
pub enum StructureError {
    #[error("block entry references palette index {index}, but the palette has {len} entries")]
    BadPaletteIndex { index: usize, len: usize },
    #[error(transparent)]
    Map(#[from] MapError),
}

/// Serialize a block map into palette-indexed structure data.
///
/// Distinct blocks are deduplicated by name plus state; two blocks that
/// differ only in extra data share a palette entry, and the data rides the
/// placement. Palette indices follow first-seen order over the map's
/// deterministic walk. Auto-sized maps are recalibrated so the low corner
/// becomes the origin. An empty map has no corners and fails with
/// [`MapError::Empty`].
pub fn to_structure_data(block_map: &BlockMap) -> Result<StructureData, MapError> {
    let (low, _) = block_map.bounds()?;
    let auto = matches!(block_map.size(), MapSize::Auto);

    let mut index_by_key: HashMap<String, usize> = HashMap::new();
    let mut palette: Vec<StructurePaletteEntry> = Vec::new();
    let mut blocks: Vec<StructureBlockEntry> = Vec::new();

    for (pos, block) in block_map.iter() {
        let actual_pos = if auto { pos - low } else { pos };
        let key = match &block.state {
            Some(state) => format!("{}{}", block.name, state),
            None => block.name.clone(),
        };
        let index = match index_by_key.get(&key) {
            Some(index) => *index,
            None => {
                let index = palette.len();
                index_by_key.insert(key, index);
                // The palette carries name and state only; extra data is
                // per-placement.
                palette.push(StructurePaletteEntry {
                    index,
                    block: Block {
                        name: block.name.clone(),
                        state: block.state.clone(),
                        data: None,
                    },
                });
                index
            }
        };
        blocks.push(StructureBlockEntry {
            state: index,
            pos: actual_pos,
            data: block.data.clone(),
        });
    }

    Ok(StructureData {
        size: block_map.actual_size(),
        palette,
        blocks,
        entities: Vec::new(),
    })
}

/// Rebuild a block map from structure data.
///
/// The inverse of [`to_structure_data`]: palette blocks are shared across
/// placements, and per-entry data is re-attached where present.
pub fn from_structure_data(data: &StructureData) -> Result<BlockMap, StructureError> {
    let mut block_map = BlockMap::fixed(data.size);
    for entry in &data.blocks {
        let palette_entry =
            data.palette
                .get(entry.state)
                .ok_or_else(|| StructureError::BadPaletteIndex {
                    index: entry.state,
                    len: data.palette.len(),
                })?;
        let block = match &entry.data {
            Some(extra) => palette_entry.block.with_data(extra.clone()),
            None => palette_entry.block.clone(),
        };
        block_map.set(entry.pos, block)?;
    }
    Ok(block_map)
}
