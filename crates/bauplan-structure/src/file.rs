//! Persisted structure-file shape, with the external format's field
//! spelling.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use bauplan_blocks::Compound;
use bauplan_geom::Vec3;

use crate::{StructureData, StructureEntityEntry};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilePaletteEntry {
    #[serde(rename = "Name")]
    pub name: String,
    /// Property values are encoded as strings in the persisted format.
    #[serde(rename = "Properties", default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileBlockEntry {
    pub state: usize,
    pub pos: Vec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbt: Option<Compound>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileEntityEntry {
    pub pos: [f64; 3],
    #[serde(rename = "blockPos")]
    pub block_pos: Vec3,
    pub nbt: Compound,
}

/// The on-disk structure document: structure data plus the caller-supplied
/// format version tag. Byte encoding stays with the host's writer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructureFile {
    #[serde(rename = "DataVersion")]
    pub data_version: i32,
    pub size: Vec3,
    pub palette: Vec<FilePaletteEntry>,
    pub blocks: Vec<FileBlockEntry>,
    pub entities: Vec<FileEntityEntry>,
}

/// Serializes structure data into the persisted file shape.
#[derive(Clone, Copy, Debug)]
pub struct StructureSerializer {
    pub data_version: i32,
}

impl StructureSerializer {
    pub fn new(data_version: i32) -> Self {
        Self { data_version }
    }

    pub fn serialize(&self, data: &StructureData) -> StructureFile {
        StructureFile {
            data_version: self.data_version,
            size: data.size,
            palette: data.palette.iter().map(|e| self.serialize_palette_entry(e)).collect(),
            blocks: data
                .blocks
                .iter()
                .map(|e| FileBlockEntry {
                    state: e.state,
                    pos: e.pos,
                    nbt: e.data.clone(),
                })
                .collect(),
            entities: data.entities.iter().map(|e| self.serialize_entity(e)).collect(),
        }
    }

    fn serialize_palette_entry(&self, entry: &crate::StructurePaletteEntry) -> FilePaletteEntry {
        let properties = entry.block.state.as_ref().map(|state| {
            state
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        });
        FilePaletteEntry {
            name: entry.block.name.clone(),
            properties,
        }
    }

    fn serialize_entity(&self, entity: &StructureEntityEntry) -> FileEntityEntry {
        let pos = entity.pos;
        FileEntityEntry {
            pos: [pos.x as f64, pos.y as f64, pos.z as f64],
            block_pos: pos,
            nbt: entity.data.clone(),
        }
    }
}
