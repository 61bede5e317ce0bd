//! Facade over the blueprint composition engine.
//!
//! The engine exposes two entry points: [`flatten`], which composes a
//! blueprint document graph into a block map, and [`to_structure_data`],
//! which serializes the finished map into a palette-indexed structure.
#![forbid(unsafe_code)]

pub use bauplan_blocks::{Block, BlockState, Compound, StateValue, Value};
pub use bauplan_blueprint::{
    Blueprint, FilterRef, FlattenError, PaletteEntry, ResolveError, Resolver, ResourceKind, flatten,
};
pub use bauplan_filter::{Filter, FilterRule};
pub use bauplan_geom::Vec3;
pub use bauplan_io::{BlueprintDoc, DocError, FilterDoc, MaterialDoc, Registry};
pub use bauplan_map::{BlockMap, MapError, MapSize};
pub use bauplan_structure::{
    StructureData, StructureFile, StructureSerializer, from_structure_data, to_structure_data,
};
