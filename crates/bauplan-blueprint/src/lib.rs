//! Symbolic blueprint layouts and recursive flattening.
#![forbid(unsafe_code)]

pub mod resolve;

use thiserror::Error;

use bauplan_blocks::Block;
use bauplan_filter::Filter;
use bauplan_geom::Vec3;
use bauplan_map::{BlockMap, MapError};

pub use resolve::{ResolveError, Resolver, ResourceKind};

/// Reference to a filter: a registry key, or rules declared inline.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterRef {
    Key(String),
    Inline(Filter),
}

/// A reusable placement rule bound to a single layout symbol.
#[derive(Clone, Debug, PartialEq)]
pub enum PaletteEntry {
    /// Erase whatever occupies the scanned position.
    Void,
    /// Place this block.
    Block(Block),
    /// Place the block a material reference resolves to.
    Material(String),
    /// Flatten a referenced blueprint and merge it at the scanned position.
    Blueprint {
        blueprint: String,
        offset: Vec3,
        filter: Option<FilterRef>,
    },
}

/// A symbolic layout plus a palette mapping symbols to placement rules.
///
/// The layout is stored bottom-up: layer index 0 is y = 0 (document
/// parsing reverses the authored top-down order once, at construction).
/// Within a layer, row index is x and column index is z. Palette order is
/// declaration order and is significant: later entries overwrite earlier
/// ones wherever nested recursion lands them on the same position.
#[derive(Clone, Debug, PartialEq)]
pub struct Blueprint {
    pub size: Vec3,
    pub anchor: Vec3,
    pub palette: Vec<(String, PaletteEntry)>,
    pub layout: Vec<Vec<String>>,
}

impl Blueprint {
    /// Positions whose layout character equals `symbol`, in layer, row,
    /// column order. Symbols are single characters; anything else never
    /// matches.
    pub fn scan<'a>(&'a self, symbol: &str) -> impl Iterator<Item = Vec3> + 'a {
        let mut chars = symbol.chars();
        let sym = match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        };
        self.layout.iter().enumerate().flat_map(move |(y, layer)| {
            layer.iter().enumerate().flat_map(move |(x, row)| {
                row.chars().enumerate().filter_map(move |(z, c)| {
                    (Some(c) == sym).then(|| Vec3::new(x as i32, y as i32, z as i32))
                })
            })
        })
    }
}

#[derive(Debug, Error)]
pub enum FlattenError {
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Flatten `blueprint` into a block map.
///
/// Creates a map sized to the blueprint, then merges each palette entry at
/// every position its symbol occupies, in palette declaration order.
/// Nested blueprints flatten recursively into an independent map, get
/// their filter applied, and merge at `position - offset - child.anchor`.
///
/// There is no cycle detection: a blueprint that references itself,
/// directly or transitively, recurses without bound. Validating the
/// document graph is the caller's responsibility.
pub fn flatten(blueprint: &Blueprint, resolver: &impl Resolver) -> Result<BlockMap, FlattenError> {
    let mut block_map = BlockMap::fixed(blueprint.size);
    for (symbol, entry) in &blueprint.palette {
        for position in blueprint.scan(symbol) {
            merge_entry(entry, &mut block_map, position, resolver)?;
        }
    }
    Ok(block_map)
}

fn merge_entry(
    entry: &PaletteEntry,
    block_map: &mut BlockMap,
    position: Vec3,
    resolver: &impl Resolver,
) -> Result<(), FlattenError> {
    match entry {
        PaletteEntry::Void => block_map.delete(position),
        PaletteEntry::Block(block) => block_map.set(position, block.clone())?,
        PaletteEntry::Material(key) => {
            let block = resolver.material(key)?;
            block_map.set(position, block.clone())?;
        }
        PaletteEntry::Blueprint {
            blueprint,
            offset,
            filter,
        } => {
            let child = resolver.blueprint(blueprint)?;
            // A fresh grid per recursion; nothing is shared with the parent.
            let mut child_map = flatten(child, resolver)?;
            match filter {
                Some(FilterRef::Key(key)) => resolver.filter(key)?.apply(&mut child_map),
                Some(FilterRef::Inline(f)) => f.apply(&mut child_map),
                None => {}
            }
            // The anchor lets a child declare its own logical origin
            // independent of its bounding box.
            let child_offset = position - *offset - child.anchor;
            block_map.merge(&child_map, child_offset);
        }
    }
    Ok(())
}
