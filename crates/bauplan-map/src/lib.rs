//! Sparse block grid with bulk filter and merge operations.
#![forbid(unsafe_code)]

use std::fmt;

use hashbrown::HashMap;
use thiserror::Error;

use bauplan_blocks::Block;
use bauplan_geom::Vec3;

/// Declared footprint of a block map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapSize {
    /// Every stored position must satisfy `0 <= c < size` componentwise.
    Fixed(Vec3),
    /// Bounding box computed from occupied cells.
    Auto,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("position {pos} exceeds block map size {size}")]
    OutOfBounds { pos: Vec3, size: Vec3 },
    #[error("block map is empty")]
    Empty,
}

/// Symbols handed out by the ascii rendering, in assignment order.
const ASCII_SYMBOLS: &str = "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A sparse, mutable 3D grid of blocks.
///
/// Each map is owned exclusively by the composition step that created it;
/// merging copies cells into the destination rather than aliasing.
#[derive(Clone, Debug)]
pub struct BlockMap {
    size: MapSize,
    cells: HashMap<Vec3, Block>,
}

impl BlockMap {
    pub fn new(size: MapSize) -> Self {
        Self {
            size,
            cells: HashMap::new(),
        }
    }

    pub fn fixed(size: Vec3) -> Self {
        Self::new(MapSize::Fixed(size))
    }

    pub fn auto() -> Self {
        Self::new(MapSize::Auto)
    }

    #[inline]
    pub fn size(&self) -> MapSize {
        self.size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn in_bounds(&self, pos: Vec3) -> bool {
        match self.size {
            MapSize::Auto => true,
            MapSize::Fixed(size) => {
                (0..size.x).contains(&pos.x)
                    && (0..size.y).contains(&pos.y)
                    && (0..size.z).contains(&pos.z)
            }
        }
    }

    /// Write `block` at `pos`, overwriting any occupant (last write wins).
    pub fn set(&mut self, pos: Vec3, block: Block) -> Result<(), MapError> {
        if let MapSize::Fixed(size) = self.size {
            if !self.in_bounds(pos) {
                return Err(MapError::OutOfBounds { pos, size });
            }
        }
        self.cells.insert(pos, block);
        Ok(())
    }

    pub fn get(&self, pos: Vec3) -> Option<&Block> {
        self.cells.get(&pos)
    }

    /// Remove the occupant at `pos`. Deleting an absent position is a no-op.
    pub fn delete(&mut self, pos: Vec3) {
        self.cells.remove(&pos);
    }

    /// Walk occupied cells in layer, row, column order (y, then x, then z).
    ///
    /// The walk is a snapshot: the order is stable for a given occupancy
    /// regardless of hash state, and the map must not be mutated while the
    /// iterator is live.
    pub fn iter(&self) -> impl Iterator<Item = (Vec3, &Block)> {
        let mut entries: Vec<(Vec3, &Block)> = self.cells.iter().map(|(p, b)| (*p, b)).collect();
        entries.sort_by_key(|(p, _)| (p.y, p.x, p.z));
        entries.into_iter()
    }

    /// Componentwise min/max of occupied positions.
    pub fn bounds(&self) -> Result<(Vec3, Vec3), MapError> {
        let mut positions = self.cells.keys();
        let first = *positions.next().ok_or(MapError::Empty)?;
        let (low, high) = positions.fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        Ok((low, high))
    }

    /// The declared size, or the occupied bounding box for auto-sized maps
    /// (zero when empty).
    pub fn actual_size(&self) -> Vec3 {
        match self.size {
            MapSize::Fixed(size) => size,
            MapSize::Auto => match self.bounds() {
                Ok((low, high)) => high - low + Vec3::ONE,
                Err(_) => Vec3::ZERO,
            },
        }
    }

    /// Delete every cell whose block does not match any pattern.
    pub fn keep_blocks(&mut self, patterns: &[Block]) {
        let doomed: Vec<Vec3> = self
            .cells
            .iter()
            .filter(|(_, b)| !b.matches_any_of(patterns))
            .map(|(p, _)| *p)
            .collect();
        for pos in doomed {
            self.cells.remove(&pos);
        }
    }

    /// Delete every cell whose block matches any pattern.
    pub fn remove_blocks(&mut self, patterns: &[Block]) {
        let doomed: Vec<Vec3> = self
            .cells
            .iter()
            .filter(|(_, b)| b.matches_any_of(patterns))
            .map(|(p, _)| *p)
            .collect();
        for pos in doomed {
            self.cells.remove(&pos);
        }
    }

    /// Substitute `replacement` at every cell whose block matches any
    /// pattern, preserving positions.
    pub fn replace_blocks(&mut self, patterns: &[Block], replacement: &Block) {
        let hits: Vec<Vec3> = self
            .cells
            .iter()
            .filter(|(_, b)| b.matches_any_of(patterns))
            .map(|(p, _)| *p)
            .collect();
        for pos in hits {
            self.cells.insert(pos, replacement.clone());
        }
    }

    /// Positions holding a block exactly equal to `block` (exact equality,
    /// not the subset predicate), in iteration order.
    pub fn scan(&self, block: &Block) -> Vec<Vec3> {
        self.iter()
            .filter(|(_, b)| *b == block)
            .map(|(p, _)| p)
            .collect()
    }

    /// Copy every cell of `other` into `self` at `pos + offset`.
    ///
    /// Deliberately unchecked against a fixed `size`: nested content may
    /// extend beyond a parent's declared footprint before final
    /// auto-sizing. Last write wins on overlap.
    pub fn merge(&mut self, other: &BlockMap, offset: Vec3) {
        for (pos, block) in other.cells.iter() {
            self.cells.insert(*pos + offset, block.clone());
        }
    }

    /// Debug rendering: layers top-down, rows along x, columns along z,
    /// `.` for empty cells. Symbols are assigned to distinct blocks in
    /// first-seen order. Empty maps render as an empty string.
    pub fn to_ascii(&self) -> String {
        let Ok((low, high)) = self.bounds() else {
            return String::new();
        };
        let symbols: Vec<char> = ASCII_SYMBOLS.chars().collect();
        let mut symbol_by_block: HashMap<String, char> = HashMap::new();
        let mut next_symbol = 0usize;
        let mut layers: Vec<String> = Vec::new();
        for y in low.y..=high.y {
            let mut rows: Vec<String> = Vec::new();
            for x in low.x..=high.x {
                let mut line = String::new();
                for z in low.z..=high.z {
                    match self.get(Vec3::new(x, y, z)) {
                        None => line.push('.'),
                        Some(block) => {
                            let key = block.to_string();
                            let symbol = *symbol_by_block.entry(key).or_insert_with(|| {
                                let s = symbols[next_symbol % symbols.len()];
                                next_symbol += 1;
                                s
                            });
                            line.push(symbol);
                        }
                    }
                }
                rows.push(line);
            }
            layers.push(rows.join("\n"));
        }
        layers.reverse();
        layers.join("\n\n")
    }
}

impl fmt::Display for BlockMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ascii())
    }
}
