//! Raw document shapes, as authored, and their conversion into engine
//! types. All structural validation happens here, before any flatten.

use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use thiserror::Error;

use bauplan_blocks::{Block, BlockState, Compound};
use bauplan_blueprint::{Blueprint, FilterRef, PaletteEntry};
use bauplan_filter::{Filter, FilterRule};
use bauplan_geom::Vec3;

#[derive(Debug, Error)]
pub enum DocError {
    #[error(transparent)]
    Parse(#[from] toml::de::Error),
    #[error("palette key `{key}` is not a single character")]
    PaletteKey { key: String },
}

/// A block as documents spell it: a bare name, or a table with optional
/// state and data.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum BlockDoc {
    Name(String),
    Table {
        name: String,
        #[serde(default)]
        state: Option<BlockState>,
        #[serde(default)]
        data: Option<Compound>,
    },
}

impl BlockDoc {
    pub fn into_block(self) -> Block {
        match self {
            BlockDoc::Name(name) => Block::named(name),
            BlockDoc::Table { name, state, data } => Block { name, state, data },
        }
    }
}

/// A material document is a named block definition.
#[derive(Clone, Debug, Deserialize)]
#[serde(transparent)]
pub struct MaterialDoc(pub BlockDoc);

impl MaterialDoc {
    pub fn from_toml_str(text: &str) -> Result<Self, DocError> {
        Ok(toml::from_str(text)?)
    }

    pub fn into_block(self) -> Block {
        self.0.into_block()
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterRuleDoc {
    Keep {
        blocks: Vec<BlockDoc>,
    },
    Remove {
        blocks: Vec<BlockDoc>,
    },
    Replace {
        blocks: Vec<BlockDoc>,
        replacement: BlockDoc,
    },
}

impl FilterRuleDoc {
    fn into_rule(self) -> FilterRule {
        let blocks = |docs: Vec<BlockDoc>| docs.into_iter().map(BlockDoc::into_block).collect();
        match self {
            FilterRuleDoc::Keep { blocks: b } => FilterRule::Keep { blocks: blocks(b) },
            FilterRuleDoc::Remove { blocks: b } => FilterRule::Remove { blocks: blocks(b) },
            FilterRuleDoc::Replace {
                blocks: b,
                replacement,
            } => FilterRule::Replace {
                blocks: blocks(b),
                replacement: replacement.into_block(),
            },
        }
    }
}

/// A filter document: a `rules` table, or a bare rule list (group form);
/// both flatten to the same ordered rule list.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum FilterDoc {
    Table { rules: Vec<FilterRuleDoc> },
    Rules(Vec<FilterRuleDoc>),
}

impl FilterDoc {
    pub fn from_toml_str(text: &str) -> Result<Self, DocError> {
        Ok(toml::from_str(text)?)
    }

    pub fn into_filter(self) -> Filter {
        let rules = match self {
            FilterDoc::Table { rules } | FilterDoc::Rules(rules) => rules,
        };
        Filter::new(rules.into_iter().map(FilterRuleDoc::into_rule).collect())
    }
}

/// A filter reference inside a palette entry: a registry key, or rules
/// declared inline.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum FilterRefDoc {
    Key(String),
    Inline(Vec<FilterRuleDoc>),
}

impl FilterRefDoc {
    fn into_filter_ref(self) -> FilterRef {
        match self {
            FilterRefDoc::Key(key) => FilterRef::Key(key),
            FilterRefDoc::Inline(rules) => FilterRef::Inline(Filter::new(
                rules.into_iter().map(FilterRuleDoc::into_rule).collect(),
            )),
        }
    }
}

/// A palette entry as authored: a bare string is shorthand for a material
/// reference; tables carry a `type` discriminator.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum PaletteEntryDoc {
    Ref(String),
    Entry(PaletteEntryTableDoc),
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaletteEntryTableDoc {
    Void,
    Block {
        block: BlockDoc,
    },
    Material {
        material: String,
    },
    Blueprint {
        blueprint: String,
        #[serde(default)]
        offset: Option<Vec3>,
        #[serde(default)]
        filter: Option<FilterRefDoc>,
    },
}

impl PaletteEntryDoc {
    fn into_entry(self) -> PaletteEntry {
        match self {
            PaletteEntryDoc::Ref(key) => PaletteEntry::Material(key),
            PaletteEntryDoc::Entry(PaletteEntryTableDoc::Void) => PaletteEntry::Void,
            PaletteEntryDoc::Entry(PaletteEntryTableDoc::Block { block }) => {
                PaletteEntry::Block(block.into_block())
            }
            PaletteEntryDoc::Entry(PaletteEntryTableDoc::Material { material }) => {
                PaletteEntry::Material(material)
            }
            PaletteEntryDoc::Entry(PaletteEntryTableDoc::Blueprint {
                blueprint,
                offset,
                filter,
            }) => PaletteEntry::Blueprint {
                blueprint,
                offset: offset.unwrap_or(Vec3::ZERO),
                filter: filter.map(FilterRefDoc::into_filter_ref),
            },
        }
    }
}

/// Palette map in declaration order. Palette order is significant, so the
/// usual map types will not do; entries are collected as encountered.
#[derive(Clone, Debug, Default)]
pub struct PaletteDoc(pub Vec<(String, PaletteEntryDoc)>);

impl<'de> Deserialize<'de> for PaletteDoc {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PaletteVisitor;

        impl<'de> Visitor<'de> for PaletteVisitor {
            type Value = PaletteDoc;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of palette symbols to entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<PaletteDoc, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, entry)) = access.next_entry()? {
                    entries.push((key, entry));
                }
                Ok(PaletteDoc(entries))
            }
        }

        deserializer.deserialize_map(PaletteVisitor)
    }
}

/// One authored layer: a list of row strings (null rows allowed in formats
/// that have null), or a single multi-line string.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum LayerDoc {
    Rows(Vec<Option<String>>),
    Lines(String),
}

impl LayerDoc {
    fn into_rows(self) -> Vec<String> {
        match self {
            LayerDoc::Rows(rows) => rows.into_iter().map(Option::unwrap_or_default).collect(),
            LayerDoc::Lines(text) => text.lines().map(str::to_string).collect(),
        }
    }
}

/// The authored layout: a list of layers, or one big string with blank
/// lines separating layers. Layers are authored top-down and reversed
/// here, once, so that layer index 0 is y = 0.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum LayoutDoc {
    Layers(Vec<Option<LayerDoc>>),
    Charmap(String),
}

impl LayoutDoc {
    fn into_layers(self) -> Vec<Vec<String>> {
        let mut layers: Vec<Vec<String>> = match self {
            LayoutDoc::Layers(layers) => layers
                .into_iter()
                .map(|layer| layer.map(LayerDoc::into_rows).unwrap_or_default())
                .collect(),
            LayoutDoc::Charmap(text) => {
                let mut layers: Vec<Vec<String>> = Vec::new();
                let mut current: Vec<String> = Vec::new();
                for line in text.lines() {
                    if line.is_empty() {
                        if !current.is_empty() {
                            layers.push(std::mem::take(&mut current));
                        }
                    } else {
                        current.push(line.to_string());
                    }
                }
                if !current.is_empty() {
                    layers.push(current);
                }
                layers
            }
        };
        layers.reverse();
        layers
    }
}

/// A blueprint document, as authored.
#[derive(Clone, Debug, Deserialize)]
pub struct BlueprintDoc {
    pub size: Vec3,
    #[serde(default)]
    pub anchor: Option<Vec3>,
    pub palette: PaletteDoc,
    pub layout: LayoutDoc,
}

impl BlueprintDoc {
    pub fn from_toml_str(text: &str) -> Result<Self, DocError> {
        Ok(toml::from_str(text)?)
    }

    /// Validate and convert into an engine blueprint. Fails on any palette
    /// key that is not exactly one character; everything structural beyond
    /// that was already enforced by the document shape.
    pub fn into_blueprint(self) -> Result<Blueprint, DocError> {
        let palette = self
            .palette
            .0
            .into_iter()
            .map(|(key, entry)| {
                if key.chars().count() != 1 {
                    return Err(DocError::PaletteKey { key });
                }
                Ok((key, entry.into_entry()))
            })
            .collect::<Result<Vec<_>, DocError>>()?;
        Ok(Blueprint {
            size: self.size,
            anchor: self.anchor.unwrap_or(Vec3::ZERO),
            palette,
            layout: self.layout.into_layers(),
        })
    }
}
