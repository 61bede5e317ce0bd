//! Document parsing, validation, and the in-memory document registry.
#![forbid(unsafe_code)]

pub mod document;
pub mod registry;

pub use document::{
    BlockDoc, BlueprintDoc, DocError, FilterDoc, FilterRefDoc, FilterRuleDoc, LayerDoc, LayoutDoc,
    MaterialDoc, PaletteEntryDoc,
};
pub use registry::Registry;
