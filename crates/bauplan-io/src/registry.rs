//! In-memory registry of resolved documents, keyed by name.

use hashbrown::HashMap;

use bauplan_blocks::Block;
use bauplan_blueprint::{Blueprint, ResolveError, Resolver, ResourceKind};
use bauplan_filter::Filter;

use crate::document::{BlueprintDoc, DocError, FilterDoc, MaterialDoc};

/// Holds fully validated documents and serves them to the flattening
/// engine. Documents are converted eagerly on insertion, so flattening
/// never observes a structurally invalid document.
#[derive(Debug, Default)]
pub struct Registry {
    blueprints: HashMap<String, Blueprint>,
    filters: HashMap<String, Filter>,
    materials: HashMap<String, Block>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_blueprint(&mut self, key: impl Into<String>, blueprint: Blueprint) {
        self.blueprints.insert(key.into(), blueprint);
    }

    pub fn insert_filter(&mut self, key: impl Into<String>, filter: Filter) {
        self.filters.insert(key.into(), filter);
    }

    pub fn insert_material(&mut self, key: impl Into<String>, block: Block) {
        self.materials.insert(key.into(), block);
    }

    pub fn add_blueprint_toml(&mut self, key: &str, text: &str) -> Result<(), DocError> {
        let blueprint = BlueprintDoc::from_toml_str(text)?.into_blueprint()?;
        self.insert_blueprint(key, blueprint);
        Ok(())
    }

    pub fn add_filter_toml(&mut self, key: &str, text: &str) -> Result<(), DocError> {
        let filter = FilterDoc::from_toml_str(text)?.into_filter();
        self.insert_filter(key, filter);
        Ok(())
    }

    pub fn add_material_toml(&mut self, key: &str, text: &str) -> Result<(), DocError> {
        let block = MaterialDoc::from_toml_str(text)?.into_block();
        self.insert_material(key, block);
        Ok(())
    }

    /// Registered blueprint keys, sorted for deterministic build order.
    pub fn blueprint_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.blueprints.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl Resolver for Registry {
    fn blueprint(&self, key: &str) -> Result<&Blueprint, ResolveError> {
        self.blueprints.get(key).ok_or_else(|| ResolveError::NotFound {
            kind: ResourceKind::Blueprint,
            key: key.to_string(),
        })
    }

    fn filter(&self, key: &str) -> Result<&Filter, ResolveError> {
        self.filters.get(key).ok_or_else(|| ResolveError::NotFound {
            kind: ResourceKind::Filter,
            key: key.to_string(),
        })
    }

    fn material(&self, key: &str) -> Result<&Block, ResolveError> {
        self.materials.get(key).ok_or_else(|| ResolveError::NotFound {
            kind: ResourceKind::Material,
            key: key.to_string(),
        })
    }
}
