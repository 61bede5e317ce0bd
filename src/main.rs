use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{debug, info};

use bauplan::{Registry, Resolver, StructureSerializer, flatten, to_structure_data};

#[derive(Parser, Debug)]
#[command(name = "bauplan", about = "Compose blueprint documents into structure files")]
struct Args {
    /// Root directory containing blueprints/, filters/, and materials/
    root: PathBuf,
    /// Output directory for generated structure files
    #[arg(short, long, default_value = "out")]
    out: PathBuf,
    /// Build only the named blueprint
    #[arg(long)]
    only: Option<String>,
    /// Format version tag stamped into generated structure files
    #[arg(long, default_value_t = 3953)]
    data_version: i32,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut registry = Registry::new();
    for (key, text) in read_documents(&args.root.join("materials"))? {
        registry.add_material_toml(&key, &text)?;
        debug!("registered material `{key}`");
    }
    for (key, text) in read_documents(&args.root.join("filters"))? {
        registry.add_filter_toml(&key, &text)?;
        debug!("registered filter `{key}`");
    }
    for (key, text) in read_documents(&args.root.join("blueprints"))? {
        registry.add_blueprint_toml(&key, &text)?;
        debug!("registered blueprint `{key}`");
    }

    let keys: Vec<String> = registry
        .blueprint_keys()
        .into_iter()
        .filter(|key| args.only.as_deref().is_none_or(|only| only == *key))
        .map(str::to_string)
        .collect();
    if let Some(only) = &args.only {
        if keys.is_empty() {
            return Err(format!("no blueprint named `{only}`").into());
        }
    }

    fs::create_dir_all(&args.out)?;
    let serializer = StructureSerializer::new(args.data_version);
    for key in keys {
        let blueprint = registry.blueprint(&key)?;
        let block_map = flatten(blueprint, &registry)?;
        let data = to_structure_data(&block_map)?;
        let file = serializer.serialize(&data);
        let path = args.out.join(format!("{key}.json"));
        fs::write(&path, serde_json::to_string_pretty(&file)?)?;
        info!(
            "built `{key}`: {} blocks, {} palette entries -> {}",
            data.blocks.len(),
            data.palette.len(),
            path.display()
        );
    }
    Ok(())
}

/// Read every `*.toml` document in `dir`, keyed by file stem. A missing
/// directory is treated as empty.
fn read_documents(dir: &Path) -> Result<Vec<(String, String)>, Box<dyn Error>> {
    let mut docs = Vec::new();
    if !dir.is_dir() {
        return Ok(docs);
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "toml") {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            docs.push((stem.to_string(), fs::read_to_string(&path)?));
        }
    }
    docs.sort();
    Ok(docs)
}
