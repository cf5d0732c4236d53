use std::{env, fs};

use anyhow::Context;
use env_logger::Env;
use scene_import::{
    engine::{MemoryEngine, MemoryNames},
    material_provider::MemoryMaterialProvider,
    AssetConfiguration, AssetLoader, ConfigFileLoader, LoaderConfig,
};

const USAGE: &str = "usage: scene_import <file.gltf|file.glb> [config.json] [manifest.bin]";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        anyhow::bail!(USAGE);
    };
    let config = match args.next() {
        Some(config_path) => ConfigFileLoader::new(config_path).load_config()?.clone(),
        None => LoaderConfig::default(),
    };
    let manifest_path = args.next();

    let bytes = fs::read(&path).with_context(|| format!("Could not read {path}"))?;

    let mut loader = AssetLoader::new(AssetConfiguration {
        engine: MemoryEngine::new(),
        materials: MemoryMaterialProvider::new(config.material_source),
        names: Some(Box::new(MemoryNames::default())),
        enable_diagnostics: config.enable_diagnostics,
    });

    let asset = if bytes.starts_with(b"glTF") {
        loader.create_asset_from_binary(&bytes)
    } else {
        loader.create_asset_from_json(&bytes)
    }
    .with_context(|| format!("Could not import {path}"))?;
    // The asset holds its own copy of anything it still needs.
    drop(bytes);

    let bounding_box = asset.bounding_box();
    println!("{path}");
    println!("  entities:           {}", asset.entities().len() + 1);
    println!("  renderables:        {}", asset.renderables().len());
    println!("  skins:              {}", asset.skins().len());
    println!("  material instances: {}", asset.material_instances().len());
    println!("  materials:          {}", loader.materials_count());
    println!("  buffer bindings:    {}", asset.buffer_bindings().len());
    println!("  texture bindings:   {}", asset.texture_bindings().len());
    if bounding_box.is_empty() {
        println!("  bounds:             empty");
    } else {
        println!(
            "  bounds:             {:?} .. {:?}",
            bounding_box.min, bounding_box.max
        );
    }

    if let Some(manifest_path) = manifest_path {
        let manifest = asset.binding_manifest().to_bytes()?;
        fs::write(&manifest_path, manifest)
            .with_context(|| format!("Could not write {manifest_path}"))?;
        log::info!("Wrote binding manifest to {manifest_path}");
    }

    loader.destroy_asset(asset);
    loader.destroy();
    Ok(())
}
