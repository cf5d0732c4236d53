mod context;
mod geometry;
mod material_cache;
mod material_key;
mod mesh_cache;
mod scene_builder;
mod skin;
mod texture;

pub use geometry::MAX_VERTEX_BUFFER_SLOTS;

use std::sync::Arc;

use asset_common::MaterialHandle;
use ultraviolet::Mat4;

use self::{context::ImportContext, scene_builder::SceneBuilder};
use crate::{
    asset::ImportedAsset,
    document::{parse_binary, parse_document, Document},
    engine::{Engine, NameManager},
    error::ImportError,
    material_provider::MaterialProvider,
};

pub struct AssetConfiguration<E, P> {
    pub engine: E,
    pub materials: P,
    /// When set, mesh names are attached to their renderables.
    pub names: Option<Box<dyn NameManager>>,
    /// Only ends up in the material keys.
    pub enable_diagnostics: bool,
}

/// Turns documents into entities, buffers and material instances of an [`Engine`].
/// Each import is independent, nothing is cached across imports.
pub struct AssetLoader<E: Engine, P: MaterialProvider> {
    engine: E,
    materials: P,
    names: Option<Box<dyn NameManager>>,
    enable_diagnostics: bool,
}

impl<E: Engine, P: MaterialProvider> AssetLoader<E, P> {
    pub fn new(config: AssetConfiguration<E, P>) -> Self {
        Self {
            engine: config.engine,
            materials: config.materials,
            names: config.names,
            enable_diagnostics: config.enable_diagnostics,
        }
    }

    pub fn enable_diagnostics(&mut self, enable: bool) {
        self.enable_diagnostics = enable;
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn names(&self) -> Option<&dyn NameManager> {
        self.names.as_deref()
    }

    pub fn material_provider(&self) -> &P {
        &self.materials
    }

    /// Materials created by the provider so far, across all imports.
    pub fn materials(&self) -> &[MaterialHandle] {
        self.materials.materials()
    }

    pub fn materials_count(&self) -> usize {
        self.materials.materials_count()
    }

    /// Imports a JSON document. Binary containers are accepted as well.
    pub fn create_asset_from_json(&mut self, bytes: &[u8]) -> Result<ImportedAsset, ImportError> {
        let (document, binary_chunk) = parse_document(bytes)?;
        self.create_asset(Arc::new(document), false, binary_chunk)
    }

    /// Imports a binary container. The asset keeps its own copy of the embedded data, so
    /// `bytes` may be dropped right after this returns.
    pub fn create_asset_from_binary(&mut self, bytes: &[u8]) -> Result<ImportedAsset, ImportError> {
        let (document, binary_chunk) = parse_binary(bytes)?;
        self.create_asset(Arc::new(document), false, binary_chunk)
    }

    /// Imports a document the caller already parsed. The asset holds a reference to it
    /// and never assumes ownership.
    pub fn create_asset_from_document(
        &mut self,
        document: Arc<Document>,
    ) -> Result<ImportedAsset, ImportError> {
        self.create_asset(document, true, None)
    }

    /// Destroys every entity, buffer and material instance of the asset.
    pub fn destroy_asset(&mut self, asset: ImportedAsset) {
        let names: Option<&mut dyn NameManager> = match &mut self.names {
            Some(names) => Some(names.as_mut()),
            None => None,
        };
        asset.destroy(&mut self.engine, names);
    }

    /// Releases the provider's materials and hands the engine back.
    pub fn destroy(mut self) -> E {
        self.materials.destroy_materials(&mut self.engine);
        self.engine
    }

    fn create_asset(
        &mut self,
        document: Arc<Document>,
        shared_document: bool,
        binary_chunk: Option<Vec<u8>>,
    ) -> Result<ImportedAsset, ImportError> {
        document.validate()?;

        let root = self.engine.create_entity();
        self.engine.create_transform(root, None, Mat4::identity());
        let mut asset = ImportedAsset::new(document.clone(), shared_document, binary_chunk, root);

        let Some(scene) = document.scene() else {
            log::warn!("The document has no scene, the asset is empty");
            return Ok(asset);
        };

        let errors = {
            let ctx = ImportContext {
                engine: &mut self.engine,
                materials: &mut self.materials,
                names: match &mut self.names {
                    Some(names) => Some(names.as_mut()),
                    None => None,
                },
                document: &document,
                asset: &mut asset,
                diagnostics: self.enable_diagnostics,
            };
            let mut builder = SceneBuilder::new(ctx);
            for &node in &scene.nodes {
                builder.build(node, root, Mat4::identity());
            }
            builder.finish()
        };
        if !errors.is_empty() {
            log::error!(
                "Discarding the import, {} primitive(s) could not be built",
                errors.len()
            );
            self.destroy_asset(asset);
            return Err(ImportError::Primitives(errors));
        }

        match skin::import_skins(&document, &asset.node_map) {
            Ok(skins) => asset.skins = skins,
            Err(error) => {
                log::error!("Discarding the import: {error}");
                self.destroy_asset(asset);
                return Err(error);
            }
        }

        log::info!(
            "Imported {} entities, {} renderables, {} material instances, {} buffer bindings",
            asset.entities.len(),
            asset.renderables.len(),
            asset.material_instances.len(),
            asset.buffer_bindings.len()
        );
        Ok(asset)
    }
}
