use std::{collections::HashMap, sync::Arc};

use asset_common::{
    Aabb, BindingManifest, BufferBinding, Entity, IndexBufferHandle, MaterialInstanceHandle,
    TextureBinding, VertexBufferHandle,
};

use crate::{
    document::Document,
    engine::{Engine, NameManager},
    error::PrimitiveId,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Skin {
    pub name: Option<String>,
    /// In the declared order, which is the order of the inverse bind matrices.
    pub joints: Vec<Entity>,
    /// Renderables deformed by this skin.
    pub targets: Vec<Entity>,
    /// Accessor holding the inverse bind matrices, for the resource loader.
    pub inverse_bind_matrices: Option<usize>,
}

/// Everything one import created. Destroy it with [`crate::AssetLoader::destroy_asset`].
pub struct ImportedAsset {
    pub(crate) document: Arc<Document>,
    pub(crate) shared_document: bool,
    pub(crate) binary_chunk: Option<Vec<u8>>,
    pub(crate) root: Entity,
    pub(crate) entities: Vec<Entity>,
    pub(crate) node_map: HashMap<usize, Entity>,
    pub(crate) renderables: Vec<Entity>,
    pub(crate) skins: Vec<Skin>,
    pub(crate) bounding_box: Aabb,
    pub(crate) buffer_bindings: Vec<BufferBinding>,
    pub(crate) texture_bindings: Vec<TextureBinding>,
    pub(crate) material_instances: Vec<MaterialInstanceHandle>,
    pub(crate) vertex_buffers: Vec<VertexBufferHandle>,
    pub(crate) index_buffers: Vec<IndexBufferHandle>,
    pub(crate) primitives: HashMap<PrimitiveId, VertexBufferHandle>,
}

impl ImportedAsset {
    pub(crate) fn new(
        document: Arc<Document>,
        shared_document: bool,
        binary_chunk: Option<Vec<u8>>,
        root: Entity,
    ) -> Self {
        Self {
            document,
            shared_document,
            binary_chunk,
            root,
            entities: Vec::new(),
            node_map: HashMap::new(),
            renderables: Vec::new(),
            skins: Vec::new(),
            bounding_box: Aabb::empty(),
            buffer_bindings: Vec::new(),
            texture_bindings: Vec::new(),
            material_instances: Vec::new(),
            vertex_buffers: Vec::new(),
            index_buffers: Vec::new(),
            primitives: HashMap::new(),
        }
    }

    pub fn document(&self) -> &Arc<Document> {
        &self.document
    }

    /// True when the document was handed in already parsed. The asset then only holds a
    /// reference and never assumes it owns it.
    pub fn is_document_shared(&self) -> bool {
        self.shared_document
    }

    /// Owned copy of the binary container's embedded chunk.
    pub fn binary_chunk(&self) -> Option<&[u8]> {
        self.binary_chunk.as_deref()
    }

    pub fn root(&self) -> Entity {
        self.root
    }

    /// One entity per imported node, in traversal order. The root is not included.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity_for_node(&self, node: usize) -> Option<Entity> {
        self.node_map.get(&node).copied()
    }

    pub fn renderables(&self) -> &[Entity] {
        &self.renderables
    }

    pub fn skins(&self) -> &[Skin] {
        &self.skins
    }

    /// World space
    pub fn bounding_box(&self) -> Aabb {
        self.bounding_box
    }

    pub fn buffer_bindings(&self) -> &[BufferBinding] {
        &self.buffer_bindings
    }

    pub fn texture_bindings(&self) -> &[TextureBinding] {
        &self.texture_bindings
    }

    pub fn material_instances(&self) -> &[MaterialInstanceHandle] {
        &self.material_instances
    }

    pub fn vertex_buffers(&self) -> &[VertexBufferHandle] {
        &self.vertex_buffers
    }

    pub fn index_buffers(&self) -> &[IndexBufferHandle] {
        &self.index_buffers
    }

    /// The vertex buffer built for a document primitive.
    pub fn primitive_vertex_buffer(&self, mesh: usize, primitive: usize) -> Option<VertexBufferHandle> {
        self.primitives
            .get(&PrimitiveId { mesh, primitive })
            .copied()
    }

    pub fn binding_manifest(&self) -> BindingManifest {
        BindingManifest {
            buffer_bindings: self.buffer_bindings.clone(),
            texture_bindings: self.texture_bindings.clone(),
        }
    }

    /// Releases everything the import created. The document itself is only dropped here
    /// when no one else holds on to it.
    pub(crate) fn destroy(self, engine: &mut dyn Engine, mut names: Option<&mut dyn NameManager>) {
        for &entity in self.entities.iter().chain(std::iter::once(&self.root)) {
            if let Some(names) = names.as_deref_mut() {
                names.remove(entity);
            }
            engine.destroy_entity(entity);
        }
        for &buffer in &self.vertex_buffers {
            engine.destroy_vertex_buffer(buffer);
        }
        for &buffer in &self.index_buffers {
            engine.destroy_index_buffer(buffer);
        }
        for &instance in &self.material_instances {
            engine.destroy_material_instance(instance);
        }
        log::debug!(
            "Destroyed asset with {} entities ({} document)",
            self.entities.len() + 1,
            if self.shared_document { "shared" } else { "owned" }
        );
    }
}
