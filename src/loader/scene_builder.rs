use asset_common::{Aabb, Entity};
use ultraviolet::Mat4;

use super::{
    context::ImportContext, geometry, material_cache::MaterialInstanceCache,
    mesh_cache::MeshCache,
};
use crate::{
    document::{self, Mode, Node},
    engine::{PrimitiveTopology, RenderPrimitive, Renderable},
    error::{PrimitiveError, PrimitiveId},
};

fn topology(mode: Mode) -> Option<PrimitiveTopology> {
    match mode {
        Mode::Points => Some(PrimitiveTopology::Points),
        Mode::Lines => Some(PrimitiveTopology::Lines),
        Mode::Triangles => Some(PrimitiveTopology::Triangles),
        Mode::LineLoop | Mode::LineStrip | Mode::TriangleStrip | Mode::TriangleFan => None,
    }
}

/// Walks the node hierarchy once. Failing primitives are collected and traversal goes on,
/// the caller decides what to do with the result.
pub(crate) struct SceneBuilder<'a> {
    ctx: ImportContext<'a>,
    meshes: MeshCache,
    materials: MaterialInstanceCache,
    errors: Vec<PrimitiveError>,
}

impl<'a> SceneBuilder<'a> {
    pub fn new(ctx: ImportContext<'a>) -> Self {
        Self {
            ctx,
            meshes: MeshCache::default(),
            materials: MaterialInstanceCache::default(),
            errors: Vec::new(),
        }
    }

    pub fn build(&mut self, node_index: usize, parent: Entity, parent_transform: Mat4) {
        let document = self.ctx.document;
        let node = &document.nodes[node_index];

        let entity = self.ctx.engine.create_entity();
        let local_transform = node.transform.matrix();
        self.ctx
            .engine
            .create_transform(entity, Some(parent), local_transform);
        self.ctx.asset.entities.push(entity);
        self.ctx.asset.node_map.insert(node_index, entity);

        let global_transform = parent_transform * local_transform;
        if let Some(mesh) = node.mesh {
            self.create_renderable(node, mesh, entity, &global_transform);
        }

        for &child in &node.children {
            self.build(child, entity, global_transform);
        }
    }

    pub fn finish(self) -> Vec<PrimitiveError> {
        self.errors
    }

    fn create_renderable(
        &mut self,
        node: &Node,
        mesh_index: usize,
        entity: Entity,
        global_transform: &Mat4,
    ) {
        let document = self.ctx.document;
        let mesh = &document.meshes[mesh_index];

        if let (Some(names), Some(name)) = (self.ctx.names.as_deref_mut(), &mesh.name) {
            names.set_name(entity, name);
        }

        let mut builder = Renderable::builder();
        let mut aabb = Aabb::empty();
        let mut failed = false;
        for (index, primitive) in mesh.primitives.iter().enumerate() {
            let id = PrimitiveId {
                mesh: mesh_index,
                primitive: index,
            };
            match self.create_primitive(id, primitive, mesh.primitives.len()) {
                Ok((render_primitive, primitive_aabb)) => {
                    builder.primitive(render_primitive);
                    aabb.extend(&primitive_aabb);
                }
                Err(error) => {
                    log::error!("{error}");
                    self.errors.push(error);
                    failed = true;
                }
            }
        }
        if failed {
            return;
        }

        self.ctx
            .asset
            .bounding_box
            .extend(&aabb.transformed(global_transform));

        builder.bounding_box(aabb).culling(true).shadows(true, true);
        if let Some(skin) = node.skin {
            builder.skinning(document.skins[skin].joints.len());
        }
        builder.build(self.ctx.engine, entity);
        self.ctx.asset.renderables.push(entity);
    }

    fn create_primitive(
        &mut self,
        id: PrimitiveId,
        primitive: &document::Primitive,
        primitive_count: usize,
    ) -> Result<(RenderPrimitive, Aabb), PrimitiveError> {
        let topology = topology(primitive.mode).ok_or(PrimitiveError::UnsupportedTopology {
            id,
            mode: primitive.mode,
        })?;
        let material =
            self.materials
                .get_or_create(&mut self.ctx, primitive.material, primitive.has_vertex_color());

        let ctx = &mut self.ctx;
        let built = self
            .meshes
            .get_or_build(id.mesh, primitive_count, id.primitive, || {
                geometry::create_primitive(ctx, id, primitive, &material.uv_map)
            })?;

        Ok((
            RenderPrimitive {
                topology,
                vertices: built.vertices,
                indices: built.indices,
                material: material.instance,
            },
            built.aabb,
        ))
    }
}
