use std::collections::HashMap;

use asset_common::{
    Entity, IndexBufferHandle, MaterialHandle, MaterialInstanceHandle, MaterialKey,
    VertexBufferHandle,
};
use ultraviolet::Mat4;

use super::{Engine, IndexType, NameManager, ParameterValue, Renderable, VertexBufferLayout};

#[derive(Clone, Debug, PartialEq)]
pub struct TransformComponent {
    pub parent: Option<Entity>,
    pub local: Mat4,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexBufferInfo {
    pub index_count: u32,
    pub index_type: IndexType,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MaterialInstanceRecord {
    pub material: MaterialHandle,
    pub label: String,
    pub parameters: HashMap<String, ParameterValue>,
}

impl MaterialInstanceRecord {
    pub fn parameter(&self, name: &str) -> Option<ParameterValue> {
        self.parameters.get(name).copied()
    }
}

/// An engine that only keeps records. Used by the command line tool and the tests.
#[derive(Default)]
pub struct MemoryEngine {
    next_id: u32,
    entities: Vec<Entity>,
    transforms: HashMap<Entity, TransformComponent>,
    renderables: HashMap<Entity, Renderable>,
    vertex_buffers: HashMap<VertexBufferHandle, VertexBufferLayout>,
    index_buffers: HashMap<IndexBufferHandle, IndexBufferInfo>,
    materials: HashMap<MaterialHandle, MaterialKey>,
    material_instances: HashMap<MaterialInstanceHandle, MaterialInstanceRecord>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    pub fn transform(&self, entity: Entity) -> Option<&TransformComponent> {
        self.transforms.get(&entity)
    }

    /// Composes the local matrices up the parent chain.
    pub fn world_transform(&self, entity: Entity) -> Option<Mat4> {
        let component = self.transforms.get(&entity)?;
        let mut world = component.local;
        let mut parent = component.parent;
        while let Some(entity) = parent {
            let component = self.transforms.get(&entity)?;
            world = component.local * world;
            parent = component.parent;
        }
        Some(world)
    }

    pub fn renderable(&self, entity: Entity) -> Option<&Renderable> {
        self.renderables.get(&entity)
    }

    pub fn renderable_count(&self) -> usize {
        self.renderables.len()
    }

    pub fn vertex_buffer(&self, buffer: VertexBufferHandle) -> Option<&VertexBufferLayout> {
        self.vertex_buffers.get(&buffer)
    }

    pub fn vertex_buffer_count(&self) -> usize {
        self.vertex_buffers.len()
    }

    pub fn index_buffer(&self, buffer: IndexBufferHandle) -> Option<&IndexBufferInfo> {
        self.index_buffers.get(&buffer)
    }

    pub fn index_buffer_count(&self) -> usize {
        self.index_buffers.len()
    }

    pub fn material(&self, material: MaterialHandle) -> Option<&MaterialKey> {
        self.materials.get(&material)
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn material_instance(
        &self,
        instance: MaterialInstanceHandle,
    ) -> Option<&MaterialInstanceRecord> {
        self.material_instances.get(&instance)
    }

    pub fn material_instance_count(&self) -> usize {
        self.material_instances.len()
    }

    /// True when nothing an import creates is left. Materials belong to the material
    /// provider and are not counted.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
            && self.transforms.is_empty()
            && self.renderables.is_empty()
            && self.vertex_buffers.is_empty()
            && self.index_buffers.is_empty()
            && self.material_instances.is_empty()
    }
}

impl Engine for MemoryEngine {
    fn create_entity(&mut self) -> Entity {
        let entity = Entity::new(self.next_id());
        self.entities.push(entity);
        entity
    }

    fn destroy_entity(&mut self, entity: Entity) {
        self.entities.retain(|alive| *alive != entity);
        self.transforms.remove(&entity);
        self.renderables.remove(&entity);
    }

    fn create_transform(&mut self, entity: Entity, parent: Option<Entity>, local: Mat4) {
        self.transforms
            .insert(entity, TransformComponent { parent, local });
    }

    fn create_renderable(&mut self, entity: Entity, renderable: Renderable) {
        self.renderables.insert(entity, renderable);
    }

    fn create_vertex_buffer(&mut self, layout: VertexBufferLayout) -> VertexBufferHandle {
        let buffer = VertexBufferHandle::new(self.next_id());
        self.vertex_buffers.insert(buffer, layout);
        buffer
    }

    fn destroy_vertex_buffer(&mut self, buffer: VertexBufferHandle) {
        self.vertex_buffers.remove(&buffer);
    }

    fn create_index_buffer(&mut self, index_count: u32, index_type: IndexType) -> IndexBufferHandle {
        let buffer = IndexBufferHandle::new(self.next_id());
        self.index_buffers.insert(
            buffer,
            IndexBufferInfo {
                index_count,
                index_type,
            },
        );
        buffer
    }

    fn destroy_index_buffer(&mut self, buffer: IndexBufferHandle) {
        self.index_buffers.remove(&buffer);
    }

    fn create_material(&mut self, key: &MaterialKey) -> MaterialHandle {
        let material = MaterialHandle::new(self.next_id());
        self.materials.insert(material, *key);
        material
    }

    fn destroy_material(&mut self, material: MaterialHandle) {
        self.materials.remove(&material);
    }

    fn create_material_instance(
        &mut self,
        material: MaterialHandle,
        label: &str,
    ) -> MaterialInstanceHandle {
        let instance = MaterialInstanceHandle::new(self.next_id());
        self.material_instances.insert(
            instance,
            MaterialInstanceRecord {
                material,
                label: label.to_string(),
                parameters: HashMap::new(),
            },
        );
        instance
    }

    fn destroy_material_instance(&mut self, instance: MaterialInstanceHandle) {
        self.material_instances.remove(&instance);
    }

    fn set_parameter(&mut self, instance: MaterialInstanceHandle, name: &str, value: ParameterValue) {
        if let Some(record) = self.material_instances.get_mut(&instance) {
            record.parameters.insert(name.to_string(), value);
        } else {
            log::warn!("Setting {name} on unknown material instance {instance}");
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryNames {
    names: HashMap<Entity, String>,
}

impl MemoryNames {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl NameManager for MemoryNames {
    fn set_name(&mut self, entity: Entity, name: &str) {
        self.names.insert(entity, name.to_string());
    }

    fn name(&self, entity: Entity) -> Option<&str> {
        self.names.get(&entity).map(String::as_str)
    }

    fn remove(&mut self, entity: Entity) {
        self.names.remove(&entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ultraviolet::Vec3;

    #[test]
    fn world_transform_follows_the_parent_chain() {
        let mut engine = MemoryEngine::new();
        let root = engine.create_entity();
        let child = engine.create_entity();
        engine.create_transform(root, None, Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)));
        engine.create_transform(child, Some(root), Mat4::from_scale(2.0));

        let world = engine.world_transform(child).unwrap();
        assert_eq!(world.cols[3].xyz(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(world.cols[0].x, 2.0);
    }

    #[test]
    fn destroying_an_entity_drops_its_components() {
        let mut engine = MemoryEngine::new();
        let entity = engine.create_entity();
        engine.create_transform(entity, None, Mat4::identity());
        engine.create_renderable(entity, Renderable::builder().renderable);
        assert!(!engine.is_empty());

        engine.destroy_entity(entity);
        assert!(engine.is_empty());
        assert!(!engine.is_alive(entity));
    }
}
