mod memory;

pub use memory::*;

use asset_common::{
    Aabb, Entity, IndexBufferHandle, MaterialHandle, MaterialInstanceHandle, MaterialKey,
    VertexBufferHandle,
};
use ultraviolet::Mat4;

/// The renderer side of an import. The importer only ever allocates through this trait,
/// filling the allocations is left to whoever consumes the binding descriptors.
pub trait Engine {
    fn create_entity(&mut self) -> Entity;
    /// Also removes every component of the entity.
    fn destroy_entity(&mut self, entity: Entity);
    fn create_transform(&mut self, entity: Entity, parent: Option<Entity>, local: Mat4);
    fn create_renderable(&mut self, entity: Entity, renderable: Renderable);

    fn create_vertex_buffer(&mut self, layout: VertexBufferLayout) -> VertexBufferHandle;
    fn destroy_vertex_buffer(&mut self, buffer: VertexBufferHandle);
    fn create_index_buffer(&mut self, index_count: u32, index_type: IndexType)
        -> IndexBufferHandle;
    fn destroy_index_buffer(&mut self, buffer: IndexBufferHandle);

    fn create_material(&mut self, key: &MaterialKey) -> MaterialHandle;
    fn destroy_material(&mut self, material: MaterialHandle);
    fn create_material_instance(
        &mut self,
        material: MaterialHandle,
        label: &str,
    ) -> MaterialInstanceHandle;
    fn destroy_material_instance(&mut self, instance: MaterialInstanceHandle);
    fn set_parameter(&mut self, instance: MaterialInstanceHandle, name: &str, value: ParameterValue);
}

/// Optional component that gives entities readable names.
pub trait NameManager {
    fn set_name(&mut self, entity: Entity, name: &str);
    fn name(&self, entity: Entity) -> Option<&str>;
    fn remove(&mut self, entity: Entity);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VertexAttribute {
    Position,
    /// Packed surface orientation, derived from the normals (and tangents if there are any).
    Tangents,
    Color,
    Uv0,
    Uv1,
    BoneIndices,
    BoneWeights,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentType {
    Byte,
    UByte,
    Short,
    UShort,
    UInt,
    Float,
}

impl ComponentType {
    pub fn size(&self) -> u32 {
        match self {
            ComponentType::Byte | ComponentType::UByte => 1,
            ComponentType::Short | ComponentType::UShort => 2,
            ComponentType::UInt | ComponentType::Float => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AttributeType {
    pub component: ComponentType,
    /// 1 to 4
    pub components: u8,
}

impl AttributeType {
    pub const SHORT4: Self = Self::new(ComponentType::Short, 4);
    pub const USHORT2: Self = Self::new(ComponentType::UShort, 2);
    pub const UBYTE4: Self = Self::new(ComponentType::UByte, 4);

    pub const fn new(component: ComponentType, components: u8) -> Self {
        Self {
            component,
            components,
        }
    }

    pub fn size(&self) -> u32 {
        self.component.size() * u32::from(self.components)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttributeLayout {
    pub attribute: VertexAttribute,
    /// Every attribute lives in its own buffer slot.
    pub slot: u8,
    pub attribute_type: AttributeType,
    pub byte_stride: u32,
    pub normalized: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VertexBufferLayout {
    pub vertex_count: u32,
    pub buffer_count: u8,
    pub attributes: Vec<VertexAttributeLayout>,
}

impl VertexBufferLayout {
    pub fn attribute(&self, attribute: VertexAttribute) -> Option<&VertexAttributeLayout> {
        self.attributes
            .iter()
            .find(|layout| layout.attribute == attribute)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IndexType {
    UShort,
    UInt,
}

impl IndexType {
    pub fn size(&self) -> u32 {
        match self {
            IndexType::UShort => 2,
            IndexType::UInt => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    Points,
    Lines,
    Triangles,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParameterValue {
    Float(f32),
    Float3([f32; 3]),
    Float4([f32; 4]),
    /// Column-major
    Mat3([[f32; 3]; 3]),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderPrimitive {
    pub topology: PrimitiveTopology,
    pub vertices: VertexBufferHandle,
    pub indices: IndexBufferHandle,
    pub material: MaterialInstanceHandle,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Renderable {
    pub primitives: Vec<RenderPrimitive>,
    /// Object space
    pub bounding_box: Aabb,
    pub skin_joint_count: Option<usize>,
    pub culling: bool,
    pub cast_shadows: bool,
    pub receive_shadows: bool,
}

impl Renderable {
    pub fn builder() -> RenderableBuilder {
        RenderableBuilder {
            renderable: Renderable {
                primitives: Vec::new(),
                bounding_box: Aabb::empty(),
                skin_joint_count: None,
                culling: true,
                cast_shadows: true,
                receive_shadows: true,
            },
        }
    }
}

pub struct RenderableBuilder {
    renderable: Renderable,
}

impl RenderableBuilder {
    pub fn primitive(&mut self, primitive: RenderPrimitive) -> &mut Self {
        self.renderable.primitives.push(primitive);
        self
    }

    pub fn bounding_box(&mut self, bounding_box: Aabb) -> &mut Self {
        self.renderable.bounding_box = bounding_box;
        self
    }

    pub fn skinning(&mut self, joint_count: usize) -> &mut Self {
        self.renderable.skin_joint_count = Some(joint_count);
        self
    }

    pub fn culling(&mut self, enabled: bool) -> &mut Self {
        self.renderable.culling = enabled;
        self
    }

    pub fn shadows(&mut self, cast: bool, receive: bool) -> &mut Self {
        self.renderable.cast_shadows = cast;
        self.renderable.receive_shadows = receive;
        self
    }

    pub fn build(self, engine: &mut dyn Engine, entity: Entity) {
        engine.create_renderable(entity, self.renderable);
    }
}
