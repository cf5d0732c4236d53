use asset_common::{
    Aabb, BindingTarget, BufferBinding, Conversion, IndexBufferHandle, SourceRange, UvMap, UvSet,
    VertexBufferHandle,
};
use ultraviolet::Vec3;

use super::context::ImportContext;
use crate::{
    document::{self, DataType, Dimensions, Document, Semantic},
    engine::{
        AttributeType, ComponentType, IndexType, VertexAttribute, VertexAttributeLayout,
        VertexBufferLayout,
    },
    error::{PrimitiveError, PrimitiveId},
    material_provider::MaterialSource,
};

pub const MAX_VERTEX_BUFFER_SLOTS: usize = 16;

/// Dummy streams are four bytes per vertex, zero filled.
const DUMMY_ELEMENT_SIZE: u32 = 4;

/// A built document primitive. Every node using the mesh shares these buffers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Primitive {
    pub vertices: VertexBufferHandle,
    pub indices: IndexBufferHandle,
    /// Object space, from the declared position bounds.
    pub aabb: Aabb,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AttributeRole {
    /// Gets its own slot and is copied as is.
    Stream(VertexAttribute),
    /// The normals. Their slot holds the packed orientation instead.
    Orientation,
    Skipped,
}

fn attribute_role(semantic: Semantic, uv_map: &UvMap) -> AttributeRole {
    match semantic {
        Semantic::Positions => AttributeRole::Stream(VertexAttribute::Position),
        Semantic::Normals => AttributeRole::Orientation,
        Semantic::Colors(0) => AttributeRole::Stream(VertexAttribute::Color),
        Semantic::Joints(0) => AttributeRole::Stream(VertexAttribute::BoneIndices),
        Semantic::Weights(0) => AttributeRole::Stream(VertexAttribute::BoneWeights),
        Semantic::TexCoords(set) => match uv_map.get(set) {
            UvSet::Uv0 => AttributeRole::Stream(VertexAttribute::Uv0),
            UvSet::Uv1 => AttributeRole::Stream(VertexAttribute::Uv1),
            UvSet::Unused => AttributeRole::Skipped,
        },
        // Tangents only feed the orientation.
        Semantic::Tangents
        | Semantic::Colors(_)
        | Semantic::Joints(_)
        | Semantic::Weights(_) => AttributeRole::Skipped,
    }
}

fn attribute_type(data_type: DataType, dimensions: Dimensions) -> Option<AttributeType> {
    let components = match dimensions {
        Dimensions::Scalar => 1,
        Dimensions::Vec2 => 2,
        Dimensions::Vec3 => 3,
        Dimensions::Vec4 => 4,
        Dimensions::Mat2 | Dimensions::Mat3 | Dimensions::Mat4 => return None,
    };
    let component = match data_type {
        DataType::I8 => ComponentType::Byte,
        DataType::U8 => ComponentType::UByte,
        DataType::I16 => ComponentType::Short,
        DataType::U16 => ComponentType::UShort,
        DataType::U32 => ComponentType::UInt,
        DataType::F32 => ComponentType::Float,
    };
    Some(AttributeType::new(component, components))
}

/// The bytes an accessor covers: `stride * (count - 1) + element size`, starting at the
/// accessor offset inside its view.
fn source_range(
    document: &Document,
    id: PrimitiveId,
    index: usize,
) -> Result<SourceRange, PrimitiveError> {
    let accessor = &document.accessors[index];
    if accessor.sparse {
        return Err(PrimitiveError::SparseAccessor {
            id,
            accessor: index,
        });
    }
    let view_index = accessor
        .buffer_view
        .ok_or(PrimitiveError::MissingBufferView {
            id,
            accessor: index,
        })?;
    let view = &document.buffer_views[view_index];
    let buffer = &document.buffers[view.buffer];

    let element_size = accessor.element_size();
    let stride = view.byte_stride.unwrap_or(element_size);
    let size = match accessor.count {
        0 => 0,
        count => stride * (count - 1) + element_size,
    };
    Ok(SourceRange {
        accessor: index,
        buffer: view.buffer,
        uri: buffer.uri.clone(),
        total_size: buffer.byte_length as u32,
        offset: (accessor.byte_offset + view.byte_offset) as u32,
        size: size as u32,
        stride: stride as u32,
    })
}

fn position_bounds(accessor: &document::Accessor) -> Option<Aabb> {
    let (min, max) = (accessor.min.as_deref()?, accessor.max.as_deref()?);
    match (min, max) {
        ([min_x, min_y, min_z, ..], [max_x, max_y, max_z, ..]) => Some(Aabb::new(
            Vec3::new(*min_x, *min_y, *min_z),
            Vec3::new(*max_x, *max_y, *max_z),
        )),
        _ => None,
    }
}

enum IndexPlan {
    Accessor {
        range: SourceRange,
        count: u32,
        index_type: IndexType,
        widen: bool,
    },
    Trivial {
        count: u32,
    },
}

fn plan_indices(
    document: &Document,
    id: PrimitiveId,
    primitive: &document::Primitive,
    vertex_count: u32,
) -> Result<IndexPlan, PrimitiveError> {
    let Some(index) = primitive.indices else {
        return Ok(IndexPlan::Trivial {
            count: vertex_count,
        });
    };
    let accessor = &document.accessors[index];
    let (index_type, widen) = match (accessor.data_type, accessor.dimensions) {
        (DataType::U8, Dimensions::Scalar) => (IndexType::UShort, true),
        (DataType::U16, Dimensions::Scalar) => (IndexType::UShort, false),
        (DataType::U32, Dimensions::Scalar) => (IndexType::UInt, false),
        (data_type, _) => {
            return Err(PrimitiveError::UnsupportedIndexType { id, data_type });
        }
    };
    Ok(IndexPlan::Accessor {
        range: source_range(document, id, index)?,
        count: accessor.count as u32,
        index_type,
        widen,
    })
}

struct VertexPlan {
    layout: VertexBufferLayout,
    aabb: Aabb,
    /// Streams the ubershaders expect but the primitive lacks, in slot order.
    dummies: Vec<VertexAttribute>,
}

/// First pass over the attributes. Everything that can fail is checked here, before
/// anything gets allocated.
fn plan_vertices(
    document: &Document,
    id: PrimitiveId,
    primitive: &document::Primitive,
    uv_map: &UvMap,
    source: MaterialSource,
    vertex_count: u32,
) -> Result<VertexPlan, PrimitiveError> {
    let mut attributes: Vec<VertexAttributeLayout> = Vec::new();
    let push = |attributes: &mut Vec<VertexAttributeLayout>,
                attribute: VertexAttribute,
                attribute_type: AttributeType,
                byte_stride: u32,
                normalized: bool| {
        if attributes.len() >= MAX_VERTEX_BUFFER_SLOTS {
            return Err(PrimitiveError::TooManySlots {
                id,
                limit: MAX_VERTEX_BUFFER_SLOTS,
            });
        }
        attributes.push(VertexAttributeLayout {
            attribute,
            slot: attributes.len() as u8,
            attribute_type,
            byte_stride,
            normalized,
        });
        Ok(())
    };
    let mut aabb = Aabb::empty();

    for attribute in &primitive.attributes {
        let accessor = &document.accessors[attribute.accessor];
        match attribute_role(attribute.semantic, uv_map) {
            AttributeRole::Orientation => {
                source_range(document, id, attribute.accessor)?;
                let packed = AttributeType::SHORT4;
                push(
                    &mut attributes,
                    VertexAttribute::Tangents,
                    packed,
                    packed.size(),
                    true,
                )?;
            }
            AttributeRole::Stream(vertex_attribute) => {
                let range = source_range(document, id, attribute.accessor)?;
                let attribute_type = attribute_type(accessor.data_type, accessor.dimensions)
                    .ok_or(PrimitiveError::UnsupportedAttributeType {
                        id,
                        semantic: attribute.semantic,
                        data_type: accessor.data_type,
                        dimensions: accessor.dimensions,
                    })?;
                if vertex_attribute == VertexAttribute::Position {
                    let bounds =
                        position_bounds(accessor).ok_or(PrimitiveError::MissingBounds {
                            id,
                            accessor: attribute.accessor,
                        })?;
                    aabb.extend(&bounds);
                }
                push(
                    &mut attributes,
                    vertex_attribute,
                    attribute_type,
                    range.stride,
                    accessor.normalized,
                )?;
            }
            AttributeRole::Skipped => match attribute.semantic {
                Semantic::Tangents => {
                    source_range(document, id, attribute.accessor)?;
                }
                Semantic::TexCoords(_) => {
                    log::debug!("{id}: {:?} is not used by the material", attribute.semantic);
                }
                semantic => log::warn!("{id}: ignoring {semantic:?}, only the first set is supported"),
            },
        }
    }

    let mut dummies = Vec::new();
    if source == MaterialSource::LoadUbershaders {
        let expected = [
            (VertexAttribute::Uv0, AttributeType::USHORT2, false),
            (VertexAttribute::Uv1, AttributeType::USHORT2, false),
            (VertexAttribute::Color, AttributeType::UBYTE4, true),
        ];
        for (attribute, attribute_type, normalized) in expected {
            if attributes.iter().any(|layout| layout.attribute == attribute) {
                continue;
            }
            push(
                &mut attributes,
                attribute,
                attribute_type,
                DUMMY_ELEMENT_SIZE,
                normalized,
            )?;
            dummies.push(attribute);
        }
    }

    Ok(VertexPlan {
        layout: VertexBufferLayout {
            vertex_count,
            buffer_count: attributes.len() as u8,
            attributes,
        },
        aabb,
        dummies,
    })
}

/// Allocates the buffers of one document primitive and records how to fill them.
pub(crate) fn create_primitive(
    ctx: &mut ImportContext<'_>,
    id: PrimitiveId,
    primitive: &document::Primitive,
    uv_map: &UvMap,
) -> Result<Primitive, PrimitiveError> {
    let document = ctx.document;
    let first = primitive
        .attributes
        .first()
        .ok_or(PrimitiveError::NoAttributes { id })?;
    let vertex_count = document.accessors[first.accessor].count as u32;

    let index_plan = plan_indices(document, id, primitive, vertex_count)?;
    let vertex_plan = plan_vertices(
        document,
        id,
        primitive,
        uv_map,
        ctx.materials.source(),
        vertex_count,
    )?;

    let indices = create_index_buffer(ctx, index_plan);
    let slot_count = vertex_plan.layout.buffer_count;
    let vertices = ctx.engine.create_vertex_buffer(vertex_plan.layout);
    ctx.asset.vertex_buffers.push(vertices);
    ctx.asset.primitives.insert(id, vertices);

    let described = bind_vertex_streams(ctx, id, primitive, uv_map, vertices, &vertex_plan.dummies)?;
    assert_eq!(
        described,
        usize::from(slot_count),
        "{id}: every vertex buffer slot needs exactly one binding"
    );

    Ok(Primitive {
        vertices,
        indices,
        aabb: vertex_plan.aabb,
    })
}

fn create_index_buffer(ctx: &mut ImportContext<'_>, plan: IndexPlan) -> IndexBufferHandle {
    let (indices, binding) = match plan {
        IndexPlan::Accessor {
            range,
            count,
            index_type,
            widen,
        } => {
            let indices = ctx.engine.create_index_buffer(count, index_type);
            let binding = BufferBinding {
                byte_size: range.size,
                source: Some(range),
                target: BindingTarget::Index(indices),
                conversion: if widen {
                    Conversion::WidenBytesToShorts
                } else {
                    Conversion::Copy
                },
            };
            (indices, binding)
        }
        IndexPlan::Trivial { count } => {
            let indices = ctx.engine.create_index_buffer(count, IndexType::UInt);
            let binding = BufferBinding {
                source: None,
                byte_size: count * IndexType::UInt.size(),
                target: BindingTarget::Index(indices),
                conversion: Conversion::GenerateTrivialIndices,
            };
            (indices, binding)
        }
    };
    ctx.asset.index_buffers.push(indices);
    ctx.asset.buffer_bindings.push(binding);
    indices
}

/// Second pass over the attributes, after allocation. Walks the slots in the same order as
/// [`plan_vertices`] and returns how many were described.
fn bind_vertex_streams(
    ctx: &mut ImportContext<'_>,
    id: PrimitiveId,
    primitive: &document::Primitive,
    uv_map: &UvMap,
    vertices: VertexBufferHandle,
    dummies: &[VertexAttribute],
) -> Result<usize, PrimitiveError> {
    let document = ctx.document;
    let vertex_count = document.accessors[primitive.attributes[0].accessor].count as u32;
    let mut slot: u8 = 0;

    for attribute in &primitive.attributes {
        let conversion = match attribute_role(attribute.semantic, uv_map) {
            AttributeRole::Skipped => continue,
            AttributeRole::Stream(_) => Conversion::Copy,
            AttributeRole::Orientation => Conversion::DeriveOrientation {
                tangents: primitive
                    .attribute(Semantic::Tangents)
                    .map(|tangents| source_range(document, id, tangents.accessor))
                    .transpose()?,
            },
        };
        let range = source_range(document, id, attribute.accessor)?;
        ctx.asset.buffer_bindings.push(BufferBinding {
            byte_size: range.size,
            source: Some(range),
            target: BindingTarget::Vertex {
                buffer: vertices,
                slot,
            },
            conversion,
        });
        slot += 1;
    }

    for _ in dummies {
        ctx.asset.buffer_bindings.push(BufferBinding {
            source: None,
            byte_size: DUMMY_ELEMENT_SIZE * vertex_count,
            target: BindingTarget::Vertex {
                buffer: vertices,
                slot,
            },
            conversion: Conversion::GenerateDummyData,
        });
        slot += 1;
    }

    Ok(usize::from(slot))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uv_map(sets: &[u8]) -> UvMap {
        let key = asset_common::MaterialKey {
            has_base_color_texture: !sets.is_empty(),
            base_color_uv: sets.first().copied().unwrap_or(0),
            has_normal_texture: sets.len() > 1,
            normal_uv: sets.get(1).copied().unwrap_or(0),
            ..Default::default()
        };
        key.constrain().1
    }

    #[test]
    fn texcoords_follow_the_uv_map() {
        let map = uv_map(&[1, 0]);
        assert_eq!(
            attribute_role(Semantic::TexCoords(1), &map),
            AttributeRole::Stream(VertexAttribute::Uv0)
        );
        assert_eq!(
            attribute_role(Semantic::TexCoords(0), &map),
            AttributeRole::Stream(VertexAttribute::Uv1)
        );
        assert_eq!(
            attribute_role(Semantic::TexCoords(2), &map),
            AttributeRole::Skipped
        );
    }

    #[test]
    fn only_the_first_color_set_is_kept() {
        let map = UvMap::default();
        assert_eq!(
            attribute_role(Semantic::Colors(0), &map),
            AttributeRole::Stream(VertexAttribute::Color)
        );
        assert_eq!(attribute_role(Semantic::Colors(1), &map), AttributeRole::Skipped);
        assert_eq!(attribute_role(Semantic::Normals, &map), AttributeRole::Orientation);
        assert_eq!(attribute_role(Semantic::Tangents, &map), AttributeRole::Skipped);
    }

    #[test]
    fn matrices_are_not_vertex_attributes() {
        assert_eq!(attribute_type(DataType::F32, Dimensions::Mat4), None);
        assert_eq!(
            attribute_type(DataType::U16, Dimensions::Vec2),
            Some(AttributeType::USHORT2)
        );
    }

    #[test]
    fn source_range_spans_the_last_element_only() {
        let document = Document {
            buffers: vec![document::Buffer {
                byte_length: 1000,
                uri: Some("data.bin".into()),
            }],
            buffer_views: vec![document::BufferView {
                buffer: 0,
                byte_offset: 100,
                byte_length: 800,
                byte_stride: Some(32),
            }],
            accessors: vec![document::Accessor {
                buffer_view: Some(0),
                byte_offset: 12,
                count: 10,
                data_type: DataType::F32,
                dimensions: Dimensions::Vec3,
                normalized: false,
                min: None,
                max: None,
                sparse: false,
            }],
            ..Default::default()
        };
        let id = PrimitiveId {
            mesh: 0,
            primitive: 0,
        };
        let range = source_range(&document, id, 0).unwrap();
        assert_eq!(range.offset, 112);
        assert_eq!(range.size, 32 * 9 + 12);
        assert_eq!(range.stride, 32);
        assert_eq!(range.uri.as_deref(), Some("data.bin"));
    }
}
