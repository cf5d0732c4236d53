use serde::{Deserialize, Serialize};

use crate::{
    ColorSpace, IndexBufferHandle, MaterialInstanceHandle, SamplerInfo, VertexBufferHandle,
};

/// A byte range inside one of the document's buffers.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceRange {
    /// The accessor this range was computed from.
    pub accessor: usize,
    pub buffer: usize,
    /// `None` for the embedded binary chunk of a binary container.
    pub uri: Option<String>,
    pub total_size: u32,
    pub offset: u32,
    pub size: u32,
    pub stride: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum BindingTarget {
    Index(IndexBufferHandle),
    Vertex { buffer: VertexBufferHandle, slot: u8 },
}

/// What the resource loader has to do with the bytes.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum Conversion {
    Copy,
    /// 8 bit indices are widened to 16 bit.
    WidenBytesToShorts,
    /// Fill with `0, 1, 2, ...`, there is no source.
    GenerateTrivialIndices,
    /// Fill with zeros, there is no source.
    GenerateDummyData,
    /// The source holds normals. Compute the packed surface orientation from them and the tangents.
    DeriveOrientation { tangents: Option<SourceRange> },
}

/// A deferred instruction to fill part of a buffer that was allocated during import.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct BufferBinding {
    pub source: Option<SourceRange>,
    /// Bytes to copy from the source, or bytes to generate when there is none.
    pub byte_size: u32,
    pub target: BindingTarget,
    pub conversion: Conversion,
}

impl BufferBinding {
    pub fn vertex_slot(&self) -> Option<(VertexBufferHandle, u8)> {
        match self.target {
            BindingTarget::Vertex { buffer, slot } => Some((buffer, slot)),
            BindingTarget::Index(_) => None,
        }
    }

    pub fn index_buffer(&self) -> Option<IndexBufferHandle> {
        match self.target {
            BindingTarget::Index(buffer) => Some(buffer),
            BindingTarget::Vertex { .. } => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum ImageSource {
    Uri(String),
    BufferView {
        buffer: usize,
        uri: Option<String>,
        offset: u32,
        size: u32,
    },
}

/// A deferred instruction to decode an image and bind it to a material parameter.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TextureBinding {
    pub image: usize,
    pub source: ImageSource,
    pub mime_type: Option<String>,
    pub material_instance: MaterialInstanceHandle,
    pub parameter: String,
    pub sampler: SamplerInfo,
    pub color_space: ColorSpace,
}
