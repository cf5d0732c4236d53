use std::fmt;

use crate::document::{DataType, Dimensions, DocumentError, Mode, Semantic};

/// Which document primitive something happened to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PrimitiveId {
    pub mesh: usize,
    pub primitive: usize,
}

impl fmt::Display for PrimitiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mesh {} primitive {}", self.mesh, self.primitive)
    }
}

/// A primitive that could not be built. The rest of the document is still traversed.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PrimitiveError {
    #[error("{id}: unsupported topology {mode:?}")]
    UnsupportedTopology { id: PrimitiveId, mode: Mode },
    #[error("{id}: unsupported index type {data_type:?}")]
    UnsupportedIndexType { id: PrimitiveId, data_type: DataType },
    #[error("{id}: unsupported type {dimensions:?} of {data_type:?} for {semantic:?}")]
    UnsupportedAttributeType {
        id: PrimitiveId,
        semantic: Semantic,
        data_type: DataType,
        dimensions: Dimensions,
    },
    #[error("{id}: accessor {accessor} is sparse")]
    SparseAccessor { id: PrimitiveId, accessor: usize },
    #[error("{id}: accessor {accessor} has no buffer view")]
    MissingBufferView { id: PrimitiveId, accessor: usize },
    #[error("{id}: position accessor {accessor} has no min/max")]
    MissingBounds { id: PrimitiveId, accessor: usize },
    #[error("{id}: no vertex attributes")]
    NoAttributes { id: PrimitiveId },
    #[error("{id}: needs more than {limit} vertex buffer slots")]
    TooManySlots { id: PrimitiveId, limit: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("could not parse the document: {0}")]
    Parse(#[from] gltf::Error),
    #[error("invalid document: {0}")]
    Document(#[from] DocumentError),
    #[error("{} primitive(s) could not be built", .0.len())]
    Primitives(Vec<PrimitiveError>),
    #[error("skin {skin} uses node {node} as a joint, but the node is not part of the imported scene")]
    UnresolvedJoint { skin: usize, node: usize },
}
