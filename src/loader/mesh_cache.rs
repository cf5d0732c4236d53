use std::collections::HashMap;

use super::geometry::Primitive;
use crate::error::PrimitiveError;

/// Mesh index to its built primitives, in document order. Lives for one import.
#[derive(Default)]
pub(crate) struct MeshCache {
    meshes: HashMap<usize, Vec<Option<Primitive>>>,
}

impl MeshCache {
    /// Builds a primitive on first use. A failed build leaves the slot empty, so a later
    /// node using the same mesh reports the failure again instead of getting half a mesh.
    pub fn get_or_build(
        &mut self,
        mesh: usize,
        primitive_count: usize,
        primitive: usize,
        build: impl FnOnce() -> Result<Primitive, PrimitiveError>,
    ) -> Result<Primitive, PrimitiveError> {
        let primitives = self
            .meshes
            .entry(mesh)
            .or_insert_with(|| vec![None; primitive_count]);
        if let Some(built) = primitives[primitive] {
            log::debug!("Reusing mesh {mesh} primitive {primitive}");
            return Ok(built);
        }
        let built = build()?;
        primitives[primitive] = Some(built);
        Ok(built)
    }
}
