mod memory;

pub use memory::*;

use asset_common::{MaterialHandle, MaterialInstanceHandle, MaterialKey, UvMap};
use serde::{Deserialize, Serialize};

use crate::engine::Engine;

/// Where the shaders behind a material come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum MaterialSource {
    /// One specialised material per key.
    #[default]
    Generate,
    /// A few precompiled materials that branch at runtime. They expect every primitive to
    /// provide both texcoord sets and vertex colors.
    LoadUbershaders,
}

pub struct CreatedInstance {
    pub instance: MaterialInstanceHandle,
    /// The key after the provider applied its limits, parameters are set from this one.
    pub key: MaterialKey,
    pub uv_map: UvMap,
}

pub trait MaterialProvider {
    fn source(&self) -> MaterialSource;

    fn create_material_instance(
        &mut self,
        engine: &mut dyn Engine,
        key: &MaterialKey,
        label: &str,
    ) -> CreatedInstance;

    /// Materials created so far. They outlive the assets that use them.
    fn materials(&self) -> &[MaterialHandle];

    fn materials_count(&self) -> usize {
        self.materials().len()
    }

    fn destroy_materials(&mut self, engine: &mut dyn Engine);
}
