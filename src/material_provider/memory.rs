use std::collections::HashMap;

use asset_common::{MaterialHandle, MaterialKey};

use super::{CreatedInstance, MaterialProvider, MaterialSource};
use crate::engine::Engine;

/// Caches materials by key and applies [`MaterialKey::constrain`].
pub struct MemoryMaterialProvider {
    source: MaterialSource,
    cache: HashMap<MaterialKey, MaterialHandle>,
    materials: Vec<MaterialHandle>,
}

impl MemoryMaterialProvider {
    pub fn new(source: MaterialSource) -> Self {
        Self {
            source,
            cache: HashMap::new(),
            materials: Vec::new(),
        }
    }

    /// Ubershaders only specialise on the shading model and the blending.
    fn shader_key(&self, key: &MaterialKey) -> MaterialKey {
        match self.source {
            MaterialSource::Generate => *key,
            MaterialSource::LoadUbershaders => MaterialKey {
                unlit: key.unlit,
                use_specular_glossiness: key.use_specular_glossiness,
                alpha_mode: key.alpha_mode,
                ..Default::default()
            },
        }
    }
}

impl Default for MemoryMaterialProvider {
    fn default() -> Self {
        Self::new(MaterialSource::Generate)
    }
}

impl MaterialProvider for MemoryMaterialProvider {
    fn source(&self) -> MaterialSource {
        self.source
    }

    fn create_material_instance(
        &mut self,
        engine: &mut dyn Engine,
        key: &MaterialKey,
        label: &str,
    ) -> CreatedInstance {
        let (key, uv_map) = key.constrain();
        let shader_key = self.shader_key(&key);
        let material = *self.cache.entry(shader_key).or_insert_with(|| {
            log::debug!("Creating material for {shader_key:?}");
            let material = engine.create_material(&shader_key);
            self.materials.push(material);
            material
        });

        CreatedInstance {
            instance: engine.create_material_instance(material, label),
            key,
            uv_map,
        }
    }

    fn materials(&self) -> &[MaterialHandle] {
        &self.materials
    }

    fn destroy_materials(&mut self, engine: &mut dyn Engine) {
        for material in self.materials.drain(..) {
            engine.destroy_material(material);
        }
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MemoryEngine;
    use asset_common::AlphaMode;

    #[test]
    fn generated_materials_are_shared_per_key() {
        let mut engine = MemoryEngine::new();
        let mut provider = MemoryMaterialProvider::new(MaterialSource::Generate);
        let key = MaterialKey {
            double_sided: true,
            ..Default::default()
        };
        let first = provider.create_material_instance(&mut engine, &key, "a");
        let second = provider.create_material_instance(&mut engine, &key, "b");
        provider.create_material_instance(&mut engine, &MaterialKey::default(), "c");

        assert_ne!(first.instance, second.instance);
        assert_eq!(provider.materials_count(), 2);
        assert_eq!(engine.material_instance_count(), 3);
    }

    #[test]
    fn ubershaders_ignore_texture_layout() {
        let mut engine = MemoryEngine::new();
        let mut provider = MemoryMaterialProvider::new(MaterialSource::LoadUbershaders);
        let textured = MaterialKey {
            has_base_color_texture: true,
            has_normal_texture: true,
            normal_uv: 1,
            ..Default::default()
        };
        let blended = MaterialKey {
            alpha_mode: AlphaMode::Blend,
            ..Default::default()
        };
        provider.create_material_instance(&mut engine, &textured, "textured");
        provider.create_material_instance(&mut engine, &MaterialKey::default(), "plain");
        provider.create_material_instance(&mut engine, &blended, "blended");
        assert_eq!(provider.materials_count(), 2);

        provider.destroy_materials(&mut engine);
        assert_eq!(engine.material_count(), 0);
    }
}
