use serde::{Deserialize, Serialize};

/// Number of document texcoord slots a [`UvMap`] can address.
pub const UV_MAP_SIZE: usize = 8;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum AlphaMode {
    #[default]
    Opaque,
    Mask,
    Blend,
}

/// One of the two texcoord sets the renderer supports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum UvSet {
    #[default]
    Unused,
    Uv0,
    Uv1,
}

/// Maps document texcoord slots (`TEXCOORD_n`) to renderer texcoord sets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct UvMap([UvSet; UV_MAP_SIZE]);

impl UvMap {
    pub fn get(&self, tex_coord: u32) -> UvSet {
        self.0
            .get(tex_coord as usize)
            .copied()
            .unwrap_or(UvSet::Unused)
    }

    pub fn used_sets(&self) -> usize {
        self.0.iter().filter(|set| **set != UvSet::Unused).count()
    }

    /// Makes sure `tex_coord` has a set, handing out the next free one if needed.
    /// Returns false when the slot can not be mapped.
    fn claim(&mut self, tex_coord: u8, free_sets: &mut impl Iterator<Item = UvSet>) -> bool {
        let Some(entry) = self.0.get_mut(tex_coord as usize) else {
            return false;
        };
        if *entry != UvSet::Unused {
            return true;
        }
        match free_sets.next() {
            Some(set) => {
                *entry = set;
                true
            }
            None => false,
        }
    }
}

/// Everything about a material that influences which shader gets used.
///
/// With `use_specular_glossiness` set, the base color slot holds the diffuse texture and the
/// metallic-roughness slot holds the specular-glossiness texture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct MaterialKey {
    pub double_sided: bool,
    pub unlit: bool,
    pub has_vertex_colors: bool,
    pub has_base_color_texture: bool,
    pub has_normal_texture: bool,
    pub has_occlusion_texture: bool,
    pub has_emissive_texture: bool,
    pub has_metallic_roughness_texture: bool,
    pub use_specular_glossiness: bool,
    pub alpha_mode: AlphaMode,
    pub enable_diagnostics: bool,
    pub base_color_uv: u8,
    pub metallic_roughness_uv: u8,
    pub normal_uv: u8,
    pub ao_uv: u8,
    pub emissive_uv: u8,
    pub has_texture_transforms: bool,
}

impl MaterialKey {
    /// The key of the material used for primitives that do not reference one.
    pub fn default_material() -> Self {
        Self {
            unlit: true,
            ..Default::default()
        }
    }

    /// Fits the key into the two texcoord sets the renderer has. Slots are handed out in the
    /// order base color, metallic-roughness, normal, occlusion, emissive. A texture that would
    /// need a third set is removed from the key.
    pub fn constrain(&self) -> (MaterialKey, UvMap) {
        let mut key = *self;
        let mut uv_map = UvMap::default();
        let mut free_sets = [UvSet::Uv0, UvSet::Uv1].into_iter();

        let slots = [
            (&mut key.has_base_color_texture, &mut key.base_color_uv),
            (&mut key.has_metallic_roughness_texture, &mut key.metallic_roughness_uv),
            (&mut key.has_normal_texture, &mut key.normal_uv),
            (&mut key.has_occlusion_texture, &mut key.ao_uv),
            (&mut key.has_emissive_texture, &mut key.emissive_uv),
        ];
        for (has_texture, uv) in slots {
            if *has_texture && !uv_map.claim(*uv, &mut free_sets) {
                *has_texture = false;
                *uv = 0;
            }
        }

        (key, uv_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_texcoord_slots_share_a_set() {
        let key = MaterialKey {
            has_base_color_texture: true,
            has_normal_texture: true,
            has_emissive_texture: true,
            emissive_uv: 1,
            ..Default::default()
        };
        let (constrained, uv_map) = key.constrain();
        assert_eq!(constrained, key);
        assert_eq!(uv_map.get(0), UvSet::Uv0);
        assert_eq!(uv_map.get(1), UvSet::Uv1);
        assert_eq!(uv_map.get(2), UvSet::Unused);
    }

    #[test]
    fn third_texcoord_slot_is_dropped() {
        let key = MaterialKey {
            has_base_color_texture: true,
            base_color_uv: 2,
            has_metallic_roughness_texture: true,
            metallic_roughness_uv: 0,
            has_occlusion_texture: true,
            ao_uv: 1,
            ..Default::default()
        };
        let (constrained, uv_map) = key.constrain();
        assert!(!constrained.has_occlusion_texture);
        assert_eq!(uv_map.get(2), UvSet::Uv0);
        assert_eq!(uv_map.get(0), UvSet::Uv1);
        assert_eq!(uv_map.get(1), UvSet::Unused);
    }

    #[test]
    fn never_more_than_two_sets() {
        for base in 0..4u8 {
            for normal in 0..4u8 {
                for emissive in 0..4u8 {
                    let key = MaterialKey {
                        has_base_color_texture: true,
                        base_color_uv: base,
                        has_normal_texture: true,
                        normal_uv: normal,
                        has_emissive_texture: true,
                        emissive_uv: emissive,
                        ..Default::default()
                    };
                    let (_, uv_map) = key.constrain();
                    assert!(uv_map.used_sets() <= 2);
                }
            }
        }
    }

    #[test]
    fn out_of_range_slots_are_unused() {
        let key = MaterialKey {
            has_base_color_texture: true,
            base_color_uv: 12,
            ..Default::default()
        };
        let (constrained, uv_map) = key.constrain();
        assert!(!constrained.has_base_color_texture);
        assert_eq!(uv_map.used_sets(), 0);
        assert_eq!(uv_map.get(12), UvSet::Unused);
    }
}
