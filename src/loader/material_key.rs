use asset_common::MaterialKey;

use crate::document::{Material, TextureView};

/// A material key together with the views that ended up in the base color and
/// metallic-roughness slots, which depend on the workflow.
pub(crate) struct ResolvedMaterial<'a> {
    pub key: MaterialKey,
    pub base_color_texture: Option<&'a TextureView>,
    pub metallic_roughness_texture: Option<&'a TextureView>,
}

fn uv_slot(view: Option<&TextureView>) -> u8 {
    view.map_or(0, |view| u8::try_from(view.tex_coord).unwrap_or(u8::MAX))
}

pub(crate) fn resolve_material_key(
    material: &Material,
    vertex_color: bool,
    enable_diagnostics: bool,
) -> ResolvedMaterial<'_> {
    let mut base_color_texture = material.base_color_texture.as_ref();
    let mut metallic_roughness_texture = material.metallic_roughness_texture.as_ref();
    if let Some(workflow) = &material.specular_glossiness {
        base_color_texture = workflow.diffuse_texture.as_ref().or(base_color_texture);
        metallic_roughness_texture = workflow
            .specular_glossiness_texture
            .as_ref()
            .or(metallic_roughness_texture);
    }
    let normal_texture = material.normal_texture.as_ref();
    let occlusion_texture = material.occlusion_texture.as_ref();
    let emissive_texture = material.emissive_texture.as_ref();

    let has_texture_transforms = [
        base_color_texture,
        metallic_roughness_texture,
        normal_texture,
        occlusion_texture,
        emissive_texture,
    ]
    .into_iter()
    .flatten()
    .any(TextureView::has_transform);

    let key = MaterialKey {
        double_sided: material.double_sided,
        unlit: material.unlit,
        has_vertex_colors: vertex_color,
        has_base_color_texture: base_color_texture.is_some(),
        has_normal_texture: normal_texture.is_some(),
        has_occlusion_texture: occlusion_texture.is_some(),
        has_emissive_texture: emissive_texture.is_some(),
        has_metallic_roughness_texture: metallic_roughness_texture.is_some(),
        use_specular_glossiness: material.specular_glossiness.is_some(),
        alpha_mode: material.alpha_mode,
        enable_diagnostics,
        base_color_uv: uv_slot(base_color_texture),
        metallic_roughness_uv: uv_slot(metallic_roughness_texture),
        normal_uv: uv_slot(normal_texture),
        ao_uv: uv_slot(occlusion_texture),
        emissive_uv: uv_slot(emissive_texture),
        has_texture_transforms,
    };

    ResolvedMaterial {
        key,
        base_color_texture,
        metallic_roughness_texture,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{SpecularGlossiness, UvTransform};
    use asset_common::AlphaMode;

    #[test]
    fn specular_glossiness_takes_over_the_pbr_slots() {
        let material = Material {
            base_color_texture: Some(TextureView::new(0, 0)),
            specular_glossiness: Some(SpecularGlossiness {
                diffuse_texture: Some(TextureView::new(1, 1)),
                specular_glossiness_texture: Some(TextureView::new(2, 1)),
                ..Default::default()
            }),
            ..Default::default()
        };
        let resolved = resolve_material_key(&material, false, false);
        assert!(resolved.key.use_specular_glossiness);
        assert!(resolved.key.has_metallic_roughness_texture);
        assert_eq!(resolved.key.base_color_uv, 1);
        assert_eq!(resolved.base_color_texture.unwrap().texture, 1);
        assert_eq!(resolved.metallic_roughness_texture.unwrap().texture, 2);
    }

    #[test]
    fn identity_transforms_do_not_count() {
        let mut view = TextureView::new(0, 0);
        view.transform = Some(UvTransform::default());
        let material = Material {
            emissive_texture: Some(view),
            ..Default::default()
        };
        assert!(!resolve_material_key(&material, false, false).key.has_texture_transforms);

        view.transform = Some(UvTransform {
            rotation: 0.5,
            ..Default::default()
        });
        let material = Material {
            emissive_texture: Some(view),
            ..Default::default()
        };
        assert!(resolve_material_key(&material, false, false).key.has_texture_transforms);
    }

    #[test]
    fn key_carries_flags() {
        let material = Material {
            double_sided: true,
            alpha_mode: AlphaMode::Mask,
            ..Default::default()
        };
        let key = resolve_material_key(&material, true, true).key;
        assert!(key.double_sided && key.has_vertex_colors && key.enable_diagnostics);
        assert_eq!(key.alpha_mode, AlphaMode::Mask);
        assert!(!key.has_base_color_texture);
    }
}
