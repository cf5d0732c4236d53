use std::collections::HashMap;

use asset_common::{AlphaMode, ColorSpace, MaterialInstanceHandle, MaterialKey, UvMap};

use super::{
    context::ImportContext,
    material_key::resolve_material_key,
    texture::add_texture_binding,
};
use crate::{document::TextureView, engine::ParameterValue};

#[derive(Clone, Copy, Debug)]
pub(crate) struct MaterialEntry {
    pub instance: MaterialInstanceHandle,
    pub uv_map: UvMap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum CacheKey {
    /// Primitives without a material, regardless of vertex colors.
    Default,
    Document { material: usize, vertex_color: bool },
}

/// Material instances of one import, keyed by document material and vertex color use.
#[derive(Default)]
pub(crate) struct MaterialInstanceCache {
    entries: HashMap<CacheKey, MaterialEntry>,
}

impl MaterialInstanceCache {
    pub fn get_or_create(
        &mut self,
        ctx: &mut ImportContext<'_>,
        material: Option<usize>,
        vertex_color: bool,
    ) -> MaterialEntry {
        let cache_key = match material {
            None => CacheKey::Default,
            Some(material) => CacheKey::Document {
                material,
                vertex_color,
            },
        };
        if let Some(entry) = self.entries.get(&cache_key) {
            return *entry;
        }

        let entry = match material {
            None => create_default_instance(ctx),
            Some(material) => create_instance(ctx, material, vertex_color),
        };
        ctx.asset.material_instances.push(entry.instance);
        self.entries.insert(cache_key, entry);
        entry
    }
}

/// Unlit black
fn create_default_instance(ctx: &mut ImportContext<'_>) -> MaterialEntry {
    let created = ctx.materials.create_material_instance(
        ctx.engine,
        &MaterialKey::default_material(),
        "default",
    );
    ctx.engine.set_parameter(
        created.instance,
        "baseColorFactor",
        ParameterValue::Float4([0.0, 0.0, 0.0, 1.0]),
    );
    MaterialEntry {
        instance: created.instance,
        uv_map: created.uv_map,
    }
}

fn create_instance(ctx: &mut ImportContext<'_>, index: usize, vertex_color: bool) -> MaterialEntry {
    let document = ctx.document;
    let material = &document.materials[index];
    let resolved = resolve_material_key(material, vertex_color, ctx.diagnostics);
    let label = material.name.as_deref().unwrap_or("material");
    let created = ctx
        .materials
        .create_material_instance(ctx.engine, &resolved.key, label);
    let instance = created.instance;
    // The provider may have dropped textures that need a third texcoord set.
    let key = created.key;

    let mut set = |name: &str, value: ParameterValue| {
        ctx.engine.set_parameter(instance, name, value);
    };
    if key.alpha_mode == AlphaMode::Mask {
        set("maskThreshold", ParameterValue::Float(material.alpha_cutoff));
    }
    set("emissiveFactor", ParameterValue::Float3(material.emissive_factor));
    match &material.specular_glossiness {
        Some(workflow) if key.use_specular_glossiness => {
            set("baseColorFactor", ParameterValue::Float4(workflow.diffuse_factor));
            set("specularFactor", ParameterValue::Float3(workflow.specular_factor));
            set("glossinessFactor", ParameterValue::Float(workflow.glossiness_factor));
        }
        _ => {
            set("baseColorFactor", ParameterValue::Float4(material.base_color_factor));
            set("metallicFactor", ParameterValue::Float(material.metallic_factor));
            set("roughnessFactor", ParameterValue::Float(material.roughness_factor));
        }
    }
    // Neutral when the provider dropped the map.
    let normal_scale = if key.has_normal_texture {
        material.normal_scale
    } else {
        1.0
    };
    let ao_strength = if key.has_occlusion_texture {
        material.occlusion_strength
    } else {
        1.0
    };
    set("normalScale", ParameterValue::Float(normal_scale));
    set("aoStrength", ParameterValue::Float(ao_strength));

    let metallic_roughness_space = if key.use_specular_glossiness {
        ColorSpace::SRGB
    } else {
        ColorSpace::Linear
    };
    let textures = [
        (
            key.has_base_color_texture,
            resolved.base_color_texture,
            "baseColor",
            ColorSpace::SRGB,
        ),
        (
            key.has_metallic_roughness_texture,
            resolved.metallic_roughness_texture,
            "metallicRoughness",
            metallic_roughness_space,
        ),
        (
            key.has_normal_texture,
            material.normal_texture.as_ref(),
            "normal",
            ColorSpace::Linear,
        ),
        (
            key.has_occlusion_texture,
            material.occlusion_texture.as_ref(),
            "occlusion",
            ColorSpace::Linear,
        ),
        (
            key.has_emissive_texture,
            material.emissive_texture.as_ref(),
            "emissive",
            ColorSpace::SRGB,
        ),
    ];
    for (enabled, view, name, color_space) in textures {
        if let (true, Some(view)) = (enabled, view) {
            bind_texture(ctx, instance, name, view, color_space, key.has_texture_transforms);
        }
    }

    MaterialEntry {
        instance,
        uv_map: created.uv_map,
    }
}

/// Binds `<name>Map` and, when the key uses texture transforms, `<name>UvMatrix`.
fn bind_texture(
    ctx: &mut ImportContext<'_>,
    instance: MaterialInstanceHandle,
    name: &str,
    view: &TextureView,
    color_space: ColorSpace,
    texture_transforms: bool,
) {
    add_texture_binding(ctx, instance, &format!("{name}Map"), view, color_space);
    if texture_transforms {
        let matrix = view.transform.unwrap_or_default().matrix();
        ctx.engine.set_parameter(
            instance,
            &format!("{name}UvMatrix"),
            ParameterValue::Mat3(matrix),
        );
    }
}
