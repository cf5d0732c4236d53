use asset_common::{
    AddressMode, ColorSpace, Filter, ImageSource, MaterialInstanceHandle, MipmapMode, SamplerInfo,
    TextureBinding,
};

use super::context::ImportContext;
use crate::document::{ImageLocation, MagFilter, MinFilter, Sampler, TextureView, WrappingMode};

/// Records that the view's image has to be decoded and bound to `parameter`. Textures
/// without an image are skipped.
pub(crate) fn add_texture_binding(
    ctx: &mut ImportContext<'_>,
    instance: MaterialInstanceHandle,
    parameter: &str,
    view: &TextureView,
    color_space: ColorSpace,
) {
    let document = ctx.document;
    let texture = &document.textures[view.texture];
    let Some(image) = texture.image else {
        log::warn!("Texture {} has no image, {parameter} stays unbound", view.texture);
        return;
    };
    let sampler = texture
        .sampler
        .map(|sampler| sampler_info(&document.samplers[sampler]))
        .unwrap_or_default();

    let (source, mime_type) = match &document.images[image].location {
        ImageLocation::Uri { uri, mime_type } => (ImageSource::Uri(uri.clone()), mime_type.clone()),
        ImageLocation::View { view, mime_type } => {
            let view = &document.buffer_views[*view];
            let source = ImageSource::BufferView {
                buffer: view.buffer,
                uri: document.buffers[view.buffer].uri.clone(),
                offset: view.byte_offset as u32,
                size: view.byte_length as u32,
            };
            (source, Some(mime_type.clone()))
        }
    };

    ctx.asset.texture_bindings.push(TextureBinding {
        image,
        source,
        mime_type,
        material_instance: instance,
        parameter: parameter.to_string(),
        sampler,
        color_space,
    });
}

pub(crate) fn sampler_info(sampler: &Sampler) -> SamplerInfo {
    let FilterAndMipmapMode {
        min_filter,
        mipmap_mode,
    } = sampler
        .min_filter
        .unwrap_or(MinFilter::LinearMipmapLinear)
        .into();
    let mag_filter = from_gltf_filter(sampler.mag_filter.unwrap_or(MagFilter::Linear));

    SamplerInfo {
        min_filter,
        mag_filter,
        mipmap_mode,
        address_mode: [
            from_gltf_address_mode(sampler.wrap_s),
            from_gltf_address_mode(sampler.wrap_t),
            AddressMode::ClampToEdge,
        ],
    }
}

fn from_gltf_address_mode(wrapping_mode: WrappingMode) -> AddressMode {
    match wrapping_mode {
        WrappingMode::ClampToEdge => AddressMode::ClampToEdge,
        WrappingMode::MirroredRepeat => AddressMode::MirroredRepeat,
        WrappingMode::Repeat => AddressMode::Repeat,
    }
}

fn from_gltf_filter(filter: MagFilter) -> Filter {
    match filter {
        MagFilter::Nearest => Filter::Nearest,
        MagFilter::Linear => Filter::Linear,
    }
}

struct FilterAndMipmapMode {
    min_filter: Filter,
    mipmap_mode: MipmapMode,
}

impl From<MinFilter> for FilterAndMipmapMode {
    fn from(min_filter: MinFilter) -> Self {
        let (min_filter, mipmap_mode) = match min_filter {
            MinFilter::Nearest | MinFilter::NearestMipmapNearest => {
                (Filter::Nearest, MipmapMode::Nearest)
            }
            MinFilter::Linear | MinFilter::LinearMipmapNearest => {
                (Filter::Linear, MipmapMode::Nearest)
            }
            MinFilter::NearestMipmapLinear => (Filter::Nearest, MipmapMode::Linear),
            MinFilter::LinearMipmapLinear => (Filter::Linear, MipmapMode::Linear),
        };
        FilterAndMipmapMode {
            min_filter,
            mipmap_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sampler_matches_the_default() {
        assert_eq!(sampler_info(&Sampler::default()), SamplerInfo::default());
    }

    #[test]
    fn wrap_modes_are_kept_per_axis() {
        let sampler = Sampler {
            mag_filter: Some(MagFilter::Nearest),
            min_filter: Some(MinFilter::Nearest),
            wrap_s: WrappingMode::ClampToEdge,
            wrap_t: WrappingMode::MirroredRepeat,
        };
        let info = sampler_info(&sampler);
        assert_eq!(
            info.address_mode,
            [
                AddressMode::ClampToEdge,
                AddressMode::MirroredRepeat,
                AddressMode::ClampToEdge
            ]
        );
        assert_eq!(info.mag_filter, Filter::Nearest);
        assert_eq!(info.mipmap_mode, MipmapMode::Nearest);
    }
}
