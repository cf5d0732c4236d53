use std::borrow::Cow;

use asset_common::AlphaMode;

use super::*;

/// Parses either container format. Returns the document and, for the binary container,
/// an owned copy of the embedded binary chunk.
pub fn parse_document(bytes: &[u8]) -> Result<(Document, Option<Vec<u8>>), gltf::Error> {
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes)?;
    Ok((Document::from_gltf(&document), blob))
}

/// Parses the binary container only. The embedded chunk is copied out of `bytes`, so the
/// caller is free to drop its buffer as soon as this returns.
pub fn parse_binary(bytes: &[u8]) -> Result<(Document, Option<Vec<u8>>), gltf::Error> {
    let glb = gltf::Glb::from_slice(bytes)?;
    let gltf::Gltf { document, .. } = gltf::Gltf::from_slice(&glb.json)?;
    let binary_chunk = glb.bin.map(Cow::into_owned);
    Ok((Document::from_gltf(&document), binary_chunk))
}

impl Document {
    pub fn from_gltf(document: &gltf::Document) -> Self {
        Self {
            scenes: document
                .scenes()
                .map(|scene| Scene {
                    name: scene.name().map(String::from),
                    nodes: scene.nodes().map(|node| node.index()).collect(),
                })
                .collect(),
            default_scene: document.default_scene().map(|scene| scene.index()),
            nodes: document.nodes().map(|node| convert_node(&node)).collect(),
            meshes: document.meshes().map(|mesh| convert_mesh(&mesh)).collect(),
            materials: document
                .materials()
                .map(|material| convert_material(&material))
                .collect(),
            skins: document
                .skins()
                .map(|skin| Skin {
                    name: skin.name().map(String::from),
                    joints: skin.joints().map(|joint| joint.index()).collect(),
                    inverse_bind_matrices: skin
                        .inverse_bind_matrices()
                        .map(|accessor| accessor.index()),
                })
                .collect(),
            accessors: document
                .accessors()
                .map(|accessor| convert_accessor(&accessor))
                .collect(),
            buffer_views: document
                .views()
                .map(|view| BufferView {
                    buffer: view.buffer().index(),
                    byte_offset: view.offset(),
                    byte_length: view.length(),
                    byte_stride: view.stride(),
                })
                .collect(),
            buffers: document
                .buffers()
                .map(|buffer| Buffer {
                    byte_length: buffer.length(),
                    uri: match buffer.source() {
                        gltf::buffer::Source::Bin => None,
                        gltf::buffer::Source::Uri(uri) => Some(uri.to_string()),
                    },
                })
                .collect(),
            textures: document
                .textures()
                .map(|texture| Texture {
                    name: texture.name().map(String::from),
                    image: Some(texture.source().index()),
                    sampler: texture.sampler().index(),
                })
                .collect(),
            images: document
                .images()
                .map(|image| Image {
                    name: image.name().map(String::from),
                    location: match image.source() {
                        gltf::image::Source::View { view, mime_type } => ImageLocation::View {
                            view: view.index(),
                            mime_type: mime_type.to_string(),
                        },
                        gltf::image::Source::Uri { uri, mime_type } => ImageLocation::Uri {
                            uri: uri.to_string(),
                            mime_type: mime_type.map(String::from),
                        },
                    },
                })
                .collect(),
            samplers: document
                .samplers()
                .map(|sampler| Sampler {
                    mag_filter: sampler.mag_filter(),
                    min_filter: sampler.min_filter(),
                    wrap_s: sampler.wrap_s(),
                    wrap_t: sampler.wrap_t(),
                })
                .collect(),
        }
    }
}

fn convert_node(node: &gltf::Node<'_>) -> Node {
    let transform = match node.transform() {
        gltf::scene::Transform::Matrix { matrix } => NodeTransform::Matrix(matrix),
        gltf::scene::Transform::Decomposed {
            translation,
            rotation,
            scale,
        } => NodeTransform::Decomposed {
            translation,
            rotation,
            scale,
        },
    };
    Node {
        name: node.name().map(String::from),
        transform,
        mesh: node.mesh().map(|mesh| mesh.index()),
        skin: node.skin().map(|skin| skin.index()),
        children: node.children().map(|child| child.index()).collect(),
    }
}

fn convert_mesh(mesh: &gltf::Mesh<'_>) -> Mesh {
    let primitives = mesh
        .primitives()
        .map(|primitive| Primitive {
            mode: primitive.mode(),
            attributes: primitive
                .attributes()
                .filter_map(|(semantic, accessor)| {
                    Some(Attribute {
                        semantic: convert_semantic(semantic)?,
                        accessor: accessor.index(),
                    })
                })
                .collect(),
            indices: primitive.indices().map(|accessor| accessor.index()),
            material: primitive.material().index(),
        })
        .collect();
    Mesh {
        name: mesh.name().map(String::from),
        primitives,
    }
}

#[allow(unreachable_patterns)]
fn convert_semantic(semantic: gltf::Semantic) -> Option<Semantic> {
    Some(match semantic {
        gltf::Semantic::Positions => Semantic::Positions,
        gltf::Semantic::Normals => Semantic::Normals,
        gltf::Semantic::Tangents => Semantic::Tangents,
        gltf::Semantic::Colors(set) => Semantic::Colors(set),
        gltf::Semantic::TexCoords(set) => Semantic::TexCoords(set),
        gltf::Semantic::Joints(set) => Semantic::Joints(set),
        gltf::Semantic::Weights(set) => Semantic::Weights(set),
        // Application specific attributes
        _ => return None,
    })
}

fn convert_accessor(accessor: &gltf::Accessor<'_>) -> Accessor {
    Accessor {
        buffer_view: accessor.view().map(|view| view.index()),
        byte_offset: accessor.offset(),
        count: accessor.count(),
        data_type: accessor.data_type(),
        dimensions: accessor.dimensions(),
        normalized: accessor.normalized(),
        min: accessor.min().as_ref().and_then(json_floats),
        max: accessor.max().as_ref().and_then(json_floats),
        sparse: accessor.sparse().is_some(),
    }
}

fn json_floats(value: &gltf::json::Value) -> Option<Vec<f32>> {
    value
        .as_array()?
        .iter()
        .map(|number| number.as_f64().map(|number| number as f32))
        .collect()
}

fn convert_material(material: &gltf::Material<'_>) -> Material {
    let pbr = material.pbr_metallic_roughness();
    let emissive_strength = material.emissive_strength().unwrap_or(1.0);

    Material {
        name: material.name().map(String::from),
        double_sided: material.double_sided(),
        unlit: material.unlit(),
        alpha_mode: match material.alpha_mode() {
            gltf::material::AlphaMode::Opaque => AlphaMode::Opaque,
            gltf::material::AlphaMode::Mask => AlphaMode::Mask,
            gltf::material::AlphaMode::Blend => AlphaMode::Blend,
        },
        alpha_cutoff: material.alpha_cutoff().unwrap_or(0.5),
        base_color_factor: pbr.base_color_factor(),
        base_color_texture: pbr.base_color_texture().as_ref().map(texture_view),
        metallic_factor: pbr.metallic_factor(),
        roughness_factor: pbr.roughness_factor(),
        metallic_roughness_texture: pbr.metallic_roughness_texture().as_ref().map(texture_view),
        normal_texture: material
            .normal_texture()
            .map(|normal| TextureView::new(normal.texture().index(), normal.tex_coord())),
        normal_scale: material.normal_texture().map_or(1.0, |normal| normal.scale()),
        occlusion_texture: material.occlusion_texture().map(|occlusion| {
            TextureView::new(occlusion.texture().index(), occlusion.tex_coord())
        }),
        occlusion_strength: material
            .occlusion_texture()
            .map_or(1.0, |occlusion| occlusion.strength()),
        emissive_factor: material
            .emissive_factor()
            .map(|value| value * emissive_strength),
        emissive_texture: material.emissive_texture().as_ref().map(texture_view),
        specular_glossiness: material.pbr_specular_glossiness().map(|workflow| {
            SpecularGlossiness {
                diffuse_factor: workflow.diffuse_factor(),
                specular_factor: workflow.specular_factor(),
                glossiness_factor: workflow.glossiness_factor(),
                diffuse_texture: workflow.diffuse_texture().as_ref().map(texture_view),
                specular_glossiness_texture: workflow
                    .specular_glossiness_texture()
                    .as_ref()
                    .map(texture_view),
            }
        }),
    }
}

/// A texture transform may override the texcoord slot of the view it is attached to.
fn texture_view(info: &gltf::texture::Info<'_>) -> TextureView {
    let transform = info.texture_transform();
    TextureView {
        texture: info.texture().index(),
        tex_coord: transform
            .as_ref()
            .and_then(|transform| transform.tex_coord())
            .unwrap_or(info.tex_coord()),
        transform: transform.map(|transform| UvTransform {
            offset: transform.offset(),
            rotation: transform.rotation(),
            scale: transform.scale(),
        }),
    }
}
