#![allow(dead_code)]

use std::sync::Arc;

use scene_import::{
    asset_common::AlphaMode,
    document::{
        Accessor, Attribute, Buffer, BufferView, DataType, Dimensions, Document, Image,
        ImageLocation, Material, Mesh, Mode, Node, NodeTransform, Primitive, Scene, Semantic,
        Texture, TextureView,
    },
    engine::{MemoryEngine, MemoryNames},
    material_provider::{MaterialSource, MemoryMaterialProvider},
    AssetConfiguration, AssetLoader, ImportedAsset,
};

pub type TestLoader = AssetLoader<MemoryEngine, MemoryMaterialProvider>;

pub fn loader(source: MaterialSource) -> TestLoader {
    AssetLoader::new(AssetConfiguration {
        engine: MemoryEngine::new(),
        materials: MemoryMaterialProvider::new(source),
        names: Some(Box::new(MemoryNames::default())),
        enable_diagnostics: false,
    })
}

/// Builds documents by hand. All data lives in one external buffer, every accessor gets
/// its own tightly packed view.
pub struct DocumentBuilder {
    pub document: Document,
    next_offset: usize,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            document: Document {
                buffers: vec![Buffer {
                    byte_length: 1 << 20,
                    uri: Some("scene.bin".into()),
                }],
                ..Default::default()
            },
            next_offset: 0,
        }
    }

    pub fn accessor(&mut self, data_type: DataType, dimensions: Dimensions, count: usize) -> usize {
        let element_size = data_type.size() * dimensions.multiplicity();
        let byte_length = element_size * count;
        self.document.buffer_views.push(BufferView {
            buffer: 0,
            byte_offset: self.next_offset,
            byte_length,
            byte_stride: None,
        });
        self.next_offset += byte_length;
        self.document.accessors.push(Accessor {
            buffer_view: Some(self.document.buffer_views.len() - 1),
            byte_offset: 0,
            count,
            data_type,
            dimensions,
            normalized: false,
            min: None,
            max: None,
            sparse: false,
        });
        self.document.accessors.len() - 1
    }

    pub fn positions_in(&mut self, count: usize, min: [f32; 3], max: [f32; 3]) -> usize {
        let index = self.accessor(DataType::F32, Dimensions::Vec3, count);
        self.document.accessors[index].min = Some(min.to_vec());
        self.document.accessors[index].max = Some(max.to_vec());
        index
    }

    /// A unit cube around the origin.
    pub fn positions(&mut self, count: usize) -> usize {
        self.positions_in(count, [-1.0; 3], [1.0; 3])
    }

    pub fn normals(&mut self, count: usize) -> usize {
        self.accessor(DataType::F32, Dimensions::Vec3, count)
    }

    pub fn tex_coords(&mut self, count: usize) -> usize {
        self.accessor(DataType::F32, Dimensions::Vec2, count)
    }

    pub fn colors(&mut self, count: usize) -> usize {
        let index = self.accessor(DataType::U8, Dimensions::Vec4, count);
        self.document.accessors[index].normalized = true;
        index
    }

    pub fn indices(&mut self, data_type: DataType, count: usize) -> usize {
        self.accessor(data_type, Dimensions::Scalar, count)
    }

    pub fn mesh(&mut self, name: &str, primitives: Vec<Primitive>) -> usize {
        self.document.meshes.push(Mesh {
            name: Some(name.into()),
            primitives,
        });
        self.document.meshes.len() - 1
    }

    pub fn node(&mut self, node: Node) -> usize {
        self.document.nodes.push(node);
        self.document.nodes.len() - 1
    }

    pub fn mesh_node(&mut self, mesh: usize) -> usize {
        self.node(Node {
            mesh: Some(mesh),
            ..Default::default()
        })
    }

    pub fn material(&mut self, material: Material) -> usize {
        self.document.materials.push(material);
        self.document.materials.len() - 1
    }

    pub fn texture(&mut self, uri: &str) -> usize {
        self.document.images.push(Image {
            name: None,
            location: ImageLocation::Uri {
                uri: uri.into(),
                mime_type: Some("image/png".into()),
            },
        });
        self.document.textures.push(Texture {
            name: None,
            image: Some(self.document.images.len() - 1),
            sampler: None,
        });
        self.document.textures.len() - 1
    }

    pub fn texture_view(&mut self, uri: &str, tex_coord: u32) -> TextureView {
        TextureView::new(self.texture(uri), tex_coord)
    }

    pub fn scene(&mut self, nodes: Vec<usize>) {
        self.document.scenes.push(Scene { name: None, nodes });
        self.document.default_scene = Some(self.document.scenes.len() - 1);
    }

    pub fn build(self) -> Arc<Document> {
        Arc::new(self.document)
    }
}

pub fn attribute(semantic: Semantic, accessor: usize) -> Attribute {
    Attribute { semantic, accessor }
}

pub fn triangles(
    attributes: Vec<Attribute>,
    indices: Option<usize>,
    material: Option<usize>,
) -> Primitive {
    Primitive {
        mode: Mode::Triangles,
        attributes,
        indices,
        material,
    }
}

pub fn translation(x: f32, y: f32, z: f32) -> NodeTransform {
    NodeTransform::Decomposed {
        translation: [x, y, z],
        rotation: [0.0, 0.0, 0.0, 1.0],
        scale: [1.0; 3],
    }
}

pub fn opaque_material(name: &str) -> Material {
    Material {
        name: Some(name.into()),
        alpha_mode: AlphaMode::Opaque,
        ..Default::default()
    }
}

/// Every slot of every vertex buffer the asset owns is targeted by exactly one binding.
pub fn assert_every_slot_described(asset: &ImportedAsset, engine: &MemoryEngine) {
    for &buffer in asset.vertex_buffers() {
        let layout = engine.vertex_buffer(buffer).expect("vertex buffer is alive");
        for slot in 0..layout.buffer_count {
            let bindings = asset
                .buffer_bindings()
                .iter()
                .filter(|binding| binding.vertex_slot() == Some((buffer, slot)))
                .count();
            assert_eq!(bindings, 1, "{buffer} slot {slot} has {bindings} bindings");
        }
        let out_of_range = asset
            .buffer_bindings()
            .iter()
            .filter_map(|binding| binding.vertex_slot())
            .filter(|(target, slot)| *target == buffer && *slot >= layout.buffer_count)
            .count();
        assert_eq!(out_of_range, 0);
    }
}
