mod from_gltf;
mod validate;

pub use from_gltf::*;
pub use validate::*;

use asset_common::{transform::matrix_from_columns, transform::Transform, AlphaMode};
use ultraviolet::Mat4;

pub use gltf::accessor::{DataType, Dimensions};
pub use gltf::mesh::Mode;
pub use gltf::texture::{MagFilter, MinFilter, WrappingMode};

/// A parsed scene description. Everything refers to everything else by index into the
/// vectors below, so a document can be shared between imports and compared cheaply.
#[derive(Clone, Debug, Default)]
pub struct Document {
    pub scenes: Vec<Scene>,
    pub default_scene: Option<usize>,
    pub nodes: Vec<Node>,
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
    pub skins: Vec<Skin>,
    pub accessors: Vec<Accessor>,
    pub buffer_views: Vec<BufferView>,
    pub buffers: Vec<Buffer>,
    pub textures: Vec<Texture>,
    pub images: Vec<Image>,
    pub samplers: Vec<Sampler>,
}

impl Document {
    /// The scene to import: the declared default, or the first one.
    pub fn scene(&self) -> Option<&Scene> {
        self.default_scene
            .and_then(|index| self.scenes.get(index))
            .or_else(|| self.scenes.first())
    }
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub name: Option<String>,
    pub nodes: Vec<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct Node {
    pub name: Option<String>,
    pub transform: NodeTransform,
    pub mesh: Option<usize>,
    pub skin: Option<usize>,
    pub children: Vec<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeTransform {
    /// Column-major
    Matrix([[f32; 4]; 4]),
    Decomposed {
        translation: [f32; 3],
        /// `[x, y, z, w]`
        rotation: [f32; 4],
        scale: [f32; 3],
    },
}

impl NodeTransform {
    pub fn matrix(&self) -> Mat4 {
        match *self {
            NodeTransform::Matrix(columns) => matrix_from_columns(columns),
            NodeTransform::Decomposed {
                translation,
                rotation,
                scale,
            } => Transform::from_arrays(translation, rotation, scale).into(),
        }
    }
}

impl Default for NodeTransform {
    fn default() -> Self {
        NodeTransform::Decomposed {
            translation: [0.0; 3],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0; 3],
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub name: Option<String>,
    pub primitives: Vec<Primitive>,
}

#[derive(Clone, Debug)]
pub struct Primitive {
    pub mode: Mode,
    /// In declaration order
    pub attributes: Vec<Attribute>,
    pub indices: Option<usize>,
    pub material: Option<usize>,
}

impl Primitive {
    pub fn has_vertex_color(&self) -> bool {
        self.attributes
            .iter()
            .any(|attribute| attribute.semantic == Semantic::Colors(0))
    }

    pub fn attribute(&self, semantic: Semantic) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|attribute| attribute.semantic == semantic)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub semantic: Semantic,
    pub accessor: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Semantic {
    Positions,
    Normals,
    Tangents,
    Colors(u32),
    TexCoords(u32),
    Joints(u32),
    Weights(u32),
}

#[derive(Clone, Debug)]
pub struct Accessor {
    pub buffer_view: Option<usize>,
    pub byte_offset: usize,
    pub count: usize,
    pub data_type: DataType,
    pub dimensions: Dimensions,
    pub normalized: bool,
    pub min: Option<Vec<f32>>,
    pub max: Option<Vec<f32>>,
    /// Sparse storage is recorded but never decoded.
    pub sparse: bool,
}

impl Accessor {
    pub fn element_size(&self) -> usize {
        self.data_type.size() * self.dimensions.multiplicity()
    }
}

#[derive(Clone, Debug)]
pub struct BufferView {
    pub buffer: usize,
    pub byte_offset: usize,
    pub byte_length: usize,
    pub byte_stride: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct Buffer {
    pub byte_length: usize,
    /// `None` for the binary chunk of a binary container.
    pub uri: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Material {
    pub name: Option<String>,
    pub double_sided: bool,
    pub unlit: bool,
    pub alpha_mode: AlphaMode,
    pub alpha_cutoff: f32,
    pub base_color_factor: [f32; 4],
    pub base_color_texture: Option<TextureView>,
    pub metallic_factor: f32,
    pub roughness_factor: f32,
    pub metallic_roughness_texture: Option<TextureView>,
    pub normal_texture: Option<TextureView>,
    pub normal_scale: f32,
    pub occlusion_texture: Option<TextureView>,
    pub occlusion_strength: f32,
    /// Already multiplied by the emissive strength.
    pub emissive_factor: [f32; 3],
    pub emissive_texture: Option<TextureView>,
    pub specular_glossiness: Option<SpecularGlossiness>,
}

/// The defaults glTF prescribes for absent properties.
impl Default for Material {
    fn default() -> Self {
        Self {
            name: None,
            double_sided: false,
            unlit: false,
            alpha_mode: AlphaMode::Opaque,
            alpha_cutoff: 0.5,
            base_color_factor: [1.0; 4],
            base_color_texture: None,
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            metallic_roughness_texture: None,
            normal_texture: None,
            normal_scale: 1.0,
            occlusion_texture: None,
            occlusion_strength: 1.0,
            emissive_factor: [0.0; 3],
            emissive_texture: None,
            specular_glossiness: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SpecularGlossiness {
    pub diffuse_factor: [f32; 4],
    pub specular_factor: [f32; 3],
    pub glossiness_factor: f32,
    pub diffuse_texture: Option<TextureView>,
    pub specular_glossiness_texture: Option<TextureView>,
}

impl Default for SpecularGlossiness {
    fn default() -> Self {
        Self {
            diffuse_factor: [1.0; 4],
            specular_factor: [1.0; 3],
            glossiness_factor: 1.0,
            diffuse_texture: None,
            specular_glossiness_texture: None,
        }
    }
}

/// A material's reference to a texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureView {
    pub texture: usize,
    pub tex_coord: u32,
    pub transform: Option<UvTransform>,
}

impl TextureView {
    pub fn new(texture: usize, tex_coord: u32) -> Self {
        Self {
            texture,
            tex_coord,
            transform: None,
        }
    }

    pub fn has_transform(&self) -> bool {
        self.transform
            .is_some_and(|transform| !transform.is_identity())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UvTransform {
    pub offset: [f32; 2],
    pub rotation: f32,
    pub scale: [f32; 2],
}

impl UvTransform {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Column-major 3x3 matrix that scales, then rotates, then offsets texture coordinates.
    /// The offset sits in the last column.
    pub fn matrix(&self) -> [[f32; 3]; 3] {
        let [tx, ty] = self.offset;
        let [sx, sy] = self.scale;
        let (s, c) = self.rotation.sin_cos();
        [
            [sx * c, -sy * s, 0.0],
            [sx * s, sy * c, 0.0],
            [tx, ty, 1.0],
        ]
    }
}

impl Default for UvTransform {
    fn default() -> Self {
        Self {
            offset: [0.0, 0.0],
            rotation: 0.0,
            scale: [1.0, 1.0],
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Texture {
    pub name: Option<String>,
    pub image: Option<usize>,
    pub sampler: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct Image {
    pub name: Option<String>,
    pub location: ImageLocation,
}

#[derive(Clone, Debug)]
pub enum ImageLocation {
    Uri {
        uri: String,
        mime_type: Option<String>,
    },
    View {
        view: usize,
        mime_type: String,
    },
}

#[derive(Clone, Copy, Debug)]
pub struct Sampler {
    pub mag_filter: Option<MagFilter>,
    pub min_filter: Option<MinFilter>,
    pub wrap_s: WrappingMode,
    pub wrap_t: WrappingMode,
}

impl Default for Sampler {
    fn default() -> Self {
        Self {
            mag_filter: None,
            min_filter: None,
            wrap_s: WrappingMode::Repeat,
            wrap_t: WrappingMode::Repeat,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Skin {
    pub name: Option<String>,
    /// Node indices, in the order the inverse bind matrices use.
    pub joints: Vec<usize>,
    pub inverse_bind_matrices: Option<usize>,
}
