mod aabb;
mod binding;
mod handle;
mod manifest;
mod material;
mod sampler;
pub mod transform;

pub use aabb::*;
pub use binding::*;
pub use handle::*;
pub use manifest::*;
pub use material::*;
pub use sampler::*;
