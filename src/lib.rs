pub mod asset;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod loader;
pub mod material_provider;

pub use asset::{ImportedAsset, Skin};
pub use config::{ConfigFileLoader, LoaderConfig};
pub use error::{ImportError, PrimitiveError, PrimitiveId};
pub use loader::{AssetConfiguration, AssetLoader};

pub use asset_common;
