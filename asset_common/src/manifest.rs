use serde::{Deserialize, Serialize};

use crate::{BufferBinding, TextureBinding};

/// All the work an import leaves for the resource loader, in a form that can cross a process boundary.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BindingManifest {
    pub buffer_bindings: Vec<BufferBinding>,
    pub texture_bindings: Vec<TextureBinding>,
}

impl BindingManifest {
    pub fn to_bytes(&self) -> bincode::Result<Vec<u8>> {
        bincode::serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> bincode::Result<Self> {
        bincode::deserialize(bytes)
    }
}
