use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            pub fn new(id: u32) -> Self {
                Self(id)
            }

            pub fn id(&self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

handle!(
    /// A scene node created by the engine. Every imported document node gets one.
    Entity
);
handle!(VertexBufferHandle);
handle!(IndexBufferHandle);
handle!(
    /// A compiled material (shader program) owned by a material provider.
    MaterialHandle
);
handle!(MaterialInstanceHandle);
