//! Entity handles.
//!
//! Handles are plain arena indices. They stay valid until the entity is removed and are never
//! reused by the same graph.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub(crate) u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

handle!(
    /// Handle of an [`LNode`](super::LNode).
    NodeId,
    "n"
);
handle!(
    /// Handle of an [`LPort`](super::LPort).
    PortId,
    "p"
);
handle!(
    /// Handle of an [`LEdge`](super::LEdge).
    EdgeId,
    "e"
);
handle!(
    /// Handle of an [`LLabel`](super::LLabel).
    LabelId,
    "l"
);
handle!(
    /// Stable identity of a [`Layer`](super::Layer). The layer's position in the graph is
    /// computed on demand.
    LayerId,
    "L"
);
