//! Typed identifiers.
//!
//! Every ID is a `u32` newtype that is `Copy + Ord + Hash`.  `Ord` matters:
//! Dijkstra breaks cost ties by `NodeId` and the tick loop steps woken agents
//! in ascending `AgentId`, which is what keeps seeded runs reproducible.

use std::fmt;

macro_rules! typed_id {
    ($(#[$attr:meta])* $name:ident, $label:literal) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl $name {
            /// Position of this ID in a dense `Vec`.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Build from a dense `Vec` position.
            ///
            /// # Panics
            /// Panics if `i` does not fit in a `u32`.
            #[inline]
            pub fn from_index(i: usize) -> Self {
                match u32::try_from(i) {
                    Ok(raw) => $name(raw),
                    Err(_) => panic!(concat!($label, " index {} overflows u32"), i),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

typed_id! {
    /// An agent.  Also the key that picks the agent's rendezvous venue
    /// (`agent mod venue_count`).
    AgentId, "agent"
}

typed_id! {
    /// A map node.
    NodeId, "node"
}

typed_id! {
    /// A directed map edge.
    EdgeId, "edge"
}

typed_id! {
    /// One rendezvous system.  Cohorts configured with different system ids
    /// never share venue slots.
    SystemId, "system"
}

impl EdgeId {
    /// "No predecessor" marker used during path reconstruction.
    pub const NONE: EdgeId = EdgeId(u32::MAX);
}
