//! "Resources" refers to the load-time data that references GPU objects owned
//! by the registry. They are built by the user and read while drawing.

pub mod buffer_view;
pub mod geometry;
pub mod mesh;

use std::fmt;

pub use buffer_view::BufferView;
pub use geometry::{Geometry, Indices, PackedGeometry};
pub use mesh::{Mesh, SubMesh};

/// Position of a buffer in the registry's buffer list.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct BufferId(u32);

impl BufferId {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
