use glam::{Vec2, Vec3};

use crate::renderer::contexts::device_ctx::IndexFormat;
use crate::renderer::resources::{BufferId, BufferView, SubMesh};

/// Every section of a packed buffer starts on this boundary.
const SECTION_ALIGNMENT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indices {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl Indices {
    pub fn len(&self) -> usize {
        match self {
            Self::U16(indices) => indices.len(),
            Self::U32(indices) => indices.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn format(&self) -> IndexFormat {
        match self {
            Self::U16(_) => IndexFormat::Uint16,
            Self::U32(_) => IndexFormat::Uint32,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::U16(indices) => bytemuck::cast_slice(indices.as_slice()),
            Self::U32(indices) => bytemuck::cast_slice(indices.as_slice()),
        }
    }
}

/// CPU-side vertex streams and indices of one sub-mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    pub tex_coords0: Vec<Vec2>,
    pub tex_coords1: Option<Vec<Vec2>>,
    pub indices: Indices,
}

impl Geometry {
    pub fn triangle() -> Self {
        Self {
            positions: vec![
                Vec3::new(-0.5, -0.5, 0.0), // Bottom left
                Vec3::new(0.5, -0.5, 0.0),  // Bottom right
                Vec3::new(0.0, 0.5, 0.0),   // Top
            ],
            normals: Some(vec![Vec3::Z; 3]),
            tex_coords0: vec![
                Vec2::new(0.0, 1.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.5, 0.0),
            ],
            tex_coords1: None,
            indices: Indices::U16(vec![0, 1, 2]),
        }
    }

    pub fn quad() -> Self {
        Self {
            positions: vec![
                Vec3::new(-1.0, 1.0, 0.0),  // Top left
                Vec3::new(-1.0, -1.0, 0.0), // Bottom left
                Vec3::new(1.0, 1.0, 0.0),   // Top right
                Vec3::new(1.0, -1.0, 0.0),  // Bottom right
            ],
            normals: Some(vec![Vec3::Z; 4]),
            tex_coords0: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
            ],
            tex_coords1: None,
            // Counter-clockwise winding order
            indices: Indices::U16(vec![
                0, 1, 2, // Top left triangle
                2, 1, 3, // Bottom right triangle
            ]),
        }
    }

    /// Lays every stream out back to back in one byte blob, in stream slot
    /// order with the indices last.
    pub fn pack(&self) -> PackedGeometry {
        let mut bytes = Vec::new();

        let positions = append_section(
            &mut bytes,
            bytemuck::cast_slice(self.positions.as_slice()),
            self.positions.len(),
        );
        let tex_coords0 = append_section(
            &mut bytes,
            bytemuck::cast_slice(self.tex_coords0.as_slice()),
            self.tex_coords0.len(),
        );
        let normals = self.normals.as_ref().map(|normals| {
            append_section(&mut bytes, bytemuck::cast_slice(normals.as_slice()), normals.len())
        });
        let tex_coords1 = self.tex_coords1.as_ref().map(|tex_coords| {
            append_section(
                &mut bytes,
                bytemuck::cast_slice(tex_coords.as_slice()),
                tex_coords.len(),
            )
        });
        let indices = append_section(&mut bytes, self.indices.as_bytes(), self.indices.len());

        PackedGeometry {
            bytes,
            layout: PackedLayout {
                positions,
                normals,
                tex_coords0,
                tex_coords1,
                indices,
                index_format: self.indices.format(),
            },
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Section {
    offset: u64,
    length: u64,
    count: u32,
}

impl Section {
    fn view(&self, buffer_id: BufferId) -> BufferView {
        BufferView::new(buffer_id, self.offset, self.length, self.count)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct PackedLayout {
    positions: Section,
    normals: Option<Section>,
    tex_coords0: Section,
    tex_coords1: Option<Section>,
    indices: Section,
    index_format: IndexFormat,
}

/// Geometry flattened into the bytes of a single buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedGeometry {
    pub bytes: Vec<u8>,
    layout: PackedLayout,
}

impl PackedGeometry {
    pub fn byte_len(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// The sub-mesh addressing these bytes once they live in `buffer_id`.
    pub fn sub_mesh(&self, buffer_id: BufferId) -> SubMesh {
        let layout = &self.layout;
        let mut sub_mesh = SubMesh::new(
            layout.positions.view(buffer_id),
            layout.indices.view(buffer_id),
            layout.tex_coords0.view(buffer_id),
        )
        .with_index_format(layout.index_format);

        if let Some(normals) = layout.normals {
            sub_mesh = sub_mesh.with_normals(normals.view(buffer_id));
        }
        if let Some(tex_coords1) = layout.tex_coords1 {
            sub_mesh = sub_mesh.with_tex_coords1(tex_coords1.view(buffer_id));
        }
        sub_mesh
    }
}

fn append_section(bytes: &mut Vec<u8>, data: &[u8], count: usize) -> Section {
    let offset = bytes.len().next_multiple_of(SECTION_ALIGNMENT);
    bytes.resize(offset, 0);
    bytes.extend_from_slice(data);

    Section {
        offset: offset as u64,
        length: data.len() as u64,
        count: count as u32,
    }
}
