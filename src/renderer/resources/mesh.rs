use std::sync::atomic::{AtomicU32, Ordering};

use crate::renderer::contexts::device_ctx::{CommandSink, IndexFormat, RenderDevice};
use crate::renderer::contexts::frame_ctx::DrawEncoder;
use crate::renderer::contexts::resource_ctx::ResourceRegistry;
use crate::renderer::error::AssetError;
use crate::renderer::resources::BufferView;

static MESH_ID_COUNTER: AtomicU32 = AtomicU32::new(0);

/// One drawable unit of a mesh.
///
/// Positions and the first texture coordinate channel are required. Normals and
/// the second channel are bound as extra vertex streams when present, and the
/// material id and render mode reach the shaders through the per-draw
/// constants.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SubMesh {
    pub vertices: BufferView,
    pub indices: BufferView,
    pub normals: Option<BufferView>,
    pub tex_coords0: BufferView,
    pub tex_coords1: Option<BufferView>,
    pub index_format: IndexFormat,
    pub material_id: u32,
    pub render_mode: u32,
}

impl SubMesh {
    pub fn new(vertices: BufferView, indices: BufferView, tex_coords0: BufferView) -> Self {
        Self {
            vertices,
            indices,
            normals: None,
            tex_coords0,
            tex_coords1: None,
            index_format: IndexFormat::Uint16,
            material_id: 0,
            render_mode: 0,
        }
    }

    pub fn with_normals(mut self, normals: BufferView) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn with_tex_coords1(mut self, tex_coords1: BufferView) -> Self {
        self.tex_coords1 = Some(tex_coords1);
        self
    }

    pub fn with_index_format(mut self, index_format: IndexFormat) -> Self {
        self.index_format = index_format;
        self
    }

    pub fn with_material(mut self, material_id: u32) -> Self {
        self.material_id = material_id;
        self
    }

    pub fn with_render_mode(mut self, render_mode: u32) -> Self {
        self.render_mode = render_mode;
        self
    }

    /// Fails when the index view cannot hold `element_count` indices of the
    /// declared width, or holds at least twice that many bytes, e.g. 32-bit
    /// data declared as 16-bit.
    ///
    /// Padding below that bound is accepted, so views shared with trailing
    /// data or rounded up to an alignment still draw.
    pub fn check_index_width(&self) -> Result<(), AssetError> {
        let needed = u64::from(self.indices.element_count) * u64::from(self.index_format.size());
        let byte_length = self.indices.byte_length;
        if byte_length < needed || (needed > 0 && byte_length >= needed * 2) {
            return Err(AssetError::IndexWidthMismatch {
                format: self.index_format,
                element_count: self.indices.element_count,
                byte_length: self.indices.byte_length,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Mesh {
    id: u32,
    sub_meshes: Vec<SubMesh>,
}

impl Mesh {
    pub fn new() -> Self {
        let id = MESH_ID_COUNTER.fetch_add(1, Ordering::Relaxed);

        Self {
            id,
            sub_meshes: Vec::new(),
        }
    }

    /// Ids are not checked for uniqueness here; that is up to whoever owns the
    /// mesh collection.
    pub fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn add_sub_mesh(&mut self, sub_mesh: SubMesh) {
        self.sub_meshes.push(sub_mesh);
    }

    /// Like [`add_sub_mesh`](Self::add_sub_mesh), but first checks every view
    /// against the buffers registered in `registry`.
    pub fn add_sub_mesh_checked<D: RenderDevice>(
        &mut self,
        sub_mesh: SubMesh,
        registry: &ResourceRegistry<D>,
    ) -> Result<(), AssetError> {
        DrawEncoder::new(registry).resolve(&sub_mesh)?;
        self.sub_meshes.push(sub_mesh);
        Ok(())
    }

    pub fn sub_meshes(&self) -> &[SubMesh] {
        &self.sub_meshes
    }

    /// Records one indexed draw per sub-mesh into `sink`, in insertion order.
    pub fn draw<D, S>(&self, registry: &ResourceRegistry<D>, sink: &mut S) -> Result<(), AssetError>
    where
        D: RenderDevice,
        S: CommandSink<D::Buffer>,
    {
        DrawEncoder::new(registry).encode_mesh(self, sink)
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::resources::BufferId;

    fn view(byte_offset: u64, byte_length: u64, element_count: u32) -> BufferView {
        BufferView::new(BufferId::new(0), byte_offset, byte_length, element_count)
    }

    fn sub_mesh(index_bytes: u64, index_count: u32) -> SubMesh {
        SubMesh::new(view(0, 36, 3), view(64, index_bytes, index_count), view(36, 24, 3))
    }

    #[test]
    fn new_meshes_get_distinct_ids() {
        let a = Mesh::new();
        let b = Mesh::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn set_id_overrides_without_uniqueness_check() {
        let mut a = Mesh::new();
        let mut b = Mesh::new();
        a.set_id(7);
        b.set_id(7);
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn sub_meshes_keep_insertion_order() {
        let mut mesh = Mesh::new();
        mesh.add_sub_mesh(sub_mesh(6, 3).with_material(1));
        mesh.add_sub_mesh(sub_mesh(12, 6).with_material(2));
        let materials: Vec<u32> = mesh.sub_meshes().iter().map(|s| s.material_id).collect();
        assert_eq!(materials, vec![1, 2]);
    }

    #[test]
    fn sixteen_bit_indices_are_the_default() {
        let sub_mesh = sub_mesh(12, 6);
        assert_eq!(sub_mesh.index_format, IndexFormat::Uint16);
        assert!(sub_mesh.check_index_width().is_ok());
    }

    #[test]
    fn wide_index_data_declared_as_sixteen_bit_is_rejected() {
        // Six 32-bit indices occupy 24 bytes.
        let err = sub_mesh(24, 6).check_index_width().unwrap_err();
        assert!(matches!(
            err,
            AssetError::IndexWidthMismatch {
                format: IndexFormat::Uint16,
                element_count: 6,
                byte_length: 24,
            }
        ));

        let widened = sub_mesh(24, 6).with_index_format(IndexFormat::Uint32);
        assert!(widened.check_index_width().is_ok());
    }

    #[test]
    fn padded_sixteen_bit_index_views_are_accepted() {
        // Three u16 indices rounded up to a 4-byte boundary.
        assert!(sub_mesh(8, 3).check_index_width().is_ok());
        assert!(sub_mesh(11, 3).check_index_width().is_ok());
    }

    #[test]
    fn index_views_too_short_for_their_count_are_rejected() {
        let err = sub_mesh(5, 3).check_index_width().unwrap_err();
        assert!(matches!(
            err,
            AssetError::IndexWidthMismatch {
                element_count: 3,
                byte_length: 5,
                ..
            }
        ));
        let wide = sub_mesh(10, 3).with_index_format(IndexFormat::Uint32);
        assert!(wide.check_index_width().is_err());
    }
}
