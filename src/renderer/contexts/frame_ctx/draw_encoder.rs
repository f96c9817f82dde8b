use smallvec::SmallVec;

use crate::renderer::contexts::device_ctx::{
    CommandSink, DrawIndexedArgs, IndexBufferView, PrimitiveTopology, RenderDevice,
    VertexBufferView,
};
use crate::renderer::contexts::resource_ctx::ResourceRegistry;
use crate::renderer::error::AssetError;
use crate::renderer::resources::{BufferView, Mesh, SubMesh};
use crate::renderer::shader_data::{PerDrawData, VEC2_STRIDE, VEC3_STRIDE};

pub const POSITION_SLOT: u32 = 0;
pub const TEX_COORD0_SLOT: u32 = 1;
pub const NORMAL_SLOT: u32 = 2;
pub const TEX_COORD1_SLOT: u32 = 3;
const VERTEX_STREAM_COUNT: usize = 4;

/// Every buffer range a sub-mesh draw reads, already checked against the
/// registry.
#[derive(Debug)]
pub struct ResolvedSubMesh<'a, B> {
    /// Indexed by stream slot.
    pub streams: [Option<VertexBufferView<'a, B>>; VERTEX_STREAM_COUNT],
    pub index: IndexBufferView<'a, B>,
    pub index_count: u32,
}

/// Turns meshes into binding and draw commands against buffers owned by a
/// [`ResourceRegistry`].
///
/// Per sub-mesh the recorded sequence is: vertex streams, triangle-list
/// topology, index buffer, per-draw constants, then one indexed draw of a
/// single instance. A sub-mesh whose views fail to resolve records nothing.
pub struct DrawEncoder<'a, D: RenderDevice> {
    registry: &'a ResourceRegistry<D>,
}

impl<'a, D: RenderDevice> DrawEncoder<'a, D> {
    pub fn new(registry: &'a ResourceRegistry<D>) -> Self {
        Self { registry }
    }

    pub fn encode_mesh<S>(&self, mesh: &Mesh, sink: &mut S) -> Result<(), AssetError>
    where
        S: CommandSink<D::Buffer>,
    {
        for (index, sub_mesh) in mesh.sub_meshes().iter().enumerate() {
            self.encode_sub_mesh(mesh.id(), index as u32, sub_mesh, sink)?;
        }
        Ok(())
    }

    pub fn encode_sub_mesh<S>(
        &self,
        mesh_id: u32,
        sub_mesh_index: u32,
        sub_mesh: &SubMesh,
        sink: &mut S,
    ) -> Result<(), AssetError>
    where
        S: CommandSink<D::Buffer>,
    {
        let resolved = self.resolve(sub_mesh)?;
        let index_count = resolved.index_count;

        bind_vertex_streams(resolved.streams, sink);
        sink.set_primitive_topology(PrimitiveTopology::TriangleList);
        sink.set_index_buffer(&resolved.index);
        sink.set_draw_constants(&PerDrawData {
            object_index: mesh_id,
            sub_mesh_index,
            material_index: sub_mesh.material_id,
            render_mode: sub_mesh.render_mode,
        });
        sink.draw_indexed(DrawIndexedArgs::single(index_count));

        log::trace!("Encoded mesh {mesh_id} sub-mesh {sub_mesh_index}: {index_count} indices");
        Ok(())
    }

    /// Resolves and validates every view of `sub_mesh` without recording
    /// anything.
    pub fn resolve(&self, sub_mesh: &SubMesh) -> Result<ResolvedSubMesh<'a, D::Buffer>, AssetError> {
        let vertices = self.vertex_stream(&sub_mesh.vertices, VEC3_STRIDE)?;
        let tex_coords0 = self.vertex_stream(&sub_mesh.tex_coords0, VEC2_STRIDE)?;
        let normals = sub_mesh
            .normals
            .as_ref()
            .map(|view| self.vertex_stream(view, VEC3_STRIDE))
            .transpose()?;
        let tex_coords1 = sub_mesh
            .tex_coords1
            .as_ref()
            .map(|view| self.vertex_stream(view, VEC2_STRIDE))
            .transpose()?;

        sub_mesh.check_index_width()?;
        let indices = self.registry.resolve_view(&sub_mesh.indices)?;

        let mut streams = [const { None }; VERTEX_STREAM_COUNT];
        streams[POSITION_SLOT as usize] = Some(vertices);
        streams[TEX_COORD0_SLOT as usize] = Some(tex_coords0);
        streams[NORMAL_SLOT as usize] = normals;
        streams[TEX_COORD1_SLOT as usize] = tex_coords1;

        Ok(ResolvedSubMesh {
            streams,
            index: IndexBufferView {
                buffer: indices.buffer,
                offset: indices.offset,
                size: indices.size,
                format: sub_mesh.index_format,
            },
            index_count: sub_mesh.indices.element_count,
        })
    }

    fn vertex_stream(
        &self,
        view: &BufferView,
        stride: u32,
    ) -> Result<VertexBufferView<'a, D::Buffer>, AssetError> {
        if view.byte_length % u64::from(stride) != 0 {
            return Err(AssetError::StrideMismatch {
                stride,
                byte_length: view.byte_length,
            });
        }

        let range = self.registry.resolve_view(view)?;
        Ok(VertexBufferView {
            buffer: range.buffer,
            offset: range.offset,
            size: range.size,
            stride,
        })
    }
}

/// Binds each run of consecutive present streams with a single call.
fn bind_vertex_streams<'a, B, S>(
    streams: [Option<VertexBufferView<'a, B>>; VERTEX_STREAM_COUNT],
    sink: &mut S,
) where
    S: CommandSink<B>,
{
    let mut batch: SmallVec<[VertexBufferView<'a, B>; VERTEX_STREAM_COUNT]> = SmallVec::new();
    let mut batch_start = 0;

    for (slot, stream) in streams.into_iter().enumerate() {
        match stream {
            Some(view) => {
                if batch.is_empty() {
                    batch_start = slot as u32;
                }
                batch.push(view);
            }
            None if !batch.is_empty() => {
                sink.set_vertex_buffers(batch_start, &batch);
                batch.clear();
            }
            None => {}
        }
    }

    if !batch.is_empty() {
        sink.set_vertex_buffers(batch_start, &batch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::config::RegistryConfig;
    use crate::renderer::contexts::device_ctx::IndexFormat;
    use crate::renderer::headless::{CommandRecorder, HeadlessBuffer, HeadlessDevice, RecordedCommand};
    use crate::renderer::resources::BufferId;

    // Layout of the shared test buffer: 4 positions, 4 uvs, 4 normals, 4 uvs, 6 u16 indices.
    const POSITIONS: (u64, u64) = (0, 48);
    const UVS0: (u64, u64) = (48, 32);
    const NORMALS: (u64, u64) = (80, 48);
    const UVS1: (u64, u64) = (128, 32);
    const INDICES: (u64, u64) = (160, 12);

    fn setup() -> (ResourceRegistry<HeadlessDevice>, BufferId) {
        let mut registry =
            ResourceRegistry::new(HeadlessDevice::default(), RegistryConfig::default()).unwrap();
        let id = registry.allocate_buffer(HeadlessBuffer::new("quad", 172));
        (registry, id)
    }

    fn view(id: BufferId, (offset, length): (u64, u64), count: u32) -> BufferView {
        BufferView::new(id, offset, length, count)
    }

    fn quad(id: BufferId) -> SubMesh {
        SubMesh::new(view(id, POSITIONS, 4), view(id, INDICES, 6), view(id, UVS0, 4))
    }

    #[test]
    fn six_indices_draw_six_from_zero() {
        let (registry, id) = setup();
        let mut mesh = Mesh::new();
        mesh.add_sub_mesh(quad(id));

        let mut recorder = CommandRecorder::new();
        DrawEncoder::new(&registry).encode_mesh(&mesh, &mut recorder).unwrap();

        let draws: Vec<DrawIndexedArgs> = recorder.draw_calls().collect();
        assert_eq!(draws, vec![DrawIndexedArgs::single(6)]);
        assert_eq!(draws[0].first_index, 0);
        assert_eq!(draws[0].instance_count, 1);
    }

    #[test]
    fn commands_follow_the_fixed_sequence() {
        let (registry, id) = setup();
        let mut mesh = Mesh::new();
        mesh.set_id(11);
        mesh.add_sub_mesh(quad(id).with_material(5).with_render_mode(2));

        let mut recorder = CommandRecorder::new();
        mesh.draw(&registry, &mut recorder).unwrap();

        let commands = recorder.commands();
        assert_eq!(commands.len(), 5);

        let RecordedCommand::SetVertexBuffers { start_slot, views } = &commands[0] else {
            panic!("expected vertex buffers first, got {:?}", commands[0]);
        };
        assert_eq!(*start_slot, POSITION_SLOT);
        assert_eq!(views.len(), 2);
        assert_eq!((views[0].offset, views[0].size, views[0].stride), (0, 48, 12));
        assert_eq!((views[1].offset, views[1].size, views[1].stride), (48, 32, 8));

        assert_eq!(
            commands[1],
            RecordedCommand::SetPrimitiveTopology(PrimitiveTopology::TriangleList)
        );

        let RecordedCommand::SetIndexBuffer(index) = &commands[2] else {
            panic!("expected index buffer, got {:?}", commands[2]);
        };
        assert_eq!((index.offset, index.size), INDICES);
        assert_eq!(index.format, IndexFormat::Uint16);
        assert_eq!(index.buffer, "quad");

        assert_eq!(
            commands[3],
            RecordedCommand::SetDrawConstants(PerDrawData {
                object_index: 11,
                sub_mesh_index: 0,
                material_index: 5,
                render_mode: 2,
            })
        );
        assert_eq!(commands[4], RecordedCommand::DrawIndexed(DrawIndexedArgs::single(6)));
    }

    #[test]
    fn sub_meshes_draw_in_insertion_order() {
        let (registry, id) = setup();
        let mut mesh = Mesh::new();
        for count in [3, 6, 0] {
            let indices = BufferView::new(id, INDICES.0, u64::from(count) * 2, count);
            mesh.add_sub_mesh(SubMesh::new(view(id, POSITIONS, 4), indices, view(id, UVS0, 4)));
        }

        let mut recorder = CommandRecorder::new();
        mesh.draw(&registry, &mut recorder).unwrap();

        let counts: Vec<u32> = recorder.draw_calls().map(|draw| draw.index_count).collect();
        assert_eq!(counts, vec![3, 6, 0]);
    }

    #[test]
    fn optional_streams_bind_at_their_own_slots() {
        let (registry, id) = setup();
        let mut mesh = Mesh::new();
        mesh.add_sub_mesh(
            quad(id)
                .with_normals(view(id, NORMALS, 4))
                .with_tex_coords1(view(id, UVS1, 4)),
        );
        // Second channel without normals leaves a gap at slot 2.
        mesh.add_sub_mesh(quad(id).with_tex_coords1(view(id, UVS1, 4)));

        let mut recorder = CommandRecorder::new();
        mesh.draw(&registry, &mut recorder).unwrap();

        let bindings: Vec<(u32, Vec<u32>)> = recorder
            .commands()
            .iter()
            .filter_map(|command| match command {
                RecordedCommand::SetVertexBuffers { start_slot, views } => {
                    Some((*start_slot, views.iter().map(|v| v.stride).collect()))
                }
                _ => None,
            })
            .collect();

        assert_eq!(
            bindings,
            vec![
                (POSITION_SLOT, vec![12, 8, 12, 8]),
                (POSITION_SLOT, vec![12, 8]),
                (TEX_COORD1_SLOT, vec![8]),
            ]
        );
        assert_eq!(NORMAL_SLOT, TEX_COORD0_SLOT + 1);
    }

    #[test]
    fn unknown_buffer_fails_before_recording() {
        let (registry, id) = setup();
        let mut mesh = Mesh::new();
        mesh.add_sub_mesh(quad(id));
        mesh.add_sub_mesh(SubMesh::new(
            view(BufferId::new(9), POSITIONS, 4),
            view(id, INDICES, 6),
            view(id, UVS0, 4),
        ));

        let mut recorder = CommandRecorder::new();
        let err = mesh.draw(&registry, &mut recorder).unwrap_err();

        assert!(matches!(
            err,
            AssetError::InvalidBufferReference { buffer_count: 1, .. }
        ));
        // Only the first, valid sub-mesh made it into the recorder.
        assert_eq!(recorder.draw_calls().count(), 1);
        assert_eq!(recorder.commands().len(), 5);
    }

    #[test]
    fn thirty_two_bit_indices_bound_as_sixteen_bit_are_detected() {
        let (registry, id) = setup();
        let mut mesh = Mesh::new();
        // 3 indices stored as u32 occupy 12 bytes.
        mesh.add_sub_mesh(SubMesh::new(
            view(id, POSITIONS, 4),
            view(id, INDICES, 3),
            view(id, UVS0, 4),
        ));

        let mut recorder = CommandRecorder::new();
        let err = mesh.draw(&registry, &mut recorder).unwrap_err();
        assert!(matches!(err, AssetError::IndexWidthMismatch { element_count: 3, .. }));
        assert!(recorder.commands().is_empty());
    }

    #[test]
    fn thirty_two_bit_indices_bind_with_their_declared_format() {
        let (registry, id) = setup();
        let mut mesh = Mesh::new();
        mesh.add_sub_mesh(
            SubMesh::new(view(id, POSITIONS, 4), view(id, INDICES, 3), view(id, UVS0, 4))
                .with_index_format(IndexFormat::Uint32),
        );

        let mut recorder = CommandRecorder::new();
        mesh.draw(&registry, &mut recorder).unwrap();

        let format = recorder.commands().iter().find_map(|command| match command {
            RecordedCommand::SetIndexBuffer(index) => Some(index.format),
            _ => None,
        });
        assert_eq!(format, Some(IndexFormat::Uint32));
        assert_eq!(recorder.draw_calls().next().map(|d| d.index_count), Some(3));
    }

    #[test]
    fn misaligned_vertex_stream_is_rejected() {
        let (registry, id) = setup();
        let sub_mesh = SubMesh::new(
            BufferView::new(id, 0, 40, 4),
            view(id, INDICES, 6),
            view(id, UVS0, 4),
        );

        let err = DrawEncoder::new(&registry).resolve(&sub_mesh).unwrap_err();
        assert!(matches!(
            err,
            AssetError::StrideMismatch { stride: 12, byte_length: 40 }
        ));
    }

    #[test]
    fn checked_add_rejects_out_of_range_views() {
        let (registry, id) = setup();
        let mut mesh = Mesh::new();

        let too_long = SubMesh::new(
            view(id, POSITIONS, 4),
            BufferView::new(id, 168, 12, 6),
            view(id, UVS0, 4),
        );
        let err = mesh.add_sub_mesh_checked(too_long, &registry).unwrap_err();
        assert!(matches!(err, AssetError::RangeOutOfBounds { buffer_size: 172, .. }));
        assert!(mesh.sub_meshes().is_empty());

        mesh.add_sub_mesh_checked(quad(id), &registry).unwrap();
        assert_eq!(mesh.sub_meshes().len(), 1);
    }
}
