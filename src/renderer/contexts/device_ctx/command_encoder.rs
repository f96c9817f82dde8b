use crate::renderer::shader_data::PerDrawData;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    #[default]
    Uint16,
    Uint32,
}

impl IndexFormat {
    /// Size of one index in bytes.
    pub fn size(&self) -> u32 {
        match self {
            Self::Uint16 => 2,
            Self::Uint32 => 4,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    PointList,
    LineList,
    LineStrip,
    TriangleList,
    TriangleStrip,
}

/// A byte range of a buffer bound as one vertex stream.
#[derive(Debug)]
pub struct VertexBufferView<'a, B> {
    pub buffer: &'a B,
    pub offset: u64,
    pub size: u64,
    pub stride: u32,
}

/// A byte range of a buffer bound as the index stream.
#[derive(Debug)]
pub struct IndexBufferView<'a, B> {
    pub buffer: &'a B,
    pub offset: u64,
    pub size: u64,
    pub format: IndexFormat,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DrawIndexedArgs {
    pub index_count: u32,
    pub instance_count: u32,
    pub first_index: u32,
    pub base_vertex: i32,
    pub first_instance: u32,
}

impl DrawIndexedArgs {
    /// One instance of `index_count` indices, every start offset at zero.
    pub fn single(index_count: u32) -> Self {
        Self {
            index_count,
            instance_count: 1,
            first_index: 0,
            base_vertex: 0,
            first_instance: 0,
        }
    }
}

/// Records binding and draw commands for later submission.
///
/// `B` is the buffer handle type of the device the commands target.
pub trait CommandSink<B> {
    /// Binds `views` to consecutive vertex stream slots starting at `start_slot`.
    fn set_vertex_buffers(&mut self, start_slot: u32, views: &[VertexBufferView<'_, B>]);

    fn set_primitive_topology(&mut self, topology: PrimitiveTopology);

    fn set_index_buffer(&mut self, view: &IndexBufferView<'_, B>);

    fn set_draw_constants(&mut self, constants: &PerDrawData);

    fn draw_indexed(&mut self, args: DrawIndexedArgs);
}
