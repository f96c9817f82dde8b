use crate::renderer::contexts::device_ctx::{
    CommandSink, DrawIndexedArgs, IndexBufferView, IndexFormat, PrimitiveTopology,
    VertexBufferView,
};
use crate::renderer::headless::HeadlessBuffer;
use crate::renderer::shader_data::PerDrawData;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedVertexBuffer {
    pub buffer: String,
    pub offset: u64,
    pub size: u64,
    pub stride: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedIndexBuffer {
    pub buffer: String,
    pub offset: u64,
    pub size: u64,
    pub format: IndexFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCommand {
    SetVertexBuffers {
        start_slot: u32,
        views: Vec<RecordedVertexBuffer>,
    },
    SetPrimitiveTopology(PrimitiveTopology),
    SetIndexBuffer(RecordedIndexBuffer),
    SetDrawConstants(PerDrawData),
    DrawIndexed(DrawIndexedArgs),
}

/// A command sink that keeps every command as a value, buffers identified by
/// label.
#[derive(Debug, Default)]
pub struct CommandRecorder {
    commands: Vec<RecordedCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[RecordedCommand] {
        &self.commands
    }

    pub fn draw_calls(&self) -> impl Iterator<Item = DrawIndexedArgs> + '_ {
        self.commands.iter().filter_map(|command| match command {
            RecordedCommand::DrawIndexed(args) => Some(*args),
            _ => None,
        })
    }

    fn record(&mut self, command: RecordedCommand) {
        log::trace!("Recorded {command:?}");
        self.commands.push(command);
    }
}

impl CommandSink<HeadlessBuffer> for CommandRecorder {
    fn set_vertex_buffers(&mut self, start_slot: u32, views: &[VertexBufferView<'_, HeadlessBuffer>]) {
        let views = views
            .iter()
            .map(|view| RecordedVertexBuffer {
                buffer: view.buffer.label().to_owned(),
                offset: view.offset,
                size: view.size,
                stride: view.stride,
            })
            .collect();
        self.record(RecordedCommand::SetVertexBuffers { start_slot, views });
    }

    fn set_primitive_topology(&mut self, topology: PrimitiveTopology) {
        self.record(RecordedCommand::SetPrimitiveTopology(topology));
    }

    fn set_index_buffer(&mut self, view: &IndexBufferView<'_, HeadlessBuffer>) {
        self.record(RecordedCommand::SetIndexBuffer(RecordedIndexBuffer {
            buffer: view.buffer.label().to_owned(),
            offset: view.offset,
            size: view.size,
            format: view.format,
        }));
    }

    fn set_draw_constants(&mut self, constants: &PerDrawData) {
        self.record(RecordedCommand::SetDrawConstants(*constants));
    }

    fn draw_indexed(&mut self, args: DrawIndexedArgs) {
        self.record(RecordedCommand::DrawIndexed(args));
    }
}
