use std::sync::Arc;
use ash::vk;
use smallvec::SmallVec;
use crate::renderer::contexts::device_ctx::{
    CommandSink, DrawIndexedArgs, IndexBufferView, PrimitiveTopology, VertexBufferView,
};
use crate::renderer::shader_data::PerDrawData;
use crate::renderer::vk::{util, AllocatedBuffer};

/// Records draw commands straight into a Vulkan command buffer.
///
/// The bound pipeline must declare primitive topology and vertex input
/// binding stride as dynamic state.
pub struct VulkanCommandEncoder {
    command_buffer: vk::CommandBuffer,
    pipeline_layout: vk::PipelineLayout,
    device: Arc<ash::Device>,
}

impl VulkanCommandEncoder {
    /// # Safety
    ///
    /// `command_buffer` must belong to `device` and be in the recording state
    /// for as long as the encoder is used. `pipeline_layout` must carry a
    /// [`PerDrawData`] push constant range at offset zero for all stages.
    pub unsafe fn new(
        command_buffer: vk::CommandBuffer,
        pipeline_layout: vk::PipelineLayout,
        device: Arc<ash::Device>,
    ) -> Self {
        Self {
            command_buffer,
            pipeline_layout,
            device,
        }
    }

    pub fn command_buffer(&self) -> vk::CommandBuffer {
        self.command_buffer
    }
}

impl CommandSink<AllocatedBuffer> for VulkanCommandEncoder {
    fn set_vertex_buffers(&mut self, start_slot: u32, views: &[VertexBufferView<'_, AllocatedBuffer>]) {
        let buffers: SmallVec<[vk::Buffer; 4]> = views.iter().map(|view| view.buffer.buffer).collect();
        let offsets: SmallVec<[vk::DeviceSize; 4]> = views.iter().map(|view| view.offset).collect();
        let sizes: SmallVec<[vk::DeviceSize; 4]> = views.iter().map(|view| view.size).collect();
        let strides: SmallVec<[vk::DeviceSize; 4]> =
            views.iter().map(|view| u64::from(view.stride)).collect();

        unsafe {
            self.device.cmd_bind_vertex_buffers2(
                self.command_buffer,
                start_slot,
                buffers.as_slice(),
                offsets.as_slice(),
                Some(sizes.as_slice()),
                Some(strides.as_slice()),
            );
        }
    }

    fn set_primitive_topology(&mut self, topology: PrimitiveTopology) {
        unsafe {
            self.device
                .cmd_set_primitive_topology(self.command_buffer, util::primitive_topology(topology));
        }
    }

    fn set_index_buffer(&mut self, view: &IndexBufferView<'_, AllocatedBuffer>) {
        unsafe {
            self.device.cmd_bind_index_buffer(
                self.command_buffer,
                view.buffer.buffer,
                view.offset,
                util::index_type(view.format),
            );
        }
    }

    fn set_draw_constants(&mut self, constants: &PerDrawData) {
        unsafe {
            self.device.cmd_push_constants(
                self.command_buffer,
                self.pipeline_layout,
                vk::ShaderStageFlags::ALL,
                0,
                bytemuck::bytes_of(constants),
            );
        }
    }

    fn draw_indexed(&mut self, args: DrawIndexedArgs) {
        unsafe {
            self.device.cmd_draw_indexed(
                self.command_buffer,
                args.index_count,
                args.instance_count,
                args.first_index,
                args.base_vertex,
                args.first_instance,
            );
        }
    }
}
