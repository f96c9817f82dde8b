use std::sync::{Arc, Mutex};
use ash::vk;
use gpu_allocator::{
    vulkan::{Allocation, AllocationCreateDesc, AllocationScheme, Allocator},
    MemoryLocation,
};
use crate::renderer::contexts::device_ctx::GpuBuffer;
use crate::renderer::error::DeviceError;

pub struct AllocatedBuffer {
    pub buffer: vk::Buffer,
    pub size: u64,

    allocation: Option<Allocation>,
    memory_allocator: Arc<Mutex<Allocator>>,
    device: Arc<ash::Device>,
}

impl AllocatedBuffer {
    pub fn new(
        buffer_size: u64,
        buffer_usage: vk::BufferUsageFlags,
        alloc_name: &str,
        alloc_loc: MemoryLocation,
        memory_allocator: Arc<Mutex<Allocator>>,
        device: Arc<ash::Device>,
    ) -> Result<Self, DeviceError> {
        let buffer = {
            let buffer_info = vk::BufferCreateInfo {
                size: buffer_size,
                usage: buffer_usage,
                sharing_mode: vk::SharingMode::EXCLUSIVE,
                ..Default::default()
            };
            unsafe { device.create_buffer(&buffer_info, None)? }
        };

        // From here on every early return goes through Drop.
        let mut allocated = Self {
            buffer,
            size: buffer_size,

            allocation: None,
            memory_allocator,
            device,
        };

        let reqs = unsafe { allocated.device.get_buffer_memory_requirements(buffer) };
        let allocation = allocated
            .memory_allocator
            .lock()
            .map_err(|e| DeviceError::Allocator(e.to_string()))?
            .allocate(&AllocationCreateDesc {
                name: alloc_name,
                requirements: reqs,
                location: alloc_loc,
                linear: true,
                allocation_scheme: AllocationScheme::GpuAllocatorManaged,
            })?;

        // Stored before binding so a failed bind still frees it in Drop.
        let memory = unsafe { allocation.memory() };
        let memory_offset = allocation.offset();
        allocated.allocation = Some(allocation);

        unsafe {
            allocated.device.bind_buffer_memory(buffer, memory, memory_offset)?;
        }

        Ok(allocated)
    }

    /// A host-visible buffer usable as both vertex and index source, for
    /// packed geometry.
    pub fn new_geometry(
        buffer_size: u64,
        alloc_name: &str,
        memory_allocator: Arc<Mutex<Allocator>>,
        device: Arc<ash::Device>,
    ) -> Result<Self, DeviceError> {
        Self::new(
            buffer_size,
            vk::BufferUsageFlags::VERTEX_BUFFER
                | vk::BufferUsageFlags::INDEX_BUFFER
                | vk::BufferUsageFlags::TRANSFER_DST,
            alloc_name,
            MemoryLocation::CpuToGpu,
            memory_allocator,
            device,
        )
    }

    pub fn write<T>(
        &mut self,
        data: &[T],
        start_offset: usize,
    ) -> Result<presser::CopyRecord, DeviceError>
    where
        T: Copy,
    {
        let allocation = self
            .allocation
            .as_mut()
            .filter(|allocation| allocation.mapped_ptr().is_some())
            .ok_or_else(|| DeviceError::Upload("buffer memory is not host visible".to_owned()))?;

        presser::copy_from_slice_to_offset(data, allocation, start_offset)
            .map_err(|e| DeviceError::Upload(format!("{e:?}")))
    }
}

impl GpuBuffer for AllocatedBuffer {
    fn size(&self) -> u64 {
        self.size
    }
}

impl Drop for AllocatedBuffer {
    fn drop(&mut self) {
        if let Some(allocation) = self.allocation.take() {
            match self.memory_allocator.lock() {
                Ok(mut allocator) => {
                    if let Err(e) = allocator.free(allocation) {
                        log::error!("Failed to free buffer allocation: {e}");
                    }
                }
                Err(e) => log::error!("Memory allocator lock poisoned while freeing buffer: {e}"),
            }
        }

        unsafe {
            self.device.destroy_buffer(self.buffer, None);
        }
    }
}
