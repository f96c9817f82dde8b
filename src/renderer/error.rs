use thiserror::Error;

use crate::renderer::contexts::device_ctx::IndexFormat;
use crate::renderer::contexts::resource_ctx::DescriptorTableType;
use crate::renderer::resources::BufferId;

/// Failures reported by a [`RenderDevice`](crate::renderer::RenderDevice).
///
/// These are unrecoverable: once the device refuses to create a table, view or
/// sampler the registry can no longer be kept consistent with it.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("graphics device was lost")]
    DeviceLost,

    #[error("graphics device is out of memory")]
    OutOfMemory,

    #[error("device returned no descriptor set for the {0:?} table")]
    MissingDescriptorSet(DescriptorTableType),

    #[error("memory allocator is unavailable: {0}")]
    Allocator(String),

    #[error("failed to upload into buffer: {0}")]
    Upload(String),

    #[cfg(feature = "vulkan")]
    #[error("vulkan call failed: {0}")]
    Vulkan(#[from] ash::vk::Result),

    #[cfg(feature = "vulkan")]
    #[error("gpu memory allocation failed: {0}")]
    Allocation(#[from] gpu_allocator::AllocationError),
}

/// Caller-contract violations and propagated device failures.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("slot {slot} is outside the {table:?} table (capacity {capacity})")]
    SlotOutOfRange {
        table: DescriptorTableType,
        slot: u32,
        capacity: u32,
    },

    #[error("buffer {buffer_id} is not registered ({buffer_count} buffers allocated)")]
    InvalidBufferReference {
        buffer_id: BufferId,
        buffer_count: usize,
    },

    #[error(
        "view [{byte_offset}, +{byte_length}) does not fit in buffer {buffer_id} of {buffer_size} bytes"
    )]
    RangeOutOfBounds {
        buffer_id: BufferId,
        byte_offset: u64,
        byte_length: u64,
        buffer_size: u64,
    },

    #[error(
        "index view holds {byte_length} bytes but declares {element_count} indices of {format:?}"
    )]
    IndexWidthMismatch {
        format: IndexFormat,
        element_count: u32,
        byte_length: u64,
    },

    #[error("vertex view of {byte_length} bytes is not a whole number of {stride}-byte elements")]
    StrideMismatch { stride: u32, byte_length: u64 },

    #[error(transparent)]
    Device(#[from] DeviceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_out_of_range_names_the_table() {
        let err = AssetError::SlotOutOfRange {
            table: DescriptorTableType::ShaderResource,
            slot: 50,
            capacity: 50,
        };
        assert_eq!(
            err.to_string(),
            "slot 50 is outside the ShaderResource table (capacity 50)"
        );
    }

    #[test]
    fn device_errors_pass_through() {
        let err = AssetError::from(DeviceError::DeviceLost);
        assert_eq!(err.to_string(), "graphics device was lost");
        assert!(matches!(err, AssetError::Device(DeviceError::DeviceLost)));
    }
}
