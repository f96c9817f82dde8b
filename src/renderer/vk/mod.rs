// Vulkan implementation of the device and command sink traits.

pub mod buffer;
pub mod command_encoder;
pub mod descriptor_set_layout_builder;
pub mod device;
pub mod texture;
pub mod util;

pub use buffer::AllocatedBuffer;
pub use command_encoder::VulkanCommandEncoder;
pub use device::{VulkanDescriptorTable, VulkanDevice};
pub use texture::VulkanTexture;
