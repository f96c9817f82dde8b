use ash::vk;
use crate::renderer::contexts::device_ctx::{GpuTexture, TextureFormat};

/// An uploaded image. The handle is borrowed; whoever created the image
/// destroys it after every table referencing it is gone.
#[derive(Debug, Copy, Clone)]
pub struct VulkanTexture {
    pub image: vk::Image,
    pub format: TextureFormat,
    pub mip_levels: u32,
}

impl VulkanTexture {
    pub fn new(image: vk::Image, format: TextureFormat, mip_levels: u32) -> Self {
        Self {
            image,
            format,
            mip_levels,
        }
    }
}

impl GpuTexture for VulkanTexture {
    fn format(&self) -> TextureFormat {
        self.format
    }

    fn mip_levels(&self) -> u32 {
        self.mip_levels
    }
}
