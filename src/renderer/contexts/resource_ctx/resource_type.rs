#[cfg(feature = "vulkan")]
use ash::vk;

/// The two descriptor tables owned by the registry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DescriptorTableType {
    /// Shader-resource views (textures).
    ShaderResource,
    Sampler,
}

impl DescriptorTableType {
    #[cfg(feature = "vulkan")]
    pub fn descriptor_type(&self) -> vk::DescriptorType {
        match self {
            Self::ShaderResource => vk::DescriptorType::SAMPLED_IMAGE,
            Self::Sampler => vk::DescriptorType::SAMPLER,
        }
    }

    #[cfg(feature = "vulkan")]
    pub fn descriptor_binding_flags(&self) -> vk::DescriptorBindingFlags {
        // Slots fill in over the load phase, so both tables are sparse.
        vk::DescriptorBindingFlags::PARTIALLY_BOUND | vk::DescriptorBindingFlags::UPDATE_AFTER_BIND
    }
}

/// Whether shader stages may read a descriptor table directly.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderVisibility {
    Hidden,
    Visible,
}
