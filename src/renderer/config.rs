/// Descriptor table slots reserved for shader-resource views.
pub const DEFAULT_SHADER_RESOURCE_CAPACITY: u32 = 50;
/// Descriptor table slots reserved for samplers.
pub const DEFAULT_SAMPLER_CAPACITY: u32 = 1;

/// Contains sizing options for the resource registry's descriptor tables
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    pub shader_resource_capacity: u32,
    pub sampler_capacity: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            shader_resource_capacity: DEFAULT_SHADER_RESOURCE_CAPACITY,
            sampler_capacity: DEFAULT_SAMPLER_CAPACITY,
        }
    }
}

impl RegistryConfig {
    pub fn with_shader_resource_capacity(mut self, capacity: u32) -> Self {
        self.shader_resource_capacity = capacity;
        self
    }

    pub fn with_sampler_capacity(mut self, capacity: u32) -> Self {
        self.sampler_capacity = capacity;
        self
    }
}
