pub mod config;
pub mod contexts;
pub mod error;
pub mod headless;
pub mod resources;
pub mod shader_data;
pub mod world;

#[cfg(feature = "vulkan")]
pub mod vk;

pub use config::RegistryConfig;
pub use contexts::device_ctx::{
    CommandSink, DrawIndexedArgs, GpuBuffer, GpuTexture, IndexFormat, PrimitiveTopology,
    RenderDevice, SamplerDesc, TextureFormat, TextureViewDesc,
};
pub use contexts::frame_ctx::DrawEncoder;
pub use contexts::resource_ctx::{DescriptorTableType, ResourceRegistry, ShaderVisibility};
pub use error::{AssetError, DeviceError};
pub use resources::{BufferId, BufferView, Geometry, Mesh, SubMesh};
pub use shader_data::PerDrawData;
pub use world::World;
