pub mod command_encoder;
pub mod device;

pub use command_encoder::{
    CommandSink, DrawIndexedArgs, IndexBufferView, IndexFormat, PrimitiveTopology,
    VertexBufferView,
};
pub use device::{
    AddressMode, DescriptorOffset, FilterMode, GpuBuffer, GpuTexture, RenderDevice, SamplerDesc,
    TextureFormat, TextureViewDesc, TextureViewDimension,
};
