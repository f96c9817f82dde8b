use crate::renderer::contexts::resource_ctx::{DescriptorTableType, ShaderVisibility};
use crate::renderer::error::DeviceError;

/// A buffer resource the registry can take ownership of.
pub trait GpuBuffer {
    /// Allocated extent in bytes.
    fn size(&self) -> u64;
}

/// A texture resource the registry can create shader-resource views for.
pub trait GpuTexture {
    fn format(&self) -> TextureFormat;
    fn mip_levels(&self) -> u32;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    R8Unorm,
    Rg8Unorm,
    Rgba8Unorm,
    Rgba8UnormSrgb,
    Bgra8Unorm,
    Bgra8UnormSrgb,
    Rgba16Float,
    Rgba32Float,
    Bc1RgbaUnorm,
    Bc3RgbaUnorm,
    Bc5RgUnorm,
    Bc7RgbaUnorm,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureViewDimension {
    D2,
}

/// Describes how shader stages read a texture.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextureViewDesc {
    pub format: TextureFormat,
    pub dimension: TextureViewDimension,
    pub most_detailed_mip: u32,
    pub mip_levels: u32,
    pub min_lod_clamp: f32,
}

impl TextureViewDesc {
    /// A 2-D view over every mip level of `texture`, in the texture's own format.
    pub fn texture_2d(texture: &impl GpuTexture) -> Self {
        Self {
            format: texture.format(),
            dimension: TextureViewDimension::D2,
            most_detailed_mip: 0,
            mip_levels: texture.mip_levels(),
            min_lod_clamp: 0.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FilterMode {
    Nearest,
    Linear,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AddressMode {
    Repeat,
    MirrorRepeat,
    ClampToEdge,
    ClampToBorder,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SamplerDesc {
    pub mag_filter: FilterMode,
    pub min_filter: FilterMode,
    pub mipmap_filter: FilterMode,
    pub address_u: AddressMode,
    pub address_v: AddressMode,
    pub address_w: AddressMode,
    pub mip_lod_bias: f32,
    /// 1 disables anisotropic filtering.
    pub max_anisotropy: u32,
    pub min_lod: f32,
    pub max_lod: f32,
}

impl Default for SamplerDesc {
    fn default() -> Self {
        Self {
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            mipmap_filter: FilterMode::Linear,
            address_u: AddressMode::Repeat,
            address_v: AddressMode::Repeat,
            address_w: AddressMode::Repeat,
            mip_lod_bias: 0.0,
            max_anisotropy: 1,
            min_lod: 0.0,
            max_lod: f32::MAX,
        }
    }
}

impl SamplerDesc {
    pub fn nearest() -> Self {
        Self {
            mag_filter: FilterMode::Nearest,
            min_filter: FilterMode::Nearest,
            mipmap_filter: FilterMode::Nearest,
            ..Default::default()
        }
    }

    pub fn with_address_mode(mut self, mode: AddressMode) -> Self {
        self.address_u = mode;
        self.address_v = mode;
        self.address_w = mode;
        self
    }

    pub fn with_anisotropy(mut self, max_anisotropy: u32) -> Self {
        self.max_anisotropy = max_anisotropy.max(1);
        self
    }
}

/// Location of a descriptor inside a table: the caller's slot and the
/// device-specific offset derived from it (`slot * increment`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DescriptorOffset {
    pub slot: u32,
    pub offset: u64,
}

/// Device-side allocator for descriptor tables and the views written into them.
///
/// Every failure returned here is treated as fatal by the registry.
pub trait RenderDevice {
    type Buffer: GpuBuffer;
    type Texture: GpuTexture;
    type DescriptorTable;

    /// Distance between two consecutive descriptors of `table`.
    fn descriptor_increment(&self, table: DescriptorTableType) -> u32;

    fn create_descriptor_table(
        &self,
        table: DescriptorTableType,
        capacity: u32,
        visibility: ShaderVisibility,
    ) -> Result<Self::DescriptorTable, DeviceError>;

    fn create_texture_view(
        &self,
        table: &mut Self::DescriptorTable,
        offset: DescriptorOffset,
        texture: &Self::Texture,
        desc: &TextureViewDesc,
    ) -> Result<(), DeviceError>;

    fn create_sampler(
        &self,
        table: &mut Self::DescriptorTable,
        offset: DescriptorOffset,
        desc: &SamplerDesc,
    ) -> Result<(), DeviceError>;
}
