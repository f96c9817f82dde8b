use std::collections::BTreeMap;

use crate::renderer::config::RegistryConfig;
use crate::renderer::contexts::device_ctx::{
    DescriptorOffset, GpuBuffer, RenderDevice, SamplerDesc, TextureViewDesc,
};
use crate::renderer::contexts::resource_ctx::storage::DescriptorSlotTable;
use crate::renderer::contexts::resource_ctx::{DescriptorTableType, ShaderVisibility};
use crate::renderer::error::{AssetError, DeviceError};
use crate::renderer::resources::{BufferId, BufferView};

/// A byte range of a registered buffer that has been checked against the
/// buffer's extent.
#[derive(Debug)]
pub struct BufferRange<'a, B> {
    pub buffer: &'a B,
    pub offset: u64,
    pub size: u64,
}

impl<B> Clone for BufferRange<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B> Copy for BufferRange<'_, B> {}

/// Sole owner of the GPU buffers, textures and samplers used by meshes, and of
/// the descriptor tables their views live in.
///
/// Everything outside the registry refers to buffers by [`BufferId`] and to
/// textures and samplers by slot. Registration needs `&mut self` and drawing
/// needs `&self`, so the load and draw phases cannot overlap.
pub struct ResourceRegistry<D: RenderDevice> {
    device: D,
    config: RegistryConfig,

    buffers: Vec<D::Buffer>,
    textures: BTreeMap<u32, D::Texture>,
    samplers: BTreeMap<u32, SamplerDesc>,

    texture_table: DescriptorSlotTable<D::DescriptorTable>,
    sampler_table: DescriptorSlotTable<D::DescriptorTable>,
}

impl<D: RenderDevice> ResourceRegistry<D> {
    pub fn new(device: D, config: RegistryConfig) -> Result<Self, AssetError> {
        let texture_table = Self::create_table(
            &device,
            DescriptorTableType::ShaderResource,
            config.shader_resource_capacity,
        )?;
        let sampler_table = Self::create_table(
            &device,
            DescriptorTableType::Sampler,
            config.sampler_capacity,
        )?;

        log::debug!(
            "Created resource registry with {} shader resource slots and {} sampler slots",
            config.shader_resource_capacity,
            config.sampler_capacity,
        );

        Ok(Self {
            device,
            config,

            buffers: Vec::new(),
            textures: BTreeMap::new(),
            samplers: BTreeMap::new(),

            texture_table,
            sampler_table,
        })
    }

    fn create_table(
        device: &D,
        ty: DescriptorTableType,
        capacity: u32,
    ) -> Result<DescriptorSlotTable<D::DescriptorTable>, DeviceError> {
        let table = device.create_descriptor_table(ty, capacity, ShaderVisibility::Visible)?;
        Ok(DescriptorSlotTable::new(
            table,
            ty,
            capacity,
            device.descriptor_increment(ty),
        ))
    }

    /// Takes ownership of `buffer`. The Nth call returns id N-1; ids are never
    /// reused.
    pub fn allocate_buffer(&mut self, buffer: D::Buffer) -> BufferId {
        let id = BufferId::new(self.buffers.len() as u32);
        log::debug!("Allocated buffer {id} ({} bytes)", buffer.size());
        self.buffers.push(buffer);
        id
    }

    /// Writes a 2-D shader-resource view of `texture` into `slot` of the
    /// shader-resource table.
    ///
    /// Out-of-range slots are rejected before the table is touched. A slot that
    /// already holds a texture is overwritten.
    pub fn register_texture(
        &mut self,
        slot: u32,
        texture: D::Texture,
    ) -> Result<DescriptorOffset, AssetError> {
        let offset = self.texture_table.offset_of(slot)?;
        let desc = TextureViewDesc::texture_2d(&texture);

        self.device
            .create_texture_view(self.texture_table.table_mut(), offset, &texture, &desc)?;

        if self.texture_table.mark_occupied(offset) {
            log::warn!("Texture slot {slot} was already in use, replacing its view");
        }
        log::debug!(
            "Registered {:?} texture ({} mips) at slot {slot}, offset {}",
            desc.format,
            desc.mip_levels,
            offset.offset,
        );

        self.textures.insert(slot, texture);
        Ok(offset)
    }

    /// Writes a sampler into `slot` of the sampler table.
    pub fn register_sampler(
        &mut self,
        slot: u32,
        desc: SamplerDesc,
    ) -> Result<DescriptorOffset, AssetError> {
        let offset = self.sampler_table.offset_of(slot)?;

        self.device
            .create_sampler(self.sampler_table.table_mut(), offset, &desc)?;

        if self.sampler_table.mark_occupied(offset) {
            log::warn!("Sampler slot {slot} was already in use, replacing it");
        }
        log::debug!("Registered sampler at slot {slot}, offset {}", offset.offset);

        self.samplers.insert(slot, desc);
        Ok(offset)
    }

    pub fn buffer(&self, id: BufferId) -> Result<&D::Buffer, AssetError> {
        self.buffers
            .get(id.index() as usize)
            .ok_or(AssetError::InvalidBufferReference {
                buffer_id: id,
                buffer_count: self.buffers.len(),
            })
    }

    /// Looks up the buffer behind `view` and checks that the view's byte range
    /// lies within it.
    pub fn resolve_view(&self, view: &BufferView) -> Result<BufferRange<'_, D::Buffer>, AssetError> {
        let buffer = self.buffer(view.buffer_id)?;
        let buffer_size = buffer.size();

        if !view.fits_within(buffer_size) {
            return Err(AssetError::RangeOutOfBounds {
                buffer_id: view.buffer_id,
                byte_offset: view.byte_offset,
                byte_length: view.byte_length,
                buffer_size,
            });
        }

        Ok(BufferRange {
            buffer,
            offset: view.byte_offset,
            size: view.byte_length,
        })
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn texture(&self, slot: u32) -> Option<&D::Texture> {
        self.textures.get(&slot)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn sampler(&self, slot: u32) -> Option<&SamplerDesc> {
        self.samplers.get(&slot)
    }

    pub fn texture_table(&self) -> &DescriptorSlotTable<D::DescriptorTable> {
        &self.texture_table
    }

    pub fn sampler_table(&self) -> &DescriptorSlotTable<D::DescriptorTable> {
        &self.sampler_table
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}
