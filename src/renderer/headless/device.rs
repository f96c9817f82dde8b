use std::cell::Cell;
use std::collections::BTreeMap;

use crate::renderer::contexts::device_ctx::{
    DescriptorOffset, GpuBuffer, GpuTexture, RenderDevice, SamplerDesc, TextureFormat,
    TextureViewDesc,
};
use crate::renderer::contexts::resource_ctx::{DescriptorTableType, ShaderVisibility};
use crate::renderer::error::DeviceError;

const DEFAULT_SHADER_RESOURCE_INCREMENT: u32 = 32;
const DEFAULT_SAMPLER_INCREMENT: u32 = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessBuffer {
    label: String,
    size: u64,
}

impl HeadlessBuffer {
    pub fn new(label: impl Into<String>, size: u64) -> Self {
        Self {
            label: label.into(),
            size,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl GpuBuffer for HeadlessBuffer {
    fn size(&self) -> u64 {
        self.size
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessTexture {
    label: String,
    format: TextureFormat,
    mip_levels: u32,
}

impl HeadlessTexture {
    pub fn new(label: impl Into<String>, format: TextureFormat, mip_levels: u32) -> Self {
        Self {
            label: label.into(),
            format,
            mip_levels,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl GpuTexture for HeadlessTexture {
    fn format(&self) -> TextureFormat {
        self.format
    }

    fn mip_levels(&self) -> u32 {
        self.mip_levels
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HeadlessDescriptor {
    TextureView {
        texture: String,
        desc: TextureViewDesc,
    },
    Sampler(SamplerDesc),
}

/// An in-memory descriptor table keyed by descriptor offset.
#[derive(Debug)]
pub struct HeadlessDescriptorTable {
    ty: DescriptorTableType,
    visibility: ShaderVisibility,
    capacity: u32,
    entries: BTreeMap<u64, HeadlessDescriptor>,
    writes: usize,
}

impl HeadlessDescriptorTable {
    pub fn table_type(&self) -> DescriptorTableType {
        self.ty
    }

    pub fn visibility(&self) -> ShaderVisibility {
        self.visibility
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn descriptor_at(&self, offset: u64) -> Option<&HeadlessDescriptor> {
        self.entries.get(&offset)
    }

    pub fn texture_label_at(&self, offset: u64) -> Option<&str> {
        match self.entries.get(&offset) {
            Some(HeadlessDescriptor::TextureView { texture, .. }) => Some(texture.as_str()),
            _ => None,
        }
    }

    pub fn sampler_at(&self, offset: u64) -> Option<&SamplerDesc> {
        match self.entries.get(&offset) {
            Some(HeadlessDescriptor::Sampler(desc)) => Some(desc),
            _ => None,
        }
    }

    /// Number of distinct offsets holding a descriptor.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of descriptor writes, including overwrites.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    fn write(&mut self, offset: DescriptorOffset, descriptor: HeadlessDescriptor) {
        self.writes += 1;
        self.entries.insert(offset.offset, descriptor);
    }
}

/// A device that keeps descriptor tables in memory instead of on a GPU.
///
/// Used for dry runs and tests. It can be switched into a lost state, after
/// which every creation call fails with [`DeviceError::DeviceLost`].
#[derive(Debug)]
pub struct HeadlessDevice {
    shader_resource_increment: u32,
    sampler_increment: u32,
    lost: Cell<bool>,
}

impl HeadlessDevice {
    pub fn new(shader_resource_increment: u32, sampler_increment: u32) -> Self {
        Self {
            shader_resource_increment,
            sampler_increment,
            lost: Cell::new(false),
        }
    }

    pub fn set_lost(&self, lost: bool) {
        self.lost.set(lost);
    }

    fn check_alive(&self) -> Result<(), DeviceError> {
        if self.lost.get() {
            return Err(DeviceError::DeviceLost);
        }
        Ok(())
    }
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self::new(DEFAULT_SHADER_RESOURCE_INCREMENT, DEFAULT_SAMPLER_INCREMENT)
    }
}

impl RenderDevice for HeadlessDevice {
    type Buffer = HeadlessBuffer;
    type Texture = HeadlessTexture;
    type DescriptorTable = HeadlessDescriptorTable;

    fn descriptor_increment(&self, table: DescriptorTableType) -> u32 {
        match table {
            DescriptorTableType::ShaderResource => self.shader_resource_increment,
            DescriptorTableType::Sampler => self.sampler_increment,
        }
    }

    fn create_descriptor_table(
        &self,
        table: DescriptorTableType,
        capacity: u32,
        visibility: ShaderVisibility,
    ) -> Result<Self::DescriptorTable, DeviceError> {
        self.check_alive()?;
        log::trace!("HeadlessDevice: creating {table:?} table with {capacity} slots");

        Ok(HeadlessDescriptorTable {
            ty: table,
            visibility,
            capacity,
            entries: BTreeMap::new(),
            writes: 0,
        })
    }

    fn create_texture_view(
        &self,
        table: &mut Self::DescriptorTable,
        offset: DescriptorOffset,
        texture: &Self::Texture,
        desc: &TextureViewDesc,
    ) -> Result<(), DeviceError> {
        self.check_alive()?;
        log::trace!(
            "HeadlessDevice: view of {:?} at offset {}",
            texture.label,
            offset.offset
        );

        table.write(
            offset,
            HeadlessDescriptor::TextureView {
                texture: texture.label.clone(),
                desc: *desc,
            },
        );
        Ok(())
    }

    fn create_sampler(
        &self,
        table: &mut Self::DescriptorTable,
        offset: DescriptorOffset,
        desc: &SamplerDesc,
    ) -> Result<(), DeviceError> {
        self.check_alive()?;
        log::trace!("HeadlessDevice: sampler at offset {}", offset.offset);

        table.write(offset, HeadlessDescriptor::Sampler(*desc));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increments_are_per_table_type() {
        let device = HeadlessDevice::new(64, 8);
        assert_eq!(device.descriptor_increment(DescriptorTableType::ShaderResource), 64);
        assert_eq!(device.descriptor_increment(DescriptorTableType::Sampler), 8);
    }

    #[test]
    fn overwrites_are_counted_but_not_duplicated() {
        let device = HeadlessDevice::default();
        let mut table = device
            .create_descriptor_table(DescriptorTableType::Sampler, 1, ShaderVisibility::Visible)
            .unwrap();
        let offset = DescriptorOffset { slot: 0, offset: 0 };

        device.create_sampler(&mut table, offset, &SamplerDesc::default()).unwrap();
        device.create_sampler(&mut table, offset, &SamplerDesc::nearest()).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.write_count(), 2);
        assert_eq!(table.sampler_at(0), Some(&SamplerDesc::nearest()));
        assert_eq!(table.visibility(), ShaderVisibility::Visible);
        assert_eq!(table.table_type(), DescriptorTableType::Sampler);
        assert_eq!(table.capacity(), 1);
    }

    #[test]
    fn lost_device_refuses_every_creation() {
        let device = HeadlessDevice::default();
        device.set_lost(true);
        let result = device.create_descriptor_table(
            DescriptorTableType::ShaderResource,
            4,
            ShaderVisibility::Visible,
        );
        assert!(matches!(result, Err(DeviceError::DeviceLost)));
    }
}
