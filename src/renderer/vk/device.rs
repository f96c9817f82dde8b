use std::collections::{btree_map, BTreeMap};
use std::sync::Arc;
use ash::vk;
use crate::renderer::contexts::device_ctx::{
    DescriptorOffset, RenderDevice, SamplerDesc, TextureViewDesc,
};
use crate::renderer::contexts::resource_ctx::{DescriptorTableType, ShaderVisibility};
use crate::renderer::error::DeviceError;
use crate::renderer::shader_data::PerDrawData;
use crate::renderer::vk::descriptor_set_layout_builder::DescriptorSetLayoutBuilder;
use crate::renderer::vk::{util, AllocatedBuffer, VulkanTexture};

/// Each table is a single arrayed binding in its own set.
const TABLE_BINDING: u32 = 0;

/// The live handle behind each written slot.
#[derive(Debug)]
struct SlotHandles<H> {
    handles: BTreeMap<u32, H>,
}

impl<H> SlotHandles<H> {
    fn new() -> Self {
        Self {
            handles: BTreeMap::new(),
        }
    }

    /// Stores `handle` for `slot` and hands back the one it replaces.
    fn replace(&mut self, slot: u32, handle: H) -> Option<H> {
        self.handles.insert(slot, handle)
    }

    fn take_all(&mut self) -> btree_map::IntoValues<u32, H> {
        std::mem::take(&mut self.handles).into_values()
    }
}

/// A descriptor set with one arrayed binding, plus the views and samplers
/// written into it.
///
/// Rewriting a slot destroys the view or sampler it held, so no draw reading
/// that slot may still be in flight.
pub struct VulkanDescriptorTable {
    pub layout: vk::DescriptorSetLayout,
    pub set: vk::DescriptorSet,

    ty: DescriptorTableType,
    pool: vk::DescriptorPool,
    image_views: SlotHandles<vk::ImageView>,
    samplers: SlotHandles<vk::Sampler>,
    device: Arc<ash::Device>,
}

impl VulkanDescriptorTable {
    fn write_image(&self, offset: DescriptorOffset, image_info: &[vk::DescriptorImageInfo]) {
        let writes = [vk::WriteDescriptorSet::default()
            .dst_set(self.set)
            .dst_binding(TABLE_BINDING)
            .dst_array_element(offset.offset as u32)
            .descriptor_type(self.ty.descriptor_type())
            .image_info(image_info)];

        unsafe {
            self.device.update_descriptor_sets(&writes, &[]);
        }
    }
}

impl Drop for VulkanDescriptorTable {
    fn drop(&mut self) {
        unsafe {
            for image_view in self.image_views.take_all() {
                self.device.destroy_image_view(image_view, None);
            }
            for sampler in self.samplers.take_all() {
                self.device.destroy_sampler(sampler, None);
            }
            // Destroying the pool frees the set.
            self.device.destroy_descriptor_pool(self.pool, None);
            self.device.destroy_descriptor_set_layout(self.layout, None);
        }
    }
}

pub struct VulkanDevice {
    device: Arc<ash::Device>,
}

impl VulkanDevice {
    pub fn new(device: Arc<ash::Device>) -> Self {
        Self { device }
    }

    /// Pipeline layout binding `tables` as sets 0.. in order, with
    /// [`PerDrawData`] as the push constant block.
    pub fn create_pipeline_layout(
        &self,
        tables: &[&VulkanDescriptorTable],
    ) -> Result<vk::PipelineLayout, DeviceError> {
        let push_constant_size = size_of::<PerDrawData>() as u32;
        let push_constant_range = vk::PushConstantRange::default()
            .stage_flags(vk::ShaderStageFlags::ALL)
            .offset(0)
            .size(push_constant_size);
        let push_constant_ranges = [push_constant_range];

        let set_layouts: Vec<vk::DescriptorSetLayout> =
            tables.iter().map(|table| table.layout).collect();
        let pipeline_layout_create_info = vk::PipelineLayoutCreateInfo::default()
            .set_layouts(&set_layouts)
            .push_constant_ranges(&push_constant_ranges);

        let pipeline_layout = unsafe {
            self.device.create_pipeline_layout(&pipeline_layout_create_info, None)?
        };

        Ok(pipeline_layout)
    }
}

impl RenderDevice for VulkanDevice {
    type Buffer = AllocatedBuffer;
    type Texture = VulkanTexture;
    type DescriptorTable = VulkanDescriptorTable;

    // Descriptors are addressed by array element.
    fn descriptor_increment(&self, _table: DescriptorTableType) -> u32 {
        1
    }

    fn create_descriptor_table(
        &self,
        table: DescriptorTableType,
        capacity: u32,
        visibility: ShaderVisibility,
    ) -> Result<VulkanDescriptorTable, DeviceError> {
        let layout = DescriptorSetLayoutBuilder::new()
            .add_binding(
                TABLE_BINDING,
                table.descriptor_type(),
                capacity,
                util::shader_stages(visibility),
                table.descriptor_binding_flags(),
            )
            .build(
                vk::DescriptorSetLayoutCreateFlags::UPDATE_AFTER_BIND_POOL,
                &self.device,
            )?;

        // Null handles are valid to destroy, so Drop cleans up partial tables.
        let mut descriptor_table = VulkanDescriptorTable {
            layout,
            set: vk::DescriptorSet::null(),

            ty: table,
            pool: vk::DescriptorPool::null(),
            image_views: SlotHandles::new(),
            samplers: SlotHandles::new(),
            device: Arc::clone(&self.device),
        };

        let pool_sizes = [vk::DescriptorPoolSize {
            ty: table.descriptor_type(),
            descriptor_count: capacity,
        }];
        let pool_info = vk::DescriptorPoolCreateInfo::default()
            .flags(vk::DescriptorPoolCreateFlags::UPDATE_AFTER_BIND)
            .max_sets(1)
            .pool_sizes(&pool_sizes);
        descriptor_table.pool = unsafe { self.device.create_descriptor_pool(&pool_info, None)? };

        let set_layouts = [layout];
        let alloc_info = vk::DescriptorSetAllocateInfo::default()
            .descriptor_pool(descriptor_table.pool)
            .set_layouts(&set_layouts);
        descriptor_table.set = unsafe { self.device.allocate_descriptor_sets(&alloc_info)? }
            .into_iter()
            .next()
            .ok_or(DeviceError::MissingDescriptorSet(table))?;

        log::debug!("Created {table:?} descriptor table with {capacity} descriptors");
        Ok(descriptor_table)
    }

    fn create_texture_view(
        &self,
        table: &mut VulkanDescriptorTable,
        offset: DescriptorOffset,
        texture: &VulkanTexture,
        desc: &TextureViewDesc,
    ) -> Result<(), DeviceError> {
        // Core Vulkan has no per-view LOD clamp; zero is the implicit value.
        let view_info = vk::ImageViewCreateInfo::default()
            .image(texture.image)
            .view_type(vk::ImageViewType::TYPE_2D)
            .format(util::texture_format(desc.format))
            .subresource_range(vk::ImageSubresourceRange {
                aspect_mask: vk::ImageAspectFlags::COLOR,
                base_mip_level: desc.most_detailed_mip,
                level_count: desc.mip_levels,
                base_array_layer: 0,
                layer_count: 1,
            });
        let image_view = unsafe { self.device.create_image_view(&view_info, None)? };

        let image_info = [vk::DescriptorImageInfo::default()
            .image_view(image_view)
            .image_layout(vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL)];
        table.write_image(offset, &image_info);

        if let Some(replaced) = table.image_views.replace(offset.slot, image_view) {
            unsafe { self.device.destroy_image_view(replaced, None) };
        }
        Ok(())
    }

    fn create_sampler(
        &self,
        table: &mut VulkanDescriptorTable,
        offset: DescriptorOffset,
        desc: &SamplerDesc,
    ) -> Result<(), DeviceError> {
        let sampler_info = util::sampler_create_info(desc);
        let sampler = unsafe { self.device.create_sampler(&sampler_info, None)? };

        let image_info = [vk::DescriptorImageInfo::default().sampler(sampler)];
        table.write_image(offset, &image_info);

        if let Some(replaced) = table.samplers.replace(offset.slot, sampler) {
            unsafe { self.device.destroy_sampler(replaced, None) };
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash::vk::Handle;

    #[test]
    fn rewriting_a_slot_hands_back_the_old_handle() {
        let mut samplers = SlotHandles::new();
        assert_eq!(samplers.replace(0, vk::Sampler::from_raw(1)), None);
        assert_eq!(samplers.replace(3, vk::Sampler::from_raw(2)), None);
        assert_eq!(
            samplers.replace(0, vk::Sampler::from_raw(7)),
            Some(vk::Sampler::from_raw(1))
        );

        let live: Vec<vk::Sampler> = samplers.take_all().collect();
        assert_eq!(live, vec![vk::Sampler::from_raw(7), vk::Sampler::from_raw(2)]);
        assert_eq!(samplers.take_all().count(), 0);
    }
}
