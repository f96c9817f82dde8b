use crate::renderer::contexts::device_ctx::DescriptorOffset;
use crate::renderer::contexts::resource_ctx::DescriptorTableType;
use crate::renderer::error::AssetError;

/// A fixed-capacity descriptor table plus the bookkeeping needed to hand out
/// validated slot offsets into it.
pub struct DescriptorSlotTable<T> {
    table: T,
    ty: DescriptorTableType,
    increment: u32,
    occupied: Vec<bool>,
}

impl<T> DescriptorSlotTable<T> {
    pub fn new(table: T, ty: DescriptorTableType, capacity: u32, increment: u32) -> Self {
        Self {
            table,
            ty,
            increment,
            occupied: vec![false; capacity as usize],
        }
    }

    /// Offset of `slot`, or `SlotOutOfRange` when the slot lies past the end
    /// of the table.
    pub fn offset_of(&self, slot: u32) -> Result<DescriptorOffset, AssetError> {
        if slot >= self.capacity() {
            return Err(AssetError::SlotOutOfRange {
                table: self.ty,
                slot,
                capacity: self.capacity(),
            });
        }

        Ok(DescriptorOffset {
            slot,
            offset: u64::from(slot) * u64::from(self.increment),
        })
    }

    /// Returns whether the slot was already in use.
    pub fn mark_occupied(&mut self, offset: DescriptorOffset) -> bool {
        std::mem::replace(&mut self.occupied[offset.slot as usize], true)
    }

    pub fn is_occupied(&self, slot: u32) -> bool {
        self.occupied.get(slot as usize).copied().unwrap_or(false)
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.iter().filter(|used| **used).count()
    }

    pub fn capacity(&self) -> u32 {
        self.occupied.len() as u32
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut T {
        &mut self.table
    }
}
