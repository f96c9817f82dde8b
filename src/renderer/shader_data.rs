use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Stride of the position and normal streams.
pub const VEC3_STRIDE: u32 = size_of::<Vec3>() as u32;
/// Stride of both texture coordinate streams.
pub const VEC2_STRIDE: u32 = size_of::<Vec2>() as u32;

/// Data unique to each draw call passed as a push constant
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Pod, Zeroable)]
pub struct PerDrawData {
    pub object_index: u32,
    pub sub_mesh_index: u32,
    pub material_index: u32,
    pub render_mode: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_strides_match_packed_float_vectors() {
        assert_eq!(VEC3_STRIDE, 12);
        assert_eq!(VEC2_STRIDE, 8);
    }

    #[test]
    fn per_draw_data_is_four_words() {
        let data = PerDrawData {
            object_index: 1,
            sub_mesh_index: 2,
            material_index: 3,
            render_mode: 4,
        };
        let words: &[u32] = bytemuck::cast_slice(bytemuck::bytes_of(&data));
        assert_eq!(words, &[1, 2, 3, 4]);
    }
}
