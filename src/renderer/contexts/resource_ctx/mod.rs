pub mod resource_registry;
pub mod resource_type;
pub mod storage;

pub use resource_registry::{BufferRange, ResourceRegistry};
pub use resource_type::{DescriptorTableType, ShaderVisibility};
pub use storage::DescriptorSlotTable;

// Responsibilities:
// - Own the buffers, textures and samplers registered during loading
// - Hand out validated slots in the shader-resource and sampler tables
// - Resolve buffer views into checked byte ranges for the draw path
