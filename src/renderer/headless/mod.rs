//! CPU-only backend: descriptor tables live in memory and commands are kept as
//! values. Needs no GPU, so it backs the demo binary and the tests.

mod device;
mod recorder;

pub use device::{
    HeadlessBuffer, HeadlessDescriptor, HeadlessDescriptorTable, HeadlessDevice, HeadlessTexture,
};
pub use recorder::{CommandRecorder, RecordedCommand, RecordedIndexBuffer, RecordedVertexBuffer};
