pub mod draw_encoder;

pub use draw_encoder::{DrawEncoder, ResolvedSubMesh};

// Responsibilities:
// - Translate meshes into bound buffer ranges and indexed draws each frame
// - Reject sub-meshes whose views do not resolve before anything is recorded
