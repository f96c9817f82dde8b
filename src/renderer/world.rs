use crate::renderer::contexts::device_ctx::{CommandSink, RenderDevice};
use crate::renderer::contexts::resource_ctx::ResourceRegistry;
use crate::renderer::error::AssetError;
use crate::renderer::resources::Mesh;

/// Flat, ordered collection of meshes.
#[derive(Debug, Default)]
pub struct World {
    meshes: Vec<Mesh>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh(&mut self, mesh: Mesh) {
        self.meshes.push(mesh);
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Draws every mesh in insertion order, stopping at the first failure.
    pub fn draw<D, S>(&self, registry: &ResourceRegistry<D>, sink: &mut S) -> Result<(), AssetError>
    where
        D: RenderDevice,
        S: CommandSink<D::Buffer>,
    {
        for mesh in &self.meshes {
            mesh.draw(registry, sink)?;
        }
        Ok(())
    }
}
