use color_eyre::Result;
use meshbind::renderer::headless::{
    CommandRecorder, HeadlessBuffer, HeadlessDevice, HeadlessTexture, RecordedCommand,
};
use meshbind::renderer::resources::{Geometry, Mesh};
use meshbind::renderer::{RegistryConfig, ResourceRegistry, SamplerDesc, TextureFormat, World};

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let mut registry = ResourceRegistry::new(HeadlessDevice::default(), RegistryConfig::default())?;

    // Load phase: buffers, textures and samplers, then the meshes referencing them.
    let quad = Geometry::quad().pack();
    let quad_buffer = registry.allocate_buffer(HeadlessBuffer::new("quad", quad.byte_len()));
    let triangle = Geometry::triangle().pack();
    let triangle_buffer =
        registry.allocate_buffer(HeadlessBuffer::new("triangle", triangle.byte_len()));

    registry.register_texture(
        0,
        HeadlessTexture::new("checkerboard", TextureFormat::Rgba8UnormSrgb, 9),
    )?;
    registry.register_sampler(0, SamplerDesc::default())?;

    let mut world = World::new();

    let mut quad_mesh = Mesh::new();
    quad_mesh.add_sub_mesh_checked(quad.sub_mesh(quad_buffer), &registry)?;
    world.add_mesh(quad_mesh);

    let mut triangle_mesh = Mesh::new();
    triangle_mesh.add_sub_mesh_checked(triangle.sub_mesh(triangle_buffer).with_material(1), &registry)?;
    world.add_mesh(triangle_mesh);

    // Draw phase.
    let mut recorder = CommandRecorder::new();
    world.draw(&registry, &mut recorder)?;

    for command in recorder.commands() {
        match command {
            RecordedCommand::DrawIndexed(args) => log::info!("draw_indexed {} indices", args.index_count),
            command => log::info!("{command:?}"),
        }
    }
    log::info!(
        "Recorded {} draws for {} meshes",
        recorder.draw_calls().count(),
        world.len(),
    );

    Ok(())
}
