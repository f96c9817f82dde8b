use meshbind::renderer::headless::{HeadlessBuffer, HeadlessDevice, HeadlessTexture};
use meshbind::renderer::{
    AssetError, BufferId, DescriptorTableType, RegistryConfig, ResourceRegistry, SamplerDesc,
    TextureFormat,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn registry(config: RegistryConfig) -> ResourceRegistry<HeadlessDevice> {
    init_logging();
    ResourceRegistry::new(HeadlessDevice::default(), config).unwrap()
}

fn texture(label: &str) -> HeadlessTexture {
    HeadlessTexture::new(label, TextureFormat::Rgba8Unorm, 1)
}

#[test]
fn buffer_ids_count_up_from_zero() {
    let mut registry = registry(RegistryConfig::default());

    let ids: Vec<BufferId> = (0..8)
        .map(|i| registry.allocate_buffer(HeadlessBuffer::new(format!("buffer{i}"), 64)))
        .collect();

    assert_eq!(ids, (0..8).map(BufferId::new).collect::<Vec<_>>());
    assert_eq!(registry.buffer_count(), 8);
    assert_eq!(registry.buffer(BufferId::new(5)).unwrap().label(), "buffer5");
}

#[test]
fn every_texture_slot_gets_its_own_descriptor() {
    let mut registry = registry(RegistryConfig::default());

    for slot in 0..50 {
        let offset = registry.register_texture(slot, texture(&format!("tex{slot}"))).unwrap();
        assert_eq!(offset.offset, u64::from(slot) * 32);
    }

    let table = registry.texture_table().table();
    assert_eq!(table.len(), 50);
    for slot in 0..50u64 {
        assert_eq!(table.texture_label_at(slot * 32), Some(format!("tex{slot}").as_str()));
    }
}

#[test]
fn out_of_range_texture_slot_leaves_the_table_alone() {
    let mut registry = registry(RegistryConfig::default());
    registry.register_texture(0, texture("albedo")).unwrap();
    registry.register_texture(49, texture("normal")).unwrap();
    let writes_before = registry.texture_table().table().write_count();

    let err = registry.register_texture(50, texture("overflow")).unwrap_err();

    assert!(matches!(
        err,
        AssetError::SlotOutOfRange {
            table: DescriptorTableType::ShaderResource,
            slot: 50,
            capacity: 50,
        }
    ));
    let table = registry.texture_table().table();
    assert_eq!(table.write_count(), writes_before);
    assert_eq!(table.texture_label_at(0), Some("albedo"));
    assert_eq!(table.texture_label_at(49 * 32), Some("normal"));
    assert!(registry.texture(50).is_none());
}

#[test]
fn samplers_land_at_their_own_offsets() {
    let mut registry = registry(RegistryConfig::default().with_sampler_capacity(2));

    let first = registry.register_sampler(0, SamplerDesc::default()).unwrap();
    let second = registry.register_sampler(1, SamplerDesc::nearest()).unwrap();
    assert_eq!((first.offset, second.offset), (0, 16));

    let table = registry.sampler_table().table();
    assert_eq!(table.sampler_at(0), Some(&SamplerDesc::default()));
    assert_eq!(table.sampler_at(16), Some(&SamplerDesc::nearest()));
}

#[test]
fn default_sampler_table_holds_a_single_sampler() {
    let mut registry = registry(RegistryConfig::default());
    registry.register_sampler(0, SamplerDesc::default()).unwrap();

    let err = registry.register_sampler(1, SamplerDesc::nearest()).unwrap_err();

    assert!(matches!(err, AssetError::SlotOutOfRange { slot: 1, capacity: 1, .. }));
    assert_eq!(registry.sampler(0), Some(&SamplerDesc::default()));
}
