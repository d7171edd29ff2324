use crate::engine::cluster::metadata::LifecycleAttachment;
use crate::test_helpers::factory::Factory;

#[test]
fn builds_generations_with_newest_write_target() {
    let stream = Factory::data_stream()
        .with("name", "logs-app")
        .with("generations", 3)
        .create();

    assert_eq!(stream.generation, 3);
    assert_eq!(stream.segments.len(), 3);
    assert!(stream.segments[2].write_target);
    assert!(!stream.segments[0].write_target);
    assert!(!stream.segments[1].write_target);
    assert_eq!(stream.write_target().unwrap().generation, 3);
}

#[test]
fn explicit_segments_override_generation_count() {
    let segments = vec![
        Factory::segment().with("generation", 7).create(),
        Factory::segment()
            .with("generation", 8)
            .with("write_target", true)
            .create(),
    ];
    let stream = Factory::data_stream()
        .with("generations", 5)
        .with_segments(segments)
        .create();

    assert_eq!(stream.generation, 8);
    assert_eq!(stream.segments.len(), 2);
}

#[test]
fn unmanaged_attachment_is_kept() {
    let stream = Factory::data_stream()
        .with_lifecycle(LifecycleAttachment::Unmanaged)
        .create();
    assert_eq!(stream.lifecycle, LifecycleAttachment::Unmanaged);
}
