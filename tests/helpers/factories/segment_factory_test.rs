use crate::test_helpers::factory::Factory;

#[test]
fn builds_segment_with_overrides() {
    let segment = Factory::segment()
        .with("stream", "logs-app")
        .with("generation", 4)
        .with("write_target", true)
        .with("docs", 120)
        .with("origination_millis", 5_000)
        .with_merge(5, 1_024)
        .create();

    assert_eq!(segment.id.as_str(), "logs-app-000004");
    assert_eq!(segment.generation, 4);
    assert!(segment.write_target);
    assert_eq!(segment.stats.docs, 120);
    assert_eq!(segment.origination(), 5_000);
    assert_eq!(segment.merge.factor, 5);
    assert!(segment.merged_at_millis.is_none());
}

#[test]
fn origination_defaults_to_creation() {
    let segment = Factory::segment().with("created_at_millis", 42).create();
    assert_eq!(segment.origination(), 42);
}
