pub use super::factories::{
    DataStreamFactory, LifecycleConfigFactory, LifecycleDefaultsFactory, SegmentFactory,
};

pub struct Factory;

impl Factory {
    pub fn segment() -> SegmentFactory {
        SegmentFactory::new()
    }

    pub fn data_stream() -> DataStreamFactory {
        DataStreamFactory::new()
    }

    pub fn lifecycle_config() -> LifecycleConfigFactory {
        LifecycleConfigFactory::new()
    }

    pub fn defaults() -> LifecycleDefaultsFactory {
        LifecycleDefaultsFactory::new()
    }
}
