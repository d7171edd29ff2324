pub mod data_stream_factory;
pub mod lifecycle_config_factory;
pub mod lifecycle_defaults_factory;
pub mod segment_factory;

pub use data_stream_factory::DataStreamFactory;
pub use lifecycle_config_factory::LifecycleConfigFactory;
pub use lifecycle_defaults_factory::LifecycleDefaultsFactory;
pub use segment_factory::SegmentFactory;

#[cfg(test)]
mod data_stream_factory_test;
#[cfg(test)]
mod segment_factory_test;
