use crate::engine::cluster::metadata::{
    DataStream, LifecycleAttachment, LifecycleConfig, Segment,
};
use super::segment_factory::SegmentFactory;
use serde_json::{Value, json};
use std::collections::HashMap;

pub struct DataStreamFactory {
    params: HashMap<String, Value>,
    lifecycle: LifecycleAttachment,
    segments: Option<Vec<Segment>>,
}

impl DataStreamFactory {
    pub fn new() -> Self {
        let mut params = HashMap::new();
        params.insert("name".into(), json!("metrics-foo"));
        params.insert("generations".into(), json!(1));
        Self {
            params,
            lifecycle: LifecycleAttachment::Config(LifecycleConfig::default()),
            segments: None,
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn with_lifecycle(mut self, lifecycle: LifecycleAttachment) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    pub fn with_config(mut self, config: LifecycleConfig) -> Self {
        self.lifecycle = LifecycleAttachment::Config(config);
        self
    }

    /// Replaces the generated segment chain entirely. The caller is
    /// responsible for flags and ordering.
    pub fn with_segments(mut self, segments: Vec<Segment>) -> Self {
        self.segments = Some(segments);
        self
    }

    pub fn create(self) -> DataStream {
        let name = self.params["name"].as_str().unwrap().to_string();
        let segments = self.segments.unwrap_or_else(|| {
            let generations = self.params["generations"].as_u64().unwrap().max(1);
            (1..=generations)
                .map(|generation| {
                    SegmentFactory::new()
                        .with("stream", name.as_str())
                        .with("generation", generation)
                        .with("write_target", generation == generations)
                        .create()
                })
                .collect()
        });
        let generation = segments.iter().map(|seg| seg.generation).max().unwrap_or(1);
        DataStream {
            name,
            generation,
            segments,
            lifecycle: self.lifecycle,
        }
    }
}
