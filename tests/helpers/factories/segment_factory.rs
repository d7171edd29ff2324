use crate::engine::cluster::metadata::{MergeSettings, Segment, SegmentId, SegmentStats};
use serde_json::{Value, json};
use std::collections::HashMap;

pub const BASE_MILLIS: u64 = 1_700_000_000_000;

pub struct SegmentFactory {
    params: HashMap<String, Value>,
    merge: MergeSettings,
}

impl SegmentFactory {
    pub fn new() -> Self {
        let mut params = HashMap::new();
        params.insert("stream".into(), json!("metrics-foo"));
        params.insert("generation".into(), json!(1));
        params.insert("created_at_millis".into(), json!(BASE_MILLIS));
        params.insert("origination_millis".into(), Value::Null);
        params.insert("write_target".into(), json!(false));
        params.insert("read_only".into(), json!(false));
        params.insert("docs".into(), json!(0));
        params.insert("primary_size_bytes".into(), json!(0));
        params.insert("merged_at_millis".into(), Value::Null);
        Self {
            params,
            merge: MergeSettings::default(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn with_merge(mut self, factor: u32, floor_segment_bytes: u64) -> Self {
        self.merge = MergeSettings {
            factor,
            floor_segment_bytes,
        };
        self
    }

    pub fn create(self) -> Segment {
        let stream = self.params["stream"].as_str().unwrap().to_string();
        let generation = self.params["generation"].as_u64().unwrap();
        Segment {
            id: SegmentId::new(&stream, generation),
            generation,
            created_at_millis: self.params["created_at_millis"].as_u64().unwrap(),
            origination_millis: self.params["origination_millis"].as_u64(),
            write_target: self.params["write_target"].as_bool().unwrap(),
            read_only: self.params["read_only"].as_bool().unwrap(),
            merge: self.merge,
            stats: SegmentStats {
                docs: self.params["docs"].as_u64().unwrap(),
                primary_size_bytes: self.params["primary_size_bytes"].as_u64().unwrap(),
            },
            merged_at_millis: self.params["merged_at_millis"].as_u64(),
        }
    }
}
