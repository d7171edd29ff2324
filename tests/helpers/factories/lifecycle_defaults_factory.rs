use crate::engine::cluster::metadata::{LifecycleDefaults, MergeSettings, RolloverConditions};
use serde_json::{Value, json};
use std::collections::HashMap;

pub struct LifecycleDefaultsFactory {
    params: HashMap<String, Value>,
}

impl LifecycleDefaultsFactory {
    pub fn new() -> Self {
        let mut params = HashMap::new();
        params.insert("max_age_millis".into(), Value::Null);
        params.insert("max_docs".into(), json!(200_000_000u64));
        params.insert("max_primary_size_bytes".into(), Value::Null);
        params.insert("min_docs".into(), json!(1));
        params.insert("merge_factor".into(), json!(16));
        params.insert("merge_floor_segment_bytes".into(), json!(104_857_600u64));
        Self { params }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn create(self) -> LifecycleDefaults {
        LifecycleDefaults {
            rollover: RolloverConditions {
                max_age_millis: self.params["max_age_millis"].as_u64(),
                max_docs: self.params["max_docs"].as_u64(),
                max_primary_size_bytes: self.params["max_primary_size_bytes"].as_u64(),
                min_docs: self.params["min_docs"].as_u64().unwrap(),
            },
            merge: MergeSettings {
                factor: self.params["merge_factor"].as_u64().unwrap() as u32,
                floor_segment_bytes: self.params["merge_floor_segment_bytes"].as_u64().unwrap(),
            },
        }
    }
}
