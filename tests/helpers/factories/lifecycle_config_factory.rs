use crate::engine::cluster::metadata::{LifecycleConfig, RolloverConditions};
use serde_json::{Value, json};
use std::collections::HashMap;

pub struct LifecycleConfigFactory {
    params: HashMap<String, Value>,
    rollover: Option<RolloverConditions>,
}

impl LifecycleConfigFactory {
    pub fn new() -> Self {
        let mut params = HashMap::new();
        params.insert("enabled".into(), json!(true));
        params.insert("retention_millis".into(), Value::Null);
        Self {
            params,
            rollover: None,
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn with_rollover(mut self, rollover: RolloverConditions) -> Self {
        self.rollover = Some(rollover);
        self
    }

    pub fn create(self) -> LifecycleConfig {
        LifecycleConfig {
            enabled: self.params["enabled"].as_bool().unwrap(),
            retention_millis: self.params["retention_millis"].as_u64(),
            rollover: self.rollover,
        }
    }
}
