use serde_json::{Map, Value};

/// Host-supplied configuration as a JSON object (theme colors, scale factors, panel text).
///
/// Values are looked up by dotted path (`"layout.xScale"`). Missing keys are simply absent; typed
/// interpretation and defaults belong to the consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphConfig(Value);

impl Default for GraphConfig {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl GraphConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn from_json_str(text: &str) -> crate::Result<Self> {
        Ok(Self(serde_json::from_str(text)?))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    fn lookup(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.lookup(dotted_path)?.as_str()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.lookup(dotted_path)?.as_f64()
    }

    /// Writes `value` at `dotted_path`, replacing any non-object found along the way.
    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        insert_at(&mut self.0, dotted_path, value);
    }

    /// Overlays `overlay` onto this config: nested objects merge key by key, any other value
    /// replaces what was there.
    pub fn deep_merge(&mut self, overlay: &Value) {
        merge_into(&mut self.0, overlay);
    }
}

fn insert_at(target: &mut Value, path: &str, value: Value) {
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    let Value::Object(map) = target else {
        return;
    };
    match path.split_once('.') {
        Some((head, rest)) => insert_at(map.entry(head).or_insert(Value::Null), rest, value),
        None => {
            map.insert(path.to_string(), value);
        }
    }
}

fn merge_into(target: &mut Value, overlay: &Value) {
    match (target.as_object_mut(), overlay.as_object()) {
        (Some(map), Some(incoming)) => {
            for (key, value) in incoming {
                merge_into(map.entry(key.as_str()).or_insert(Value::Null), value);
            }
        }
        _ => *target = overlay.clone(),
    }
}
