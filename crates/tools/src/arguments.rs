use serde_json::Value;

/// Read-only view over a tool call's argument object with defaulting getters.
///
/// Lookups on a non-object value behave as if every key were missing.
#[derive(Debug, Clone, Copy)]
pub struct Arguments<'a> {
    inner: &'a Value,
}

impl<'a> Arguments<'a> {
    pub fn new(inner: &'a Value) -> Self {
        Self { inner }
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.inner.get(key).filter(|v| !v.is_null())
    }

    pub fn str(&self, key: &str) -> Option<&'a str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn str_or(&self, key: &str, default: &'a str) -> &'a str {
        self.str(key).unwrap_or(default)
    }

    pub fn i64_or(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(Value::as_i64).unwrap_or(default)
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    /// The raw value, or JSON `null` when absent.
    pub fn value_or_null(&self, key: &str) -> Value {
        self.get(key).cloned().unwrap_or(Value::Null)
    }
}
