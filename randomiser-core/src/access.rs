use serde_json::Value;

pub trait PropertyAccess {
    // Falsy results are treated as absent by the strategies.
    fn extract(&self, doc: &Value, name: &str) -> Option<Value>;

    fn inject(&self, doc: &mut Value, name: &str, value: Value);
}

/// Reads and writes a variable number of values per document, all of which
/// go into one shared pool.
///
/// Contract: for any document, `inject_all` must pop exactly as many values
/// from `pool` as `extract_all` returned for that same document. The
/// strategy only guarantees that the pool starts with the sum of all
/// extractions; it does not check per-document consumption, so an
/// implementation that over- or under-pops shifts values between
/// documents and leaves later documents short.
pub trait MultiPropertyAccess {
    fn extract_all(&self, doc: &Value) -> Vec<Value>;

    fn inject_all(&self, doc: &mut Value, pool: &mut Vec<Value>);
}

/// JavaScript-style truthiness: `null`, `false`, `0` and `""` are falsy,
/// everything else (including empty arrays and objects) is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub(crate) fn extract_truthy<A>(access: &A, doc: &Value, name: &str) -> Option<Value>
where
    A: PropertyAccess + ?Sized,
{
    access.extract(doc, name).filter(is_truthy)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TopLevelProperty;

impl PropertyAccess for TopLevelProperty {
    fn extract(&self, doc: &Value, name: &str) -> Option<Value> {
        doc.get(name).cloned()
    }

    fn inject(&self, doc: &mut Value, name: &str, value: Value) {
        if let Some(obj) = doc.as_object_mut() {
            obj.insert(name.to_string(), value);
        }
    }
}

/// Every element of the array stored under one root key.
#[derive(Debug, Clone)]
pub struct ListProperty {
    key: String,
}

impl ListProperty {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl MultiPropertyAccess for ListProperty {
    fn extract_all(&self, doc: &Value) -> Vec<Value> {
        doc.get(&self.key)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    fn inject_all(&self, doc: &mut Value, pool: &mut Vec<Value>) {
        let Some(items) = doc.get_mut(&self.key).and_then(Value::as_array_mut) else {
            return;
        };
        for item in items.iter_mut() {
            if let Some(value) = pool.pop() {
                *item = value;
            }
        }
    }
}
