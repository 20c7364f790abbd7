use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};

#[cfg(test)]
mod tests;

/// The shared blackboard threaded through a single workflow run.
///
/// Every action reads and writes the same store through dot-separated
/// paths (`"config.name"`). Intermediate levels are JSON objects, created
/// on write when absent. `get` never fails: a missing segment yields
/// [`Value::Null`].
///
/// Cloning a `StateStore` yields another handle to the same underlying
/// data. The engine provides no locking beyond per-call consistency;
/// actions scheduled concurrently must write disjoint paths (last write
/// wins otherwise).
#[derive(Clone)]
pub struct StateStore {
    root: Arc<Mutex<Value>>,
}

impl StateStore {
    /// Wraps the caller's initial state. `Value::Null` becomes an empty
    /// object so the first `set` has somewhere to land.
    pub fn new(initial: Value) -> Self {
        let root = match initial {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        Self {
            root: Arc::new(Mutex::new(root)),
        }
    }

    /// Returns the value at `path`, or `Value::Null` the moment any
    /// segment is absent.
    pub fn get(&self, path: &str) -> Value {
        let root = self.root.lock().unwrap();
        let mut current = &*root;
        for segment in path.split('.') {
            match current.get(segment) {
                Some(value) => current = value,
                None => return Value::Null,
            }
        }
        current.clone()
    }

    /// Writes `value` at `path`, creating intermediate objects as needed.
    /// Overwrites the leaf silently; a non-object intermediate is replaced
    /// by an object.
    pub fn set(&self, path: &str, value: impl Into<Value>) {
        let mut root = self.root.lock().unwrap();
        let segments: Vec<&str> = path.split('.').collect();
        let Some((leaf, parents)) = segments.split_last() else {
            return;
        };

        let mut current = &mut *root;
        for segment in parents {
            current = ensure_object(current)
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        ensure_object(current).insert(leaf.to_string(), value.into());
    }

    /// A clone of the current tree. Used by predicates, tests, and the
    /// caller after `start` resolves.
    pub fn snapshot(&self) -> Value {
        self.root.lock().unwrap().clone()
    }
}

/// Turns `slot` into an object container if it is not one already.
fn ensure_object(slot: &mut Value) -> &mut Map<String, Value> {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot was just made an object"),
    }
}
