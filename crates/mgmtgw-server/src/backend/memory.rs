//! In-memory backend.
//!
//! Stores one JSON document per resource URI and dispatches actions to
//! registered closures. Reads of a path without its own document return an
//! object of the documents stored below it, keyed by their remaining suffix.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{json, Map, Value};

use super::{Backend, BackendError};

/// URI of the arithmetic self-test action.
pub const SUM_ACTION_URI: &str = "/sonic-tests:sum";

/// An action implementation.
pub type ActionFn = Arc<dyn Fn(Value) -> Result<Value, BackendError> + Send + Sync>;

/// A [`Backend`] keeping everything in process memory.
#[derive(Default)]
pub struct MemoryBackend {
    resources: RwLock<BTreeMap<String, Value>>,
    actions: RwLock<HashMap<String, ActionFn>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend with the `sonic-tests:sum` self-test action registered.
    pub fn with_self_test() -> Self {
        let backend = Self::new();
        backend.register_action(SUM_ACTION_URI, sum_action);
        backend
    }

    /// Register (or replace) the action served at `uri`.
    pub fn register_action<F>(&self, uri: impl Into<String>, action: F)
    where
        F: Fn(Value) -> Result<Value, BackendError> + Send + Sync + 'static,
    {
        self.actions.write().insert(uri.into(), Arc::new(action));
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.resources.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.read().is_empty()
    }
}

/// Whether `candidate` lies strictly below `path`.
fn is_below(path: &str, candidate: &str) -> bool {
    if path == "/" {
        return candidate != "/";
    }
    candidate
        .strip_prefix(path)
        .is_some_and(|rest| rest.starts_with('/') || rest.starts_with('['))
}

fn merge(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                match target.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, patch) => *target = patch,
    }
}

impl Backend for MemoryBackend {
    fn get(&self, path: &str) -> Result<Value, BackendError> {
        let resources = self.resources.read();
        if let Some(value) = resources.get(path) {
            return Ok(value.clone());
        }

        let below: Map<String, Value> = resources
            .iter()
            .filter(|(key, _)| is_below(path, key))
            .map(|(key, value)| {
                let suffix = if path == "/" { key.as_str() } else { &key[path.len()..] };
                (suffix.to_string(), value.clone())
            })
            .collect();

        if below.is_empty() {
            return Err(BackendError::not_found(format!("Resource not found: {}", path)));
        }
        Ok(Value::Object(below))
    }

    fn create(&self, path: &str, payload: Value) -> Result<(), BackendError> {
        let mut resources = self.resources.write();
        if resources.contains_key(path) {
            return Err(BackendError::already_exists(format!(
                "Resource already exists: {}",
                path
            )));
        }
        resources.insert(path.to_string(), payload);
        Ok(())
    }

    fn replace(&self, path: &str, payload: Value) -> Result<(), BackendError> {
        let mut resources = self.resources.write();
        resources.retain(|key, _| !is_below(path, key));
        resources.insert(path.to_string(), payload);
        Ok(())
    }

    fn update(&self, path: &str, payload: Value) -> Result<(), BackendError> {
        let mut resources = self.resources.write();
        match resources.get_mut(path) {
            Some(existing) => merge(existing, payload),
            None => {
                resources.insert(path.to_string(), payload);
            }
        }
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<(), BackendError> {
        let mut resources = self.resources.write();
        resources.retain(|key, _| key != path && !is_below(path, key));
        Ok(())
    }

    fn action(&self, uri: &str, input: Value) -> Result<Value, BackendError> {
        let action = self
            .actions
            .read()
            .get(uri)
            .cloned()
            .ok_or_else(|| BackendError::not_supported(format!("Unknown action: {}", uri)))?;
        action(input)
    }
}

fn sum_action(input: Value) -> Result<Value, BackendError> {
    let operand = |name: &str| {
        input
            .get("sonic-tests:input")
            .and_then(|i| i.get(name))
            .and_then(Value::as_i64)
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| BackendError::invalid_input(format!("missing or invalid '{}'", name)))
    };

    let result = operand("left")?
        .checked_add(operand("right")?)
        .ok_or_else(|| BackendError::invalid_input("sum overflows"))?;
    Ok(json!({ "sonic-tests:output": { "result": result } }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_get_delete() {
        let backend = MemoryBackend::new();
        backend
            .replace("/openconfig-system:system/config/hostname", json!("sw1"))
            .unwrap();
        assert_eq!(
            backend.get("/openconfig-system:system/config/hostname").unwrap(),
            json!("sw1")
        );

        backend.delete("/openconfig-system:system").unwrap();
        assert!(backend.is_empty());
    }

    #[test]
    fn test_get_collects_subtree() {
        let backend = MemoryBackend::new();
        backend.replace("/vlans/vlan[id=10]", json!({"name": "ten"})).unwrap();
        backend.replace("/vlans/vlan[id=20]", json!({"name": "twenty"})).unwrap();
        backend.replace("/vlansx", json!(true)).unwrap();

        let value = backend.get("/vlans").unwrap();
        assert_eq!(
            value,
            json!({
                "/vlan[id=10]": {"name": "ten"},
                "/vlan[id=20]": {"name": "twenty"}
            })
        );
        assert_eq!(backend.get("/").unwrap().as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_get_missing() {
        let err = MemoryBackend::new().get("/nothing").unwrap_err();
        assert_eq!(err.code, super::super::BackendErrorCode::NotFound);
    }

    #[test]
    fn test_update_merges_objects() {
        let backend = MemoryBackend::new();
        backend
            .update("/if[name=Eth0]/config", json!({"mtu": 1500, "enabled": true}))
            .unwrap();
        backend
            .update("/if[name=Eth0]/config", json!({"mtu": 9100}))
            .unwrap();
        assert_eq!(
            backend.get("/if[name=Eth0]/config").unwrap(),
            json!({"mtu": 9100, "enabled": true})
        );
    }

    #[test]
    fn test_replace_drops_descendants() {
        let backend = MemoryBackend::new();
        backend.replace("/a/b", json!(1)).unwrap();
        backend.replace("/a", json!({"c": 2})).unwrap();
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_create_conflict() {
        let backend = MemoryBackend::new();
        backend.create("/a", json!(1)).unwrap();
        assert!(backend.create("/a", json!(2)).is_err());
    }

    #[test]
    fn test_sum_action() {
        let backend = MemoryBackend::with_self_test();
        let out = backend
            .action(
                SUM_ACTION_URI,
                json!({"sonic-tests:input": {"left": 2, "right": 40}}),
            )
            .unwrap();
        assert_eq!(out, json!({"sonic-tests:output": {"result": 42}}));

        assert!(backend
            .action(SUM_ACTION_URI, json!({"sonic-tests:input": {"left": i32::MAX, "right": 1}}))
            .is_err());
        assert!(backend.action(SUM_ACTION_URI, json!({})).is_err());
    }

    #[test]
    fn test_unknown_action() {
        let err = MemoryBackend::new().action("/x:y", json!({})).unwrap_err();
        assert_eq!(err.message, "Unknown action: /x:y");
    }
}
