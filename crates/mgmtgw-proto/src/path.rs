//! Structured paths used to address configuration and state subtrees.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Element keys, kept in the order the caller supplied them.
pub type KeyMap = IndexMap<String, String>;

/// One named, optionally keyed, element of a [`Path`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathElem {
    /// Element name (a schema node identifier, optionally module-qualified).
    pub name: String,
    /// List keys selecting one entry of a keyed node.
    pub key: KeyMap,
}

impl PathElem {
    /// Create a keyless (container) element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: KeyMap::new(),
        }
    }

    /// Add a key to this element.
    pub fn with_key(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.key.insert(name.into(), value.into());
        self
    }

    /// Check whether this element selects a list entry.
    pub fn is_keyed(&self) -> bool {
        !self.key.is_empty()
    }
}

/// An ordered sequence of path elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Path {
    /// Schema origin, if any.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub origin: String,
    /// Elements from the root downwards.
    pub elem: Vec<PathElem>,
    /// Target device the path refers to.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub target: String,
}

impl Path {
    /// Create a path from elements.
    pub fn new(elem: Vec<PathElem>) -> Self {
        Self {
            elem,
            ..Default::default()
        }
    }

    /// The root path (no elements).
    pub fn root() -> Self {
        Self::default()
    }

    /// Append an element.
    pub fn with_elem(mut self, elem: PathElem) -> Self {
        self.elem.push(elem);
        self
    }

    /// Set the target.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elem.len()
    }

    /// Check whether this is the root path.
    pub fn is_empty(&self) -> bool {
        self.elem.is_empty()
    }

    /// Concatenate `prefix` and `path` element-wise.
    ///
    /// The origin is taken from `path`, the target from `prefix` unless `path`
    /// names its own.
    pub fn join(prefix: &Path, path: &Path) -> Path {
        let mut elem = Vec::with_capacity(prefix.elem.len() + path.elem.len());
        elem.extend(prefix.elem.iter().cloned());
        elem.extend(path.elem.iter().cloned());

        Path {
            origin: path.origin.clone(),
            elem,
            target: if path.target.is_empty() {
                prefix.target.clone()
            } else {
                path.target.clone()
            },
        }
    }
}

impl FromIterator<PathElem> for Path {
    fn from_iter<I: IntoIterator<Item = PathElem>>(iter: I) -> Self {
        Path::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_appends_prefix_first() {
        let prefix = Path::new(vec![PathElem::new("interfaces")]).with_target("dut");
        let path = Path::new(vec![
            PathElem::new("interface").with_key("name", "Ethernet0"),
            PathElem::new("config"),
        ]);

        let full = Path::join(&prefix, &path);
        let names: Vec<&str> = full.elem.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["interfaces", "interface", "config"]);
        assert_eq!(full.target, "dut");
    }

    #[test]
    fn test_key_order_is_preserved() {
        let elem = PathElem::new("neighbor")
            .with_key("vrf", "default")
            .with_key("address", "10.0.0.1");
        let keys: Vec<&str> = elem.key.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["vrf", "address"]);
        assert!(elem.is_keyed());
    }

    #[test]
    fn test_json_shape() {
        let path = Path::new(vec![PathElem::new("system")]);
        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(json, serde_json::json!({"elem": [{"name": "system", "key": {}}]}));
    }
}
