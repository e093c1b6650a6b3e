//! Keyed access for the `get_item` filter.
//!
//! Templates index both mappings and plain records. Rather than probing a
//! value for "is it dict-like", the call site picks an adapter: a
//! [`MapLookup`] for mappings or an [`AttrLookup`] for records whose fields
//! act as attributes.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde_json::{Map, Value};

/// Capability to fetch a value by key.
pub trait Lookup {
    fn lookup(&self, key: &str) -> Option<Value>;
}

/// Mapping-backed adapter.
#[derive(Debug, Clone, Copy)]
pub struct MapLookup<'a, M>(pub &'a M);

impl Lookup for MapLookup<'_, Map<String, Value>> {
    fn lookup(&self, key: &str) -> Option<Value> {
        self.0.get(key).cloned()
    }
}

impl<V: Clone + Into<Value>> Lookup for MapLookup<'_, HashMap<String, V>> {
    fn lookup(&self, key: &str) -> Option<Value> {
        self.0.get(key).cloned().map(Into::into)
    }
}

impl<V: Clone + Into<Value>> Lookup for MapLookup<'_, BTreeMap<String, V>> {
    fn lookup(&self, key: &str) -> Option<Value> {
        self.0.get(key).cloned().map(Into::into)
    }
}

/// Attribute-backed adapter: fields of a serializable record.
#[derive(Debug, Clone, Copy)]
pub struct AttrLookup<'a, T>(pub &'a T);

impl<T: Serialize> Lookup for AttrLookup<'_, T> {
    fn lookup(&self, key: &str) -> Option<Value> {
        match serde_json::to_value(self.0) {
            Ok(Value::Object(mut fields)) => fields.remove(key),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(error = %e, "record could not be viewed as attributes");
                None
            }
        }
    }
}

/// `source[key]`, or `None` when absent.
#[must_use]
pub fn get_item(source: &dyn Lookup, key: &str) -> Option<Value> {
    source.lookup(key)
}
