//! Typed property bags.
//!
//! Values are stored as JSON so a bag can be filled from user configuration (`merge_json`)
//! as well as through typed [`Property`] keys.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;

/// A typed option key with a declared default.
pub struct Property<T> {
    id: &'static str,
    default: T,
}

impl<T> Property<T> {
    pub const fn new(id: &'static str, default: T) -> Self {
        Self { id, default }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }
}

impl<T> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Property").field(&self.id).finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    #[error("property configuration must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(Map<String, Value>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored value, or the key's default if the key is unset.
    pub fn get<T>(&self, property: &Property<T>) -> T
    where
        T: Clone + DeserializeOwned,
    {
        self.get_opt(property)
            .unwrap_or_else(|| property.default.clone())
    }

    /// Returns the stored value without falling back to the default.
    pub fn get_opt<T>(&self, property: &Property<T>) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let value = self.0.get(property.id)?;
        match serde_json::from_value::<T>(value.clone()) {
            Ok(v) => Some(v),
            Err(err) => {
                tracing::warn!(
                    property = property.id,
                    %err,
                    "ignoring property value of unexpected type"
                );
                None
            }
        }
    }

    pub fn has<T>(&self, property: &Property<T>) -> bool {
        self.0.contains_key(property.id)
    }

    pub fn set<T>(&mut self, property: &Property<T>, value: T) -> &mut Self
    where
        T: Serialize,
    {
        match serde_json::to_value(value) {
            Ok(v) => {
                self.0.insert(property.id.to_string(), v);
            }
            Err(err) => {
                tracing::warn!(property = property.id, %err, "property value is not serializable");
            }
        }
        self
    }

    pub fn remove<T>(&mut self, property: &Property<T>) -> bool {
        self.0.remove(property.id).is_some()
    }

    /// Copies every entry of `other` into this bag, overwriting existing keys.
    pub fn copy_from(&mut self, other: &Properties) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Merges a JSON object keyed by property id.
    pub fn merge_json(&mut self, value: &Value) -> Result<(), PropertyError> {
        let Value::Object(map) = value else {
            return Err(PropertyError::NotAnObject {
                found: json_kind(value),
            });
        };
        for (k, v) in map {
            self.0.insert(k.clone(), v.clone());
        }
        Ok(())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
