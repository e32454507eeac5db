//! Fallible, typed access to pipeline documents.
//!
//! Documents are plain [`serde_json::Value`]s. [`ValueExt`] adds the lookups
//! the transforms need without reaching for the panicking index operators:
//! membership tests, typed reads that report [`PrepError::TypeMismatch`], and
//! nested writes that create intermediate mappings on demand.
//!
//! Sequence access by position uses serde_json directly (`value.get(i)`).

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{PrepError, Result};

/// Extension methods for [`Value`] documents.
pub trait ValueExt {
    /// True if `self` is a mapping holding `key`.
    fn contains(&self, key: &str) -> bool;

    /// Short name of the stored variant (`"object"`, `"array"`, ...).
    fn kind_name(&self) -> &'static str;

    /// Read `key` as `T`.
    ///
    /// # Errors
    ///
    /// [`PrepError::MissingRequiredField`] if the key is absent,
    /// [`PrepError::TypeMismatch`] if the stored value does not decode as `T`.
    fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T>;

    /// Read `key` as a list of strings, or `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// [`PrepError::TypeMismatch`] if the value is not an array or one of its
    /// elements is not a string. The error path names the offending element.
    fn string_list(&self, key: &str) -> Result<Option<Vec<String>>>;

    /// Write `value` at a nested `path`, creating mappings along the way.
    ///
    /// `null` segments are promoted to empty mappings. An empty path replaces
    /// `self`.
    ///
    /// # Errors
    ///
    /// [`PrepError::TypeMismatch`] if an intermediate segment holds a
    /// non-mapping value.
    fn set_path(&mut self, path: &[&str], value: Value) -> Result<()>;
}

impl ValueExt for Value {
    fn contains(&self, key: &str) -> bool {
        self.as_object().is_some_and(|map| map.contains_key(key))
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self.get(key).ok_or_else(|| PrepError::missing(key))?;
        T::deserialize(value).map_err(|_| {
            PrepError::type_mismatch(key, std::any::type_name::<T>(), value.kind_name())
        })
    }

    fn string_list(&self, key: &str) -> Result<Option<Vec<String>>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let items = value
            .as_array()
            .ok_or_else(|| PrepError::type_mismatch(key, "array", value.kind_name()))?;
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    PrepError::type_mismatch(format!("{key}[{index}]"), "string", item.kind_name())
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    fn set_path(&mut self, path: &[&str], value: Value) -> Result<()> {
        let Some((last, parents)) = path.split_last() else {
            *self = value;
            return Ok(());
        };
        let mut current = self;
        for (depth, segment) in parents.iter().enumerate() {
            current = object_mut(current, &path[..depth])?
                .entry(*segment)
                .or_insert(Value::Null);
        }
        object_mut(current, parents)?.insert((*last).to_string(), value);
        Ok(())
    }
}

fn object_mut<'a>(value: &'a mut Value, walked: &[&str]) -> Result<&'a mut Map<String, Value>> {
    if value.is_null() {
        *value = Value::Object(Map::new());
    }
    let found = value.kind_name();
    value.as_object_mut().ok_or_else(|| {
        let path = if walked.is_empty() {
            "<root>".to_string()
        } else {
            walked.join(".")
        };
        PrepError::type_mismatch(path, "object", found)
    })
}

/// Decode a whole value as `T`, reporting mismatches against `path`.
pub fn decode<'a, T: Deserialize<'a>>(value: &'a Value, path: &str) -> Result<T> {
    T::deserialize(value)
        .map_err(|_| PrepError::type_mismatch(path, std::any::type_name::<T>(), value.kind_name()))
}
