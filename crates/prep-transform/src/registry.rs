//! Named, device-specific, versioned creators.
//!
//! A [`Registry`] maps a [`CreatorKey`] (`name`, `device`, `version`) to a
//! [`Creator`] that builds an instance of some interface `T` from a
//! configuration document. The same registry type backs transforms
//! (`Registry<dyn Transform>`) and inference backends.
//!
//! # Architecture
//!
//! Registries are filled once by an explicit registration function and are
//! read-only afterwards, so a populated registry can be shared across threads.
//! Registering a key twice is rejected; callers treat that as a startup
//! failure.
//!
//! # Example
//!
//! ```ignore
//! use prep_transform::registry::{FnCreator, Registry};
//!
//! let mut registry: Registry<dyn Transform> = Registry::new();
//! registry.register(Box::new(FnCreator::new("Collect", "cpu", 1, create_collect)))?;
//! let collect = registry.create("Collect", "cpu", Some(1), &args)?;
//! ```

use std::collections::BTreeMap;
use std::fmt;

use prep_model::Result as PrepResult;
use serde_json::Value;
use tracing::debug;

use crate::error::RegistryError;

/// Registry lookup key. Orders by name, then device, then version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CreatorKey {
    pub name: String,
    pub device: String,
    pub version: u32,
}

impl CreatorKey {
    pub fn new(name: impl Into<String>, device: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            device: device.into(),
            version,
        }
    }
}

impl fmt::Display for CreatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} v{}", self.name, self.device, self.version)
    }
}

/// Factory for instances of `T`.
pub trait Creator<T: ?Sized>: Send + Sync {
    fn name(&self) -> &str;

    /// Device tag this implementation targets (e.g. `"cpu"`).
    fn device(&self) -> &str;

    fn version(&self) -> u32;

    /// Build an instance from `args`.
    ///
    /// # Errors
    ///
    /// Returns [`prep_model::PrepError::InvalidArgument`] for malformed
    /// configuration. No partially configured instance is produced.
    fn create(&self, args: &Value) -> PrepResult<Box<T>>;

    fn key(&self) -> CreatorKey {
        CreatorKey::new(self.name(), self.device(), self.version())
    }
}

/// Adapts a plain constructor function to the [`Creator`] trait.
pub struct FnCreator<T: ?Sized> {
    name: &'static str,
    device: &'static str,
    version: u32,
    create_fn: fn(&Value) -> PrepResult<Box<T>>,
}

impl<T: ?Sized> FnCreator<T> {
    pub fn new(
        name: &'static str,
        device: &'static str,
        version: u32,
        create_fn: fn(&Value) -> PrepResult<Box<T>>,
    ) -> Self {
        Self {
            name,
            device,
            version,
            create_fn,
        }
    }
}

impl<T: ?Sized> Creator<T> for FnCreator<T> {
    fn name(&self) -> &str {
        self.name
    }

    fn device(&self) -> &str {
        self.device
    }

    fn version(&self) -> u32 {
        self.version
    }

    fn create(&self, args: &Value) -> PrepResult<Box<T>> {
        (self.create_fn)(args)
    }
}

/// Creators indexed by [`CreatorKey`].
pub struct Registry<T: ?Sized> {
    creators: BTreeMap<CreatorKey, Box<dyn Creator<T>>>,
}

impl<T: ?Sized> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Registry<T> {
    pub fn new() -> Self {
        Self {
            creators: BTreeMap::new(),
        }
    }

    /// Register a creator under its own key.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Duplicate`] if the key is already taken. The existing
    /// creator is kept.
    pub fn register(&mut self, creator: Box<dyn Creator<T>>) -> Result<(), RegistryError> {
        let key = creator.key();
        if self.creators.contains_key(&key) {
            return Err(RegistryError::Duplicate { key });
        }
        debug!(%key, "registered creator");
        self.creators.insert(key, creator);
        Ok(())
    }

    /// Creator registered for exactly `(name, device, version)`.
    pub fn get_creator(&self, name: &str, device: &str, version: u32) -> Option<&dyn Creator<T>> {
        self.creators
            .get(&CreatorKey::new(name, device, version))
            .map(|creator| &**creator)
    }

    /// Highest-versioned creator for `(name, device)` not above `max_version`.
    pub fn get_latest(
        &self,
        name: &str,
        device: &str,
        max_version: Option<u32>,
    ) -> Option<&dyn Creator<T>> {
        let low = CreatorKey::new(name, device, 0);
        let high = CreatorKey::new(name, device, max_version.unwrap_or(u32::MAX));
        self.creators
            .range(low..=high)
            .next_back()
            .map(|(_, creator)| &**creator)
    }

    /// Build an instance.
    ///
    /// `Some(version)` requires an exact match; `None` picks the highest
    /// registered version.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] when nothing matches,
    /// [`RegistryError::Create`] when the creator rejects `args`.
    pub fn create(
        &self,
        name: &str,
        device: &str,
        version: Option<u32>,
        args: &Value,
    ) -> Result<Box<T>, RegistryError> {
        let creator = match version {
            Some(version) => self.get_creator(name, device, version),
            None => self.get_latest(name, device, None),
        }
        .ok_or_else(|| RegistryError::NotFound {
            name: name.to_string(),
            device: device.to_string(),
            version,
        })?;
        build(creator, args)
    }

    /// Build an instance from the highest version not above `max_version`.
    ///
    /// # Errors
    ///
    /// As for [`Registry::create`].
    pub fn create_latest(
        &self,
        name: &str,
        device: &str,
        max_version: Option<u32>,
        args: &Value,
    ) -> Result<Box<T>, RegistryError> {
        let creator = self.get_latest(name, device, max_version).ok_or_else(|| {
            RegistryError::NotFound {
                name: name.to_string(),
                device: device.to_string(),
                version: max_version,
            }
        })?;
        build(creator, args)
    }

    pub fn contains(&self, key: &CreatorKey) -> bool {
        self.creators.contains_key(key)
    }

    /// Registered keys in lookup order.
    pub fn keys(&self) -> impl Iterator<Item = &CreatorKey> + '_ {
        self.creators.keys()
    }

    pub fn len(&self) -> usize {
        self.creators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creators.is_empty()
    }
}

fn build<T: ?Sized>(creator: &dyn Creator<T>, args: &Value) -> Result<Box<T>, RegistryError> {
    creator.create(args).map_err(|source| RegistryError::Create {
        key: creator.key(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use prep_model::{PrepError, Result};
    use serde_json::json;

    use super::*;

    trait Shape: Send + Sync {
        fn sides(&self) -> u32;
    }

    struct Polygon(u32);

    impl Shape for Polygon {
        fn sides(&self) -> u32 {
            self.0
        }
    }

    fn triangle(_args: &Value) -> Result<Box<dyn Shape>> {
        Ok(Box::new(Polygon(3)))
    }

    fn square(_args: &Value) -> Result<Box<dyn Shape>> {
        Ok(Box::new(Polygon(4)))
    }

    fn sized(args: &Value) -> Result<Box<dyn Shape>> {
        let sides = args
            .get("sides")
            .and_then(Value::as_u64)
            .ok_or_else(|| PrepError::invalid_argument("'sides' is required"))?;
        Ok(Box::new(Polygon(sides as u32)))
    }

    fn registry() -> Registry<dyn Shape> {
        let mut registry = Registry::new();
        registry
            .register(Box::new(FnCreator::new("Polygon", "cpu", 1, triangle)))
            .unwrap();
        registry
            .register(Box::new(FnCreator::new("Polygon", "cpu", 3, square)))
            .unwrap();
        registry
            .register(Box::new(FnCreator::new("Sized", "cpu", 1, sized)))
            .unwrap();
        registry
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = registry();
        let err = registry
            .register(Box::new(FnCreator::new("Polygon", "cpu", 1, square)))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::Duplicate {
                key: CreatorKey::new("Polygon", "cpu", 1)
            }
        );
        // The first registration wins.
        let shape = registry.create("Polygon", "cpu", Some(1), &json!({})).unwrap();
        assert_eq!(shape.sides(), 3);
    }

    #[test]
    fn exact_lookup() {
        let registry = registry();
        assert!(registry.get_creator("Polygon", "cpu", 1).is_some());
        assert!(registry.get_creator("Polygon", "cpu", 2).is_none());
        assert!(registry.get_creator("Polygon", "cuda", 1).is_none());
    }

    #[test]
    fn latest_lookup_respects_cap() {
        let registry = registry();
        let latest = registry.get_latest("Polygon", "cpu", None).unwrap();
        assert_eq!(latest.version(), 3);
        let capped = registry.get_latest("Polygon", "cpu", Some(2)).unwrap();
        assert_eq!(capped.version(), 1);
        assert!(registry.get_latest("Polygon", "cpu", Some(0)).is_none());
        assert!(registry.get_latest("Poly", "cpu", None).is_none());
    }

    #[test]
    fn create_reports_missing_creator() {
        let registry = registry();
        let err = registry
            .create("Polygon", "cuda", None, &json!({}))
            .err()
            .unwrap();
        assert!(matches!(err, RegistryError::NotFound { ref device, .. } if device == "cuda"));
    }

    #[test]
    fn create_wraps_creator_error() {
        let registry = registry();
        let err = registry.create("Sized", "cpu", None, &json!({})).err().unwrap();
        assert_eq!(
            err,
            RegistryError::Create {
                key: CreatorKey::new("Sized", "cpu", 1),
                source: PrepError::invalid_argument("'sides' is required"),
            }
        );
        let shape = registry
            .create("Sized", "cpu", None, &json!({"sides": 6}))
            .unwrap();
        assert_eq!(shape.sides(), 6);
    }

    #[test]
    fn create_latest_honours_cap() {
        let registry = registry();
        let shape = registry
            .create_latest("Polygon", "cpu", Some(2), &json!({}))
            .unwrap();
        assert_eq!(shape.sides(), 3);
        let shape = registry.create_latest("Polygon", "cpu", None, &json!({})).unwrap();
        assert_eq!(shape.sides(), 4);
        let err = registry
            .create_latest("Polygon", "cpu", Some(0), &json!({}))
            .err()
            .unwrap();
        assert!(matches!(err, RegistryError::NotFound { version: Some(0), .. }));
    }

    #[test]
    fn keys_are_ordered() {
        let registry = registry();
        let keys: Vec<String> = registry.keys().map(ToString::to_string).collect();
        assert_eq!(keys, ["Polygon@cpu v1", "Polygon@cpu v3", "Sized@cpu v1"]);
        assert_eq!(registry.len(), 3);
    }
}
