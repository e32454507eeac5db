//! The transform contract.

use prep_model::Result;
use serde_json::Value;

/// A pipeline stage mapping one document to another.
///
/// Implementations are built once from their configuration and hold no
/// per-call state, so `process` may run concurrently on a shared instance.
/// The same input must always yield the same output or the same error.
pub trait Transform: Send + Sync {
    /// Registered name of the transform (e.g. `"Collect"`).
    fn name(&self) -> &str;

    /// Produce a new document from `input`.
    ///
    /// # Errors
    ///
    /// Returns a [`prep_model::PrepError`] when the document lacks a field the
    /// stage requires or holds one of the wrong type.
    fn process(&self, input: &Value) -> Result<Value>;
}

/// Pretty JSON for debug logging.
pub(crate) fn dump(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
