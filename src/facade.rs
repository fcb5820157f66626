//! Process-wide façade over a default [`MockRegistry`].
//!
//! Mirrors the classic static API: install a mock from a file, then address
//! it by `(class, method)` strings for the rest of the test run. Harnesses
//! that want an explicit lifecycle can own a [`MockRegistry`] instead.
//!
//! The default registry is shared by every thread. Tests running in parallel
//! must mock distinct class names; state for one class is not isolated
//! between concurrent callers.
//!
//! ```rust,no_run
//! use mocktail::facade;
//! use serde_json::json;
//!
//! facade::generate_class_mock("tests/fixtures/Widget.php")?;
//! let widget = facade::new_instance("Widget", &[])?;
//! facade::set_method_return_values("Widget", "spin", json!([10, 20]))?;
//! assert_eq!(widget.call("spin", &[json!(1)])?, Some(json!(10)));
//! assert_eq!(facade::get_global_method_count("Widget", "spin")?, 1);
//! # Ok::<(), mocktail::MockError>(())
//! ```

use crate::config::{get_config, MocktailConfig};
use crate::errors::Result;
use crate::installer::{MockClass, MockInstance, MockRegistry, SpyRef};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

static REGISTRY: Lazy<Mutex<MockRegistry>> =
    Lazy::new(|| Mutex::new(MockRegistry::new(get_config().clone())));

/// Scan the class in `path` and install its mock under the class name.
pub fn generate_class_mock(path: impl AsRef<Path>) -> Result<Arc<MockClass>> {
    REGISTRY.lock().generate_class_mock(path)
}

/// Install a mock from in-memory source.
pub fn generate_class_mock_from_source(source: &str) -> Result<Arc<MockClass>> {
    REGISTRY.lock().generate_from_source(source)
}

/// Construct the installed mock for `class_name`.
pub fn new_instance(class_name: &str, args: &[Value]) -> Result<MockInstance> {
    // Resolve first: the constructor's spy may call back into the façade.
    let class = REGISTRY.lock().class(class_name)?;
    class.instantiate(args)
}

pub fn set_method_return_values(class_name: &str, method_name: &str, values: Value) -> Result<()> {
    REGISTRY
        .lock()
        .set_method_return_values(class_name, method_name, values)
}

pub fn get_global_method_count(class_name: &str, method_name: &str) -> Result<u64> {
    REGISTRY
        .lock()
        .get_global_method_count(class_name, method_name)
}

pub fn reset_global_method_count(class_name: &str, method_name: &str) -> Result<()> {
    REGISTRY
        .lock()
        .reset_global_method_count(class_name, method_name)
}

pub fn reset_all_global_counts(class_name: &str) -> Result<()> {
    REGISTRY.lock().reset_all_global_counts(class_name)
}

pub fn set_spy(class_name: &str, method_name: &str, spy: SpyRef) -> Result<()> {
    REGISTRY.lock().set_spy(class_name, method_name, spy)
}

pub fn register_spy_function<F>(name: impl Into<String>, callback: F)
where
    F: Fn(&[Value]) -> anyhow::Result<()> + Send + Sync + 'static,
{
    REGISTRY.lock().register_spy_function(name, callback);
}

pub fn is_installed(class_name: &str) -> bool {
    REGISTRY.lock().is_installed(class_name)
}

/// Replace the default registry with an empty one using `config`.
///
/// Every mock installed through the façade is dropped, including those of
/// tests running concurrently.
pub fn reset_registry(config: MocktailConfig) {
    *REGISTRY.lock() = MockRegistry::new(config);
}
