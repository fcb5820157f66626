//! Mocktail: tracking, stubbing and spying test doubles generated from the
//! public surface of a PHP class.
//!
//! The pipeline is: source text → [`extraction::SignatureScanner`] →
//! [`generation`] (state slots, tracking bodies, helpers) →
//! [`installer::MockRegistry`], which publishes the mock under the class name.
//! [`facade`] exposes the same operations over a process-wide registry.
//!
//! ```rust
//! use mocktail::MockRegistry;
//! use serde_json::json;
//!
//! let mut registry = MockRegistry::default();
//! registry.generate_from_source(
//!     "class Widget { public function __construct() {} public function spin($n) {} }",
//! )?;
//!
//! let widget = registry.instantiate("Widget", &[])?;
//! registry.set_method_return_values("Widget", "spin", json!([10, 20]))?;
//! assert_eq!(widget.call("spin", &[json!(1)])?, Some(json!(10)));
//! assert_eq!(widget.call("spin", &[json!(2)])?, Some(json!(20)));
//! assert_eq!(widget.call("spin", &[json!(3)])?, None);
//! assert_eq!(registry.get_global_method_count("Widget", "spin")?, 3);
//! assert_eq!(registry.get_global_method_count("Widget", "__construct")?, 1);
//! # Ok::<(), mocktail::MockError>(())
//! ```

pub mod common;
pub mod config;
pub mod errors;
pub mod extraction;
pub mod facade;
pub mod generation;
pub mod installer;

pub use crate::config::{MocktailConfig, RedefinitionPolicy};
pub use crate::errors::{MockError, Result};
pub use crate::extraction::{ClassMockSpec, MethodDescriptor, MethodKey, SignatureScanner};
pub use crate::generation::{Spy, StateBundle};
pub use crate::installer::{MockClass, MockInstance, MockRegistry, SpyRef};
