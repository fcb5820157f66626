//! Interface extraction: from PHP class source to a [`ClassMockSpec`].
//!
//! ```rust
//! use mocktail::extraction::SignatureScanner;
//!
//! let spec = SignatureScanner::default()
//!     .extract_source("class Widget { public function spin($n) {} }")
//!     .unwrap();
//! assert_eq!(spec.class_name(), "Widget");
//! assert_eq!(spec.methods()[0].raw_parameter_list, "$n");
//! ```

pub mod sanitizer;
pub mod scanner;
pub mod types;

pub use sanitizer::sanitize;
pub use scanner::SignatureScanner;
pub use types::{ClassMockSpec, MethodDescriptor, MethodKey, CONSTRUCTOR_IDENT};
