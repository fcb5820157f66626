//! Descriptors produced by the signature scanner.

use crate::common::fold_identifier;
use serde::Serialize;
use std::fmt;

/// Reserved identifier every constructor descriptor is renamed to.
pub const CONSTRUCTOR_IDENT: &str = "Constructor";

/// Lookup key for one mocked method.
///
/// Constructors get their own variant so a regular method that happens to be
/// called `constructor` can never alias the constructor's state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MethodKey {
    Constructor,
    /// Case-folded method name
    Method(String),
}

impl MethodKey {
    /// Key for an externally supplied method name. Names equal to the
    /// constructor name (ignoring case) map to `MethodKey::Constructor`.
    pub fn resolve(method_name: &str, constructor_name: &str) -> Self {
        if method_name.eq_ignore_ascii_case(constructor_name) {
            Self::Constructor
        } else {
            Self::Method(fold_identifier(method_name))
        }
    }

    pub fn is_constructor(&self) -> bool {
        matches!(self, Self::Constructor)
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constructor => f.write_str(CONSTRUCTOR_IDENT),
            Self::Method(name) => f.write_str(name),
        }
    }
}

/// One public method declaration found in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodDescriptor {
    /// Declared name, or [`CONSTRUCTOR_IDENT`] for the constructor
    pub name: String,
    /// Declared `static`
    pub is_shared: bool,
    pub is_constructor: bool,
    /// Parameter list between the parentheses, verbatim
    pub raw_parameter_list: String,
}

impl MethodDescriptor {
    pub fn method(name: impl Into<String>, is_shared: bool, params: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_shared,
            is_constructor: false,
            raw_parameter_list: params.into(),
        }
    }

    pub fn constructor(params: impl Into<String>) -> Self {
        Self {
            name: CONSTRUCTOR_IDENT.to_string(),
            is_shared: false,
            is_constructor: true,
            raw_parameter_list: params.into(),
        }
    }

    pub fn key(&self) -> MethodKey {
        if self.is_constructor {
            MethodKey::Constructor
        } else {
            MethodKey::Method(fold_identifier(&self.name))
        }
    }
}

/// The class name and its public surface, in source order.
///
/// Built once per scan and never mutated afterwards; every generator reads
/// the same instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassMockSpec {
    class_name: String,
    methods: Vec<MethodDescriptor>,
}

impl ClassMockSpec {
    pub fn new(class_name: impl Into<String>, methods: Vec<MethodDescriptor>) -> Self {
        Self {
            class_name: class_name.into(),
            methods,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    pub fn constructor(&self) -> Option<&MethodDescriptor> {
        self.methods.iter().rev().find(|m| m.is_constructor)
    }

    /// Last descriptor declared under `key`; later duplicates win.
    pub fn find(&self, key: &MethodKey) -> Option<&MethodDescriptor> {
        self.methods.iter().rev().find(|m| &m.key() == key)
    }
}
