//! Signature scanner: class name and public method declarations.
//!
//! Matching runs on sanitized text. When the raw text is available too, the
//! parameter lists are sliced out of the raw text at the same byte offsets, so
//! string defaults such as `$sep = ", "` survive verbatim.

use super::sanitizer::sanitize;
use super::types::{ClassMockSpec, MethodDescriptor};
use crate::config::default_constructor_name;
use crate::errors::{MockError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

// `class` preceded by `$`, `->` or `::` is a variable, property or constant
static CLASS_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[^A-Za-z0-9_$>:])class\s+([A-Za-z_][A-Za-z0-9_]*)")
        .expect("valid class regex")
});

static PUBLIC_METHOD_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(public\s+static|static\s+public|public)\s+function\s+&?\s*([A-Za-z_][A-Za-z0-9_]*)\s*\(",
    )
    .expect("valid method regex")
});

#[derive(Debug, Clone)]
pub struct SignatureScanner {
    constructor_name: String,
}

impl Default for SignatureScanner {
    fn default() -> Self {
        Self::new(default_constructor_name())
    }
}

impl SignatureScanner {
    pub fn new(constructor_name: impl Into<String>) -> Self {
        Self {
            constructor_name: constructor_name.into(),
        }
    }

    /// Extract from text whose comments and literals are already blanked.
    ///
    /// # Errors
    ///
    /// `NoClassFound` when no class declaration matches, `Parse` when a
    /// parameter list never closes.
    pub fn extract(&self, sanitized: &str) -> Result<ClassMockSpec> {
        self.extract_aligned(sanitized, sanitized)
    }

    /// Sanitize `source` first, then extract with verbatim parameter lists.
    pub fn extract_source(&self, source: &str) -> Result<ClassMockSpec> {
        let cleaned = sanitize(source);
        self.extract_aligned(source, &cleaned)
    }

    /// `raw` and `scan` must have identical byte layouts (see [`sanitize`]).
    fn extract_aligned(&self, raw: &str, scan: &str) -> Result<ClassMockSpec> {
        debug_assert_eq!(raw.len(), scan.len());

        let class_name = find_class_name(scan).ok_or_else(|| MockError::no_class_found(None))?;

        let mut methods = Vec::new();
        let mut seen = HashSet::new();
        for caps in PUBLIC_METHOD_DECL.captures_iter(scan) {
            let (Some(whole), Some(modifiers), Some(name)) =
                (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            let open = whole.end() - 1;
            let close = matching_paren(scan, open).ok_or_else(|| {
                MockError::parse(
                    open,
                    format!("unclosed parameter list for `{}`", name.as_str()),
                )
            })?;
            let params = &raw[open + 1..close];
            let is_shared = modifiers.as_str().to_ascii_lowercase().contains("static");

            let descriptor = if name.as_str().eq_ignore_ascii_case(&self.constructor_name) {
                MethodDescriptor::constructor(params)
            } else {
                MethodDescriptor::method(name.as_str(), is_shared, params)
            };
            if !seen.insert(descriptor.key()) {
                log::warn!(
                    "{}::{} is declared more than once; the later declaration overrides the earlier",
                    class_name,
                    descriptor.name
                );
            }
            methods.push(descriptor);
        }

        log::debug!(
            "Scanned class {} with {} public method(s)",
            class_name,
            methods.len()
        );
        Ok(ClassMockSpec::new(class_name, methods))
    }
}

fn find_class_name(scan: &str) -> Option<String> {
    CLASS_DECL
        .captures(scan)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Index of the `)` matching the `(` at `open`.
fn matching_paren(scan: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in scan.bytes().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
