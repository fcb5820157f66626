//! Mock installation and the registry that resolves mocks by class name.
//!
//! A [`MockClass`] is the assembled substitute type: the scanned spec, one
//! tracking body per method, the helper table and the shared state. The
//! [`MockRegistry`] publishes it under the original class name so that
//! construction by name yields the mock.

use crate::common::fold_identifier;
use crate::config::{MockSettings, MocktailConfig, RedefinitionPolicy};
use crate::errors::{MockError, Result};
use crate::extraction::{ClassMockSpec, MethodKey, SignatureScanner};
use crate::generation::{
    generate, render_mock_source, GeneratedMethod, GeneratedMock, HelperTable, Spy, StateBundle,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// How a caller identifies a spy.
#[derive(Clone)]
pub enum SpyRef {
    Callback(Spy),
    /// Name of a function registered with [`MockRegistry::register_spy_function`]
    Named(String),
}

impl SpyRef {
    pub fn callback<F>(callback: F) -> Self
    where
        F: Fn(&[Value]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::Callback(Spy::new(callback))
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

impl fmt::Debug for SpyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("SpyRef::Callback(..)"),
            Self::Named(name) => write!(f, "SpyRef::Named({name:?})"),
        }
    }
}

/// The installed substitute for one class.
pub struct MockClass {
    spec: ClassMockSpec,
    constructor_name: String,
    methods: HashMap<MethodKey, GeneratedMethod>,
    helpers: HelperTable,
    state: Mutex<StateBundle>,
}

impl fmt::Debug for MockClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockClass")
            .field("class_name", &self.spec.class_name())
            .field("methods", &self.methods.len())
            .finish()
    }
}

impl MockClass {
    /// Assemble the generated pieces into one type description.
    pub fn assemble(
        spec: ClassMockSpec,
        generated: GeneratedMock,
        constructor_name: impl Into<String>,
    ) -> Self {
        let GeneratedMock {
            state,
            methods,
            helpers,
        } = generated;
        Self {
            spec,
            constructor_name: constructor_name.into(),
            methods: methods.into_iter().map(|m| (m.key.clone(), m)).collect(),
            helpers,
            state: Mutex::new(state),
        }
    }

    /// Run the generators over `spec` and assemble the result.
    pub fn from_spec(spec: ClassMockSpec, constructor_name: impl Into<String>) -> Self {
        let generated = generate(&spec);
        Self::assemble(spec, generated, constructor_name)
    }

    pub fn class_name(&self) -> &str {
        self.spec.class_name()
    }

    pub fn spec(&self) -> &ClassMockSpec {
        &self.spec
    }

    fn key(&self, method_name: &str) -> MethodKey {
        MethodKey::resolve(method_name, &self.constructor_name)
    }

    fn method(&self, method_name: &str) -> Result<&GeneratedMethod> {
        self.methods
            .get(&self.key(method_name))
            .ok_or_else(|| MockError::unknown_method(self.class_name(), method_name))
    }

    /// Construct an instance, running the tracking constructor if one was declared.
    pub fn instantiate(self: &Arc<Self>, args: &[Value]) -> Result<MockInstance> {
        if let Some(ctor) = self.methods.get(&MethodKey::Constructor) {
            ctor.invoke(&self.state, args)?;
        }
        Ok(MockInstance {
            class: Arc::clone(self),
        })
    }

    /// Call a `static` method through the class.
    pub fn call_static(&self, method_name: &str, args: &[Value]) -> Result<Option<Value>> {
        let method = self.method(method_name)?;
        if !method.is_shared {
            return Err(MockError::NonStaticCall {
                class: self.class_name().to_string(),
                method: method_name.to_string(),
            });
        }
        method.invoke(&self.state, args)
    }

    fn call_method(&self, method_name: &str, args: &[Value]) -> Result<Option<Value>> {
        let method = self.method(method_name)?;
        if method.key.is_constructor() {
            // Constructors only run through instantiate
            return Err(MockError::unknown_method(self.class_name(), method_name));
        }
        method.invoke(&self.state, args)
    }

    pub fn call_count(&self, method_name: &str) -> Result<u64> {
        self.helpers
            .get_call_count(&self.state.lock(), &self.key(method_name))
    }

    pub fn reset_call_count(&self, method_name: &str) -> Result<()> {
        self.helpers
            .reset_call_count(&mut self.state.lock(), &self.key(method_name))
    }

    /// Replace the method's return queue and rewind its cursor.
    pub fn set_return_values(&self, method_name: &str, values: Vec<Value>) -> Result<()> {
        log::debug!(
            "{}::{} programmed with {} return value(s)",
            self.class_name(),
            method_name,
            values.len()
        );
        self.helpers
            .set_return_values(&mut self.state.lock(), &self.key(method_name), values)
    }

    pub fn set_spy(&self, method_name: &str, spy: Spy) -> Result<()> {
        log::debug!("{}::{} spy installed", self.class_name(), method_name);
        self.helpers
            .set_spy(&mut self.state.lock(), &self.key(method_name), spy)
    }

    /// Zero every method's counter, constructor included.
    pub fn reset_all_counters(&self) {
        self.helpers.reset_all(&mut self.state.lock());
    }

    /// PHP source equivalent of this mock.
    pub fn render_source(&self) -> String {
        render_mock_source(&self.spec, &self.helpers, &self.constructor_name)
    }
}

/// A constructed mock object. All instances of a class share its state.
#[derive(Debug, Clone)]
pub struct MockInstance {
    class: Arc<MockClass>,
}

impl MockInstance {
    pub fn class(&self) -> &Arc<MockClass> {
        &self.class
    }

    /// Invoke `method_name`; `Ok(None)` once its return queue is exhausted.
    pub fn call(&self, method_name: &str, args: &[Value]) -> Result<Option<Value>> {
        self.class.call_method(method_name, args)
    }
}

/// Installed mocks keyed by case-folded class name.
#[derive(Debug, Default)]
pub struct MockRegistry {
    settings: MockSettings,
    classes: HashMap<String, Arc<MockClass>>,
    spy_functions: HashMap<String, Spy>,
}

impl MockRegistry {
    pub fn new(config: MocktailConfig) -> Self {
        Self {
            settings: config.mock,
            classes: HashMap::new(),
            spy_functions: HashMap::new(),
        }
    }

    pub fn settings(&self) -> &MockSettings {
        &self.settings
    }

    /// Read `path`, scan its class and install the mock.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `NoClassFound` if it declares no
    /// class, `MockInstallation` if the class is installed and redefinition
    /// is rejected.
    pub fn generate_class_mock(&mut self, path: impl AsRef<Path>) -> Result<Arc<MockClass>> {
        let path = path.as_ref();
        let _span = tracing::debug_span!("generate_class_mock", path = %path.display()).entered();

        let source = std::fs::read_to_string(path).map_err(|e| MockError::io(path, e))?;
        self.generate_from_source(&source).map_err(|e| match e {
            MockError::NoClassFound { path: None } => {
                MockError::no_class_found(Some(path.to_path_buf()))
            }
            other => other,
        })
    }

    /// Scan `source` and install the mock it describes.
    pub fn generate_from_source(&mut self, source: &str) -> Result<Arc<MockClass>> {
        let scanner = SignatureScanner::new(self.settings.constructor_name.clone());
        let spec = if self.settings.sanitize {
            scanner.extract_source(source)?
        } else {
            scanner.extract(source)?
        };
        let class = MockClass::from_spec(spec, self.settings.constructor_name.clone());
        self.install(class)
    }

    /// Publish `class` under its class name.
    pub fn install(&mut self, class: MockClass) -> Result<Arc<MockClass>> {
        let key = fold_identifier(class.class_name());
        if self.classes.contains_key(&key) {
            match self.settings.redefinition {
                RedefinitionPolicy::Reject => {
                    return Err(MockError::installation(class.class_name()));
                }
                RedefinitionPolicy::Replace => {
                    log::debug!("Replacing installed mock for {}", class.class_name());
                }
            }
        }

        log::debug!(
            "Installed mock {} ({} method(s))",
            class.class_name(),
            class.spec().methods().len()
        );
        let class = Arc::new(class);
        self.classes.insert(key, Arc::clone(&class));
        Ok(class)
    }

    pub fn is_installed(&self, class_name: &str) -> bool {
        self.classes.contains_key(&fold_identifier(class_name))
    }

    pub fn class(&self, class_name: &str) -> Result<Arc<MockClass>> {
        self.classes
            .get(&fold_identifier(class_name))
            .cloned()
            .ok_or_else(|| MockError::unknown_class(class_name))
    }

    /// Construct the installed mock for `class_name`.
    pub fn instantiate(&self, class_name: &str, args: &[Value]) -> Result<MockInstance> {
        self.class(class_name)?.instantiate(args)
    }

    /// Make `name` usable as a [`SpyRef::Named`] spy.
    pub fn register_spy_function<F>(&mut self, name: impl Into<String>, callback: F)
    where
        F: Fn(&[Value]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.spy_functions.insert(name.into(), Spy::new(callback));
    }

    fn resolve_spy(&self, spy: SpyRef) -> Result<Spy> {
        match spy {
            SpyRef::Callback(spy) => Ok(spy),
            SpyRef::Named(name) => self.spy_functions.get(&name).cloned().ok_or_else(|| {
                MockError::invalid_argument(format!(
                    "spy `{name}` does not name a registered function"
                ))
            }),
        }
    }

    /// `values` must be a JSON array; anything else is rejected untouched.
    pub fn set_method_return_values(
        &self,
        class_name: &str,
        method_name: &str,
        values: Value,
    ) -> Result<()> {
        let class = self.class(class_name)?;
        let Value::Array(values) = values else {
            return Err(MockError::invalid_argument(
                "return values must be a sequence",
            ));
        };
        class.set_return_values(method_name, values)
    }

    pub fn get_global_method_count(&self, class_name: &str, method_name: &str) -> Result<u64> {
        self.class(class_name)?.call_count(method_name)
    }

    pub fn reset_global_method_count(&self, class_name: &str, method_name: &str) -> Result<()> {
        self.class(class_name)?.reset_call_count(method_name)
    }

    pub fn reset_all_global_counts(&self, class_name: &str) -> Result<()> {
        self.class(class_name)?.reset_all_counters();
        Ok(())
    }

    pub fn set_spy(&self, class_name: &str, method_name: &str, spy: SpyRef) -> Result<()> {
        let class = self.class(class_name)?;
        let spy = self.resolve_spy(spy)?;
        class.set_spy(method_name, spy)
    }

    /// Drop every installed mock and registered spy function.
    pub fn clear(&mut self) {
        self.classes.clear();
        self.spy_functions.clear();
    }
}
