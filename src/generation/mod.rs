//! Mock synthesis: state slots, tracking bodies and helper operations for
//! every method of a [`ClassMockSpec`].
//!
//! All generators read the same spec. When two declarations share a key the
//! later one wins everywhere, so state, bodies and helpers always agree.

pub mod body;
pub mod helpers;
pub mod render;
pub mod state;

pub use body::{body, GeneratedMethod, MethodKind};
pub use helpers::{helpers, HelperEntry, HelperOp, HelperTable};
pub use render::render_mock_source;
pub use state::{bundle, MockState, ReturnQueue, Spy, SpyFn, StateBundle};

use crate::extraction::{ClassMockSpec, MethodDescriptor};
use std::collections::HashMap;

/// Descriptors with later duplicates removed, in declaration order.
pub(crate) fn unique_methods(spec: &ClassMockSpec) -> Vec<&MethodDescriptor> {
    let methods = spec.methods();
    let last_index: HashMap<_, _> = methods
        .iter()
        .enumerate()
        .map(|(i, m)| (m.key(), i))
        .collect();

    methods
        .iter()
        .enumerate()
        .filter(|(i, m)| last_index.get(&m.key()) == Some(i))
        .map(|(_, m)| m)
        .collect()
}

/// Everything the installer needs for one class.
#[derive(Debug, Clone)]
pub struct GeneratedMock {
    pub state: StateBundle,
    pub methods: Vec<GeneratedMethod>,
    pub helpers: HelperTable,
}

/// Run all three generators over `spec`.
pub fn generate(spec: &ClassMockSpec) -> GeneratedMock {
    GeneratedMock {
        state: bundle(spec),
        methods: unique_methods(spec).into_iter().map(body).collect(),
        helpers: helpers(spec),
    }
}
