//! Per-method tracking state and the bundle that owns it.

use super::unique_methods;
use crate::errors::{MockError, Result};
use crate::extraction::{ClassMockSpec, MethodKey};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Callback signature for spies: receives the call's arguments.
pub type SpyFn = dyn Fn(&[Value]) -> anyhow::Result<()> + Send + Sync;

/// An installed observer callback.
#[derive(Clone)]
pub struct Spy(Arc<SpyFn>);

impl Spy {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&[Value]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(callback))
    }

    pub fn call(&self, args: &[Value]) -> anyhow::Result<()> {
        (self.0)(args)
    }
}

impl fmt::Debug for Spy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Spy(..)")
    }
}

/// One-shot queue of programmed return values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReturnQueue {
    values: Vec<Value>,
    cursor: usize,
}

impl ReturnQueue {
    /// Replace the queue and rewind the cursor.
    pub fn reprogram(&mut self, values: Vec<Value>) {
        self.values = values;
        self.cursor = 0;
    }

    /// Next unconsumed value, or `None` once the queue is exhausted.
    pub fn next_value(&mut self) -> Option<Value> {
        let value = self.values.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(value)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Tracking slots for one method. Constructors carry no return queue.
#[derive(Debug, Clone, Default)]
pub struct MockState {
    pub call_count: u64,
    pub queue: Option<ReturnQueue>,
    pub spy: Option<Spy>,
}

impl MockState {
    pub fn for_constructor() -> Self {
        Self::default()
    }

    pub fn for_method() -> Self {
        Self {
            queue: Some(ReturnQueue::default()),
            ..Self::default()
        }
    }

    /// Count one call and hand back the spy to notify, if any.
    pub fn record_call(&mut self) -> Option<Spy> {
        self.call_count += 1;
        self.spy.clone()
    }

    pub fn next_value(&mut self) -> Option<Value> {
        self.queue.as_mut().and_then(ReturnQueue::next_value)
    }
}

/// Every slot of one mocked class, keyed by method.
///
/// State is class-level: all instances of the mock share one bundle.
#[derive(Debug, Clone)]
pub struct StateBundle {
    class_name: String,
    slots: HashMap<MethodKey, MockState>,
}

impl StateBundle {
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn slot(&self, key: &MethodKey) -> Result<&MockState> {
        self.slots
            .get(key)
            .ok_or_else(|| MockError::unknown_method(&self.class_name, key.to_string()))
    }

    pub fn slot_mut(&mut self, key: &MethodKey) -> Result<&mut MockState> {
        let class_name = &self.class_name;
        self.slots
            .get_mut(key)
            .ok_or_else(|| MockError::unknown_method(class_name, key.to_string()))
    }

    pub fn slots_mut(&mut self) -> impl Iterator<Item = &mut MockState> {
        self.slots.values_mut()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Declare the private slots every discovered method needs.
pub fn bundle(spec: &ClassMockSpec) -> StateBundle {
    let slots = unique_methods(spec)
        .into_iter()
        .map(|method| {
            let state = if method.is_constructor {
                MockState::for_constructor()
            } else {
                MockState::for_method()
            };
            (method.key(), state)
        })
        .collect();

    StateBundle {
        class_name: spec.class_name().to_string(),
        slots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::MethodDescriptor;
    use serde_json::json;

    fn widget() -> ClassMockSpec {
        ClassMockSpec::new(
            "Widget",
            vec![
                MethodDescriptor::constructor(""),
                MethodDescriptor::method("spin", false, "$n"),
            ],
        )
    }

    #[test]
    fn test_constructor_slot_has_no_queue() {
        let state = bundle(&widget());
        assert_eq!(state.len(), 2);
        assert!(state.slot(&MethodKey::Constructor).unwrap().queue.is_none());

        let spin = state.slot(&MethodKey::Method("spin".into())).unwrap();
        let queue = spin.queue.as_ref().unwrap();
        assert!(queue.is_empty());
        assert_eq!(queue.cursor(), 0);
        assert_eq!(spin.call_count, 0);
        assert!(spin.spy.is_none());
    }

    #[test]
    fn test_queue_consumes_in_order_then_runs_dry() {
        let mut queue = ReturnQueue::default();
        queue.reprogram(vec![json!(1), json!(null)]);

        assert_eq!(queue.next_value(), Some(json!(1)));
        assert_eq!(queue.next_value(), Some(Value::Null));
        assert_eq!(queue.next_value(), None);
        assert_eq!(queue.cursor(), 2);
    }

    #[test]
    fn test_reprogram_rewinds_cursor() {
        let mut queue = ReturnQueue::default();
        queue.reprogram(vec![json!("a"), json!("b")]);
        queue.next_value();

        queue.reprogram(vec![json!("c")]);
        assert_eq!(queue.cursor(), 0);
        assert_eq!(queue.next_value(), Some(json!("c")));
    }

    #[test]
    fn test_unknown_slot() {
        let state = bundle(&widget());
        let err = state.slot(&MethodKey::Method("fly".into())).unwrap_err();
        assert!(matches!(err, MockError::UnknownMethod { .. }));
    }
}
