//! Replacement method bodies. A mocked method never runs real logic: it
//! counts the call, notifies the spy and pops the next queued value.

use super::state::StateBundle;
use crate::errors::{MockError, Result};
use crate::extraction::{MethodDescriptor, MethodKey};
use parking_lot::Mutex;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Counts and notifies; produces no value
    Constructor,
    /// Counts, notifies and returns from the queue
    Returning,
}

/// The tracking implementation generated for one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMethod {
    pub key: MethodKey,
    pub name: String,
    pub kind: MethodKind,
    pub is_shared: bool,
    pub raw_parameter_list: String,
}

pub fn body(descriptor: &MethodDescriptor) -> GeneratedMethod {
    GeneratedMethod {
        key: descriptor.key(),
        name: descriptor.name.clone(),
        kind: if descriptor.is_constructor {
            MethodKind::Constructor
        } else {
            MethodKind::Returning
        },
        is_shared: descriptor.is_shared,
        raw_parameter_list: descriptor.raw_parameter_list.clone(),
    }
}

impl GeneratedMethod {
    /// Run the tracking body against the class's shared state.
    ///
    /// The state lock is released while the spy runs, so a spy may read or
    /// reset counters on the same mock. A failing spy aborts the call before
    /// a queued value is consumed; the count has already been taken.
    pub fn invoke(&self, state: &Mutex<StateBundle>, args: &[Value]) -> Result<Option<Value>> {
        let spy = state.lock().slot_mut(&self.key)?.record_call();

        if let Some(spy) = spy {
            let spy_args = match self.kind {
                MethodKind::Constructor => &[][..],
                MethodKind::Returning => args,
            };
            spy.call(spy_args).map_err(MockError::Spy)?;
        }

        match self.kind {
            MethodKind::Constructor => Ok(None),
            MethodKind::Returning => Ok(state.lock().slot_mut(&self.key)?.next_value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ClassMockSpec;
    use crate::generation::state::{bundle, Spy};
    use serde_json::json;
    use std::sync::Arc;

    fn setup() -> (GeneratedMethod, GeneratedMethod, Mutex<StateBundle>) {
        let spec = ClassMockSpec::new(
            "Widget",
            vec![
                MethodDescriptor::constructor(""),
                MethodDescriptor::method("spin", false, "$n"),
            ],
        );
        let ctor = body(&spec.methods()[0]);
        let spin = body(&spec.methods()[1]);
        (ctor, spin, Mutex::new(bundle(&spec)))
    }

    #[test]
    fn test_returning_body_pops_queue_then_yields_none() {
        let (_, spin, state) = setup();
        state
            .lock()
            .slot_mut(&spin.key)
            .unwrap()
            .queue
            .as_mut()
            .unwrap()
            .reprogram(vec![json!(10), json!(20)]);

        assert_eq!(spin.invoke(&state, &[json!(1)]).unwrap(), Some(json!(10)));
        assert_eq!(spin.invoke(&state, &[json!(2)]).unwrap(), Some(json!(20)));
        assert_eq!(spin.invoke(&state, &[json!(3)]).unwrap(), None);
        assert_eq!(state.lock().slot(&spin.key).unwrap().call_count, 3);
    }

    #[test]
    fn test_constructor_spy_gets_no_arguments() {
        let (ctor, _, state) = setup();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        state.lock().slot_mut(&ctor.key).unwrap().spy = Some(Spy::new(move |args| {
            sink.lock().push(args.len());
            Ok(())
        }));

        assert_eq!(ctor.invoke(&state, &[json!("ignored")]).unwrap(), None);
        assert_eq!(*seen.lock(), vec![0]);
    }

    #[test]
    fn test_failing_spy_propagates_and_keeps_queue() {
        let (_, spin, state) = setup();
        {
            let mut guard = state.lock();
            let slot = guard.slot_mut(&spin.key).unwrap();
            slot.queue.as_mut().unwrap().reprogram(vec![json!("kept")]);
            slot.spy = Some(Spy::new(|_| anyhow::bail!("spy refused")));
        }

        let err = spin.invoke(&state, &[]).unwrap_err();
        assert_eq!(err.to_string(), "spy refused");

        let guard = state.lock();
        let slot = guard.slot(&spin.key).unwrap();
        assert_eq!(slot.call_count, 1);
        assert_eq!(slot.queue.as_ref().unwrap().cursor(), 0);
    }

    #[test]
    fn test_spy_may_read_state_reentrantly() {
        let (_, spin, state) = setup();
        let state = Arc::new(state);
        let observed = Arc::new(Mutex::new(None));

        let weak = Arc::downgrade(&state);
        let key = spin.key.clone();
        let out = Arc::clone(&observed);
        state.lock().slot_mut(&spin.key).unwrap().spy = Some(Spy::new(move |_| {
            if let Some(state) = weak.upgrade() {
                *out.lock() = Some(state.lock().slot(&key)?.call_count);
            }
            Ok(())
        }));

        spin.invoke(&state, &[]).unwrap();
        assert_eq!(*observed.lock(), Some(1));
    }
}
