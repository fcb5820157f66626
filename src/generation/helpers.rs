//! Accessor operations generated for each mocked method.
//!
//! Instead of synthesizing `_getGlobalTimesCalled<Name>`-style identifiers,
//! the helper table records which operations each [`MethodKey`] supports and
//! applies them to the [`StateBundle`] by key.

use super::state::{Spy, StateBundle};
use super::unique_methods;
use crate::common::capitalize_first;
use crate::errors::{MockError, Result};
use crate::extraction::{ClassMockSpec, MethodKey};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelperOp {
    GetCount,
    ResetCount,
    SetReturnValues,
    SetSpy,
}

impl HelperOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetCount => "get_call_count",
            Self::ResetCount => "reset_call_count",
            Self::SetReturnValues => "set_return_values",
            Self::SetSpy => "set_spy",
        }
    }
}

const CONSTRUCTOR_OPS: &[HelperOp] = &[HelperOp::GetCount, HelperOp::ResetCount, HelperOp::SetSpy];
const METHOD_OPS: &[HelperOp] = &[
    HelperOp::GetCount,
    HelperOp::ResetCount,
    HelperOp::SetReturnValues,
    HelperOp::SetSpy,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperEntry {
    pub key: MethodKey,
    /// Initial-capitalised name used in emitted helper identifiers
    pub display_name: String,
    pub ops: &'static [HelperOp],
}

/// Helper operations for one class, in declaration order.
#[derive(Debug, Clone)]
pub struct HelperTable {
    class_name: String,
    entries: Vec<HelperEntry>,
    index: HashMap<MethodKey, usize>,
}

pub fn helpers(spec: &ClassMockSpec) -> HelperTable {
    let entries: Vec<HelperEntry> = unique_methods(spec)
        .into_iter()
        .map(|method| HelperEntry {
            key: method.key(),
            display_name: capitalize_first(&method.name),
            ops: if method.is_constructor {
                CONSTRUCTOR_OPS
            } else {
                METHOD_OPS
            },
        })
        .collect();
    let index = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| (entry.key.clone(), i))
        .collect();

    HelperTable {
        class_name: spec.class_name().to_string(),
        entries,
        index,
    }
}

impl HelperTable {
    pub fn entries(&self) -> &[HelperEntry] {
        &self.entries
    }

    pub fn entry(&self, key: &MethodKey) -> Option<&HelperEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Fail unless `key` has a helper for `op`.
    pub fn check(&self, key: &MethodKey, op: HelperOp) -> Result<()> {
        let entry = self
            .entry(key)
            .ok_or_else(|| MockError::unknown_method(&self.class_name, key.to_string()))?;
        if entry.ops.contains(&op) {
            Ok(())
        } else {
            Err(MockError::unsupported(
                &self.class_name,
                entry.display_name.clone(),
                op.as_str(),
            ))
        }
    }

    pub fn get_call_count(&self, state: &StateBundle, key: &MethodKey) -> Result<u64> {
        self.check(key, HelperOp::GetCount)?;
        Ok(state.slot(key)?.call_count)
    }

    /// Zero the counter; the queue and cursor are untouched.
    pub fn reset_call_count(&self, state: &mut StateBundle, key: &MethodKey) -> Result<()> {
        self.check(key, HelperOp::ResetCount)?;
        state.slot_mut(key)?.call_count = 0;
        Ok(())
    }

    pub fn set_return_values(
        &self,
        state: &mut StateBundle,
        key: &MethodKey,
        values: Vec<Value>,
    ) -> Result<()> {
        self.check(key, HelperOp::SetReturnValues)?;
        let slot = state.slot_mut(key)?;
        slot.queue.get_or_insert_with(Default::default).reprogram(values);
        Ok(())
    }

    pub fn set_spy(&self, state: &mut StateBundle, key: &MethodKey, spy: Spy) -> Result<()> {
        self.check(key, HelperOp::SetSpy)?;
        state.slot_mut(key)?.spy = Some(spy);
        Ok(())
    }

    /// Zero every counter, constructor included. Queues and spies stay.
    pub fn reset_all(&self, state: &mut StateBundle) {
        for slot in state.slots_mut() {
            slot.call_count = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::MethodDescriptor;
    use crate::generation::state::bundle;
    use serde_json::json;

    fn widget() -> ClassMockSpec {
        ClassMockSpec::new(
            "Widget",
            vec![
                MethodDescriptor::constructor(""),
                MethodDescriptor::method("spin", false, "$n"),
                MethodDescriptor::method("stop", false, ""),
            ],
        )
    }

    fn spin() -> MethodKey {
        MethodKey::Method("spin".into())
    }

    #[test]
    fn test_entries_follow_declaration_order() {
        let table = helpers(&widget());
        let names: Vec<_> = table
            .entries()
            .iter()
            .map(|e| e.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["Constructor", "Spin", "Stop"]);
    }

    #[test]
    fn test_constructor_has_no_return_value_helper() {
        let table = helpers(&widget());
        let mut state = bundle(&widget());

        let err = table
            .set_return_values(&mut state, &MethodKey::Constructor, vec![json!(1)])
            .unwrap_err();
        assert!(matches!(
            err,
            MockError::UnsupportedOperation {
                operation: "set_return_values",
                ..
            }
        ));
        assert!(table.check(&MethodKey::Constructor, HelperOp::SetSpy).is_ok());
    }

    #[test]
    fn test_reset_count_leaves_queue_alone() {
        let table = helpers(&widget());
        let mut state = bundle(&widget());
        table
            .set_return_values(&mut state, &spin(), vec![json!(1), json!(2)])
            .unwrap();
        state.slot_mut(&spin()).unwrap().call_count = 4;
        state.slot_mut(&spin()).unwrap().next_value();

        table.reset_call_count(&mut state, &spin()).unwrap();

        assert_eq!(table.get_call_count(&state, &spin()).unwrap(), 0);
        assert_eq!(state.slot(&spin()).unwrap().queue.as_ref().unwrap().cursor(), 1);
    }

    #[test]
    fn test_reset_all_zeroes_every_counter_including_constructor() {
        let table = helpers(&widget());
        let mut state = bundle(&widget());
        for slot in state.slots_mut() {
            slot.call_count = 3;
        }

        table.reset_all(&mut state);

        for entry in table.entries() {
            assert_eq!(table.get_call_count(&state, &entry.key).unwrap(), 0);
        }
    }

    #[test]
    fn test_unknown_method() {
        let table = helpers(&widget());
        let err = table
            .check(&MethodKey::Method("fly".into()), HelperOp::GetCount)
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown method: Widget::fly");
    }
}
