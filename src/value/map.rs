//! `Value::Map` storage. Kept from the teacher's `SassMap` (a flat
//! `Vec<(Value, Value)>`, preserving insertion order) and generalized:
//! the teacher's key lookup went through a span-carrying `equals` call
//! because its `Value` was still entangled with source positions; the
//! evaluator's `Value` is a plain structurally-comparable type (spec
//! §3), so lookups just use `PartialEq` directly.

use std::slice::Iter;
use std::vec::IntoIter;

use codemap::Span;

use crate::common::{Brackets, ListSeparator};
use crate::error::{SassError, SassResult};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct SassMap(Vec<(Value, Value)>);

impl SassMap {
    pub const fn new() -> SassMap {
        SassMap(Vec::new())
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &Value) {
        self.0.retain(|(k, ..)| k != key);
    }

    pub fn merge(&mut self, other: SassMap) {
        for (key, value) in other {
            self.insert(key, value);
        }
    }

    pub fn iter(&self) -> Iter<(Value, Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> Vec<Value> {
        self.0.iter().map(|(k, ..)| k.clone()).collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.0.iter().map(|(.., v)| v.clone()).collect()
    }

    pub fn as_list(&self) -> Vec<Value> {
        self.0
            .iter()
            .map(|(k, v)| Value::List(vec![k.clone(), v.clone()], ListSeparator::Space, Brackets::None))
            .collect()
    }

    pub fn entries(self) -> Vec<(Value, Value)> {
        self.0
    }

    /// Returns `true` if the key already existed (and was overwritten).
    pub fn insert(&mut self, key: Value, value: Value) -> bool {
        for (k, v) in &mut self.0 {
            if k == &key {
                *v = value;
                return true;
            }
        }
        self.0.push((key, value));
        false
    }

    /// Used while constructing a map literal: spec invariant "maps ...
    /// keys unique by value equality" — a key appearing twice is a fatal
    /// error carrying both source spans, not a silent overwrite.
    pub fn insert_unique(&mut self, key: Value, value: Value, span: Span, first_span: Span) -> SassResult<()> {
        if self.0.iter().any(|(k, _)| k == &key) {
            return Err(SassError::runtime_with_secondary(
                format!("Duplicate key {} in map.", key),
                span,
                vec![crate::error::SecondarySpan {
                    label: "first key here".into(),
                    span: first_span,
                }],
            ));
        }
        self.0.push((key, value));
        Ok(())
    }
}

impl Default for SassMap {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoIterator for SassMap {
    type Item = (Value, Value);
    type IntoIter = IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Maps compare as unordered multisets of pairs (spec §3/§4.1): same
/// pairs, any order.
impl Eq for SassMap {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn insert_overwrites_existing_key_in_place() {
        let mut map = SassMap::new();
        map.insert(Value::Bool(true), Value::String("a".into(), crate::common::QuoteKind::None));
        let overwrote = map.insert(Value::Bool(true), Value::String("b".into(), crate::common::QuoteKind::None));
        assert!(overwrote);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn keeps_insertion_order() {
        let mut map = SassMap::new();
        map.insert(Value::Bool(true), Value::Bool(false));
        map.insert(Value::Bool(false), Value::Bool(true));
        assert_eq!(map.keys(), vec![Value::Bool(true), Value::Bool(false)]);
    }
}
