//! `Value::ArgumentList` — a `List` that also carries keyword-rest
//! entries and a "were keywords accessed" flag (spec §3, design note in
//! §9: "needs a mutable 'were keywords accessed' flag that survives
//! across the call").
//!
//! Represented with an interior-mutable `Cell`, per the design note's
//! suggested resolution, so `ArgumentList` can remain an otherwise
//! immutable, `Clone`-able `Value` variant.

use std::cell::Cell;
use std::rc::Rc;

use crate::common::ListSeparator;
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct ArgumentList {
    positional: Vec<Value>,
    keywords: Vec<(String, Value)>,
    separator: ListSeparator,
    /// Shared so that accessing keywords through any clone of this
    /// argument list is visible to the binding-finalization check
    /// (spec §4.4 point 4 exempts built-in overload redirects).
    keywords_accessed: Rc<Cell<bool>>,
}

impl ArgumentList {
    pub fn new(positional: Vec<Value>, keywords: Vec<(String, Value)>, separator: ListSeparator) -> Self {
        ArgumentList {
            positional,
            keywords,
            separator,
            keywords_accessed: Rc::new(Cell::new(false)),
        }
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn separator(&self) -> ListSeparator {
        self.separator
    }

    /// Reading the keyword map marks it accessed; called by the
    /// `keywords()` built-in and by final unbound-named-argument checks.
    pub fn keywords(&self) -> &[(String, Value)] {
        self.keywords_accessed.set(true);
        &self.keywords
    }

    pub fn were_keywords_accessed(&self) -> bool {
        self.keywords_accessed.get()
    }

    pub fn as_list_values(&self) -> Vec<Value> {
        self.positional.clone()
    }
}

impl PartialEq for ArgumentList {
    fn eq(&self, other: &Self) -> bool {
        self.positional == other.positional && self.keywords == other.keywords
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_access_flag_is_shared_across_clones() {
        let list = ArgumentList::new(vec![], vec![("key".into(), Value::Null)], ListSeparator::Comma);
        let clone = list.clone();
        assert!(!list.were_keywords_accessed());
        let _ = clone.keywords();
        assert!(list.were_keywords_accessed());
    }
}
