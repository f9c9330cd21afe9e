//! # Recursion Guard
//!
//! Tracks the objects a traversal is currently inside so cyclic graphs are
//! walked once. A guard belongs to one top-level call; it is passed down the
//! recursion explicitly instead of living in thread-local storage.

use crate::value::{ObjectRef, Value};

#[derive(Debug, Default)]
pub struct RecursionGuard {
    in_progress: Vec<ObjectRef>,
    depth: usize,
}

impl RecursionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record entry into `value`
    ///
    /// Returns `false` if `value` is an object already being traversed; the
    /// caller must not descend into it. Every call must be paired with
    /// [`exit`](Self::exit), whatever it returned.
    pub fn enter(&mut self, value: &Value) -> bool {
        self.depth += 1;

        let Value::Object(object) = value else {
            return true;
        };

        if self.in_progress.iter().any(|seen| seen.ptr_eq(object)) {
            tracing::debug!("[GUARD] Cycle detected at {}", object.class().name);
            return false;
        }
        self.in_progress.push(object.clone());
        true
    }

    /// Leave the innermost entry; the tracked set is cleared once the
    /// outermost entry is left
    pub fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.in_progress.clear();
        }
    }

    /// Number of unmatched `enter` calls
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_idle(&self) -> bool {
        self.depth == 0 && self.in_progress.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{ClassBuilder, TypeRegistry};

    fn object() -> ObjectRef {
        let registry = TypeRegistry::new();
        registry
            .register_class(ClassBuilder::new("App.Node"))
            .unwrap()
            .instantiate()
            .unwrap()
    }

    #[test]
    fn same_reference_is_not_reentered() {
        let node = Value::Object(object());
        let mut guard = RecursionGuard::new();

        assert!(guard.enter(&node));
        assert!(!guard.enter(&node));
        guard.exit();
        guard.exit();
        assert!(guard.is_idle());
    }

    #[test]
    fn distinct_objects_of_same_class_are_allowed() {
        let mut guard = RecursionGuard::new();
        assert!(guard.enter(&Value::Object(object())));
        assert!(guard.enter(&Value::Object(object())));
        assert_eq!(guard.depth(), 2);
    }

    #[test]
    fn scalars_always_enter() {
        let text = Value::from("same");
        let mut guard = RecursionGuard::new();
        assert!(guard.enter(&text));
        assert!(guard.enter(&text));
        assert!(guard.enter(&Value::I32(1)));
    }

    #[test]
    fn state_is_cleared_after_outermost_exit() {
        let node = Value::Object(object());
        let mut guard = RecursionGuard::new();

        guard.enter(&node);
        guard.exit();
        assert!(guard.is_idle());
        assert!(guard.enter(&node));
    }

    #[test]
    fn extra_exit_does_not_underflow() {
        let mut guard = RecursionGuard::new();
        guard.exit();
        assert_eq!(guard.depth(), 0);
    }
}
