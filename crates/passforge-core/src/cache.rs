//! The shared, invalidatable analysis cache.
//!
//! A pass tree shares exactly one [`Cache`]: the root pass creates it (or
//! receives one) and propagates the same reference to every descendant before
//! any rule runs, so `append`/`invalidate` calls made anywhere in the tree are
//! visible everywhere.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::node::Node;

/// One cached analysis outcome: the analysis' name, whether it is still
/// trusted, and the data it accumulated.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub name: String,
    pub valid: bool,
    pub data: IndexMap<String, Node>,
}

impl AnalysisResult {
    pub fn new(name: impl Into<String>, data: IndexMap<String, Node>) -> Self {
        Self {
            name: name.into(),
            valid: true,
            data,
        }
    }
}

/// A shared, append-only, invalidatable store of named analysis results.
///
/// Cloning a `Cache` is cheap and yields a handle to the *same* underlying
/// store (it is an `Rc<RefCell<..>>` under the hood), which is how cache
/// identity is preserved across an entire pass tree without unsafe sharing —
/// the crate's single-threaded concurrency model (see the crate-level docs)
/// makes `Rc<RefCell<_>>` sufficient; nothing here crosses a thread boundary.
#[derive(Debug, Clone, Default)]
pub struct Cache {
    store: Rc<RefCell<Vec<AnalysisResult>>>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every entry recorded under `name`, valid and stale alike, oldest first.
    pub fn get(&self, name: &str) -> Vec<AnalysisResult> {
        self.store
            .borrow()
            .iter()
            .filter(|entry| entry.name == name)
            .cloned()
            .collect()
    }

    /// The most recently appended *valid* entry for `name`, if any.
    pub fn current(&self, name: &str) -> Option<AnalysisResult> {
        self.store
            .borrow()
            .iter()
            .rev()
            .find(|entry| entry.name == name && entry.valid)
            .cloned()
    }

    pub fn append(&self, entry: AnalysisResult) {
        self.store.borrow_mut().push(entry);
    }

    /// Invalidate every currently-valid entry sharing `entry.name`, then append
    /// `entry`. This is how a rerun of the same named analysis supersedes its
    /// own prior result: the old entry survives in `history` as stale, the new
    /// one becomes the current valid reading.
    pub fn supersede(&self, entry: AnalysisResult) {
        self.invalidate(&entry.name);
        self.append(entry);
    }

    /// Mark every currently-valid entry named `name` as stale. Already-stale
    /// entries are left untouched.
    pub fn invalidate(&self, name: &str) {
        for entry in self.store.borrow_mut().iter_mut() {
            if entry.name == name && entry.valid {
                entry.valid = false;
            }
        }
    }

    /// The full history, in append order. Primarily for tests that assert on
    /// cache contents directly.
    pub fn history(&self) -> Vec<AnalysisResult> {
        self.store.borrow().clone()
    }

    /// Whether `other` refers to the same underlying store as `self`.
    pub fn is_same(&self, other: &Cache) -> bool {
        Rc::ptr_eq(&self.store, &other.store)
    }
}

#[cfg(test)]
mod cache_tests;
