use relmap::{
    driver::{operation::Transaction, Operation},
    stmt::Value,
};
use std::sync::{Arc, Mutex};

/// A wrapper around the operations log that provides a clean API for tests
pub struct ExecLog {
    ops: Arc<Mutex<Vec<Operation>>>,
}

impl ExecLog {
    pub(crate) fn new(ops: Arc<Mutex<Vec<Operation>>>) -> Self {
        Self { ops }
    }

    pub fn len(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.lock().unwrap().is_empty()
    }

    /// Every logged operation, oldest first.
    pub fn ops(&self) -> Vec<Operation> {
        self.ops.lock().unwrap().clone()
    }

    /// SQL text of every operation that carried one, oldest first.
    pub fn sql(&self) -> Vec<String> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter_map(|op| op.sql().map(str::to_string))
            .collect()
    }

    /// Parameters of the `index`th logged operation.
    pub fn params(&self, index: usize) -> Vec<Value> {
        self.ops.lock().unwrap()[index].params().to_vec()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter_map(|op| match op {
                Operation::Transaction(op) => Some(*op),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.ops.lock().unwrap().clear();
    }
}
