use crate::sink::{Failure, Sink};
use core::cell::RefCell;
use serde_json::Value;
use std::rc::Rc;

/// A [`Sink`] that keeps every report. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
	successes: Rc<RefCell<Vec<Value>>>,
	failures: Rc<RefCell<Vec<Failure>>>,
}

impl MemorySink {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn successes(&self) -> Vec<Value> {
		self.successes.borrow().clone()
	}

	#[must_use]
	pub fn failures(&self) -> Vec<Failure> {
		self.failures.borrow().clone()
	}
}

impl Sink for MemorySink {
	fn success(&self, value: &Value) {
		self.successes.borrow_mut().push(value.clone());
	}

	fn failure(&self, failure: &Failure) {
		self.failures.borrow_mut().push(failure.clone());
	}
}
