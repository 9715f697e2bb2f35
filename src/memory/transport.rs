use crate::transport::{Request, Transport, TransportFailure};
use core::cell::RefCell;
use futures::{
	channel::oneshot,
	future::{FutureExt, LocalBoxFuture},
};
use std::rc::Rc;
use tracing::{trace, warn};

type Settle = oneshot::Sender<Result<String, TransportFailure>>;

/// A [`Transport`] whose requests stay pending until settled by hand, in any order.
///
/// Clones share the same request log.
#[derive(Clone, Default)]
pub struct DeferredTransport {
	requests: Rc<RefCell<Vec<(Request, Option<Settle>)>>>,
}

impl DeferredTransport {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Every request issued so far, settled or not, in order.
	#[must_use]
	pub fn requests(&self) -> Vec<Request> {
		self.requests.borrow().iter().map(|(request, _)| request.clone()).collect()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.requests.borrow().len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Resolves the `index`th request with `body`.
	///
	/// Returns `false` iff there is no such request, it was already settled or nobody awaits it anymore.
	pub fn resolve(&self, index: usize, body: impl Into<String>) -> bool {
		self.settle(index, Ok(body.into()))
	}

	/// Rejects the `index`th request with `failure`. Returns like [`DeferredTransport::resolve`].
	pub fn reject(&self, index: usize, failure: impl Into<String>) -> bool {
		self.settle(index, Err(TransportFailure::new(failure)))
	}

	fn settle(&self, index: usize, result: Result<String, TransportFailure>) -> bool {
		let settle = self.requests.borrow_mut().get_mut(index).and_then(|(_, settle)| settle.take());
		match settle {
			Some(settle) => settle.send(result).is_ok(),
			None => {
				warn!("Request {} doesn't exist or was already settled.", index);
				false
			}
		}
	}
}

impl Transport for DeferredTransport {
	fn request(&self, request: Request) -> LocalBoxFuture<'static, Result<String, TransportFailure>> {
		let (settle, settled) = oneshot::channel();
		trace!("Deferring {:?}.", request.url);
		self.requests.borrow_mut().push((request, Some(settle)));
		settled.map(|settled| settled.unwrap_or_else(|oneshot::Canceled| Err(TransportFailure::new("The request was dropped without settling.")))).boxed_local()
	}
}
