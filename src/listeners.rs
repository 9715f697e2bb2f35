//! Delegated listener bookkeeping, shared by the DOM backends.
//!
//! Each element gets one native listener per base event type (`click`), created on first use.
//! Every namespaced registration riding on it holds one count, and the native listener is handed back
//! for detaching once the last registration for its base type is removed.

use crate::{
	dom::{EventType, Handler},
	error::DomError,
	rc_hash_map::{CountSaturatedError, RcHashMap},
};
use tracing::{trace, warn};

impl From<CountSaturatedError> for DomError {
	fn from(_: CountSaturatedError) -> Self {
		DomError::ListenerSaturated { event_type: String::new() }
	}
}

struct Binding {
	event_type: EventType,
	selector: String,
	handler: Handler,
}

/// The registrations of a single element. `N` is the backend's native listener handle.
pub(crate) struct ListenerRegistry<N> {
	natives: RcHashMap<String, u16, N>,
	bindings: Vec<Binding>,
}

impl<N> Default for ListenerRegistry<N> {
	fn default() -> Self {
		Self {
			natives: RcHashMap::new(),
			bindings: Vec::new(),
		}
	}
}

impl<N> ListenerRegistry<N> {
	/// Registers `handler`, calling `attach` with the base type iff no native listener exists for it yet.
	pub fn bind(&mut self, event_type: &EventType, selector: &str, handler: Handler, attach: impl FnOnce(&str) -> Result<N, DomError>) -> Result<(), DomError> {
		let base = event_type.base();
		if base.is_empty() {
			warn!("Ignoring registration without a base event type: {:?}", event_type.to_string());
			return Ok(());
		}

		self.natives.increment_or_try_insert_with(base.to_owned(), || attach(base)).map_err(|error| match error {
			DomError::ListenerSaturated { .. } => DomError::ListenerSaturated { event_type: event_type.to_string() },
			other => other,
		})?;
		self.bindings.push(Binding {
			event_type: event_type.clone(),
			selector: selector.to_owned(),
			handler,
		});
		trace!("Registered {} for {:?}.", event_type, selector);
		Ok(())
	}

	/// Removes all registrations matched by `pattern` and returns the native listeners that became unused.
	pub fn unbind(&mut self, pattern: &EventType) -> Vec<(String, N)> {
		let natives = &mut self.natives;
		let mut removed = 0_usize;
		self.bindings.retain(|binding| {
			if !pattern.matches(&binding.event_type) {
				return true;
			}
			if let Err(CountSaturatedError) = natives.weak_decrement(binding.event_type.base()) {
				warn!("Listener count underflow for {:?}.", binding.event_type.base());
			}
			removed += 1;
			false
		});
		let released = self.natives.drain_weak();
		trace!("Unregistered {} binding(s) for {}, releasing {} native listener(s).", removed, pattern, released.len());
		released
	}

	/// The handlers registered for `base`, in registration order, with their delegate selectors.
	///
	/// Returns clones so the caller can run them without holding a borrow of the registry.
	pub fn handlers(&self, base: &str) -> Vec<(String, Handler)> {
		self.bindings
			.iter()
			.filter(|binding| binding.event_type.base() == base)
			.map(|binding| (binding.selector.clone(), binding.handler.clone()))
			.collect()
	}

	/// How many registrations `pattern` matches.
	pub fn count(&self, pattern: &EventType) -> usize {
		self.bindings.iter().filter(|binding| pattern.matches(&binding.event_type)).count()
	}

	/// How many native listeners are attached.
	#[cfg(test)]
	pub fn native_count(&self) -> usize {
		self.natives.len()
	}
}
