//! The DOM collaborator contract.
//!
//! Implementations: [`memory::MemoryDom`](`crate::memory::MemoryDom`) everywhere, and `web::WebDom` on `wasm32`.

use crate::error::DomError;
use core::{
	fmt::{self, Display, Formatter},
	str::FromStr,
};
use std::rc::Rc;

/// A delegated event handler.
pub type Handler = Rc<dyn Fn(&DomEvent)>;

/// Query and mutation access to a document.
pub trait Dom {
	type Elements: ElementSet + 'static;

	/// Loads `markup` into new, detached elements.
	///
	/// # Errors
	///
	/// Iff `markup` can't be loaded.
	fn parse(&self, markup: &str) -> Result<Self::Elements, DomError>;

	/// All attached elements matching `selector`.
	fn query(&self, selector: &str) -> Self::Elements;
}

/// An ordered set of element references. Cloning is shallow.
pub trait ElementSet: Clone {
	fn len(&self) -> usize;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// All descendants of the elements in this set that match `selector`.
	#[must_use]
	fn find(&self, selector: &str) -> Self;

	/// Appends `child` to the first element of this set.
	///
	/// # Errors
	///
	/// Iff this set is empty or the underlying document refuses the insertion.
	fn append(&self, child: &Self) -> Result<(), DomError>;

	/// Detaches every element of this set from its parent.
	fn remove(&self);

	/// Attaches a delegated listener to each element of this set.
	///
	/// `handler` runs for `event_type`s that bubble up from descendants matching `delegate_selector`,
	/// including descendants added after this call.
	///
	/// # Errors
	///
	/// Iff the listener can't be attached.
	fn on(&self, event_type: &EventType, delegate_selector: &str, handler: Handler) -> Result<(), DomError>;

	/// Removes every listener registered on this set whose event type is matched by `event_type`.
	///
	/// See [`EventType::matches`].
	fn off(&self, event_type: &EventType);
}

/// A (possibly) namespaced event type like `click.exampleClass`.
///
/// The base type is what the document dispatches. The namespaces only exist for selective removal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventType {
	base: String,
	namespaces: Vec<String>,
}

impl EventType {
	/// Any string is a valid event type. Empty namespaces (`click..a`) are skipped.
	#[must_use]
	pub fn new(event_type: &str) -> Self {
		let mut parts = event_type.split('.');
		let base = parts.next().unwrap_or_default().to_owned();
		let mut namespaces: Vec<String> = parts.filter(|ns| !ns.is_empty()).map(ToOwned::to_owned).collect();
		namespaces.sort_unstable();
		namespaces.dedup();
		Self { base, namespaces }
	}

	/// The type the document dispatches, `click` for `click.exampleClass`. Empty for namespace-only patterns.
	#[must_use]
	pub fn base(&self) -> &str {
		&self.base
	}

	#[must_use]
	pub fn namespaces(&self) -> &[String] {
		&self.namespaces
	}

	/// Whether `self`, used as a removal pattern, covers `registered`.
	///
	/// An empty base matches every base. Every namespace of the pattern must be present on `registered`.
	#[must_use]
	pub fn matches(&self, registered: &EventType) -> bool {
		(self.base.is_empty() || self.base == registered.base) && self.namespaces.iter().all(|ns| registered.namespaces.contains(ns))
	}
}

impl FromStr for EventType {
	type Err = core::convert::Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self::new(s))
	}
}

impl Display for EventType {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.base)?;
		for ns in &self.namespaces {
			write!(f, ".{}", ns)?;
		}
		Ok(())
	}
}

/// What a delegated [`Handler`] receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEvent {
	/// The dispatched type, without namespaces.
	pub event_type: String,
	/// The delegate selector the handler was registered with.
	pub selector: String,
}

#[cfg(test)]
mod tests {
	use super::EventType;

	#[test]
	fn parse_and_display() {
		let event_type = EventType::new("click.exampleClass");
		assert_eq!(event_type.base(), "click");
		assert_eq!(event_type.namespaces(), ["exampleClass"]);
		assert_eq!(event_type.to_string(), "click.exampleClass");
		assert_eq!(EventType::new("click").to_string(), "click");
	}

	#[test]
	fn matching() {
		let registered = EventType::new("click.exampleClass");
		assert!(EventType::new("click.exampleClass").matches(&registered));
		assert!(EventType::new("click").matches(&registered));
		assert!(EventType::new(".exampleClass").matches(&registered));
		assert!(!EventType::new("click.otherThing").matches(&registered));
		assert!(!EventType::new("keyup.exampleClass").matches(&registered));
		assert!(!EventType::new("click.exampleClass").matches(&EventType::new("click")));
	}
}
