//! Logical names the component uses, mapped to their namespaced forms.

use crate::{dom::EventType, namespace::Prefixes};
use core::ops::Index;
use hashbrown::HashMap;

/// Selector of the nav item anchors.
pub const NAV_ITEM: &str = "NAV_ITEM";
/// CSS modifier hiding an element.
pub const IS_HIDDEN: &str = "IS_HIDDEN";
/// Click events.
pub const CLICK: &str = "CLICK";

/// A read-only map from logical names to namespaced values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMap<V>(HashMap<&'static str, V>);

impl<V> NameMap<V> {
	fn from_entries(entries: impl IntoIterator<Item = (&'static str, V)>) -> Self {
		Self(entries.into_iter().collect())
	}

	#[must_use]
	pub fn get(&self, name: &str) -> Option<&V> {
		self.0.get(name)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&'static str, &V)> {
		self.0.iter().map(|(name, value)| (*name, value))
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl<V> Index<&str> for NameMap<V> {
	type Output = V;

	/// # Panics
	///
	/// Iff `name` isn't mapped.
	fn index(&self, name: &str) -> &V {
		&self.0[name]
	}
}

/// Everything the component queries, styles and binds by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Names {
	pub selectors: NameMap<String>,
	pub css_modifiers: NameMap<String>,
	pub events: NameMap<EventType>,
}

impl Names {
	#[must_use]
	pub fn new(prefixes: &Prefixes) -> Self {
		Self {
			selectors: NameMap::from_entries([(NAV_ITEM, format!("{}NavItem", prefixes.selector_prefix()))]),
			css_modifiers: NameMap::from_entries([(IS_HIDDEN, format!("{}is--hidden", prefixes.css_modifier_prefix()))]),
			events: NameMap::from_entries([(CLICK, EventType::new(&format!("click{}", prefixes.event_suffix())))]),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::namespace::Namespace;

	#[test]
	fn example_class() {
		let names = Names::new(&Prefixes::new(&Namespace::new("exampleClass").unwrap()));
		assert_eq!(names.selectors.get(NAV_ITEM).unwrap(), ".js-exampleClassNavItem");
		assert_eq!(names.css_modifiers.get(IS_HIDDEN).unwrap(), "example-class--is--hidden");
		assert_eq!(names.events.get(CLICK).unwrap().to_string(), "click.exampleClass");
		assert_eq!(names.events.len(), 1);
	}
}
