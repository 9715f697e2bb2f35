//! Derivation of every collision-relevant prefix from a single namespace.
//!
//! A namespace is camelCase ASCII (`exampleClass`). That restriction makes each derivation injective,
//! so two components with different namespaces can never produce the same selector, CSS class or event namespace.

use crate::error::ConfigError;
use core::fmt::{self, Display, Formatter};

/// A validated component namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
	/// # Errors
	///
	/// Iff `namespace` is empty, doesn't start with an ASCII lowercase letter or contains anything but ASCII alphanumerics.
	pub fn new(namespace: impl Into<String>) -> Result<Self, ConfigError> {
		let namespace = namespace.into();
		let mut chars = namespace.char_indices();
		match chars.next() {
			None => return Err(ConfigError::EmptyNamespace),
			Some((_, first)) if !first.is_ascii_lowercase() => return Err(ConfigError::InvalidNamespaceStart { found: first, namespace }),
			Some(_) => (),
		}
		if let Some((index, found)) = chars.find(|(_, c)| !c.is_ascii_alphanumeric()) {
			return Err(ConfigError::InvalidNamespaceCharacter { namespace, found, index });
		}
		Ok(Self(namespace))
	}

	/// Derives the namespace from a component type name by lowercasing its first character (`ExampleClass` → `exampleClass`).
	///
	/// # Errors
	///
	/// Like [`Namespace::new`].
	pub fn from_type_name(type_name: &str) -> Result<Self, ConfigError> {
		let mut chars = type_name.chars();
		match chars.next() {
			None => Err(ConfigError::EmptyNamespace),
			Some(first) => Self::new(first.to_lowercase().chain(chars).collect::<String>()),
		}
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// `exampleClass` → `example-class`
	#[must_use]
	pub fn kebab_case(&self) -> String {
		let mut kebab = String::with_capacity(self.0.len() + 4);
		for (i, c) in self.0.chars().enumerate() {
			if c.is_ascii_uppercase() {
				if i > 0 {
					kebab.push('-');
				}
				kebab.push(c.to_ascii_lowercase());
			} else {
				kebab.push(c);
			}
		}
		kebab
	}

	/// `exampleClass` → `ExampleClass`
	#[must_use]
	pub fn type_name(&self) -> String {
		let mut chars = self.0.chars();
		chars.next().map(|first| first.to_ascii_uppercase().to_string() + chars.as_str()).unwrap_or_default()
	}
}

impl Display for Namespace {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for Namespace {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

/// Prefixes derived from a [`Namespace`]. There are no setters: the only way to change them is a different namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefixes {
	namespace: Namespace,
	selector_prefix: String,
	css_class_prefix: String,
	css_modifier_prefix: String,
	event_suffix: String,
	log_prefix: String,
}

impl Prefixes {
	#[must_use]
	pub fn new(namespace: &Namespace) -> Self {
		let kebab = namespace.kebab_case();
		Self {
			selector_prefix: format!(".js-{}", namespace),
			css_class_prefix: format!("{}__", kebab),
			css_modifier_prefix: format!("{}--", kebab),
			event_suffix: format!(".{}", namespace),
			log_prefix: format!("[ {} ] -", namespace.type_name()),
			namespace: namespace.clone(),
		}
	}

	#[must_use]
	pub fn namespace(&self) -> &Namespace {
		&self.namespace
	}

	/// `.js-exampleClass`, prepended to every selector the component queries with.
	#[must_use]
	pub fn selector_prefix(&self) -> &str {
		&self.selector_prefix
	}

	/// The selector prefix without its leading `.`, as written into `class` attributes (`js-exampleClass`).
	#[must_use]
	pub fn js_prefix(&self) -> &str {
		&self.selector_prefix[1..]
	}

	/// `example-class__`
	#[must_use]
	pub fn css_class_prefix(&self) -> &str {
		&self.css_class_prefix
	}

	/// `example-class--`
	#[must_use]
	pub fn css_modifier_prefix(&self) -> &str {
		&self.css_modifier_prefix
	}

	/// `.exampleClass`, appended to every event type the component binds.
	#[must_use]
	pub fn event_suffix(&self) -> &str {
		&self.event_suffix
	}

	/// `[ ExampleClass ] -`
	#[must_use]
	pub fn log_prefix(&self) -> &str {
		&self.log_prefix
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn example_class() {
		let prefixes = Prefixes::new(&Namespace::new("exampleClass").unwrap());
		assert_eq!(prefixes.selector_prefix(), ".js-exampleClass");
		assert_eq!(prefixes.js_prefix(), "js-exampleClass");
		assert_eq!(prefixes.css_class_prefix(), "example-class__");
		assert_eq!(prefixes.css_modifier_prefix(), "example-class--");
		assert_eq!(prefixes.event_suffix(), ".exampleClass");
		assert_eq!(prefixes.log_prefix(), "[ ExampleClass ] -");
	}

	#[test]
	fn from_type_name() {
		assert_eq!(Namespace::from_type_name("ExampleClass").unwrap().as_str(), "exampleClass");
		assert_eq!(Namespace::from_type_name("NavBar2").unwrap().kebab_case(), "nav-bar2");
		assert!(matches!(Namespace::from_type_name(""), Err(ConfigError::EmptyNamespace)));
	}

	#[test]
	fn rejects() {
		assert!(matches!(Namespace::new(""), Err(ConfigError::EmptyNamespace)));
		assert!(matches!(Namespace::new("Example"), Err(ConfigError::InvalidNamespaceStart { found: 'E', .. })));
		assert!(matches!(Namespace::new("9lives"), Err(ConfigError::InvalidNamespaceStart { found: '9', .. })));
		assert!(matches!(Namespace::new("example.class"), Err(ConfigError::InvalidNamespaceCharacter { found: '.', index: 7, .. })));
		assert!(matches!(Namespace::new("example class"), Err(ConfigError::InvalidNamespaceCharacter { found: ' ', .. })));
	}

	#[test]
	fn kebab_case_is_injective_for_nearby_names() {
		let a = Namespace::new("fooBar").unwrap();
		let b = Namespace::new("foobar").unwrap();
		assert_ne!(a.kebab_case(), b.kebab_case());
		assert_ne!(Prefixes::new(&a), Prefixes::new(&b));
	}
}
