//! Component configuration.
//!
//! Callers override defaults either through [`ComponentConfig::builder`] or with a [`ComponentOptions`] bag.
//! Neither can touch the derived prefixes, which only follow from the namespace.

use crate::{error::ConfigError, namespace::Namespace, template::NavLink};
use core::time::Duration;
use serde::Deserialize;
use serde_json::{Map, Value};

pub const DEFAULT_NAMESPACE: &str = "exampleClass";
pub const DEFAULT_NAV_ITEM_URL: &str = "http://example.com/api/v1/is/fake";
pub const DEFAULT_ERROR_DELAY: Duration = Duration::from_millis(1000);

/// Endpoints the component calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Urls {
	pub nav_item: String,
}

/// Validated configuration of a [`NamespacedComponent`](`crate::component::NamespacedComponent`).
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentConfig {
	namespace: Namespace,
	urls: Urls,
	error_delay: Duration,
	nav_item_data: Map<String, Value>,
	nav_links: Vec<NavLink>,
	random_prop: bool,
	mount: Option<String>,
}

impl ComponentConfig {
	#[must_use]
	pub fn builder() -> ComponentConfigBuilder {
		ComponentConfigBuilder::default()
	}

	/// Applies `options` over the defaults.
	///
	/// # Errors
	///
	/// Iff the result doesn't validate.
	pub fn from_options(options: ComponentOptions) -> Result<Self, ConfigError> {
		let ComponentOptions {
			namespace,
			urls,
			error_wait,
			nav_item_data,
			nav_urls,
			random_prop,
			mount,
		} = options;

		let mut builder = Self::builder();
		if let Some(namespace) = namespace {
			builder = builder.namespace(namespace);
		}
		if let Some(nav_item) = urls.and_then(|urls| urls.nav_item) {
			builder = builder.nav_item_url(nav_item);
		}
		if let Some(error_wait) = error_wait {
			builder = builder.error_delay(Duration::from_millis(error_wait));
		}
		if let Some(nav_item_data) = nav_item_data {
			builder = builder.nav_item_data(nav_item_data);
		}
		if let Some(nav_urls) = nav_urls {
			builder = builder.nav_links(nav_urls);
		}
		if let Some(random_prop) = random_prop {
			builder = builder.random_prop(random_prop);
		}
		if let Some(mount) = mount {
			builder = builder.mount(mount);
		}
		builder.build()
	}

	#[must_use]
	pub fn namespace(&self) -> &Namespace {
		&self.namespace
	}

	#[must_use]
	pub fn urls(&self) -> &Urls {
		&self.urls
	}

	/// How long failures wait before they are reported.
	#[must_use]
	pub fn error_delay(&self) -> Duration {
		self.error_delay
	}

	/// The data sent along with each nav item request.
	#[must_use]
	pub fn nav_item_data(&self) -> &Map<String, Value> {
		&self.nav_item_data
	}

	#[must_use]
	pub fn nav_links(&self) -> &[NavLink] {
		&self.nav_links
	}

	/// Forwarded to the template as `props.fu`.
	#[must_use]
	pub fn random_prop(&self) -> bool {
		self.random_prop
	}

	/// Selector of the element the rendered root is appended to, if any.
	#[must_use]
	pub fn mount(&self) -> Option<&str> {
		self.mount.as_deref()
	}
}

#[derive(Debug, Clone)]
pub struct ComponentConfigBuilder {
	namespace: String,
	nav_item_url: String,
	error_delay: Duration,
	nav_item_data: Map<String, Value>,
	nav_links: Vec<NavLink>,
	random_prop: bool,
	mount: Option<String>,
}

impl Default for ComponentConfigBuilder {
	fn default() -> Self {
		let mut nav_item_data = Map::new();
		nav_item_data.insert("fu".to_owned(), Value::from("bar"));
		Self {
			namespace: DEFAULT_NAMESPACE.to_owned(),
			nav_item_url: DEFAULT_NAV_ITEM_URL.to_owned(),
			error_delay: DEFAULT_ERROR_DELAY,
			nav_item_data,
			nav_links: vec![NavLink {
				url: "http://example.com".to_owned(),
				label: "Example".to_owned(),
			}],
			random_prop: true,
			mount: None,
		}
	}
}

impl ComponentConfigBuilder {
	#[must_use]
	pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
		self.namespace = namespace.into();
		self
	}

	#[must_use]
	pub fn nav_item_url(mut self, url: impl Into<String>) -> Self {
		self.nav_item_url = url.into();
		self
	}

	#[must_use]
	pub fn error_delay(mut self, error_delay: Duration) -> Self {
		self.error_delay = error_delay;
		self
	}

	#[must_use]
	pub fn nav_item_data(mut self, data: Map<String, Value>) -> Self {
		self.nav_item_data = data;
		self
	}

	#[must_use]
	pub fn nav_links(mut self, nav_links: Vec<NavLink>) -> Self {
		self.nav_links = nav_links;
		self
	}

	#[must_use]
	pub fn random_prop(mut self, random_prop: bool) -> Self {
		self.random_prop = random_prop;
		self
	}

	#[must_use]
	pub fn mount(mut self, selector: impl Into<String>) -> Self {
		self.mount = Some(selector.into());
		self
	}

	/// # Errors
	///
	/// Iff the namespace is invalid or the URL is empty.
	pub fn build(self) -> Result<ComponentConfig, ConfigError> {
		let namespace = Namespace::new(self.namespace)?;
		if self.nav_item_url.is_empty() {
			return Err(ConfigError::EmptyUrl { name: "NAV_ITEM" });
		}
		Ok(ComponentConfig {
			namespace,
			urls: Urls { nav_item: self.nav_item_url },
			error_delay: self.error_delay,
			nav_item_data: self.nav_item_data,
			nav_links: self.nav_links,
			random_prop: self.random_prop,
			mount: self.mount,
		})
	}
}

/// A caller-supplied override bag, usually deserialized from JSON.
///
/// Unknown keys are rejected, which includes every derived field (`jsPrefix`, `cssClassPrefix`, `eventSuffix`, …).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ComponentOptions {
	pub namespace: Option<String>,
	pub urls: Option<UrlOptions>,
	/// Error delay in milliseconds.
	pub error_wait: Option<u64>,
	pub nav_item_data: Option<Map<String, Value>>,
	#[serde(rename = "navURLs")]
	pub nav_urls: Option<Vec<NavLink>>,
	pub random_prop: Option<bool>,
	pub mount: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
pub struct UrlOptions {
	pub nav_item: Option<String>,
}

impl ComponentOptions {
	/// # Errors
	///
	/// Iff `json` isn't an options object.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		Ok(serde_json::from_str(json)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let config = ComponentConfig::builder().build().unwrap();
		assert_eq!(config.namespace().as_str(), "exampleClass");
		assert_eq!(config.urls().nav_item, DEFAULT_NAV_ITEM_URL);
		assert_eq!(config.error_delay(), Duration::from_millis(1000));
		assert_eq!(config.nav_item_data().get("fu"), Some(&Value::from("bar")));
		assert_eq!(config.nav_links().len(), 1);
		assert!(config.random_prop());
		assert_eq!(config.mount(), None);
	}

	#[test]
	fn options_override_defaults() {
		let options = ComponentOptions::from_json(r##"{ "namespace": "siteNav", "urls": { "NAV_ITEM": "/nav" }, "errorWait": 250, "mount": "#app" }"##).unwrap();
		let config = ComponentConfig::from_options(options).unwrap();
		assert_eq!(config.namespace().as_str(), "siteNav");
		assert_eq!(config.urls().nav_item, "/nav");
		assert_eq!(config.error_delay(), Duration::from_millis(250));
		assert_eq!(config.mount(), Some("#app"));
		assert!(config.random_prop());
	}

	#[test]
	fn derived_fields_are_not_options() {
		for json in [r#"{ "jsPrefix": ".js-other" }"#, r#"{ "cssClassPrefix": "x__" }"#, r#"{ "eventSuffix": ".x" }"#] {
			assert!(matches!(ComponentOptions::from_json(json), Err(ConfigError::Options(_))), "{}", json);
		}
	}

	#[test]
	fn invalid() {
		assert!(matches!(ComponentConfig::builder().namespace("").build(), Err(ConfigError::EmptyNamespace)));
		assert!(matches!(ComponentConfig::builder().nav_item_url("").build(), Err(ConfigError::EmptyUrl { .. })));
		let options = ComponentOptions::from_json(r#"{ "namespace": "" }"#).unwrap();
		assert!(matches!(ComponentConfig::from_options(options), Err(ConfigError::EmptyNamespace)));
	}
}
