//! The template collaborator and the data the component renders with.

use crate::error::TemplateError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Renders named templates to markup. Implementations must be pure and synchronous.
pub trait Template {
	/// # Errors
	///
	/// Iff `name` is unknown or `data` doesn't fit the template.
	fn render(&self, name: &str, data: &Value) -> Result<String, TemplateError>;
}

impl<F> Template for F
where
	F: Fn(&str, &Value) -> Result<String, TemplateError>,
{
	fn render(&self, name: &str, data: &Value) -> Result<String, TemplateError> {
		self(name, data)
	}
}

/// Name of the component's root template.
pub const EXAMPLE_TEMPLATE: &str = "ExampleTemplate";

/// A navigation link shown by the component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
	pub url: String,
	pub label: String,
}

/// The complete data passed to [`EXAMPLE_TEMPLATE`]. Nothing else is visible to the template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellData<'a> {
	pub css_class_prefix: &'a str,
	/// The selector prefix without its leading `.`.
	pub js_prefix: &'a str,
	#[serde(rename = "navURLs")]
	pub nav_urls: &'a [NavLink],
	pub props: ShellProps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShellProps {
	pub fu: bool,
	pub unimportant: bool,
}

/// Built-in renderer for [`EXAMPLE_TEMPLATE`].
///
/// Produces one `<nav>` root holding a `NavItem` anchor per link:
///
/// ```html
/// <nav class="example-class__nav" data-fu="true"><a class="example-class__nav-item js-exampleClassNavItem" href="http://example.com">Example</a></nav>
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellTemplate;

impl Template for ShellTemplate {
	fn render(&self, name: &str, data: &Value) -> Result<String, TemplateError> {
		if name != EXAMPLE_TEMPLATE {
			return Err(TemplateError::new(name, "unknown template"));
		}
		let field = |key: &str| data.get(key).and_then(Value::as_str).ok_or_else(|| TemplateError::new(name, format!("missing string {:?}", key)));
		let css = escape(field("cssClassPrefix")?);
		let js = escape(field("jsPrefix")?);
		let fu = data.pointer("/props/fu").and_then(Value::as_bool).unwrap_or_default();

		let mut markup = format!(r#"<nav class="{}nav" data-fu="{}">"#, css, fu);
		for link in data.get("navURLs").and_then(Value::as_array).into_iter().flatten() {
			let link: NavLink = serde_json::from_value(link.clone()).map_err(|error| TemplateError::new(name, error.to_string()))?;
			markup.push_str(&format!(
				r#"<a class="{}nav-item {}NavItem" href="{}">{}</a>"#,
				css,
				js,
				escape(&link.url),
				escape(&link.label)
			));
		}
		markup.push_str("</nav>");
		Ok(markup)
	}
}

/// Escapes text for use in element content and quoted attribute values.
#[must_use]
pub fn escape(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			c => escaped.push(c),
		}
	}
	escaped
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn shell_data_keys() {
		let links = [NavLink {
			url: "http://example.com".to_owned(),
			label: "Example".to_owned(),
		}];
		let data = serde_json::to_value(ShellData {
			css_class_prefix: "example-class__",
			js_prefix: "js-exampleClass",
			nav_urls: &links,
			props: ShellProps { fu: true, unimportant: true },
		})
		.unwrap();
		assert_eq!(
			data,
			json!({
				"cssClassPrefix": "example-class__",
				"jsPrefix": "js-exampleClass",
				"navURLs": [{ "url": "http://example.com", "label": "Example" }],
				"props": { "fu": true, "unimportant": true },
			})
		);
	}

	#[test]
	fn shell_template() {
		let markup = ShellTemplate
			.render(
				EXAMPLE_TEMPLATE,
				&json!({
					"cssClassPrefix": "example-class__",
					"jsPrefix": "js-exampleClass",
					"navURLs": [{ "url": "http://example.com/?a=1&b=2", "label": "<Example>" }],
					"props": { "fu": false, "unimportant": true },
				}),
			)
			.unwrap();
		assert_eq!(
			markup,
			r#"<nav class="example-class__nav" data-fu="false"><a class="example-class__nav-item js-exampleClassNavItem" href="http://example.com/?a=1&amp;b=2">&lt;Example&gt;</a></nav>"#
		);
	}

	#[test]
	fn unknown_template() {
		assert!(ShellTemplate.render("Nope", &json!({})).is_err());
	}
}
