//! Simple selectors: `tag`, `*`, `.class`, `#id`, compounds of those (`a.nav-item#first`) and comma-separated groups.
//!
//! Combinators, attribute selectors and pseudo-classes are rejected.

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Selector(Vec<Compound>);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
	tag: Option<String>,
	ids: Vec<String>,
	classes: Vec<String>,
}

fn is_name_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl Selector {
	pub fn parse(selector: &str) -> Result<Self, String> {
		let compounds = selector.split(',').map(|group| Compound::parse(group.trim())).collect::<Result<Vec<_>, _>>()?;
		Ok(Self(compounds))
	}

	pub fn matches<'a>(&self, tag: &str, mut attribute: impl FnMut(&str) -> Option<&'a str>) -> bool {
		let id = attribute("id");
		let class = attribute("class").unwrap_or_default();
		self.0.iter().any(|compound| compound.matches(tag, id, class))
	}
}

impl Compound {
	fn parse(group: &str) -> Result<Self, String> {
		if group.is_empty() {
			return Err("empty selector".to_owned());
		}

		let mut compound = Compound::default();
		let mut rest = group;
		let head_len = rest.find(|c: char| !is_name_char(c) && c != '*').unwrap_or(rest.len());
		match &rest[..head_len] {
			"" | "*" => (),
			tag if tag.contains('*') => return Err(format!("invalid tag {:?}", tag)),
			tag => compound.tag = Some(tag.to_ascii_lowercase()),
		}
		rest = &rest[head_len..];

		while let Some(sigil) = rest.chars().next() {
			let body = &rest[sigil.len_utf8()..];
			let name_len = body.find(|c: char| !is_name_char(c)).unwrap_or(body.len());
			let name = &body[..name_len];
			match sigil {
				'.' if !name.is_empty() => compound.classes.push(name.to_owned()),
				'#' if !name.is_empty() => compound.ids.push(name.to_owned()),
				_ => return Err(format!("unsupported selector syntax at {:?}", rest)),
			}
			rest = &body[name_len..];
		}
		Ok(compound)
	}

	fn matches(&self, tag: &str, id: Option<&str>, class: &str) -> bool {
		self.tag.as_ref().map_or(true, |expected| expected.eq_ignore_ascii_case(tag))
			&& self.ids.iter().all(|expected| id == Some(expected.as_str()))
			&& self.classes.iter().all(|expected| class.split_ascii_whitespace().any(|class| class == expected))
	}
}

#[cfg(test)]
mod tests {
	use super::Selector;

	fn matches(selector: &str, tag: &str, id: Option<&'static str>, class: &'static str) -> bool {
		Selector::parse(selector).unwrap().matches(tag, |name| match name {
			"id" => id,
			"class" => Some(class),
			_ => None,
		})
	}

	#[test]
	fn simple() {
		assert!(matches(".js-exampleClassNavItem", "a", None, "example-class__nav-item js-exampleClassNavItem"));
		assert!(!matches(".js-exampleClassNav", "a", None, "js-exampleClassNavItem"));
		assert!(matches("#app", "div", Some("app"), ""));
		assert!(matches("NAV", "nav", None, ""));
		assert!(matches("*", "nav", None, ""));
		assert!(matches("a.x.y#z", "a", Some("z"), "y x"));
		assert!(!matches("a.x.y#z", "a", Some("z"), "x"));
		assert!(matches("b, .x", "a", None, "x"));
	}

	#[test]
	fn unsupported() {
		for selector in ["", "div p", "a > b", "[href]", "a:hover", ".", "a,"] {
			assert!(Selector::parse(selector).is_err(), "{:?}", selector);
		}
	}
}
