//! The transport collaborator.

use core::fmt::{self, Display, Formatter};
use futures::future::LocalBoxFuture;
use serde_json::{Map, Value};

/// Issues requests. Each call is one request; there is no cancellation.
pub trait Transport {
	/// Resolves with the raw response body, or rejects with an opaque [`TransportFailure`].
	fn request(&self, request: Request) -> LocalBoxFuture<'static, Result<String, TransportFailure>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
	Get,
	Post,
}

impl Default for Method {
	fn default() -> Self {
		Method::Get
	}
}

impl Method {
	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
	pub url: String,
	pub method: Method,
	pub data: Map<String, Value>,
}

impl Request {
	#[must_use]
	pub fn get(url: impl Into<String>, data: Map<String, Value>) -> Self {
		Self {
			url: url.into(),
			method: Method::Get,
			data,
		}
	}

	/// `data` as `application/x-www-form-urlencoded`.
	///
	/// Strings are encoded as-is, `null` as an empty value and everything else as its JSON text.
	#[must_use]
	pub fn form_data(&self) -> String {
		let mut serializer = url::form_urlencoded::Serializer::new(String::new());
		for (key, value) in &self.data {
			match value {
				Value::String(string) => serializer.append_pair(key, string),
				Value::Null => serializer.append_pair(key, ""),
				other => serializer.append_pair(key, &other.to_string()),
			};
		}
		serializer.finish()
	}

	/// The URL to fetch: for [`Method::Get`], [`Request::form_data`] is appended as query string.
	#[must_use]
	pub fn effective_url(&self) -> String {
		if self.method != Method::Get || self.data.is_empty() {
			return self.url.clone();
		}
		let separator = if self.url.contains('?') { '&' } else { '?' };
		format!("{}{}{}", self.url, separator, self.form_data())
	}
}

/// Whatever the transport rejected with. Only its text is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure(String);

impl TransportFailure {
	pub fn new(message: impl Into<String>) -> Self {
		Self(message.into())
	}

	#[must_use]
	pub fn message(&self) -> &str {
		&self.0
	}
}

impl Display for TransportFailure {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
