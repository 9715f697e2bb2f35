//! Where request outcomes end up.

use crate::transport::TransportFailure;
use core::fmt::{self, Display, Formatter};
use serde_json::Value;
use tracing::{error, info};

/// Receives the outcome of each request.
pub trait Sink {
	/// Called synchronously with the parsed response body.
	fn success(&self, value: &Value);

	/// Called once the component's error delay has passed after a failure.
	fn failure(&self, failure: &Failure);
}

/// A failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
	/// The transport rejected.
	Transport(TransportFailure),
	/// The transport resolved with a body that isn't JSON.
	Parse { body: String, message: String },
}

impl Display for Failure {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Failure::Transport(failure) => Display::fmt(failure, f),
			Failure::Parse { message, .. } => write!(f, "Invalid response body: {}", message),
		}
	}
}

impl From<TransportFailure> for Failure {
	fn from(failure: TransportFailure) -> Self {
		Failure::Transport(failure)
	}
}

/// Reports through `tracing`, prefixed with the component's log prefix.
///
/// Payloads are only logged with the `dangerous-logging` feature.
#[derive(Debug, Clone)]
pub struct TracingSink {
	log_prefix: String,
}

impl TracingSink {
	pub fn new(log_prefix: impl Into<String>) -> Self {
		Self { log_prefix: log_prefix.into() }
	}
}

impl Sink for TracingSink {
	fn success(&self, value: &Value) {
		if cfg!(feature = "dangerous-logging") {
			info!("{} {}", self.log_prefix, value);
		} else {
			info!("{} Received a {} response.", self.log_prefix, json_kind(value));
		}
	}

	fn failure(&self, failure: &Failure) {
		if cfg!(feature = "dangerous-logging") {
			error!("{} {}", self.log_prefix, failure);
		} else {
			match failure {
				Failure::Transport(_) => error!("{} The request failed.", self.log_prefix),
				Failure::Parse { body, .. } => error!("{} Received an unparsable response ({} bytes).", self.log_prefix, body.len()),
			}
		}
	}
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}
