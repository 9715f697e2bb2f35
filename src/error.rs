use thiserror::Error;

/// Crate-level error, returned by construction and initialization.
///
/// Transport failures are deliberately absent: they are recovered by the component and reported to its [`Sink`](`crate::sink::Sink`).
#[derive(Debug, Error)]
pub enum Error {
	#[error(transparent)]
	Config(#[from] ConfigError),
	#[error(transparent)]
	Render(#[from] RenderError),
	#[error("Failed to bind listeners: {0}")]
	Listeners(#[from] DomError),
}

/// Invalid configuration. A component is never constructed from one of these.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("The namespace must not be empty")]
	EmptyNamespace,
	#[error("The namespace {namespace:?} must start with an ASCII lowercase letter but starts with {found:?}")]
	InvalidNamespaceStart { namespace: String, found: char },
	#[error("The namespace {namespace:?} contains {found:?} at byte {index}; only ASCII letters and digits are allowed")]
	InvalidNamespaceCharacter { namespace: String, found: char, index: usize },
	#[error("The URL {name:?} must not be empty")]
	EmptyUrl { name: &'static str },
	#[error("Invalid component options: {0}")]
	Options(#[from] serde_json::Error),
}

/// Failure to produce or place the component's root markup.
#[derive(Debug, Error)]
pub enum RenderError {
	#[error(transparent)]
	Template(#[from] TemplateError),
	#[error("Rendered markup could not be loaded: {0}")]
	Markup(#[source] DomError),
	#[error("Template {template:?} rendered no root element")]
	EmptyRoot { template: &'static str },
	#[error("No mount point matches {selector:?}")]
	MountNotFound { selector: String },
	#[error("Failed to mount the root element: {0}")]
	Mount(#[source] DomError),
}

/// Raised by a [`Template`](`crate::template::Template`) collaborator.
#[derive(Debug, Error)]
#[error("Template {name:?} failed: {message}")]
pub struct TemplateError {
	pub name: String,
	pub message: String,
}

impl TemplateError {
	pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			message: message.into(),
		}
	}
}

/// Raised by a [`Dom`](`crate::dom::Dom`) or [`ElementSet`](`crate::dom::ElementSet`) collaborator.
#[derive(Debug, Error)]
pub enum DomError {
	#[error("Malformed markup ({count} parse error(s)), first: {message}")]
	Markup { count: usize, message: String },
	#[error("Unsupported selector {selector:?}: {message}")]
	InvalidSelector { selector: String, message: String },
	#[error("Too many (more than 65k) active listeners for {event_type:?} on one element")]
	ListenerSaturated { event_type: String },
	#[error("Cannot append to an empty element set")]
	EmptyTarget,
	#[error("JavaScript exception: {0}")]
	Js(String),
}
