//! Browser collaborators on top of `web-sys`.

mod dom;
mod fetch;
mod spawn;
mod timer;

pub use dom::{WebDom, WebElements};
pub use fetch::FetchTransport;
pub use spawn::WebSpawner;
pub use timer::WindowTimer;

use crate::{component::Collaborators, sink::Sink, template::Template};
use std::rc::Rc;

/// Collaborators for the current window's document: `fetch`, `setTimeout` and the microtask queue.
///
/// [`None`] iff there is no window or document.
#[must_use]
pub fn collaborators(template: Rc<dyn Template>, sink: Rc<dyn Sink>) -> Option<Collaborators<WebDom>> {
	Some(Collaborators {
		dom: WebDom::new()?,
		template,
		transport: Rc::new(FetchTransport),
		timer: Rc::new(WindowTimer),
		spawner: Rc::new(WebSpawner),
		sink,
	})
}
